use std::path::PathBuf;

/// Errors that can occur while decoding a model container.
///
/// None of these reach callers of the cache as failures: the assembler
/// converts every one of them into the default-cube fallback and a
/// [`LoadDiagnostic`](crate::LoadDiagnostic).
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("not a model container: magic {0:#010x}")]
    InvalidMagic(u32),

    #[error("unsupported container version {0} (expected 2)")]
    UnsupportedVersion(u32),

    #[error("container truncated: {needed} bytes declared, {available} available")]
    TruncatedContainer { needed: usize, available: usize },

    #[error("metadata field missing: {0}")]
    MissingField(&'static str),

    #[error("metadata field '{field}' malformed: {detail}")]
    MalformedNumber { field: &'static str, detail: String },

    #[error("buffer overrun: {offset} + {len} bytes exceeds {buffer_len}-byte buffer")]
    BufferOverrun {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    #[error("mesh invariant violated: {0}")]
    InvalidMesh(&'static str),

    #[error("cannot read model file '{}'", .0.display())]
    FileUnavailable(PathBuf, #[source] std::io::Error),
}
