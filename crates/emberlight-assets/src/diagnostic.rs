use std::fmt;
use std::path::PathBuf;

use crate::error::AssetError;

/// Pipeline stage at which a degraded load was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    /// Reading the model file from disk.
    ReadFile,
    /// Splitting the container into metadata and binary chunks.
    ReadContainer,
    /// Resolving counts, offsets and image slots from the metadata chunk.
    ScanMetadata,
    /// Extracting typed attribute arrays from the binary chunk.
    ExtractGeometry,
    /// Extracting and decoding embedded images.
    ExtractImages,
    /// Post-assembly mesh invariant checks.
    Validate,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadStage::ReadFile => "read-file",
            LoadStage::ReadContainer => "read-container",
            LoadStage::ScanMetadata => "scan-metadata",
            LoadStage::ExtractGeometry => "extract-geometry",
            LoadStage::ExtractImages => "extract-images",
            LoadStage::Validate => "validate",
        };
        f.write_str(name)
    }
}

/// Structured report of a load that fell back to a placeholder or the
/// default cube. The functional return value of a load is always a usable
/// model; this is the only caller-visible failure signal.
#[derive(Debug)]
pub struct LoadDiagnostic {
    pub path: PathBuf,
    pub stage: LoadStage,
    pub error: AssetError,
}

impl fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "degraded load of '{}' at {}: {}",
            self.path.display(),
            self.stage,
            self.error
        )
    }
}
