//! Container splitting: header validation and chunk extraction.
//!
//! Layout (all integers little-endian):
//! 12-byte header `[magic][version][total_length]`, then a metadata chunk
//! `[length][type][bytes...]` (UTF-8 JSON), then a binary chunk
//! `[length][type][bytes...]` (raw).

use crate::error::AssetError;

/// "glTF" in ASCII.
pub const CONTAINER_MAGIC: u32 = 0x4654_6C67;
/// The only container version this decoder accepts.
pub const SUPPORTED_VERSION: u32 = 2;
/// "JSON" chunk type tag.
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// "BIN\0" chunk type tag.
pub const CHUNK_BIN: u32 = 0x004E_4942;

/// A validated container, split into borrowed chunk slices. No chunk bytes
/// are copied; the container borrows from the raw input.
#[derive(Debug)]
pub struct Container<'a> {
    pub version: u32,
    pub total_length: u32,
    pub json: &'a [u8],
    pub bin: &'a [u8],
}

/// Read a little-endian u32 at `at`, or report how many bytes were needed.
fn read_u32(raw: &[u8], at: usize) -> Result<u32, AssetError> {
    let end = at.checked_add(4).ok_or(AssetError::TruncatedContainer {
        needed: usize::MAX,
        available: raw.len(),
    })?;
    let bytes = raw
        .get(at..end)
        .ok_or(AssetError::TruncatedContainer {
            needed: end,
            available: raw.len(),
        })?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read one `[length][type]` chunk header at `at` and return the chunk body
/// together with the offset just past it.
fn read_chunk(raw: &[u8], at: usize) -> Result<(u32, &[u8], usize), AssetError> {
    let length = read_u32(raw, at)? as usize;
    let type_tag = read_u32(raw, at + 4)?;
    let body_start = at + 8;
    let body_end = body_start
        .checked_add(length)
        .ok_or(AssetError::TruncatedContainer {
            needed: usize::MAX,
            available: raw.len(),
        })?;
    let body = raw
        .get(body_start..body_end)
        .ok_or(AssetError::TruncatedContainer {
            needed: body_end,
            available: raw.len(),
        })?;
    Ok((type_tag, body, body_end))
}

/// Validate the header and split the container into its metadata and binary
/// chunks.
pub fn read(raw: &[u8]) -> Result<Container<'_>, AssetError> {
    let magic = read_u32(raw, 0)?;
    if magic != CONTAINER_MAGIC {
        return Err(AssetError::InvalidMagic(magic));
    }

    let version = read_u32(raw, 4)?;
    if version != SUPPORTED_VERSION {
        return Err(AssetError::UnsupportedVersion(version));
    }

    let total_length = read_u32(raw, 8)?;
    if total_length as usize > raw.len() {
        return Err(AssetError::TruncatedContainer {
            needed: total_length as usize,
            available: raw.len(),
        });
    }
    // Chunks must lie within the declared container length, not just the
    // input buffer.
    let raw = &raw[..total_length as usize];

    let (first_tag, json, after_json) = read_chunk(raw, 12)?;
    if first_tag != CHUNK_JSON {
        return Err(AssetError::MissingField("JSON chunk"));
    }

    let (second_tag, bin, _) = read_chunk(raw, after_json)?;
    if second_tag != CHUNK_BIN {
        return Err(AssetError::MissingField("BIN chunk"));
    }

    Ok(Container {
        version,
        total_length,
        json,
        bin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(magic: u32, version: u32, json: &[u8], bin: &[u8]) -> Vec<u8> {
        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut raw = Vec::with_capacity(total);
        raw.extend_from_slice(&magic.to_le_bytes());
        raw.extend_from_slice(&version.to_le_bytes());
        raw.extend_from_slice(&(total as u32).to_le_bytes());
        raw.extend_from_slice(&(json.len() as u32).to_le_bytes());
        raw.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        raw.extend_from_slice(json);
        raw.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        raw.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        raw.extend_from_slice(bin);
        raw
    }

    #[test]
    fn splits_well_formed_container() {
        let raw = build(CONTAINER_MAGIC, 2, b"{}", &[1, 2, 3, 4]);
        let container = read(&raw).unwrap();
        assert_eq!(container.json, b"{}");
        assert_eq!(container.bin, &[1, 2, 3, 4]);
        assert_eq!(container.version, 2);
    }

    #[test]
    fn rejects_empty_input_as_truncated() {
        match read(&[]) {
            Err(AssetError::TruncatedContainer { available: 0, .. }) => {}
            other => panic!("expected TruncatedContainer, got {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_magic() {
        let raw = build(0xDEAD_BEEF, 2, b"{}", &[]);
        match read(&raw) {
            Err(AssetError::InvalidMagic(0xDEAD_BEEF)) => {}
            other => panic!("expected InvalidMagic, got {:?}", other),
        }
    }

    #[test]
    fn rejects_wrong_version() {
        let raw = build(CONTAINER_MAGIC, 1, b"{}", &[]);
        match read(&raw) {
            Err(AssetError::UnsupportedVersion(1)) => {}
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn rejects_chunk_longer_than_input() {
        let mut raw = build(CONTAINER_MAGIC, 2, b"{}", &[]);
        // Inflate the JSON chunk length past the end of the buffer.
        raw[12..16].copy_from_slice(&1000u32.to_le_bytes());
        // Keep the declared total consistent so the chunk check triggers.
        let total = raw.len() as u32;
        raw[8..12].copy_from_slice(&total.to_le_bytes());
        match read(&raw) {
            Err(AssetError::TruncatedContainer { .. }) => {}
            other => panic!("expected TruncatedContainer, got {:?}", other),
        }
    }

    #[test]
    fn rejects_chunks_past_declared_total() {
        // Declared total ends two bytes into the BIN chunk body even though
        // the input buffer itself is long enough.
        let mut raw = build(CONTAINER_MAGIC, 2, b"{}", &[1, 2, 3, 4]);
        let total = (raw.len() - 2) as u32;
        raw[8..12].copy_from_slice(&total.to_le_bytes());
        match read(&raw) {
            Err(AssetError::TruncatedContainer { available, .. }) => {
                assert_eq!(available, total as usize);
            }
            other => panic!("expected TruncatedContainer, got {:?}", other),
        }
    }

    #[test]
    fn rejects_declared_total_past_end() {
        let mut raw = build(CONTAINER_MAGIC, 2, b"{}", &[]);
        raw[8..12].copy_from_slice(&10_000u32.to_le_bytes());
        assert!(matches!(
            read(&raw),
            Err(AssetError::TruncatedContainer { needed: 10_000, .. })
        ));
    }

    #[test]
    fn rejects_swapped_chunk_order() {
        let total = 12 + 8;
        let mut raw = Vec::new();
        raw.extend_from_slice(&CONTAINER_MAGIC.to_le_bytes());
        raw.extend_from_slice(&2u32.to_le_bytes());
        raw.extend_from_slice(&(total as u32).to_le_bytes());
        raw.extend_from_slice(&0u32.to_le_bytes());
        raw.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        match read(&raw) {
            Err(AssetError::MissingField("JSON chunk")) => {}
            other => panic!("expected MissingField, got {:?}", other),
        }
    }
}
