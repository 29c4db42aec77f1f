//! Typed attribute extraction from the binary chunk.
//!
//! Pure functions over `(bin, offset, count)`. All reads are bounds-checked
//! up front; a range that does not fit is a `BufferOverrun`, never a panic.

use glam::{Vec2, Vec3};

use crate::error::AssetError;

/// Bytes per vec3 of f32 components, tightly packed.
const VEC3_STRIDE: usize = 12;
/// Primary texcoord stride: two f32 components per vertex.
const TEXCOORD_F32_STRIDE: usize = 8;
/// Fallback texcoord stride: two normalized u16 components per vertex.
const TEXCOORD_U16_STRIDE: usize = 4;

/// Check that `count` elements of `elem_size` bytes starting at `offset` lie
/// inside `bin`, guarding against address-space overflow.
fn check_range(bin: &[u8], offset: usize, count: usize, elem_size: usize) -> Result<(), AssetError> {
    let overrun = || AssetError::BufferOverrun {
        offset,
        len: count.saturating_mul(elem_size),
        buffer_len: bin.len(),
    };
    let len = count.checked_mul(elem_size).ok_or_else(overrun)?;
    let end = offset.checked_add(len).ok_or_else(overrun)?;
    if end > bin.len() {
        return Err(overrun());
    }
    Ok(())
}

fn read_f32(bin: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([bin[at], bin[at + 1], bin[at + 2], bin[at + 3]])
}

fn read_u32(bin: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bin[at], bin[at + 1], bin[at + 2], bin[at + 3]])
}

fn read_u16(bin: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bin[at], bin[at + 1]])
}

/// Extract `count` tightly packed little-endian f32 triples.
pub fn extract_vec3s(bin: &[u8], offset: usize, count: usize) -> Result<Vec<Vec3>, AssetError> {
    check_range(bin, offset, count, VEC3_STRIDE)?;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let at = offset + i * VEC3_STRIDE;
        out.push(Vec3::new(
            read_f32(bin, at),
            read_f32(bin, at + 4),
            read_f32(bin, at + 8),
        ));
    }
    Ok(out)
}

/// Extract `count` little-endian u32 index values.
pub fn extract_indices(bin: &[u8], offset: usize, count: usize) -> Result<Vec<u32>, AssetError> {
    check_range(bin, offset, count, 4)?;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        out.push(read_u32(bin, offset + i * 4));
    }
    Ok(out)
}

/// Extract `count` texture coordinate pairs. Tries the f32-pair stride
/// first; if that range does not fit, retries as normalized u16 pairs
/// before giving up.
pub fn extract_tex_coords(bin: &[u8], offset: usize, count: usize) -> Result<Vec<Vec2>, AssetError> {
    if check_range(bin, offset, count, TEXCOORD_F32_STRIDE).is_ok() {
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let at = offset + i * TEXCOORD_F32_STRIDE;
            out.push(Vec2::new(read_f32(bin, at), read_f32(bin, at + 4)));
        }
        return Ok(out);
    }

    check_range(bin, offset, count, TEXCOORD_U16_STRIDE)?;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let at = offset + i * TEXCOORD_U16_STRIDE;
        out.push(Vec2::new(
            read_u16(bin, at) as f32 / u16::MAX as f32,
            read_u16(bin, at + 2) as f32 / u16::MAX as f32,
        ));
    }
    Ok(out)
}
