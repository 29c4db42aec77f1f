//! Embedded image extraction and decoding.

use tracing::{debug, warn};

use crate::error::AssetError;
use crate::glb::document::ImageSlot;
use crate::texture::{TextureAsset, TextureRole};

/// Slice the raw image bytes for a slot out of the binary chunk.
pub fn extract<'a>(bin: &'a [u8], slot: &ImageSlot) -> Result<&'a [u8], AssetError> {
    let offset = slot.byte_offset as usize;
    let len = slot.byte_length as usize;
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= bin.len())
        .ok_or(AssetError::BufferOverrun {
            offset,
            len,
            buffer_len: bin.len(),
        })?;
    Ok(&bin[offset..end])
}

/// Decode raw image bytes (PNG/JPEG) into an RGBA8 texture for the given
/// role. An undecodable payload degrades to the role's placeholder swatch;
/// the model still gets a bindable image either way.
pub fn decode(bytes: &[u8], role: TextureRole) -> TextureAsset {
    match image::load_from_memory(bytes) {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            let (width, height) = rgba.dimensions();
            debug!("decoded {:?} image: {}x{}", role, width, height);
            TextureAsset {
                role,
                width,
                height,
                data: rgba.into_raw(),
                placeholder: false,
            }
        }
        Err(e) => {
            warn!("undecodable {:?} image ({e}); using placeholder", role);
            TextureAsset::placeholder(role)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(offset: u32, length: u32) -> ImageSlot {
        ImageSlot {
            role: TextureRole::BaseColor,
            byte_offset: offset,
            byte_length: length,
        }
    }

    #[test]
    fn extracts_the_exact_byte_range() {
        let bin = [0u8, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(extract(&bin, &slot(2, 4)).unwrap(), &[2, 3, 4, 5]);
    }

    #[test]
    fn overrun_slot_is_an_error() {
        let bin = [0u8; 8];
        assert!(matches!(
            extract(&bin, &slot(4, 8)),
            Err(AssetError::BufferOverrun { buffer_len: 8, .. })
        ));
        assert!(matches!(
            extract(&bin, &slot(u32::MAX, u32::MAX)),
            Err(AssetError::BufferOverrun { .. })
        ));
    }

    #[test]
    fn decodes_a_png_payload() {
        let mut png = Vec::new();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]))
            .write_to(
                &mut std::io::Cursor::new(&mut png),
                image::ImageFormat::Png,
            )
            .unwrap();

        let texture = decode(&png, TextureRole::BaseColor);
        assert!(!texture.placeholder);
        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(&texture.data[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn garbage_bytes_degrade_to_placeholder() {
        let texture = decode(b"definitely not an image", TextureRole::Normal);
        assert!(texture.placeholder);
        assert_eq!(texture.data, TextureAsset::placeholder(TextureRole::Normal).data);
    }
}
