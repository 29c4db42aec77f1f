//! Core types used throughout the Emberlight engine

use serde::{Deserialize, Serialize};

/// RGBA color with floating point components (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Create a color from RGB values (alpha = 1.0)
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA values
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a hex value (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Convert to an array [r, g, b, a]
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Convert to 8-bit RGBA, clamping each component to [0, 1]
    pub fn to_rgba8(&self) -> [u8; 4] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Opaque handle to a GPU vertex/index buffer pair created by the rendering
/// backend for a cached model. The asset layer never dereferences it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GpuMeshHandle(pub u64);

/// Opaque handle to a GPU texture created by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GpuTextureHandle(pub u64);

/// GPU residency of one cached model: the backend fills these in after
/// uploading, and is responsible for releasing them before eviction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpuResidency {
    pub mesh: Option<GpuMeshHandle>,
    pub textures: [Option<GpuTextureHandle>; 3],
}

impl GpuResidency {
    /// True once the backend has uploaded the mesh buffers.
    pub fn is_resident(&self) -> bool {
        self.mesh.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let color = Color::from_hex(0xFF8000);
        assert!((color.r - 1.0).abs() < 0.01);
        assert!((color.g - 0.5).abs() < 0.01);
        assert!((color.b - 0.0).abs() < 0.01);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_color_to_rgba8() {
        assert_eq!(Color::WHITE.to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Color::BLACK.to_rgba8(), [0, 0, 0, 255]);
        assert_eq!(Color::rgba(2.0, -1.0, 0.5, 1.0).to_rgba8(), [255, 0, 128, 255]);
    }

    #[test]
    fn test_residency_default_not_resident() {
        let residency = GpuResidency::default();
        assert!(!residency.is_resident());
        assert_eq!(residency.textures, [None, None, None]);
    }
}
