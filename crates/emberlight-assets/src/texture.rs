use emberlight_core::Color;

/// Material role of a decoded or placeholder image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureRole {
    BaseColor,
    MetallicRoughness,
    Normal,
}

impl TextureRole {
    /// The three roles a single-material model can carry, in slot order.
    pub const ALL: [TextureRole; 3] = [
        TextureRole::BaseColor,
        TextureRole::MetallicRoughness,
        TextureRole::Normal,
    ];

    /// Flat swatch color substituted when this role's image is absent or
    /// undecodable. Each role gets a distinct, recognizable value: mid-gray
    /// albedo, rough non-metal parameters, and a straight-up tangent normal.
    pub fn placeholder_color(self) -> Color {
        match self {
            TextureRole::BaseColor => Color::rgb(0.5, 0.5, 0.5),
            TextureRole::MetallicRoughness => Color::rgb(0.0, 0.9, 0.0),
            TextureRole::Normal => Color::rgb(0.5, 0.5, 1.0),
        }
    }
}

/// A decoded texture with raw RGBA8 pixel data, ready for GPU upload.
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub role: TextureRole,
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major, `width * height * 4` bytes.
    pub data: Vec<u8>,
    /// True when this is a generated swatch rather than decoded image bytes.
    pub placeholder: bool,
}

impl TextureAsset {
    /// A 1x1 flat-color swatch for the given role. Deterministic: the same
    /// role always yields identical pixels.
    pub fn placeholder(role: TextureRole) -> Self {
        Self {
            role,
            width: 1,
            height: 1,
            data: role.placeholder_color().to_rgba8().to_vec(),
            placeholder: true,
        }
    }
}
