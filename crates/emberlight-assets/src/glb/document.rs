//! Metadata resolution: a typed view of the JSON chunk, flattened into the
//! offset table the extractors consume.
//!
//! Fields are resolved by path through the document tree
//! (mesh primitive -> accessor -> buffer view), not by scan order. Documents
//! that carry buffer views but no usable accessor bindings fall back to the
//! historical two-view layout (first view = indices, second = positions);
//! the table flags that assumption so the assembler can surface it.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::AssetError;
use crate::texture::TextureRole;

/// GL component type tag for 32-bit IEEE floats.
const COMPONENT_F32: u32 = 5126;
/// GL component type tag for unsigned 32-bit integers.
const COMPONENT_U32: u32 = 5125;

/// A named byte range within the binary chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferView {
    pub byte_offset: u32,
    pub byte_length: u32,
}

/// What a resolved attribute's bytes encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Position,
    Normal,
    TexCoord,
    Index,
}

/// One attribute resolved down to an absolute range in the binary chunk.
#[derive(Debug, Clone, Copy)]
pub struct AttributeDescriptor {
    pub kind: AttributeKind,
    pub buffer_view: usize,
    /// Absolute offset into the binary chunk (view offset + accessor offset).
    pub byte_offset: u32,
    pub count: u32,
    pub component_width: u32,
}

/// An embedded image resolved to its byte range, tagged by material role.
#[derive(Debug, Clone, Copy)]
pub struct ImageSlot {
    pub role: TextureRole,
    pub byte_offset: u32,
    pub byte_length: u32,
}

/// Flat decode table produced from the metadata chunk.
#[derive(Debug)]
pub struct DocumentTable {
    pub position: AttributeDescriptor,
    pub normal: Option<AttributeDescriptor>,
    pub tex_coord: Option<AttributeDescriptor>,
    pub index: AttributeDescriptor,
    pub buffer_views: Vec<BufferView>,
    pub images: Vec<ImageSlot>,
    /// True when attribute binding came from the two-buffer-view layout
    /// assumption instead of explicit accessor references.
    pub positional_fallback: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Document {
    accessors: Vec<AccessorDef>,
    #[serde(rename = "bufferViews")]
    buffer_views: Vec<BufferViewDef>,
    meshes: Vec<MeshDef>,
    materials: Vec<MaterialDef>,
    textures: Vec<TextureDef>,
    images: Vec<ImageDef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AccessorDef {
    #[serde(rename = "bufferView")]
    buffer_view: Option<usize>,
    #[serde(rename = "byteOffset")]
    byte_offset: u32,
    #[serde(rename = "componentType")]
    component_type: u32,
    count: u32,
    #[serde(rename = "type")]
    element_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BufferViewDef {
    #[serde(rename = "byteOffset")]
    byte_offset: u32,
    #[serde(rename = "byteLength")]
    byte_length: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MeshDef {
    primitives: Vec<PrimitiveDef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrimitiveDef {
    attributes: HashMap<String, usize>,
    indices: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MaterialDef {
    #[serde(rename = "pbrMetallicRoughness")]
    pbr: Option<PbrDef>,
    #[serde(rename = "normalTexture")]
    normal_texture: Option<TextureRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PbrDef {
    #[serde(rename = "baseColorTexture")]
    base_color_texture: Option<TextureRef>,
    #[serde(rename = "metallicRoughnessTexture")]
    metallic_roughness_texture: Option<TextureRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextureRef {
    index: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextureDef {
    source: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageDef {
    #[serde(rename = "bufferView")]
    buffer_view: Option<usize>,
}

impl Document {
    fn accessor(&self, index: usize) -> Result<&AccessorDef, AssetError> {
        self.accessors
            .get(index)
            .ok_or(AssetError::MissingField("accessors"))
    }

    /// Resolve an accessor to an absolute byte range descriptor.
    fn resolve_attribute(
        &self,
        accessor_index: usize,
        kind: AttributeKind,
        expected_component: u32,
        expected_type: &str,
        component_width: u32,
    ) -> Result<AttributeDescriptor, AssetError> {
        let accessor = self.accessor(accessor_index)?;
        if accessor.component_type != expected_component {
            return Err(AssetError::MalformedNumber {
                field: "accessor.componentType",
                detail: format!(
                    "expected {expected_component}, found {}",
                    accessor.component_type
                ),
            });
        }
        if accessor.element_type != expected_type {
            return Err(AssetError::MalformedNumber {
                field: "accessor.type",
                detail: format!("expected {expected_type}, found '{}'", accessor.element_type),
            });
        }
        let view_index = accessor
            .buffer_view
            .ok_or(AssetError::MissingField("accessor.bufferView"))?;
        let view = self
            .buffer_views
            .get(view_index)
            .ok_or(AssetError::MissingField("bufferViews"))?;
        Ok(AttributeDescriptor {
            kind,
            buffer_view: view_index,
            byte_offset: view.byte_offset.saturating_add(accessor.byte_offset),
            count: accessor.count,
            component_width,
        })
    }

    /// Resolve one material texture reference down to an image byte range.
    /// Any broken link along the chain means the slot is absent, not an error.
    fn resolve_image(&self, reference: Option<&TextureRef>, role: TextureRole) -> Option<ImageSlot> {
        let texture = self.textures.get(reference?.index)?;
        let image = self.images.get(texture.source?)?;
        let view = self.buffer_views.get(image.buffer_view?)?;
        Some(ImageSlot {
            role,
            byte_offset: view.byte_offset,
            byte_length: view.byte_length,
        })
    }
}

/// Parse the metadata chunk and flatten it into a [`DocumentTable`].
pub fn scan(json: &[u8]) -> Result<DocumentTable, AssetError> {
    let document: Document = serde_json::from_slice(json).map_err(|e| {
        if e.classify() == serde_json::error::Category::Data {
            AssetError::MalformedNumber {
                field: "metadata",
                detail: e.to_string(),
            }
        } else {
            AssetError::MissingField("metadata document")
        }
    })?;

    let buffer_views: Vec<BufferView> = document
        .buffer_views
        .iter()
        .map(|view| BufferView {
            byte_offset: view.byte_offset,
            byte_length: view.byte_length,
        })
        .collect();

    let primitive = document
        .meshes
        .first()
        .and_then(|mesh| mesh.primitives.first());

    let (position, normal, tex_coord, index, positional_fallback) = match primitive {
        Some(primitive) if primitive.attributes.contains_key("POSITION") => {
            let position = document.resolve_attribute(
                primitive.attributes["POSITION"],
                AttributeKind::Position,
                COMPONENT_F32,
                "VEC3",
                4,
            )?;
            let normal = match primitive.attributes.get("NORMAL") {
                Some(&accessor) => Some(document.resolve_attribute(
                    accessor,
                    AttributeKind::Normal,
                    COMPONENT_F32,
                    "VEC3",
                    4,
                )?),
                None => None,
            };
            let tex_coord = match primitive.attributes.get("TEXCOORD_0") {
                Some(&accessor) => Some(document.resolve_attribute(
                    accessor,
                    AttributeKind::TexCoord,
                    COMPONENT_F32,
                    "VEC2",
                    4,
                )?),
                None => None,
            };
            let index_accessor = primitive
                .indices
                .ok_or(AssetError::MissingField("mesh.primitives[0].indices"))?;
            let index = document.resolve_attribute(
                index_accessor,
                AttributeKind::Index,
                COMPONENT_U32,
                "SCALAR",
                4,
            )?;
            (position, normal, tex_coord, index, false)
        }
        _ => positional_layout(&buffer_views)?,
    };

    let material = document.materials.first();
    let mut images = Vec::new();
    if let Some(material) = material {
        let pbr = material.pbr.as_ref();
        let slots = [
            (
                pbr.and_then(|p| p.base_color_texture.as_ref()),
                TextureRole::BaseColor,
            ),
            (
                pbr.and_then(|p| p.metallic_roughness_texture.as_ref()),
                TextureRole::MetallicRoughness,
            ),
            (material.normal_texture.as_ref(), TextureRole::Normal),
        ];
        for (reference, role) in slots {
            if let Some(slot) = document.resolve_image(reference, role) {
                images.push(slot);
            }
        }
    }

    Ok(DocumentTable {
        position,
        normal,
        tex_coord,
        index,
        buffer_views,
        images,
        positional_fallback,
    })
}

type LayoutTuple = (
    AttributeDescriptor,
    Option<AttributeDescriptor>,
    Option<AttributeDescriptor>,
    AttributeDescriptor,
    bool,
);

/// Two-buffer-view layout assumption for documents without explicit accessor
/// bindings: first view holds u32 indices, second holds vec3 positions.
fn positional_layout(buffer_views: &[BufferView]) -> Result<LayoutTuple, AssetError> {
    if buffer_views.len() < 2 {
        return Err(AssetError::MissingField("bufferViews"));
    }
    let index_view = buffer_views[0];
    let position_view = buffer_views[1];
    let index = AttributeDescriptor {
        kind: AttributeKind::Index,
        buffer_view: 0,
        byte_offset: index_view.byte_offset,
        count: index_view.byte_length / 4,
        component_width: 4,
    };
    let position = AttributeDescriptor {
        kind: AttributeKind::Position,
        buffer_view: 1,
        byte_offset: position_view.byte_offset,
        count: position_view.byte_length / 12,
        component_width: 4,
    };
    Ok((position, None, None, index, true))
}
