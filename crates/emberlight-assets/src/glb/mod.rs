//! Binary model container decoding.
//!
//! The pipeline runs container split -> metadata scan -> geometry
//! extraction (synthesizing normals when the source has none) -> image
//! extraction -> validation. [`assemble`] never fails: any unrecoverable
//! stage error yields the default cube with placeholder textures, plus a
//! diagnostic describing what went wrong.

pub mod container;
pub mod document;
pub mod geometry;
pub mod image;
pub mod normals;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::diagnostic::{LoadDiagnostic, LoadStage};
use crate::error::AssetError;
use crate::mesh::MeshData;
use crate::texture::{TextureAsset, TextureRole};

/// One fully assembled model: mesh plus one texture per material role
/// (decoded or placeholder), in [`TextureRole::ALL`] slot order.
#[derive(Debug, Clone)]
pub struct ModelAsset {
    pub mesh: MeshData,
    pub textures: Vec<TextureAsset>,
    pub source: PathBuf,
}

impl ModelAsset {
    /// The fallback model: default cube, all-placeholder textures.
    pub fn fallback(source: &Path) -> Self {
        Self {
            mesh: MeshData::default_cube(),
            textures: TextureRole::ALL
                .iter()
                .map(|&role| TextureAsset::placeholder(role))
                .collect(),
            source: source.to_path_buf(),
        }
    }

    pub fn texture(&self, role: TextureRole) -> Option<&TextureAsset> {
        self.textures.iter().find(|texture| texture.role == role)
    }
}

struct Decoded {
    mesh: MeshData,
    textures: Vec<TextureAsset>,
    /// Set when an image slot degraded to a placeholder; geometry is intact.
    degraded: Option<(LoadStage, AssetError)>,
}

fn decode(raw: &[u8]) -> Result<Decoded, (LoadStage, AssetError)> {
    let container = container::read(raw).map_err(|e| (LoadStage::ReadContainer, e))?;
    debug!(
        "container: {} metadata bytes, {} binary bytes",
        container.json.len(),
        container.bin.len()
    );

    let table = document::scan(container.json).map_err(|e| (LoadStage::ScanMetadata, e))?;
    if table.positional_fallback {
        warn!("metadata has no explicit attribute bindings; assuming two-buffer-view layout");
    }

    let bin = container.bin;
    let stage = |e| (LoadStage::ExtractGeometry, e);

    let positions = geometry::extract_vec3s(
        bin,
        table.position.byte_offset as usize,
        table.position.count as usize,
    )
    .map_err(stage)?;

    let indices = geometry::extract_indices(
        bin,
        table.index.byte_offset as usize,
        table.index.count as usize,
    )
    .map_err(stage)?;

    // Use source normals only when present and one-per-position; anything
    // else means synthesizing from the triangle geometry.
    let normals = match table.normal {
        Some(descriptor) if descriptor.count as usize == positions.len() => {
            match geometry::extract_vec3s(
                bin,
                descriptor.byte_offset as usize,
                descriptor.count as usize,
            ) {
                Ok(normals) => normals,
                Err(e) => {
                    warn!("normal extraction failed ({e}); synthesizing normals");
                    normals::synthesize(&positions, &indices)
                }
            }
        }
        _ => {
            debug!("no usable source normals; synthesizing");
            normals::synthesize(&positions, &indices)
        }
    };

    let tex_coords = match table.tex_coord {
        Some(descriptor) => geometry::extract_tex_coords(
            bin,
            descriptor.byte_offset as usize,
            descriptor.count as usize,
        )
        .map_err(stage)?,
        None => vec![glam::Vec2::ZERO; positions.len()],
    };

    let mut degraded = None;
    let mut textures = Vec::with_capacity(TextureRole::ALL.len());
    for role in TextureRole::ALL {
        let slot = table.images.iter().find(|slot| slot.role == role);
        let texture = match slot {
            Some(slot) => match image::extract(bin, slot) {
                Ok(bytes) => image::decode(bytes, role),
                Err(e) => {
                    warn!("{:?} image out of range ({e}); using placeholder", role);
                    degraded.get_or_insert((LoadStage::ExtractImages, e));
                    TextureAsset::placeholder(role)
                }
            },
            None => TextureAsset::placeholder(role),
        };
        textures.push(texture);
    }

    let mesh = MeshData {
        positions,
        normals,
        tex_coords,
        indices,
    };
    mesh.validate().map_err(|e| (LoadStage::Validate, e))?;

    debug!(
        "decoded mesh: {} vertices, {} triangles",
        mesh.positions.len(),
        mesh.triangle_count()
    );

    Ok(Decoded {
        mesh,
        textures,
        degraded,
    })
}

/// Decode a raw container into a model. Always returns a usable model: a
/// failure at any required stage substitutes the default cube and reports
/// the stage and error through the diagnostic.
pub fn assemble(raw: &[u8], source: &Path) -> (ModelAsset, Option<LoadDiagnostic>) {
    match decode(raw) {
        Ok(decoded) => {
            let diagnostic = decoded.degraded.map(|(stage, error)| LoadDiagnostic {
                path: source.to_path_buf(),
                stage,
                error,
            });
            if let Some(diagnostic) = &diagnostic {
                warn!("{diagnostic}");
            }
            (
                ModelAsset {
                    mesh: decoded.mesh,
                    textures: decoded.textures,
                    source: source.to_path_buf(),
                },
                diagnostic,
            )
        }
        Err((stage, error)) => {
            let diagnostic = LoadDiagnostic {
                path: source.to_path_buf(),
                stage,
                error,
            };
            warn!("{diagnostic}; substituting default cube");
            (ModelAsset::fallback(source), Some(diagnostic))
        }
    }
}
