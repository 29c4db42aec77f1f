//! Emberlight Assets - model decoding and caching
//!
//! Decodes self-contained binary model containers (header + JSON metadata
//! chunk + binary buffer chunk) into renderable mesh and texture data, and
//! serves them through a path-keyed cache. Decoding never fails outward:
//! malformed input degrades to a fixed default cube plus a structured
//! diagnostic, so a broken asset shows up wrong on screen instead of
//! crashing the frame loop.

mod cache;
mod diagnostic;
mod error;
pub mod glb;
mod mesh;
mod texture;

pub use cache::{ModelCache, ModelHandle};
pub use diagnostic::{LoadDiagnostic, LoadStage};
pub use error::AssetError;
pub use glb::ModelAsset;
pub use mesh::{MeshData, ModelVertex};
pub use texture::{TextureAsset, TextureRole};
