//! Emberlight Core - shared types for the Emberlight engine
//!
//! This crate provides the foundational types used across the engine:
//! - Mathematical primitives (re-exported from glam)
//! - Color values
//! - Opaque GPU resource handles assigned by the rendering backend

pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use types::{Color, GpuMeshHandle, GpuResidency, GpuTextureHandle};
