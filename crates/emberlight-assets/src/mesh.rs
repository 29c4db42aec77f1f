use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::error::AssetError;

/// Interleaved vertex layout handed to the rendering backend. Attribute
/// order (position, normal, tex_coord) is the contract the backend's vertex
/// input description binds against.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// CPU-side triangle mesh: the decoded (or fallback) geometry of one model.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Check the assembly invariants: one normal and one texcoord per
    /// position, whole triangles only, and every index in range.
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.normals.len() != self.positions.len() {
            return Err(AssetError::InvalidMesh("normal count != position count"));
        }
        if self.tex_coords.len() != self.positions.len() {
            return Err(AssetError::InvalidMesh("texcoord count != position count"));
        }
        if self.indices.len() % 3 != 0 {
            return Err(AssetError::InvalidMesh("index count not a multiple of 3"));
        }
        if self
            .indices
            .iter()
            .any(|&index| index as usize >= self.positions.len())
        {
            return Err(AssetError::InvalidMesh("index out of range"));
        }
        Ok(())
    }

    /// Interleave the attribute arrays into GPU-uploadable vertices.
    pub fn vertices(&self) -> Vec<ModelVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.tex_coords)
            .map(|((position, normal), tex_coord)| ModelVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                tex_coord: tex_coord.to_array(),
            })
            .collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The fixed fallback mesh: a unit-radius cube with 24 vertices (4 per
    /// face, so each face keeps its own flat normal) and 36 indices.
    pub fn default_cube() -> Self {
        #[rustfmt::skip]
        let positions = vec![
            // Front
            Vec3::new(-1.0, -1.0,  1.0), Vec3::new( 1.0, -1.0,  1.0),
            Vec3::new( 1.0,  1.0,  1.0), Vec3::new(-1.0,  1.0,  1.0),
            // Back
            Vec3::new(-1.0, -1.0, -1.0), Vec3::new(-1.0,  1.0, -1.0),
            Vec3::new( 1.0,  1.0, -1.0), Vec3::new( 1.0, -1.0, -1.0),
            // Top
            Vec3::new(-1.0,  1.0, -1.0), Vec3::new(-1.0,  1.0,  1.0),
            Vec3::new( 1.0,  1.0,  1.0), Vec3::new( 1.0,  1.0, -1.0),
            // Bottom
            Vec3::new(-1.0, -1.0, -1.0), Vec3::new( 1.0, -1.0, -1.0),
            Vec3::new( 1.0, -1.0,  1.0), Vec3::new(-1.0, -1.0,  1.0),
            // Right
            Vec3::new( 1.0, -1.0, -1.0), Vec3::new( 1.0,  1.0, -1.0),
            Vec3::new( 1.0,  1.0,  1.0), Vec3::new( 1.0, -1.0,  1.0),
            // Left
            Vec3::new(-1.0, -1.0, -1.0), Vec3::new(-1.0, -1.0,  1.0),
            Vec3::new(-1.0,  1.0,  1.0), Vec3::new(-1.0,  1.0, -1.0),
        ];

        let face_normals = [
            Vec3::Z,
            Vec3::NEG_Z,
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::X,
            Vec3::NEG_X,
        ];
        let normals = face_normals
            .iter()
            .flat_map(|&normal| [normal; 4])
            .collect();

        let face_uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let tex_coords = (0..6).flat_map(|_| face_uvs).collect();

        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 2, 3, 0,
            4, 5, 6, 6, 7, 4,
            8, 9, 10, 10, 11, 8,
            12, 13, 14, 14, 15, 12,
            16, 17, 18, 18, 19, 16,
            20, 21, 22, 22, 23, 20,
        ];

        Self {
            positions,
            normals,
            tex_coords,
            indices,
        }
    }

    /// A flat quad on the XZ plane, normal up, `size` from center to edge.
    pub fn quad(size: f32) -> Self {
        Self {
            positions: vec![
                Vec3::new(-size, 0.0, -size),
                Vec3::new(size, 0.0, -size),
                Vec3::new(size, 0.0, size),
                Vec3::new(-size, 0.0, size),
            ],
            normals: vec![Vec3::Y; 4],
            tex_coords: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// A subdivided plane on the XZ plane, centered at the origin.
    pub fn plane(width: f32, height: f32, subdivisions: u32) -> Self {
        let subdivisions = subdivisions.max(1);
        let step_x = width / subdivisions as f32;
        let step_z = height / subdivisions as f32;

        let side = subdivisions + 1;
        let mut positions = Vec::with_capacity((side * side) as usize);
        let mut tex_coords = Vec::with_capacity((side * side) as usize);
        for z in 0..side {
            for x in 0..side {
                positions.push(Vec3::new(
                    x as f32 * step_x - width / 2.0,
                    0.0,
                    z as f32 * step_z - height / 2.0,
                ));
                tex_coords.push(Vec2::new(
                    x as f32 / subdivisions as f32,
                    z as f32 / subdivisions as f32,
                ));
            }
        }

        let mut indices = Vec::with_capacity((subdivisions * subdivisions * 6) as usize);
        for z in 0..subdivisions {
            for x in 0..subdivisions {
                let a = z * side + x;
                let b = a + 1;
                let c = a + side;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        Self {
            normals: vec![Vec3::Y; positions.len()],
            positions,
            tex_coords,
            indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cube_shape() {
        let cube = MeshData::default_cube();
        assert_eq!(cube.positions.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(cube.triangle_count(), 12);
        cube.validate().unwrap();
        for normal in &cube.normals {
            assert_eq!(normal.length(), 1.0);
        }
    }

    #[test]
    fn quad_and_plane_validate() {
        MeshData::quad(2.0).validate().unwrap();
        let plane = MeshData::plane(10.0, 10.0, 4);
        plane.validate().unwrap();
        assert_eq!(plane.positions.len(), 25);
        assert_eq!(plane.triangle_count(), 32);
    }

    #[test]
    fn validate_rejects_mismatched_normals() {
        let mut mesh = MeshData::default_cube();
        mesh.normals.pop();
        assert!(matches!(
            mesh.validate(),
            Err(AssetError::InvalidMesh("normal count != position count"))
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_index() {
        let mut mesh = MeshData::quad(1.0);
        mesh.indices[0] = 99;
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn validate_rejects_partial_triangle() {
        let mut mesh = MeshData::quad(1.0);
        mesh.indices.pop();
        assert!(matches!(
            mesh.validate(),
            Err(AssetError::InvalidMesh("index count not a multiple of 3"))
        ));
    }

    #[test]
    fn vertices_interleave_in_field_order() {
        let quad = MeshData::quad(1.0);
        let vertices = quad.vertices();
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[2].position, [1.0, 0.0, 1.0]);
        assert_eq!(vertices[2].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[2].tex_coord, [1.0, 1.0]);

        // Pod layout: 8 floats per vertex, no padding.
        assert_eq!(std::mem::size_of::<ModelVertex>(), 32);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 4 * 32);
    }
}
