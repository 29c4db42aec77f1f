//! Smooth per-vertex normal synthesis for meshes that ship without normals.

use glam::Vec3;

/// Accumulate unnormalized face normals into each triangle's vertices, then
/// normalize. Vertices that accumulate nothing (isolated, or touched only by
/// degenerate triangles) get the fixed up-vector instead of an undefined
/// direction.
///
/// Total over its inputs: triangles with out-of-range indices are skipped.
pub fn synthesize(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let (i0, i1, i2) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }

        let edge1 = positions[i1] - positions[i0];
        let edge2 = positions[i2] - positions[i0];
        let face_normal = edge1.cross(edge2);

        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    for normal in &mut normals {
        *normal = normal.try_normalize().unwrap_or(Vec3::Y);
    }

    normals
}
