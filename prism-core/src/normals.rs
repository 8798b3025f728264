//! Smooth per-vertex normals for the hardware path

use crate::algebra::Vec3;
use crate::error::GeometryError;

/// Accumulate every face normal into the vertices it touches, then normalize.
///
/// Face normals are left unnormalized while accumulating, so larger faces
/// weigh more. Vertices with no incident face (or only degenerate ones) keep
/// a zero normal. Any out-of-range index aborts the whole mesh before a
/// single accumulator is read.
pub fn vertex_normals<I>(vertices: &[Vec3], faces: I) -> Result<Vec<Vec3>, GeometryError>
where
    I: IntoIterator<Item = [usize; 3]>,
{
    let mut normals = vec![Vec3::zeros(); vertices.len()];

    for (face, indices) in faces.into_iter().enumerate() {
        if indices.iter().any(|&i| i >= vertices.len()) {
            return Err(GeometryError::FaceIndexOutOfRange {
                face,
                indices,
                vertex_count: vertices.len(),
            });
        }

        let [i0, i1, i2] = indices;
        let edge1 = vertices[i1] - vertices[i0];
        let edge2 = vertices[i2] - vertices[i0];
        let normal = edge1.cross(&edge2);

        normals[i0] += normal;
        normals[i1] += normal;
        normals[i2] += normal;
    }

    for n in &mut normals {
        let len = n.norm();
        if len > 0.0 {
            *n /= len;
        }
    }

    Ok(normals)
}
