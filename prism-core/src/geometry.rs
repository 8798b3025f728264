//! Geometry primitives: colors, validated faces, meshes and scene objects

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::algebra::Vec3;
use crate::error::GeometryError;
use crate::normals;
use crate::transform::Transform;

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

/// An RGBA color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(240, 10, 10);
    pub const GREEN: Color = Color::rgb(10, 245, 10);
    pub const BLUE: Color = Color::rgb(10, 10, 245);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Darken the color by `brightness`, clamped to `[0, 1]`. Alpha is kept.
    pub fn scale(self, brightness: f32) -> Self {
        let k = brightness.clamp(0.0, 1.0);
        let channel = |c: u8| (f32::from(c) * k) as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    /// Normalized RGB, as shader uniforms take it
    pub fn to_rgb_f32(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }

    /// Perceived brightness in `[0, 1]`
    pub fn luminance(self) -> f32 {
        let [r, g, b] = self.to_rgb_f32();
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Process-unique mesh identity, used to key back-end resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

impl MeshId {
    fn next() -> Self {
        Self(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A triangle of vertex indices, checked against the vertex count it was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face([usize; 3]);

impl Face {
    /// `face` is only used to report which face was rejected.
    pub fn new(face: usize, indices: [usize; 3], vertex_count: usize) -> Result<Self, GeometryError> {
        if indices.iter().any(|&i| i >= vertex_count) {
            return Err(GeometryError::FaceIndexOutOfRange {
                face,
                indices,
                vertex_count,
            });
        }
        Ok(Self(indices))
    }

    pub fn indices(&self) -> [usize; 3] {
        self.0
    }
}

/// Immutable triangle mesh
#[derive(Debug)]
pub struct Mesh {
    id: MeshId,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    color: Color,
}

impl Mesh {
    /// Build a mesh, rejecting any face that indexes past `vertices`.
    pub fn new(vertices: Vec<Vec3>, faces: &[[usize; 3]], color: Color) -> Result<Self, GeometryError> {
        let vertex_count = vertices.len();
        let faces = faces
            .iter()
            .enumerate()
            .map(|(i, &indices)| Face::new(i, indices, vertex_count))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: MeshId::next(),
            vertices,
            faces,
            color,
        })
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Vertex positions of every face
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.faces
            .iter()
            .map(|f| f.indices().map(|i| self.vertices[i]))
    }

    /// Smooth per-vertex normals, see [`normals::vertex_normals`]
    pub fn vertex_normals(&self) -> Result<Vec<Vec3>, GeometryError> {
        normals::vertex_normals(&self.vertices, self.faces.iter().map(Face::indices))
    }

    /// Create an axis-aligned cube centered at the origin, faces wound
    /// counter-clockwise seen from outside
    pub fn cube(size: f32, color: Color) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let faces = [
            // Front
            [4, 5, 6],
            [4, 6, 7],
            // Back
            [1, 0, 3],
            [1, 3, 2],
            // Top
            [3, 7, 6],
            [3, 6, 2],
            // Bottom
            [0, 1, 5],
            [0, 5, 4],
            // Right
            [1, 2, 6],
            [1, 6, 5],
            // Left
            [0, 4, 7],
            [0, 7, 3],
        ];

        Self {
            id: MeshId::next(),
            vertices,
            faces: faces.into_iter().map(Face).collect(),
            color,
        }
    }
}

/// A named instance of a mesh placed in the world
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub transform: Transform,
    pub mesh: Arc<Mesh>,
}

impl Object {
    pub fn new(name: impl Into<String>, mesh: Arc<Mesh>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            mesh,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}
