//! Error types for the rendering core

use thiserror::Error;

use crate::geometry::MeshId;

/// Mesh data that cannot be used safely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A face points past the end of the vertex array
    #[error(
        "face {face} references vertices {indices:?} but the mesh only has {vertex_count} vertices"
    )]
    FaceIndexOutOfRange {
        face: usize,
        indices: [usize; 3],
        vertex_count: usize,
    },
}

/// Failures of the hardware path
#[derive(Debug, Error)]
pub enum RenderError {
    /// Mesh data is corrupt; the mesh is skipped
    #[error("mesh {mesh:?} has corrupt geometry: {source}")]
    CorruptMesh {
        mesh: MeshId,
        #[source]
        source: GeometryError,
    },

    /// Index buffers are 32-bit on the GPU side
    #[error("mesh {mesh:?} has {vertex_count} vertices, more than a 32-bit index buffer can address")]
    IndexOverflow { mesh: MeshId, vertex_count: usize },

    /// The backend refused the upload
    #[error("GPU upload failed: {0}")]
    Upload(String),
}

/// Result type for fallible rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;
