//! PrismCore - geometric core of a small 3D renderer
//!
//! Algebra, transforms, camera and lens, the mesh and scene model, near-plane
//! clipping, painter's ordering, ray picking and smooth normals, shared by a
//! CPU render path and a GPU render path.

pub mod algebra;
pub mod clip;
pub mod error;
pub mod geometry;
pub mod hardware;
pub mod normals;
pub mod painter;
pub mod projection;
pub mod raycast;
pub mod scene;
pub mod software;
pub mod transform;

// Re-export commonly used types
pub use algebra::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use error::{GeometryError, RenderError};
pub use geometry::{Color, Face, Mesh, MeshId, Object};
pub use hardware::{DrawCall, FrameMatrices, FrameReport, GpuBackend, HardwareRenderer, MeshUpload};
pub use projection::{Camera, Lens};
pub use raycast::{Ray, RayHit};
pub use scene::Scene;
pub use software::{Lighting, Rasterizer, RenderMode, SoftwareRenderer};
pub use transform::Transform;
