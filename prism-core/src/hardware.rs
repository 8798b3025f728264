//! GPU render path
//!
//! The core never talks to a graphics API directly. A [`GpuBackend`] owns
//! buffers and shaders; [`HardwareRenderer`] decides what to upload and when,
//! and issues one draw call per object.
//!
//! Meshes are uploaded lazily the first time an object using them is drawn.
//! Handles live in a side map keyed by [`MeshId`], so objects sharing an
//! `Arc<Mesh>` share a single upload.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::algebra::{Mat4, Vec3};
use crate::error::{RenderError, Result};
use crate::geometry::{Color, Mesh, MeshId};
use crate::projection::Lens;
use crate::scene::Scene;
use crate::software::{RenderMode, DEBUG_RAY_LENGTH};

/// Upper bound on debug ray segments sent per frame
pub const MAX_DEBUG_RAYS: usize = 10_000;

const DEBUG_RAY_COLOR: Color = Color::rgb(255, 220, 0);

/// Everything a backend needs to create vertex and index buffers for a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshUpload {
    pub mesh: MeshId,
    pub vertices: Vec<Vec3>,
    /// Smooth normals, one per vertex
    pub normals: Vec<Vec3>,
    /// Three indices per face
    pub indices: Vec<u32>,
}

impl MeshUpload {
    pub fn from_mesh(mesh: &Mesh) -> Result<Self> {
        let id = mesh.id();
        if u32::try_from(mesh.vertex_count()).is_err() {
            return Err(RenderError::IndexOverflow {
                mesh: id,
                vertex_count: mesh.vertex_count(),
            });
        }

        let normals = mesh
            .vertex_normals()
            .map_err(|source| RenderError::CorruptMesh { mesh: id, source })?;

        // Vertex count fits in u32, so every validated index does too
        let indices = mesh
            .faces()
            .iter()
            .flat_map(|f| f.indices())
            .map(|i| i as u32)
            .collect();

        Ok(Self {
            mesh: id,
            vertices: mesh.vertices().to_vec(),
            normals,
            indices,
        })
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Position and normal interleaved, six floats per vertex
    pub fn interleaved(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .flat_map(|(p, n)| [p.x, p.y, p.z, n.x, n.y, n.z])
            .collect()
    }
}

/// Backend resources for one uploaded mesh
#[derive(Debug, Clone)]
pub struct UploadedMesh<H> {
    pub handle: H,
    pub index_count: usize,
}

/// Per-frame camera matrices, computed once and shared by every draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

/// Uniforms for drawing one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub color: Color,
    pub mode: RenderMode,
    /// World-space direction the light travels
    pub light_direction: Vec3,
    pub index_count: usize,
}

/// A graphics API able to hold meshes and draw them
pub trait GpuBackend {
    type Handle;

    fn upload_mesh(&mut self, upload: MeshUpload) -> Result<Self::Handle>;

    fn draw_mesh(&mut self, handle: &Self::Handle, call: &DrawCall);

    fn draw_lines(&mut self, segments: &[[Vec3; 2]], frame: &FrameMatrices, color: Color);
}

/// Outcome of one [`HardwareRenderer::render`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub drawn: usize,
    pub skipped: usize,
}

pub struct HardwareRenderer<B: GpuBackend> {
    backend: B,
    meshes: HashMap<MeshId, UploadedMesh<B::Handle>>,
    /// Meshes whose upload failed; never retried
    failed: HashSet<MeshId>,
    segments: Vec<[Vec3; 2]>,
    pub lens: Lens,
    pub light_direction: Vec3,
    pub mode: RenderMode,
    pub show_rays: bool,
}

impl<B: GpuBackend> HardwareRenderer<B> {
    pub fn new(backend: B, lens: Lens, light_direction: Vec3) -> Self {
        Self {
            backend,
            meshes: HashMap::new(),
            failed: HashSet::new(),
            segments: Vec::new(),
            lens,
            light_direction,
            mode: RenderMode::default(),
            show_rays: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn uploaded(&self, mesh: MeshId) -> Option<&UploadedMesh<B::Handle>> {
        self.meshes.get(&mesh)
    }

    /// Drop the renderer's record of a mesh and hand back its handle so the
    /// caller can free it. A later draw uploads it again.
    pub fn evict(&mut self, mesh: MeshId) -> Option<B::Handle> {
        self.failed.remove(&mesh);
        self.meshes.remove(&mesh).map(|m| m.handle)
    }

    /// Upload `mesh` unless it already is. Returns `false` for meshes that
    /// cannot be uploaded; the failure is logged only the first time.
    fn ensure_uploaded(&mut self, mesh: &Mesh) -> bool {
        let id = mesh.id();
        if self.meshes.contains_key(&id) {
            return true;
        }
        if self.failed.contains(&id) {
            return false;
        }

        let uploaded = MeshUpload::from_mesh(mesh).and_then(|upload| {
            let index_count = upload.index_count();
            self.backend
                .upload_mesh(upload)
                .map(|handle| UploadedMesh { handle, index_count })
        });

        match uploaded {
            Ok(uploaded) => {
                debug!("uploaded mesh {:?} ({} indices)", id, uploaded.index_count);
                self.meshes.insert(id, uploaded);
                true
            }
            Err(e) => {
                warn!("skipping mesh {:?}: {}", id, e);
                self.failed.insert(id);
                false
            }
        }
    }

    /// Draw every object of the scene, then the debug rays if enabled
    pub fn render(&mut self, scene: &Scene, aspect: f32) -> FrameReport {
        let camera = scene.camera();
        let frame = FrameMatrices {
            view: camera.view_matrix(),
            projection: self.lens.perspective_matrix(aspect),
        };
        let mut report = FrameReport::default();

        for object in scene.objects() {
            let uploaded = if self.ensure_uploaded(&object.mesh) {
                self.meshes.get(&object.mesh.id())
            } else {
                None
            };
            let Some(uploaded) = uploaded else {
                report.skipped += 1;
                continue;
            };

            let call = DrawCall {
                model: object.transform.model_matrix(),
                view: frame.view,
                projection: frame.projection,
                color: object.mesh.color(),
                mode: self.mode,
                light_direction: self.light_direction,
                index_count: uploaded.index_count,
            };
            self.backend.draw_mesh(&uploaded.handle, &call);
            report.drawn += 1;
        }

        if self.show_rays && !scene.rays().is_empty() {
            self.segments.clear();
            self.segments.extend(
                scene
                    .rays()
                    .iter()
                    .take(MAX_DEBUG_RAYS)
                    .map(|ray| ray.segment(DEBUG_RAY_LENGTH)),
            );
            self.backend.draw_lines(&self.segments, &frame, DEBUG_RAY_COLOR);
        }

        debug!("hardware frame: {} drawn, {} skipped", report.drawn, report.skipped);
        report
    }
}
