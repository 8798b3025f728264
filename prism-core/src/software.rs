//! CPU render path
//!
//! Triangles are taken to camera space, shaded once per face, clipped against
//! the near plane and sorted back to front. There is no depth buffer: a
//! [`Rasterizer`] simply paints in the order it is handed triangles.

use log::debug;
use nalgebra::Point3;

use crate::algebra::{normalize, quat_inverse, rotate_vector, Vec2, Vec3};
use crate::clip::{clip_segment, clip_triangle};
use crate::geometry::Color;
use crate::painter::{RenderQueue, RenderTriangle};
use crate::projection::{ndc_to_screen, project_point, Lens};
use crate::scene::Scene;

/// Length of the segment drawn for each recorded ray
pub const DEBUG_RAY_LENGTH: f32 = 100.0;

const DEBUG_RAY_COLOR: Color = Color::rgb(255, 220, 0);

/// How queued triangles reach the rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Filled,
    Wireframe,
    Points,
}

impl RenderMode {
    /// Filled → Wireframe → Points → Filled
    pub fn next(self) -> Self {
        match self {
            RenderMode::Filled => RenderMode::Wireframe,
            RenderMode::Wireframe => RenderMode::Points,
            RenderMode::Points => RenderMode::Filled,
        }
    }
}

/// A single directional light plus an ambient floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Direction the light travels in world space, unit length
    pub direction: Vec3,
    pub ambient: f32,
}

impl Lighting {
    pub fn new(direction: Vec3, ambient: f32) -> Self {
        Self {
            direction: normalize(&direction),
            ambient: ambient.clamp(0.0, 1.0),
        }
    }

    /// `ambient + (1 - ambient) · max(0, n · -L)`
    pub fn brightness(&self, normal: &Vec3, light: &Vec3) -> f32 {
        let diffuse = normal.dot(&-light).max(0.0);
        self.ambient + (1.0 - self.ambient) * diffuse
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self::new(Vec3::new(0.5, -1.0, 0.5), 0.3)
    }
}

/// Drawing primitives in screen space (x right, y down)
pub trait Rasterizer {
    fn fill_triangle(&mut self, points: [Vec2; 3], color: Color);
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn draw_point(&mut self, point: Vec2, color: Color);
}

pub struct SoftwareRenderer {
    queue: RenderQueue,
    /// Camera-space debug ray segments, already clipped
    rays: Vec<[Vec3; 2]>,
    pub lens: Lens,
    pub lighting: Lighting,
    pub mode: RenderMode,
    pub show_rays: bool,
}

impl SoftwareRenderer {
    pub fn new(lens: Lens, lighting: Lighting) -> Self {
        Self {
            queue: RenderQueue::new(),
            rays: Vec::new(),
            lens,
            lighting,
            mode: RenderMode::default(),
            show_rays: false,
        }
    }

    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    /// Transform, shade, clip and sort every face of the scene.
    ///
    /// Returns the number of triangles queued for drawing.
    pub fn build_frame(&mut self, scene: &Scene) -> usize {
        self.queue.clear();
        self.rays.clear();

        let camera = scene.camera();
        let view = camera.view_matrix();
        let light = rotate_vector(&self.lighting.direction, &quat_inverse(&camera.rotation));
        let near = self.lens.near;
        let mut faces = 0;

        for object in scene.objects() {
            let model_view = view * object.transform.model_matrix();
            let color = object.mesh.color();

            for tri in object.mesh.triangles() {
                faces += 1;
                let cam = tri.map(|v| model_view.transform_point(&Point3::from(v)).coords);

                // Zero-area faces have no normal and cover no pixels
                let cross = (cam[1] - cam[0]).cross(&(cam[2] - cam[0]));
                if cross.norm_squared() <= f32::EPSILON * f32::EPSILON {
                    continue;
                }
                let normal = normalize(&cross);
                let shade = color.scale(self.lighting.brightness(&normal, &light));

                for clipped in clip_triangle(cam, near).iter() {
                    self.queue.push(RenderTriangle::new(clipped, shade));
                }
            }
        }
        self.queue.sort_back_to_front();

        if self.show_rays {
            for ray in scene.rays() {
                let segment = ray.segment(DEBUG_RAY_LENGTH).map(|p| camera.to_camera_space(&p));
                if let Some(visible) = clip_segment(segment, near) {
                    self.rays.push(visible);
                }
            }
        }

        debug!(
            "software frame: {} faces, {} triangles queued, {} rays",
            faces,
            self.queue.len(),
            self.rays.len()
        );
        self.queue.len()
    }

    /// Project the queued triangles and hand them to `rasterizer`, farthest
    /// first, followed by the debug rays.
    pub fn draw<R: Rasterizer>(&self, rasterizer: &mut R, width: f32, height: f32, aspect: f32) {
        let projection = self.lens.perspective_matrix(aspect);
        let to_screen = |v: &Vec3| project_point(&projection, v).map(|ndc| ndc_to_screen(&ndc, width, height));

        for tri in self.queue.triangles() {
            let [Some(a), Some(b), Some(c)] = tri.vertices.map(|v| to_screen(&v)) else {
                continue;
            };
            match self.mode {
                RenderMode::Filled => rasterizer.fill_triangle([a, b, c], tri.color),
                RenderMode::Wireframe => {
                    rasterizer.draw_line(a, b, tri.color);
                    rasterizer.draw_line(b, c, tri.color);
                    rasterizer.draw_line(c, a, tri.color);
                }
                RenderMode::Points => {
                    for p in [a, b, c] {
                        rasterizer.draw_point(p, tri.color);
                    }
                }
            }
        }

        for [from, to] in &self.rays {
            if let (Some(a), Some(b)) = (to_screen(from), to_screen(to)) {
                rasterizer.draw_line(a, b, DEBUG_RAY_COLOR);
            }
        }
    }
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new(Lens::default(), Lighting::default())
    }
}
