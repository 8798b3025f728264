//! Back-to-front ordering of camera-space triangles

use crate::algebra::Vec3;
use crate::geometry::Color;

/// One shaded, clipped triangle waiting to be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTriangle {
    /// Camera-space vertices
    pub vertices: [Vec3; 3],
    pub depth: f32,
    pub color: Color,
}

impl RenderTriangle {
    pub fn new(vertices: [Vec3; 3], color: Color) -> Self {
        Self {
            vertices,
            depth: depth_key(&vertices),
            color,
        }
    }
}

/// Average distance in front of the camera; larger is farther away
pub fn depth_key(vertices: &[Vec3; 3]) -> f32 {
    -(vertices[0].z + vertices[1].z + vertices[2].z) / 3.0
}

/// Per-frame triangle buffer, reused between frames
#[derive(Debug, Default)]
pub struct RenderQueue {
    triangles: Vec<RenderTriangle>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last frame's triangles but keep the allocation
    pub fn clear(&mut self) {
        self.triangles.clear();
    }

    pub fn push(&mut self, triangle: RenderTriangle) {
        self.triangles.push(triangle);
    }

    /// Farthest first. The sort is stable, so triangles with equal depth keep
    /// submission order.
    pub fn sort_back_to_front(&mut self) {
        self.triangles.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    }

    pub fn triangles(&self) -> &[RenderTriangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}
