//! Near-plane clipping in camera space
//!
//! The camera looks down -Z, so the near plane is `z = -near` and a point is
//! visible when `z <= -near`. Everything is clipped before projection so the
//! perspective divide never sees `w <= 0`.

use crate::algebra::{lerp, Vec3};

/// Result of clipping one triangle: zero, one or two triangles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clipped {
    Culled,
    One([Vec3; 3]),
    Two([Vec3; 3], [Vec3; 3]),
}

impl Clipped {
    pub fn len(&self) -> usize {
        match self {
            Clipped::Culled => 0,
            Clipped::One(_) => 1,
            Clipped::Two(..) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Clipped::Culled)
    }

    pub fn iter(&self) -> impl Iterator<Item = [Vec3; 3]> {
        let (first, second) = match *self {
            Clipped::Culled => (None, None),
            Clipped::One(a) => (Some(a), None),
            Clipped::Two(a, b) => (Some(a), Some(b)),
        };
        first.into_iter().chain(second)
    }
}

fn is_inside(v: &Vec3, near: f32) -> bool {
    v.z <= -near
}

/// Point where the segment `from → to` crosses `z = -near`
fn intersect(from: &Vec3, to: &Vec3, near: f32) -> Vec3 {
    let t = (-near - from.z) / (to.z - from.z);
    lerp(from, to, t)
}

/// Clip a camera-space triangle against the near plane.
///
/// Output triangles keep the winding of the input. With two vertices inside,
/// the remaining quad is split along the diagonal from the first inside
/// vertex.
pub fn clip_triangle(tri: [Vec3; 3], near: f32) -> Clipped {
    let inside = tri.map(|v| is_inside(&v, near));

    match inside.iter().filter(|&&b| b).count() {
        3 => Clipped::One(tri),
        0 => Clipped::Culled,
        1 => {
            // Rotate so the lone inside vertex comes first; winding is kept
            let i = inside.iter().position(|&b| b).unwrap_or(0);
            let (a, b, c) = (tri[i], tri[(i + 1) % 3], tri[(i + 2) % 3]);
            Clipped::One([a, intersect(&a, &b, near), intersect(&a, &c, near)])
        }
        _ => {
            // Rotate so the lone outside vertex comes first: (out, a, b)
            let o = inside.iter().position(|&b| !b).unwrap_or(0);
            let (out, a, b) = (tri[o], tri[(o + 1) % 3], tri[(o + 2) % 3]);
            let on_b = intersect(&b, &out, near);
            let on_a = intersect(&a, &out, near);
            Clipped::Two([a, b, on_b], [a, on_b, on_a])
        }
    }
}

/// Clip a camera-space segment, returning the visible part if any
pub fn clip_segment(segment: [Vec3; 2], near: f32) -> Option<[Vec3; 2]> {
    let [p0, p1] = segment;
    match (is_inside(&p0, near), is_inside(&p1, near)) {
        (true, true) => Some(segment),
        (false, false) => None,
        (true, false) => Some([p0, intersect(&p0, &p1, near)]),
        (false, true) => Some([intersect(&p1, &p0, near), p1]),
    }
}
