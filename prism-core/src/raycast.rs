//! Ray casting against scene objects
//!
//! Picking works on world-space triangles: every vertex of an object is
//! pushed through its transform for each cast, so results always reflect the
//! current transform without any cached bounds.

use crate::algebra::{normalize, rotate_vector, Vec2, Vec3};
use crate::geometry::Object;
use crate::projection::{Camera, Lens};

/// Rejects near-parallel rays and hits at (or behind) the origin
pub const EPSILON: f32 = 1e-6;

/// A half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// The direction is normalized; a zero direction stays zero and never hits.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: normalize(&direction),
        }
    }

    /// Straight out of the camera along its view direction
    pub fn from_camera(camera: &Camera) -> Self {
        Self::new(camera.position, camera.forward())
    }

    /// Through a point on the screen given in normalized device coordinates.
    ///
    /// The camera-space direction is rebuilt from the lens, then rotated into
    /// world space, so no matrix inverse is needed.
    pub fn through_screen(camera: &Camera, lens: &Lens, aspect: f32, ndc: &Vec2) -> Self {
        let t = (lens.fov_y * 0.5).tan();
        let local = Vec3::new(ndc.x * aspect * t, ndc.y * t, -1.0);
        Self::new(camera.position, rotate_vector(&local, &camera.rotation))
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The first `length` units of the ray as a line segment
    pub fn segment(&self, length: f32) -> [Vec3; 2] {
        [self.origin, self.point_at(length)]
    }
}

/// Closest intersection found by [`raycast`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index of the object in the slice that was searched
    pub index: usize,
    pub distance: f32,
    pub point: Vec3,
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the distance along the ray. Both windings are hit; rays parallel to
/// the triangle's plane and hits closer than [`EPSILON`] miss.
pub fn intersect_triangle(ray: &Ray, v0: &Vec3, v1: &Vec3, v2: &Vec3) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > EPSILON).then_some(t)
}

/// Nearest hit against every face of `object` in world space
pub fn intersect_object(ray: &Ray, object: &Object) -> Option<f32> {
    let transform = &object.transform;
    object
        .mesh
        .triangles()
        .filter_map(|tri| {
            let [v0, v1, v2] = tri.map(|v| transform.apply(&v));
            intersect_triangle(ray, &v0, &v1, &v2)
        })
        .min_by(f32::total_cmp)
}

/// Nearest hit across `objects`.
///
/// Distances within a relative [`EPSILON`] of each other count as equal, and
/// on equal distances the earlier object wins.
pub fn raycast(ray: &Ray, objects: &[Object]) -> Option<RayHit> {
    let mut best: Option<(usize, f32)> = None;

    for (index, object) in objects.iter().enumerate() {
        if let Some(t) = intersect_object(ray, object) {
            if best.map_or(true, |(_, closest)| t < closest - EPSILON * closest.max(1.0)) {
                best = Some((index, t));
            }
        }
    }

    best.map(|(index, distance)| RayHit {
        index,
        distance,
        point: ray.point_at(distance),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, Mesh};
    use crate::transform::Transform;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn unit_triangle() -> [Vec3; 3] {
        [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    fn cube_at(name: &str, z: f32) -> Object {
        let mesh = Arc::new(Mesh::cube(1.0, Color::WHITE));
        Object::new(name, mesh).with_transform(Transform::new().at(0.0, 0.0, z))
    }

    #[test]
    fn test_hit_straight_on() {
        let [a, b, c] = unit_triangle();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let t = intersect_triangle(&ray, &a, &b, &c).unwrap();
        assert_relative_eq!(t, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_back_face_is_hit_too() {
        let [a, b, c] = unit_triangle();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(intersect_triangle(&ray, &a, &b, &c).is_some());
    }

    #[test]
    fn test_pointing_away_misses() {
        let [a, b, c] = unit_triangle();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(intersect_triangle(&ray, &a, &b, &c).is_none());
    }

    #[test]
    fn test_parallel_and_outside_miss() {
        let [a, b, c] = unit_triangle();
        let parallel = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::x());
        assert!(intersect_triangle(&parallel, &a, &b, &c).is_none());

        let beside = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_triangle(&beside, &a, &b, &c).is_none());
    }

    #[test]
    fn test_origin_on_triangle_misses() {
        let [a, b, c] = unit_triangle();
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_triangle(&ray, &a, &b, &c).is_none());
    }

    #[test]
    fn test_raycast_returns_nearest_object() {
        let objects = vec![cube_at("far", -10.0), cube_at("near", -4.0)];
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let hit = raycast(&ray, &objects).unwrap();
        assert_eq!(hit.index, 1);
        assert_relative_eq!(hit.distance, 3.5, epsilon = 1e-5);
        assert_relative_eq!(hit.point, Vec3::new(0.0, 0.0, -3.5), epsilon = 1e-5);
    }

    #[test]
    fn test_raycast_ties_keep_first_object() {
        let objects = vec![cube_at("a", -4.0), cube_at("b", -4.0)];
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(raycast(&ray, &objects).unwrap().index, 0);
    }

    #[test]
    fn test_near_coincident_objects_keep_first() {
        // The second cube is a couple of ULPs closer, which is float noise
        let objects = vec![cube_at("a", -4.0), cube_at("b", -3.999_999_8)];
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(raycast(&ray, &objects).unwrap().index, 0);

        let separated = vec![cube_at("a", -4.0), cube_at("b", -3.99)];
        assert_eq!(raycast(&ray, &separated).unwrap().index, 1);
    }

    #[test]
    fn test_raycast_no_hit() {
        let objects = vec![cube_at("a", -4.0)];
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        assert!(raycast(&ray, &objects).is_none());
        assert!(raycast(&ray, &[]).is_none());
    }

    #[test]
    fn test_object_transform_is_applied() {
        let mut object = cube_at("scaled", -4.0);
        object.transform.scale = Vec3::repeat(4.0);
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let t = intersect_object(&ray, &object).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_through_screen_center_matches_camera_ray() {
        let mut camera = Camera::new().at(1.0, 2.0, 3.0);
        camera.mouse_look(30.0, 10.0, 0.01);
        let ray = Ray::through_screen(&camera, &Lens::default(), 1.6, &Vec2::zeros());
        let forward = Ray::from_camera(&camera);
        assert_relative_eq!(ray.direction, forward.direction, epsilon = 1e-5);
        assert_eq!(ray.origin, forward.origin);
    }

    #[test]
    fn test_through_screen_edge_projects_back() {
        let camera = Camera::new();
        let lens = Lens::default();
        let aspect = 2.0;
        let ndc = Vec2::new(0.5, -0.25);
        let ray = Ray::through_screen(&camera, &lens, aspect, &ndc);
        let point = camera.to_camera_space(&ray.point_at(7.0));
        assert_relative_eq!(lens.project(&point, aspect).unwrap(), ndc, epsilon = 1e-4);
    }

    #[test]
    fn test_segment() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        let [a, b] = ray.segment(100.0);
        assert_eq!(a, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(b, Vec3::new(1.0, 100.0, 0.0));
    }
}
