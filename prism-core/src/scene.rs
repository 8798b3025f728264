//! The scene: a camera, the objects it sees and the rays cast into it

use log::debug;

use crate::algebra::Vec3;
use crate::geometry::Object;
use crate::projection::Camera;
use crate::raycast::{raycast, Ray, RayHit};

const INITIAL_CAPACITY: usize = 2;

/// Grow by doubling, starting from [`INITIAL_CAPACITY`]
fn push_doubling<T>(items: &mut Vec<T>, item: T) {
    if items.len() == items.capacity() {
        let additional = items.capacity().max(INITIAL_CAPACITY);
        items.reserve_exact(additional);
    }
    items.push(item);
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    camera: Camera,
    objects: Vec<Object>,
    rays: Vec<Ray>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            objects: Vec::new(),
            rays: Vec::new(),
        }
    }

    /// Append an object and return its index. Insertion order is draw order
    /// for triangles at equal depth.
    pub fn add_object(&mut self, object: Object) -> usize {
        push_doubling(&mut self.objects, object);
        self.objects.len() - 1
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [Object] {
        &mut self.objects
    }

    /// First object with the given name
    pub fn object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn record_ray(&mut self, ray: Ray) {
        push_doubling(&mut self.rays, ray);
    }

    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    pub fn clear_rays(&mut self) {
        self.rays.clear();
    }

    /// Cast `ray` into the scene and keep it for debug display
    pub fn pick(&mut self, ray: Ray) -> Option<RayHit> {
        self.record_ray(ray);
        let hit = raycast(&ray, &self.objects);
        match &hit {
            Some(h) => debug!(
                "ray hit '{}' at distance {:.3}",
                self.objects[h.index].name, h.distance
            ),
            None => debug!("ray missed every object"),
        }
        hit
    }

    /// Total vertex and face count over all objects
    pub fn stats(&self) -> (usize, usize) {
        self.objects.iter().fold((0, 0), |(v, f), o| {
            (v + o.mesh.vertex_count(), f + o.mesh.face_count())
        })
    }

    /// Center of the object positions, or the origin for an empty scene
    pub fn centroid(&self) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::zeros();
        }
        let sum: Vec3 = self.objects.iter().map(|o| o.transform.position).sum();
        sum / self.objects.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, Mesh};
    use crate::transform::Transform;
    use std::sync::Arc;

    fn cube(name: &str, z: f32) -> Object {
        Object::new(name, Arc::new(Mesh::cube(1.0, Color::WHITE)))
            .with_transform(Transform::new().at(0.0, 0.0, z))
    }

    #[test]
    fn test_capacity_doubles_from_two() {
        let mut scene = Scene::new(Camera::new());
        let mut capacities = Vec::new();
        for i in 0..5 {
            scene.add_object(cube(&format!("c{i}"), -3.0));
            capacities.push(scene.objects.capacity());
        }
        assert_eq!(capacities, vec![2, 2, 4, 4, 8]);
    }

    #[test]
    fn test_add_object_returns_index_in_order() {
        let mut scene = Scene::default();
        assert_eq!(scene.add_object(cube("a", -1.0)), 0);
        assert_eq!(scene.add_object(cube("b", -2.0)), 1);
        assert_eq!(scene.objects()[1].name, "b");
        assert!(scene.object("a").is_some());
        assert!(scene.object("missing").is_none());
    }

    #[test]
    fn test_pick_records_ray() {
        let mut scene = Scene::new(Camera::new().at(0.0, 0.0, 5.0));
        scene.add_object(cube("target", 0.0));

        let ray = Ray::from_camera(scene.camera());
        let hit = scene.pick(ray).unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(scene.rays(), &[ray]);

        let miss = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::z());
        assert!(scene.pick(miss).is_none());
        assert_eq!(scene.rays().len(), 2);

        scene.clear_rays();
        assert!(scene.rays().is_empty());
    }

    #[test]
    fn test_stats_and_centroid() {
        let mut scene = Scene::default();
        assert_eq!(scene.centroid(), Vec3::zeros());
        scene.add_object(cube("a", -2.0));
        scene.add_object(cube("b", -4.0));
        assert_eq!(scene.stats(), (16, 24));
        assert_eq!(scene.centroid(), Vec3::new(0.0, 0.0, -3.0));
    }
}
