//! Object transforms and model matrix composition

use crate::algebra::{
    quat_from_axis_angle, quat_multiply, quat_normalize, quat_to_mat4, rotate_vector, Mat4, Quat, Vec3,
};

/// Position, rotation and scale of one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Kept at unit length by every rotate operation
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::repeat(1.0),
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = quat_normalize(&rotation);
        self
    }

    /// Apply a rotation of `angle` radians about a local `axis` on top of the
    /// current rotation.
    ///
    /// The product is renormalized every time: repeated multiplication drifts
    /// away from unit length, and a non-unit quaternion would scale vertices.
    pub fn rotate(&mut self, axis: &Vec3, angle: f32) {
        let step = quat_from_axis_angle(axis, angle);
        self.rotation = quat_normalize(&quat_multiply(&self.rotation, &step));
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.rotate(&Vec3::x(), angle);
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.rotate(&Vec3::y(), angle);
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.rotate(&Vec3::z(), angle);
    }

    pub fn translate(&mut self, delta: &Vec3) {
        self.position += delta;
    }

    /// Local to world for a single point: scale, rotate, then translate
    pub fn apply(&self, v: &Vec3) -> Vec3 {
        let scaled = v.component_mul(&self.scale);
        rotate_vector(&scaled, &self.rotation) + self.position
    }

    /// `T · R · S` as one matrix: rotation basis columns scaled per axis,
    /// translation in the last column.
    pub fn model_matrix(&self) -> Mat4 {
        let mut m = quat_to_mat4(&self.rotation);
        for axis in 0..3 {
            let mut basis = m.column_mut(axis);
            basis *= self.scale[axis];
        }
        m[(0, 3)] = self.position.x;
        m[(1, 3)] = self.position.y;
        m[(2, 3)] = self.position.z;
        m
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a model-view-projection matrix
pub fn mvp_matrix(model: &Mat4, view: &Mat4, projection: &Mat4) -> Mat4 {
    projection * view * model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{normalize, quat_inverse};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_identity_transform() {
        let t = Transform::default();
        assert_relative_eq!(t.model_matrix(), Mat4::identity());
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(t.apply(&v), v);
    }

    #[test]
    fn test_model_matrix_matches_apply() {
        let mut t = Transform::new()
            .at(1.5, -2.0, 4.0)
            .with_scale(Vec3::new(2.0, 0.5, 3.0));
        t.rotate_y(0.8);
        t.rotate_x(-0.3);

        let v = Vec3::new(0.25, -1.0, 2.0);
        let by_matrix = t.model_matrix().transform_point(&Point3::from(v));
        assert_relative_eq!(by_matrix.coords, t.apply(&v), epsilon = EPS);
    }

    #[test]
    fn test_inverse_transform_round_trip() {
        let mut t = Transform::new()
            .at(-3.0, 0.5, 7.0)
            .with_scale(Vec3::new(0.02, 4.0, 1.5));
        t.rotate(&normalize(&Vec3::new(1.0, 1.0, 0.0)), 1.1);

        let local = Vec3::new(3.0, -1.0, 0.5);
        let world = t.model_matrix().transform_point(&Point3::from(local)).coords;

        let back = rotate_vector(&(world - t.position), &quat_inverse(&t.rotation))
            .component_div(&t.scale);
        assert_relative_eq!(back, local, epsilon = EPS);
    }

    #[test]
    fn test_rotation_stays_unit_length() {
        let mut t = Transform::new();
        for _ in 0..10_000 {
            t.rotate_x(0.013);
            t.rotate_y(-0.007);
            t.rotate_z(0.021);
        }
        assert_relative_eq!(t.rotation.norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_full_turn_returns_to_start() {
        let mut t = Transform::new();
        for _ in 0..4 {
            t.rotate_z(std::f32::consts::FRAC_PI_2);
        }
        let v = t.apply(&Vec3::x());
        assert_relative_eq!(v, Vec3::x(), epsilon = EPS);
    }

    #[test]
    fn test_translate() {
        let mut t = Transform::new().at(1.0, 1.0, 1.0);
        t.translate(&Vec3::new(0.5, -1.0, 2.0));
        assert_eq!(t.position, Vec3::new(1.5, 0.0, 3.0));
    }

    #[test]
    fn test_mvp_order() {
        let model = Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0));
        let view = Mat4::new_translation(&Vec3::new(0.0, 0.0, -5.0));
        let projection = Mat4::identity();
        let p = mvp_matrix(&model, &view, &projection).transform_point(&Point3::origin());
        assert_relative_eq!(p.coords, Vec3::new(1.0, 0.0, -5.0));
    }
}
