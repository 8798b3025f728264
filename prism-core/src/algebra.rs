//! Vector, quaternion and matrix helpers on top of `nalgebra`.
//!
//! Quaternions are kept as the plain (non-unit) `nalgebra::Quaternion` so that
//! renormalization stays an explicit step at every composition site instead of
//! being hidden in the type. Matrices are column-major, column vectors.

use nalgebra::{Point3, SVector};

pub type Vec2 = nalgebra::Vector2<f32>;
pub type Vec3 = nalgebra::Vector3<f32>;
pub type Vec4 = nalgebra::Vector4<f32>;
pub type Quat = nalgebra::Quaternion<f32>;
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Normalize a vector, returning the zero vector when its length is zero.
pub fn normalize<const D: usize>(v: &SVector<f32, D>) -> SVector<f32, D> {
    v.try_normalize(0.0).unwrap_or_else(SVector::zeros)
}

/// Linear interpolation between `start` and `end`; `t` is not clamped.
pub fn lerp<const D: usize>(start: &SVector<f32, D>, end: &SVector<f32, D>, t: f32) -> SVector<f32, D> {
    start + (end - start) * t
}

/// Normalize a quaternion. A zero-length quaternion becomes the identity.
pub fn quat_normalize(q: &Quat) -> Quat {
    let len = q.norm();
    if len == 0.0 {
        return Quat::identity();
    }
    Quat::from(q.coords / len)
}

/// Rotation of `angle` radians around `axis` (expected to be unit length).
pub fn quat_from_axis_angle(axis: &Vec3, angle: f32) -> Quat {
    let half = angle * 0.5;
    let s = half.sin();
    quat_normalize(&Quat::new(half.cos(), axis.x * s, axis.y * s, axis.z * s))
}

/// Hamilton product `a ⊗ b`: applies `b` first, then `a`.
///
/// The result is not renormalized; callers composing rotations repeatedly
/// must follow this with [`quat_normalize`].
pub fn quat_multiply(a: &Quat, b: &Quat) -> Quat {
    a * b
}

/// Conjugate divided by the squared length; identity for a zero quaternion.
pub fn quat_inverse(q: &Quat) -> Quat {
    let len_sq = q.norm_squared();
    if len_sq == 0.0 {
        return Quat::identity();
    }
    Quat::from(q.conjugate().coords / len_sq)
}

/// Rotate `v` by `q` as `q ⊗ v ⊗ q*`.
pub fn rotate_vector(v: &Vec3, q: &Quat) -> Vec3 {
    let pure = Quat::from_imag(*v);
    let r = q * pure * q.conjugate();
    r.imag()
}

/// Euler angles use the Z-Y-X convention: yaw about Z, pitch about Y, roll
/// about X. Results are in radians.
pub fn pitch(q: &Quat) -> f32 {
    let v = 2.0 * (q.w * q.j - q.k * q.i);
    v.clamp(-1.0, 1.0).asin()
}

pub fn yaw(q: &Quat) -> f32 {
    let siny_cosp = 2.0 * (q.w * q.k + q.i * q.j);
    let cosy_cosp = 1.0 - 2.0 * (q.j * q.j + q.k * q.k);
    siny_cosp.atan2(cosy_cosp)
}

pub fn roll(q: &Quat) -> f32 {
    let sinr_cosp = 2.0 * (q.w * q.i + q.j * q.k);
    let cosr_cosp = 1.0 - 2.0 * (q.i * q.i + q.j * q.j);
    sinr_cosp.atan2(cosr_cosp)
}

pub fn mat4_identity() -> Mat4 {
    Mat4::identity()
}

/// `a × b`; applied to a column vector, `b` acts first.
pub fn mat4_multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    a * b
}

/// Rotation matrix of a unit quaternion.
pub fn quat_to_mat4(q: &Quat) -> Mat4 {
    let (x, y, z, w) = (q.i, q.j, q.k, q.w);
    let (xx, yy, zz) = (x * x, y * y, z * z);
    let (xy, xz, yz) = (x * y, x * z, y * z);
    let (wx, wy, wz) = (w * x, w * y, w * z);

    #[rustfmt::skip]
    let m = Mat4::new(
        1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz),       2.0 * (xz + wy),       0.0,
        2.0 * (xy + wz),       1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx),       0.0,
        2.0 * (xz - wy),       2.0 * (yz + wx),       1.0 - 2.0 * (xx + yy), 0.0,
        0.0,                   0.0,                   0.0,                   1.0,
    );
    m
}

pub fn mat4_translation(t: &Vec3) -> Mat4 {
    Mat4::new_translation(t)
}

pub fn mat4_scale(s: &Vec3) -> Mat4 {
    Mat4::new_nonuniform_scaling(s)
}

pub fn mat4_rotation_x(angle: f32) -> Mat4 {
    quat_to_mat4(&quat_from_axis_angle(&Vec3::x(), angle))
}

pub fn mat4_transpose(m: &Mat4) -> Mat4 {
    m.transpose()
}

/// Inverse of a rotation + translation matrix (no scale, no projection).
pub fn mat4_rigid_inverse(m: &Mat4) -> Mat4 {
    let mut r = m.transpose();
    let t = Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    let rotation_t = m.fixed_view::<3, 3>(0, 0).transpose();
    let nt = -(rotation_t * t);
    r[(3, 0)] = 0.0;
    r[(3, 1)] = 0.0;
    r[(3, 2)] = 0.0;
    r[(0, 3)] = nt.x;
    r[(1, 3)] = nt.y;
    r[(2, 3)] = nt.z;
    r
}

pub fn mat4_look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    Mat4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
}

pub fn mat4_orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::new_orthographic(left, right, bottom, top, near, far)
}

/// Column-major float array, the layout GPU uniform uploads expect.
pub fn mat4_to_array(m: &Mat4) -> [f32; 16] {
    let mut out = [0.0; 16];
    out.copy_from_slice(m.as_slice());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    const EPS: f32 = 1e-5;

    fn assert_quat_eq(a: &Quat, b: &Quat) {
        assert_relative_eq!(a.coords, b.coords, epsilon = EPS);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize(&Vec3::zeros()), Vec3::zeros());
        assert_eq!(normalize(&Vec2::zeros()), Vec2::zeros());
    }

    #[test]
    fn test_normalize_idempotent() {
        let v = normalize(&Vec3::new(3.0, -4.0, 12.0));
        assert_relative_eq!(v.norm(), 1.0, epsilon = EPS);
        assert_relative_eq!(normalize(&v), v, epsilon = EPS);

        let q = quat_normalize(&Quat::new(1.0, 2.0, 3.0, 4.0));
        assert_quat_eq(&quat_normalize(&q), &q);
    }

    #[test]
    fn test_zero_quaternion_degrades_to_identity() {
        let zero = Quat::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(quat_normalize(&zero), Quat::identity());
        assert_eq!(quat_inverse(&zero), Quat::identity());
    }

    #[test]
    fn test_quaternion_times_inverse_is_identity() {
        let axes = [
            Vec3::x(),
            Vec3::y(),
            normalize(&Vec3::new(1.0, -2.0, 0.5)),
        ];
        for axis in axes {
            for angle in [0.1, 1.0, FRAC_PI_2, 2.5, -3.0] {
                let q = quat_from_axis_angle(&axis, angle);
                let product = quat_multiply(&q, &quat_inverse(&q));
                assert_quat_eq(&product, &Quat::identity());
            }
        }
    }

    #[test]
    fn test_rotate_vector_quarter_turn() {
        let q = quat_from_axis_angle(&Vec3::y(), FRAC_PI_2);
        let v = rotate_vector(&Vec3::new(1.0, 0.0, 0.0), &q);
        assert_relative_eq!(v, Vec3::new(0.0, 0.0, -1.0), epsilon = EPS);
    }

    #[test]
    fn test_quat_to_mat4_matches_rotate_vector() {
        let q = quat_from_axis_angle(&normalize(&Vec3::new(0.3, 1.0, -0.7)), 1.2);
        let v = Vec3::new(0.5, -2.0, 3.0);
        let m = quat_to_mat4(&q);
        let by_matrix = m.transform_vector(&v);
        assert_relative_eq!(by_matrix, rotate_vector(&v, &q), epsilon = EPS);
    }

    #[test]
    fn test_euler_extraction() {
        let q = quat_from_axis_angle(&Vec3::x(), FRAC_PI_3);
        assert_relative_eq!(roll(&q), FRAC_PI_3, epsilon = EPS);
        assert_relative_eq!(yaw(&q), 0.0, epsilon = EPS);

        let q = quat_from_axis_angle(&Vec3::z(), 0.4);
        assert_relative_eq!(yaw(&q), 0.4, epsilon = EPS);

        let q = quat_from_axis_angle(&Vec3::y(), 0.25);
        assert_relative_eq!(pitch(&q), 0.25, epsilon = EPS);
    }

    #[test]
    fn test_lerp() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(2.0, 4.0, -6.0);
        assert_relative_eq!(lerp(&a, &b, 0.5), Vec3::new(1.0, 2.0, -3.0));
        let a2 = Vec2::new(1.0, 1.0);
        assert_eq!(lerp(&a2, &Vec2::new(3.0, 5.0), 0.0), a2);
    }

    #[test]
    fn test_identity_is_neutral() {
        let m = mat4_translation(&Vec3::new(1.0, 2.0, 3.0)) * mat4_rotation_x(0.7);
        assert_relative_eq!(mat4_multiply(&mat4_identity(), &m), m);
        assert_relative_eq!(mat4_multiply(&m, &mat4_identity()), m);
    }

    #[test]
    fn test_rigid_inverse() {
        let m = mat4_translation(&Vec3::new(4.0, -1.0, 2.0)) * mat4_rotation_x(0.9);
        let product = mat4_multiply(&mat4_rigid_inverse(&m), &m);
        assert_relative_eq!(product, Mat4::identity(), epsilon = EPS);
    }

    #[test]
    fn test_mat4_to_array_is_column_major() {
        let m = mat4_translation(&Vec3::new(7.0, 8.0, 9.0));
        let a = mat4_to_array(&m);
        assert_eq!(&a[12..15], &[7.0, 8.0, 9.0]);
        assert_eq!(a[15], 1.0);
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let m = mat4_look_at(&eye, &Vec3::zeros(), &Vec3::y());
        let p = m.transform_point(&Point3::from(eye));
        assert_relative_eq!(p.coords, Vec3::zeros(), epsilon = EPS);
    }

    #[test]
    fn test_scale_matrix() {
        let m = mat4_scale(&Vec3::new(2.0, 3.0, 4.0));
        let p = m.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p.coords, Vec3::new(2.0, 3.0, 4.0), epsilon = EPS);
        assert_relative_eq!(m.transform_vector(&Vec3::x()), Vec3::new(2.0, 0.0, 0.0), epsilon = EPS);
    }

    #[test]
    fn test_orthographic_maps_box_to_ndc() {
        let m = mat4_orthographic(-2.0, 2.0, -1.0, 1.0, 0.1, 10.0);
        let near_corner = m.transform_point(&Point3::new(2.0, 1.0, -0.1));
        assert_relative_eq!(near_corner.coords, Vec3::new(1.0, 1.0, -1.0), epsilon = EPS);
        let far_corner = m.transform_point(&Point3::new(-2.0, -1.0, -10.0));
        assert_relative_eq!(far_corner.coords, Vec3::new(-1.0, -1.0, 1.0), epsilon = EPS);
    }
}
