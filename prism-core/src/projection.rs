//! Camera, lens and projection utilities

use nalgebra::Point3;

use crate::algebra::{
    quat_from_axis_angle, quat_inverse, quat_multiply, quat_normalize, quat_to_mat4, rotate_vector, Mat4,
    Quat, Vec2, Vec3,
};

/// Pitch is kept just short of straight up/down so yaw stays well defined
pub const PITCH_LIMIT: f32 = 1.55;

const WORLD_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// A free-flying camera. Looks down -Z when its rotation is the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn forward(&self) -> Vec3 {
        rotate_vector(&Vec3::new(0.0, 0.0, -1.0), &self.rotation)
    }

    pub fn right(&self) -> Vec3 {
        rotate_vector(&Vec3::x(), &self.rotation)
    }

    /// Move along the view direction, the view's right vector and world up.
    ///
    /// The three direction arguments are usually -1, 0 or 1 from the input
    /// controller; `speed` is the distance for one unit of each.
    pub fn move_by(&mut self, forward: f32, right: f32, up: f32, speed: f32) {
        let delta = self.forward() * (forward * speed)
            + self.right() * (right * speed)
            + WORLD_UP * (up * speed);
        self.position += delta;
    }

    /// Turn the camera from pointer deltas.
    ///
    /// Yaw turns about world up and pitch about the camera's own right
    /// axis, so the horizon never rolls. Pitch is clamped to
    /// [`PITCH_LIMIT`].
    pub fn mouse_look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        let yaw = self.look_yaw() - dx * sensitivity;
        let pitch = (self.look_pitch() - dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let yaw_q = quat_from_axis_angle(&WORLD_UP, yaw);
        let pitch_q = quat_from_axis_angle(&Vec3::x(), pitch);
        self.rotation = quat_normalize(&quat_multiply(&yaw_q, &pitch_q));
    }

    /// Heading about world up of a yaw-then-pitch rotation
    pub fn look_yaw(&self) -> f32 {
        let q = &self.rotation;
        (2.0 * (q.w * q.j + q.i * q.k)).atan2(1.0 - 2.0 * (q.j * q.j + q.i * q.i))
    }

    /// Elevation about the camera's right axis of a yaw-then-pitch rotation
    pub fn look_pitch(&self) -> f32 {
        let q = &self.rotation;
        (2.0 * (q.w * q.i - q.k * q.j)).clamp(-1.0, 1.0).asin()
    }

    /// World to camera space: translate the camera to the origin, then undo
    /// its rotation. Cameras carry no scale.
    pub fn to_camera_space(&self, world: &Vec3) -> Vec3 {
        rotate_vector(&(world - self.position), &quat_inverse(&self.rotation))
    }

    /// Matrix form of [`Camera::to_camera_space`]: inverse rotation applied
    /// after the inverse translation.
    pub fn view_matrix(&self) -> Mat4 {
        let rotation = quat_to_mat4(&quat_inverse(&self.rotation));
        let translation = Mat4::new_translation(&-self.position);
        rotation * translation
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Perspective parameters shared by both render paths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Lens {
    pub fn new(fov_y: f32, near: f32, far: f32) -> Self {
        Self { fov_y, near, far }
    }

    pub fn perspective_matrix(&self, aspect: f32) -> Mat4 {
        perspective(self.fov_y, aspect, self.near, self.far)
    }

    /// Project a camera-space point to normalized device coordinates.
    ///
    /// Returns `None` for points at or behind the eye, which callers avoid by
    /// clipping against the near plane first.
    pub fn project(&self, camera_space: &Vec3, aspect: f32) -> Option<Vec2> {
        project_point(&self.perspective_matrix(aspect), camera_space)
    }
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_y: 1.57,
            near: 0.05,
            far: 100.0,
        }
    }
}

/// OpenGL-style right-handed perspective projection.
///
/// Camera-space `-z` becomes clip-space `w`, so the divide by `w` performs
/// the perspective foreshortening.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let t = (fov_y * 0.5).tan();
    let mut m = Mat4::zeros();
    m[(0, 0)] = 1.0 / (aspect * t);
    m[(1, 1)] = 1.0 / t;
    m[(2, 2)] = -(far + near) / (far - near);
    m[(2, 3)] = -(2.0 * far * near) / (far - near);
    m[(3, 2)] = -1.0;
    m
}

/// Camera space to NDC through a projection matrix, `None` at or behind the eye
pub fn project_point(projection: &Mat4, camera_space: &Vec3) -> Option<Vec2> {
    let clip = projection * Point3::from(*camera_space).to_homogeneous();
    if clip.w <= f32::EPSILON {
        return None;
    }
    Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
}

/// NDC (`[-1, 1]`, y up) to pixel coordinates (y down)
pub fn ndc_to_screen(ndc: &Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height)
}
