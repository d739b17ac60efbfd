//! Free-fly camera

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Default yaw in degrees; looks down -Z
pub const DEFAULT_YAW: f32 = -90.0;
/// Default pitch in degrees
pub const DEFAULT_PITCH: f32 = 0.0;
/// Default movement speed in units per second
pub const DEFAULT_SPEED: f32 = 20.0;
/// Default mouse sensitivity (degrees per pixel)
pub const DEFAULT_SENSITIVITY: f32 = 0.25;
/// Default vertical field of view in degrees
pub const DEFAULT_ZOOM: f32 = 45.0;

/// Pitch is kept strictly inside the poles so the basis never degenerates
pub const PITCH_LIMIT: f32 = 89.0;

/// Discrete movement command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Movement {
    pub const ALL: [Movement; 6] = [
        Movement::Forward,
        Movement::Backward,
        Movement::Left,
        Movement::Right,
        Movement::Up,
        Movement::Down,
    ];
}

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 200.0,
        }
    }
}

impl Projection {
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }

    /// Perspective matrix for a vertical field of view given in degrees
    pub fn matrix(&self, fov_y_degrees: f32, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

/// Euler-angle free-fly camera.
///
/// `front`, `right` and `up` are always derived from `yaw`, `pitch` and
/// `world_up`; they are never written from outside this type.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    /// Horizontal look angle in degrees
    yaw: f32,
    /// Vertical look angle in degrees
    pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    zoom: f32,
    pub projection: Projection,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }
}

impl FlyCamera {
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: -Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            world_up,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
            projection: Projection::default(),
        };
        camera.update_vectors();
        camera
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Apply a raw mouse delta (pixels). Pitch is clamped to +-89 degrees.
    pub fn process_look(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.update_vectors();
    }

    /// Translate along the camera basis. Up/Down use world up so vertical
    /// motion does not depend on pitch.
    pub fn process_move(&mut self, direction: Movement, dt: f32) {
        let velocity = self.movement_speed * dt;
        let offset = match direction {
            Movement::Forward => self.front,
            Movement::Backward => -self.front,
            Movement::Right => self.right,
            Movement::Left => -self.right,
            Movement::Up => self.world_up,
            Movement::Down => -self.world_up,
        };
        self.position += offset * velocity;
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        self.projection.matrix(self.zoom, aspect)
    }

    /// Build camera uniform data for shaders
    pub fn uniform_data(&self, aspect: f32) -> CameraUniformData {
        let view = self.view_matrix();
        let proj = self.projection_matrix(aspect);

        CameraUniformData {
            view,
            proj,
            view_proj: proj * view,
            position: self.position.extend(1.0),
            near_far: Vec4::new(self.projection.near, self.projection.far, 0.0, 0.0),
        }
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

/// Camera uniform data for GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniformData {
    pub view: Mat4,
    pub proj: Mat4,
    pub view_proj: Mat4,
    pub position: Vec4,
    pub near_far: Vec4,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(camera: &FlyCamera) {
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        for v in [f, r, u] {
            assert!((v.length() - 1.0).abs() < 1e-5, "not unit: {v:?}");
        }
        assert!(f.dot(r).abs() < 1e-5);
        assert!(f.dot(u).abs() < 1e-5);
        assert!(r.dot(u).abs() < 1e-5);
    }

    #[test]
    fn default_looks_down_negative_z() {
        let camera = FlyCamera::default();
        assert!(camera.front().abs_diff_eq(-Vec3::Z, 1e-6));
        assert!(camera.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(camera.up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn move_forward_one_second() {
        let mut camera = FlyCamera::default();
        camera.process_move(Movement::Forward, 1.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, -20.0), 1e-4));
    }

    #[test]
    fn backward_and_strafe() {
        let mut camera = FlyCamera::default().with_speed(2.0);
        camera.process_move(Movement::Backward, 0.5);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-5));
        camera.process_move(Movement::Right, 1.0);
        camera.process_move(Movement::Left, 0.25);
        assert!(camera.position.abs_diff_eq(Vec3::new(1.5, 0.0, 1.0), 1e-5));
    }

    #[test]
    fn vertical_movement_ignores_pitch() {
        let mut camera = FlyCamera::default().with_speed(1.0);
        camera.process_look(0.0, 200.0);
        assert!(camera.pitch() > 45.0);

        camera.process_move(Movement::Up, 3.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), 1e-5));
        camera.process_move(Movement::Down, 1.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = FlyCamera::default();
        for offset in [10_000.0, -10_000.0, 3.0, -700.0, 1e9] {
            camera.process_look(offset * 0.3, offset);
            assert!(camera.pitch() >= -PITCH_LIMIT && camera.pitch() <= PITCH_LIMIT);
            assert_orthonormal(&camera);
        }
        camera.process_look(0.0, 1e6);
        assert_eq!(camera.pitch(), PITCH_LIMIT);
    }

    #[test]
    fn look_scales_by_sensitivity() {
        let mut camera = FlyCamera::default().with_sensitivity(0.5);
        camera.process_look(20.0, -10.0);
        assert!((camera.yaw() - (DEFAULT_YAW + 10.0)).abs() < 1e-5);
        assert!((camera.pitch() + 5.0).abs() < 1e-5);
    }

    #[test]
    fn yaw_zero_looks_down_positive_x() {
        let camera = FlyCamera::new(Vec3::ZERO, Vec3::Y, 0.0, 0.0);
        assert!(camera.front().abs_diff_eq(Vec3::X, 1e-6));
        assert!(camera.right().abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn view_matrix_is_pure() {
        let mut camera = FlyCamera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, -45.0, 10.0);
        camera.process_look(13.0, 7.0);
        assert_eq!(camera.view_matrix(), camera.view_matrix());

        let eye = camera.view_matrix().inverse().w_axis.truncate();
        assert!(eye.abs_diff_eq(camera.position, 1e-4));
    }

    #[test]
    fn uniform_data_matches_matrices() {
        let camera = FlyCamera::new(Vec3::new(0.0, 15.0, 55.0), Vec3::Y, -90.0, 0.0);
        let data = camera.uniform_data(1.5);
        assert_eq!(data.view, camera.view_matrix());
        assert_eq!(data.proj, camera.projection_matrix(1.5));
        assert_eq!(data.position, Vec4::new(0.0, 15.0, 55.0, 1.0));
        assert_eq!(bytemuck::bytes_of(&data).len(), 3 * 64 + 2 * 16);
    }
}
