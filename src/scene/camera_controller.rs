//! Camera controller system
//!
//! Turns per-frame key state and mouse deltas into [`FlyCamera`] commands.

use glam::Vec2;

use super::{FlyCamera, Movement};

/// Input state for camera controllers
#[derive(Debug, Clone, Default)]
pub struct CameraInput {
    /// Movement keys (WASD / arrows, Space and C for up/down)
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,

    /// Mouse delta since last frame (in pixels, +y means look up)
    pub mouse_delta: Vec2,
}

impl CameraInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, movement: Movement) -> bool {
        match movement {
            Movement::Forward => self.forward,
            Movement::Backward => self.backward,
            Movement::Left => self.left,
            Movement::Right => self.right,
            Movement::Up => self.up,
            Movement::Down => self.down,
        }
    }

    pub fn set_held(&mut self, movement: Movement, held: bool) {
        let slot = match movement {
            Movement::Forward => &mut self.forward,
            Movement::Backward => &mut self.backward,
            Movement::Left => &mut self.left,
            Movement::Right => &mut self.right,
            Movement::Up => &mut self.up,
            Movement::Down => &mut self.down,
        };
        *slot = held;
    }

    /// Reset per-frame deltas (call after update)
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = Vec2::ZERO;
    }
}

/// Converts absolute cursor positions into look deltas.
///
/// The first sample only records a baseline so the camera does not snap
/// when the cursor first enters the window.
#[derive(Debug, Clone, Default)]
pub struct MouseTracker {
    last: Option<Vec2>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cursor position and return the delta to feed the camera.
    /// Screen Y grows downward, so the Y component is inverted.
    pub fn sample(&mut self, x: f32, y: f32) -> Vec2 {
        let position = Vec2::new(x, y);
        let delta = match self.last {
            Some(last) => Vec2::new(position.x - last.x, last.y - position.y),
            None => Vec2::ZERO,
        };
        self.last = Some(position);
        delta
    }

    /// Forget the baseline, e.g. after the cursor left the window
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Abstract camera controller trait
pub trait CameraController {
    /// Update the camera based on input and delta time
    fn update(&mut self, camera: &mut FlyCamera, input: &CameraInput, dt: f32);

    /// Get the controller name for debugging
    fn name(&self) -> &'static str;

    /// Restore the camera to the pose the controller started from
    fn reset(&mut self, camera: &mut FlyCamera);
}

/// Free-fly camera controller (FPS-style)
///
/// Every held key applies its own move, so diagonals are faster than
/// straight lines. Mouse look is always active.
pub struct FreeFlyController {
    home: FlyCamera,
}

impl FreeFlyController {
    /// Create a controller that resets to `camera`'s current pose
    pub fn new(camera: &FlyCamera) -> Self {
        Self {
            home: camera.clone(),
        }
    }
}

impl CameraController for FreeFlyController {
    fn update(&mut self, camera: &mut FlyCamera, input: &CameraInput, dt: f32) {
        if input.mouse_delta != Vec2::ZERO {
            camera.process_look(input.mouse_delta.x, input.mouse_delta.y);
        }

        for movement in Movement::ALL {
            if input.is_held(movement) {
                camera.process_move(movement, dt);
            }
        }
    }

    fn name(&self) -> &'static str {
        "FreeFly"
    }

    fn reset(&mut self, camera: &mut FlyCamera) {
        *camera = self.home.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn first_mouse_sample_is_baseline() {
        let mut tracker = MouseTracker::new();
        assert_eq!(tracker.sample(600.0, 400.0), Vec2::ZERO);
        assert_eq!(tracker.sample(610.0, 390.0), Vec2::new(10.0, 10.0));
        assert_eq!(tracker.sample(605.0, 395.0), Vec2::new(-5.0, -5.0));

        tracker.reset();
        assert_eq!(tracker.sample(0.0, 0.0), Vec2::ZERO);
    }

    #[test]
    fn held_keys_apply_independently() {
        let mut camera = FlyCamera::default().with_speed(1.0);
        let mut controller = FreeFlyController::new(&camera);
        let mut input = CameraInput::new();
        input.forward = true;
        input.right = true;
        input.up = true;

        controller.update(&mut camera, &input, 2.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(2.0, 2.0, -2.0), 1e-5));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut camera = FlyCamera::default();
        let mut controller = FreeFlyController::new(&camera);
        let mut input = CameraInput::new();
        input.set_held(Movement::Left, true);
        input.set_held(Movement::Right, true);

        controller.update(&mut camera, &input, 0.5);
        assert!(camera.position.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn mouse_delta_turns_camera() {
        let mut camera = FlyCamera::default();
        let mut controller = FreeFlyController::new(&camera);
        let mut input = CameraInput::new();
        input.mouse_delta = Vec2::new(4.0, 8.0);

        controller.update(&mut camera, &input, 0.016);
        assert!((camera.yaw() - (-89.0)).abs() < 1e-5);
        assert!((camera.pitch() - 2.0).abs() < 1e-5);

        input.reset_deltas();
        assert_eq!(input.mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn reset_restores_home_pose() {
        let mut camera = FlyCamera::new(Vec3::new(0.0, 15.0, 55.0), Vec3::Y, -90.0, 0.0);
        let mut controller = FreeFlyController::new(&camera);
        let mut input = CameraInput::new();
        input.forward = true;
        input.mouse_delta = Vec2::new(30.0, -12.0);
        controller.update(&mut camera, &input, 1.0);
        assert_ne!(camera.position, Vec3::new(0.0, 15.0, 55.0));

        controller.reset(&mut camera);
        assert_eq!(camera.position, Vec3::new(0.0, 15.0, 55.0));
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(controller.name(), "FreeFly");
    }
}
