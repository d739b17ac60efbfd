//! Keyboard and mouse mapping
//!
//! Controls:
//!   W / Up       - Move forward
//!   S / Down     - Move backward
//!   A / Left     - Strafe left
//!   D / Right    - Strafe right
//!   Space / C    - Move up / down
//!   N            - Toggle night
//!   M            - Toggle sunset
//!   Mouse        - Look around
//!   Escape       - Exit

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{DeviceEvent, ElementState};
use winit::keyboard::KeyCode;

use crate::scene::{CameraInput, MouseTracker, Movement};

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Move(Movement),
    ToggleNight,
    ToggleSunset,
    Quit,
}

impl Action {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        let action = match key {
            KeyCode::KeyW | KeyCode::ArrowUp => Action::Move(Movement::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Action::Move(Movement::Backward),
            KeyCode::KeyA | KeyCode::ArrowLeft => Action::Move(Movement::Left),
            KeyCode::KeyD | KeyCode::ArrowRight => Action::Move(Movement::Right),
            KeyCode::Space => Action::Move(Movement::Up),
            KeyCode::KeyC => Action::Move(Movement::Down),
            KeyCode::KeyN => Action::ToggleNight,
            KeyCode::KeyM => Action::ToggleSunset,
            KeyCode::Escape => Action::Quit,
            _ => return None,
        };
        Some(action)
    }
}

/// Input consumed by one simulation tick
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub camera: CameraInput,
    /// Night key pressed since the previous tick
    pub toggle_night: bool,
    /// Sunset key pressed since the previous tick
    pub toggle_sunset: bool,
}

/// Accumulates window events between ticks
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    mouse: MouseTracker,
    frame: FrameInput,
    quit_requested: bool,
    /// Set once the platform delivers relative motion; cursor positions
    /// then stop driving the look
    raw_motion: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a key event. Toggles fire on the press edge; OS key repeat is
    /// ignored.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState, repeat: bool) {
        let pressed = state == ElementState::Pressed;
        let edge = pressed && !repeat && self.held.insert(key);
        if !pressed {
            self.held.remove(&key);
        }

        match Action::from_key(key) {
            Some(Action::Move(movement)) => {
                // Another key bound to the same movement may still be down
                let held = Self::movement_keys(movement)
                    .iter()
                    .any(|k| self.held.contains(k));
                self.frame.camera.set_held(movement, held);
            }
            Some(Action::ToggleNight) if edge => self.frame.toggle_night = true,
            Some(Action::ToggleSunset) if edge => self.frame.toggle_sunset = true,
            Some(Action::Quit) if edge => self.quit_requested = true,
            _ => {}
        }
    }

    /// Feed an absolute cursor position
    pub fn handle_cursor(&mut self, x: f32, y: f32) {
        let delta = self.mouse.sample(x, y);
        if !self.raw_motion {
            self.frame.camera.mouse_delta += delta;
        }
    }

    /// Feed relative device motion. Unlike cursor positions this keeps
    /// flowing when the pointer is pinned at a window edge.
    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.raw_motion = true;
            // Device Y grows downward like screen Y
            self.frame.camera.mouse_delta += Vec2::new(delta.0 as f32, -delta.1 as f32);
        }
    }

    /// Forget the cursor baseline so re-entry does not jump the view
    pub fn cursor_left(&mut self) {
        self.mouse.reset();
    }

    /// Release every key, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
        for movement in Movement::ALL {
            self.frame.camera.set_held(movement, false);
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Input for the next tick; clears edges and deltas, keeps held keys
    pub fn take_frame(&mut self) -> FrameInput {
        let frame = self.frame.clone();
        self.frame.toggle_night = false;
        self.frame.toggle_sunset = false;
        self.frame.camera.reset_deltas();
        frame
    }

    fn movement_keys(movement: Movement) -> &'static [KeyCode] {
        match movement {
            Movement::Forward => &[KeyCode::KeyW, KeyCode::ArrowUp],
            Movement::Backward => &[KeyCode::KeyS, KeyCode::ArrowDown],
            Movement::Left => &[KeyCode::KeyA, KeyCode::ArrowLeft],
            Movement::Right => &[KeyCode::KeyD, KeyCode::ArrowRight],
            Movement::Up => &[KeyCode::Space],
            Movement::Down => &[KeyCode::KeyC],
        }
    }
}
