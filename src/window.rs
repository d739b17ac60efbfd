//! Window management using winit
//!
//! The window only gathers input and paces ticks; drawing is left to the
//! [`FrameSink`] handed to [`run`].

use std::time::Instant;

use winit::{
    dpi::PhysicalSize,
    event::{DeviceEvent, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window as WinitWindow, WindowBuilder},
};

use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};
use crate::input::InputState;
use crate::scene::RandomSource;
use crate::viewer::{FrameSink, Viewer};

/// Wrapper around winit window with additional state
pub struct Window {
    window: WinitWindow,
    width: u32,
    height: u32,
    close_requested: bool,
    focused: bool,
}

impl Window {
    /// Create a new window with the given title and dimensions
    pub fn new(
        event_loop: &EventLoop<()>,
        title: &str,
        width: u32,
        height: u32,
    ) -> ViewerResult<Self> {
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(width, height))
            .build(event_loop)
            .map_err(|e| ViewerError::WindowCreationFailed(e.to_string()))?;

        // Locked pins the pointer in place; some platforms only support Confined
        let grab = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grab {
            log::warn!("Cursor grab unavailable: {}", e);
        }
        window.set_cursor_visible(false);

        Ok(Self {
            window,
            width,
            height,
            close_requested: false,
            focused: true,
        })
    }

    /// Get the raw window for renderer initialization
    pub fn window(&self) -> &WinitWindow {
        &self.window
    }

    /// Get current window dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Check if close was requested
    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    /// Handle window events
    pub fn handle_event(&mut self, event: &WindowEvent, input: &mut InputState) {
        match event {
            WindowEvent::Resized(size) => {
                self.width = size.width;
                self.height = size.height;
            }
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                input.handle_key(*code, *state, *repeat);
            }
            WindowEvent::CursorMoved { position, .. } => {
                input.handle_cursor(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => input.cursor_left(),
            WindowEvent::Focused(focused) => {
                self.focused = *focused;
                if !focused {
                    input.release_all();
                }
            }
            _ => {}
        }
    }

    /// Handle raw device events; ignored while another window has focus
    pub fn handle_device_event(&self, event: &DeviceEvent, input: &mut InputState) {
        if self.focused {
            input.handle_device_event(event);
        }
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

/// Open a window and drive `viewer` until it is closed or Escape is pressed
pub fn run<R, S>(config: &ViewerConfig, mut viewer: Viewer<R>, mut sink: S) -> ViewerResult<()>
where
    R: RandomSource,
    S: FrameSink,
{
    let event_loop = EventLoop::new().map_err(|e| ViewerError::EventLoop(e.to_string()))?;
    let mut window = Window::new(&event_loop, &config.title, config.width, config.height)?;
    let mut input = InputState::new();
    let mut last_frame = Instant::now();
    let mut failure = None;

    log::info!("Window opened ({}x{})", config.width, config.height);
    sink.attach(&window)?;

    event_loop
        .run(|event, elwt: &EventLoopWindowTarget<()>| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { event, .. } => {
                    window.handle_event(&event, &mut input);
                    if window.should_close() || input.quit_requested() {
                        elwt.exit();
                    }
                }
                Event::DeviceEvent { event, .. } => {
                    window.handle_device_event(&event, &mut input);
                }
                Event::AboutToWait => {
                    let now = Instant::now();
                    let dt = (now - last_frame).as_secs_f32();
                    last_frame = now;

                    let frame = input.take_frame();
                    if let Err(e) = viewer.step(&frame, dt, window.aspect(), &mut sink) {
                        log::error!("Stopping: {}", e);
                        failure = Some(e);
                        elwt.exit();
                        return;
                    }
                    window.request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|e| ViewerError::EventLoop(e.to_string()))?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
