//! Frame driver
//!
//! [`Viewer`] owns the camera, the sky cycle and every actor, and advances
//! them once per tick. Renderers never touch that state; they receive a
//! [`FrameSnapshot`] of plain values through a [`FrameSink`].

use glam::Vec3;

use crate::config::ViewerConfig;
use crate::error::ViewerResult;
use crate::input::FrameInput;
use crate::scene::{
    Actor, CameraController, CameraUniformData, FlyCamera, FreeFlyController, RandSource,
    RandomSource, SkyCycle, SkyMode, TransformUniformData,
};
use crate::window::Window;

/// Per-actor render data
#[derive(Debug, Clone, PartialEq)]
pub struct ActorSnapshot {
    pub name: String,
    pub position: Vec3,
    pub facing: Vec3,
    /// Model and normal matrices, ready to upload
    pub transform: TransformUniformData,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Ticks simulated so far
    pub frame: u64,
    /// Accumulated simulation time in seconds
    pub elapsed: f64,
    /// View and projection matrices, ready to upload
    pub camera: CameraUniformData,
    /// Vertical field of view in degrees
    pub zoom: f32,
    pub camera_position: Vec3,
    /// Background clear / ambient colour
    pub clear_color: Vec3,
    pub sky_mode: SkyMode,
    /// Sun or moon disc colour
    pub celestial_color: Vec3,
    pub actors: Vec<ActorSnapshot>,
}

impl FrameSnapshot {
    pub fn is_night(&self) -> bool {
        self.sky_mode == SkyMode::Night
    }
}

/// Renderer seam: receives one snapshot per tick
pub trait FrameSink {
    /// Called once the window exists, before the first frame. Renderers
    /// create their surface here.
    fn attach(&mut self, _window: &Window) -> ViewerResult<()> {
        Ok(())
    }

    fn submit(&mut self, frame: &FrameSnapshot) -> ViewerResult<()>;
}

/// Sink that reports frames through the `log` facade
#[derive(Debug, Default)]
pub struct LogSink {
    /// Log at info level every this many frames (0 = never)
    pub summary_interval: u64,
}

impl LogSink {
    pub fn new(summary_interval: u64) -> Self {
        Self { summary_interval }
    }
}

impl FrameSink for LogSink {
    fn attach(&mut self, window: &Window) -> ViewerResult<()> {
        let (width, height) = window.dimensions();
        log::info!(
            "Logging frames for a {}x{} window (scale factor {})",
            width,
            height,
            window.window().scale_factor()
        );
        Ok(())
    }

    fn submit(&mut self, frame: &FrameSnapshot) -> ViewerResult<()> {
        log::debug!(
            "frame {} t={:.3} camera={:?} sky={:?} clear={:?}",
            frame.frame,
            frame.elapsed,
            frame.camera_position,
            frame.sky_mode,
            frame.clear_color
        );
        if self.summary_interval > 0 && frame.frame % self.summary_interval == 0 {
            let actors: Vec<String> = frame
                .actors
                .iter()
                .map(|a| {
                    format!(
                        "{} at ({:.1}, {:.1}, {:.1})",
                        a.name, a.position.x, a.position.y, a.position.z
                    )
                })
                .collect();
            log::info!(
                "Frame {}: sky {:?}, camera ({:.1}, {:.1}, {:.1}), {}",
                frame.frame,
                frame.sky_mode,
                frame.camera_position.x,
                frame.camera_position.y,
                frame.camera_position.z,
                actors.join(", ")
            );
        }
        Ok(())
    }
}

/// Simulation state for the whole scene
pub struct Viewer<R: RandomSource = RandSource> {
    camera: FlyCamera,
    controller: Box<dyn CameraController>,
    sky: SkyCycle,
    actors: Vec<Actor>,
    rng: R,
    elapsed: f64,
    frame: u64,
}

impl Viewer<RandSource> {
    /// Build from config, seeding goal sampling from `config.seed` when set
    pub fn from_config(config: &ViewerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => RandSource::seeded(seed),
            None => RandSource::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> Viewer<R> {
    pub fn with_rng(config: &ViewerConfig, rng: R) -> Self {
        let camera = config.build_camera();
        let actors = config.build_actors();
        log::info!(
            "Viewer ready: camera at {:?}, {} actor(s)",
            camera.position,
            actors.len()
        );
        Self::new(camera, config.build_sky(), actors, rng)
    }

    pub fn new(camera: FlyCamera, sky: SkyCycle, actors: Vec<Actor>, rng: R) -> Self {
        Self {
            controller: Box::new(FreeFlyController::new(&camera)),
            camera,
            sky,
            actors,
            rng,
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Replace the camera controller
    pub fn with_controller<C: CameraController + 'static>(mut self, controller: C) -> Self {
        self.controller = Box::new(controller);
        self
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    pub fn sky(&self) -> &SkyCycle {
        &self.sky
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Put the camera back where it started
    pub fn reset_camera(&mut self) {
        self.controller.reset(&mut self.camera);
    }

    /// Advance every controller by `dt` seconds
    pub fn update(&mut self, input: &FrameInput, dt: f32) {
        let dt = dt.max(0.0);
        self.elapsed += dt as f64;
        self.frame += 1;

        // A night toggle that starts a blend swallows a same-frame sunset toggle
        if input.toggle_night {
            self.sky.toggle_night();
        }
        if input.toggle_sunset {
            self.sky.toggle_sunset();
        }

        self.controller.update(&mut self.camera, &input.camera, dt);
        self.sky.update(dt);

        let elapsed = self.elapsed as f32;
        for actor in &mut self.actors {
            actor.tick(dt, elapsed, &mut self.rng);
        }
    }

    /// Copy out the values a renderer needs
    pub fn snapshot(&self, aspect: f32) -> FrameSnapshot {
        let elapsed = self.elapsed as f32;
        FrameSnapshot {
            frame: self.frame,
            elapsed: self.elapsed,
            camera: self.camera.uniform_data(aspect),
            zoom: self.camera.zoom(),
            camera_position: self.camera.position,
            clear_color: self.sky.current_color(),
            sky_mode: self.sky.mode(),
            celestial_color: self.sky.celestial_color(),
            actors: self
                .actors
                .iter()
                .map(|actor| {
                    let pose = actor.pose();
                    ActorSnapshot {
                        name: actor.name.clone(),
                        position: pose.position,
                        facing: pose.facing,
                        transform: actor.uniform_data(elapsed),
                    }
                })
                .collect(),
        }
    }

    /// Update, then hand the resulting frame to `sink`
    pub fn step<S: FrameSink + ?Sized>(
        &mut self,
        input: &FrameInput,
        dt: f32,
        aspect: f32,
        sink: &mut S,
    ) -> ViewerResult<()> {
        self.update(input, dt);
        sink.submit(&self.snapshot(aspect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;
    use crate::scene::SequenceSource;

    fn viewer() -> Viewer<SequenceSource> {
        Viewer::with_rng(
            &ViewerConfig::default(),
            SequenceSource::new(vec![0.1, 0.9, 0.4, 0.6]),
        )
    }

    #[test]
    fn update_accumulates_time() {
        let mut viewer = viewer();
        let input = FrameInput::default();
        viewer.update(&input, 0.25);
        viewer.update(&input, 0.5);
        assert_eq!(viewer.elapsed(), 0.75);
        assert_eq!(viewer.frame(), 2);
    }

    #[test]
    fn long_runs_keep_small_steps() {
        let mut viewer = viewer();
        let input = FrameInput::default();
        viewer.update(&input, 100_000.0);
        for _ in 0..10 {
            viewer.update(&input, 0.001);
        }
        assert!((viewer.elapsed() - 100_000.01).abs() < 1e-6);
    }

    #[test]
    fn same_frame_toggles_keep_first() {
        let mut viewer = viewer();
        let input = FrameInput {
            toggle_night: true,
            toggle_sunset: true,
            ..Default::default()
        };
        viewer.update(&input, 0.0);
        assert_eq!(viewer.sky().target(), Some(SkyMode::Night));
    }

    #[test]
    fn snapshot_is_a_value_copy() {
        let mut viewer = viewer();
        viewer.update(&FrameInput::default(), 0.1);
        let before = viewer.snapshot(1.5);
        assert_eq!(before, viewer.snapshot(1.5));

        viewer.update(&FrameInput::default(), 0.1);
        let after = viewer.snapshot(1.5);
        assert_ne!(before.actors[0].position, after.actors[0].position);
        assert_eq!(before.frame, 1);
    }

    #[test]
    fn camera_reset() {
        let mut viewer = viewer();
        let mut input = FrameInput::default();
        input.camera.backward = true;
        viewer.update(&input, 1.0);
        assert_ne!(viewer.camera().position, Vec3::new(0.0, 15.0, 55.0));

        viewer.reset_camera();
        assert_eq!(viewer.camera().position, Vec3::new(0.0, 15.0, 55.0));
    }

    struct Collect(Vec<FrameSnapshot>);

    impl FrameSink for Collect {
        fn submit(&mut self, frame: &FrameSnapshot) -> ViewerResult<()> {
            self.0.push(frame.clone());
            Ok(())
        }
    }

    #[test]
    fn step_submits_each_frame() {
        let mut viewer = viewer();
        let mut sink = Collect(Vec::new());
        for _ in 0..3 {
            viewer
                .step(&FrameInput::default(), 1.0 / 60.0, 1.5, &mut sink)
                .unwrap();
        }
        assert_eq!(sink.0.len(), 3);
        assert_eq!(sink.0[2].frame, 3);
        assert_eq!(sink.0[0].actors.len(), 2);
        assert!(!sink.0[0].is_night());

        LogSink::new(1).submit(&sink.0[0]).unwrap();
    }

    #[test]
    fn snapshot_carries_uniforms() {
        let mut viewer = viewer();
        viewer.update(&FrameInput::default(), 0.5);
        let frame = viewer.snapshot(1.5);

        assert_eq!(frame.camera.view, viewer.camera().view_matrix());
        assert_eq!(frame.camera.proj, viewer.camera().projection_matrix(1.5));
        let actor = &viewer.actors()[0];
        let model = actor.style.model_matrix(&actor.pose(), 0.5);
        assert_eq!(frame.actors[0].transform.model, model);
        assert_eq!(bytemuck::bytes_of(&frame.actors[0].transform).len(), 128);
    }

    struct Reject;

    impl FrameSink for Reject {
        fn submit(&mut self, frame: &FrameSnapshot) -> ViewerResult<()> {
            Err(ViewerError::SinkFailed(format!("frame {}", frame.frame)))
        }
    }

    #[test]
    fn step_propagates_sink_failure() {
        let mut viewer = viewer();
        let err = viewer
            .step(&FrameInput::default(), 0.1, 1.5, &mut Reject)
            .unwrap_err();
        assert!(matches!(err, ViewerError::SinkFailed(ref msg) if msg == "frame 1"));
        assert_eq!(viewer.frame(), 1);
    }
}
