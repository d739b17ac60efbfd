//! Scene Viewer - simulation core for a free-fly 3D scene
//!
//! Each tick advances three independent pieces of state:
//! - **Camera**: yaw/pitch free-fly camera driven by held keys and mouse deltas
//! - **Sky**: day / night / sunset ambient colour with timed blends
//! - **Actors**: wanderers that seek random goals along weaving paths
//!
//! Window and input plumbing live in [`window`] and [`input`]; drawing is
//! delegated to a [`FrameSink`] that receives an immutable [`FrameSnapshot`].

pub mod config;
pub mod error;
pub mod input;
pub mod scene;
pub mod viewer;
pub mod window;

pub use config::ViewerConfig;
pub use error::{ConfigError, ViewerError, ViewerResult};
pub use input::{FrameInput, InputState};
pub use viewer::{ActorSnapshot, FrameSink, FrameSnapshot, LogSink, Viewer};
pub use window::Window;
