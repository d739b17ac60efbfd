//! Scene state advanced every frame

mod actor;
mod camera;
mod camera_controller;
mod sky;
mod wanderer;

pub use actor::*;
pub use camera::*;
pub use camera_controller::*;
pub use sky::*;
pub use wanderer::*;
