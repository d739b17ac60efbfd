//! Animated actors and their model transforms

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::{ActorPose, RandomSource, WanderParams, Wanderer};

/// Headings closer than this to vertical keep the unrotated model
const MIN_HORIZONTAL_FACING: f32 = 1e-4;

/// Periodic roll used for wing flapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flap {
    /// Oscillation rate in radians per second
    pub rate: f32,
    /// Peak roll about the local Z axis, degrees
    pub amplitude_degrees: f32,
}

/// Static presentation of an actor's model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorStyle {
    pub scale: f32,
    /// Fixed pitch about the local X axis, degrees
    pub tilt_degrees: f32,
    pub flap: Option<Flap>,
}

impl Default for ActorStyle {
    fn default() -> Self {
        Self {
            scale: 1.0,
            tilt_degrees: 0.0,
            flap: None,
        }
    }
}

impl ActorStyle {
    pub fn ho_oh() -> Self {
        Self {
            scale: 0.25,
            tilt_degrees: 75.0,
            flap: Some(Flap {
                rate: 4.0,
                amplitude_degrees: 15.0,
            }),
        }
    }

    pub fn mew() -> Self {
        Self {
            scale: 0.15,
            ..Default::default()
        }
    }

    /// Model matrix for `pose` at simulation time `elapsed`
    pub fn model_matrix(&self, pose: &ActorPose, elapsed: f32) -> Mat4 {
        let mut model = Mat4::from_translation(pose.position) * facing_rotation(pose.facing);

        if self.tilt_degrees != 0.0 {
            model *= Mat4::from_rotation_x(self.tilt_degrees.to_radians());
        }
        if let Some(flap) = self.flap {
            let roll = (elapsed * flap.rate).sin() * flap.amplitude_degrees;
            model *= Mat4::from_rotation_z(roll.to_radians());
        }

        model * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// Rotation taking the model's +Z onto `facing`, with +Y kept upright
fn facing_rotation(facing: Vec3) -> Mat4 {
    if facing.cross(Vec3::Y).length() < MIN_HORIZONTAL_FACING {
        return Mat4::IDENTITY;
    }
    Mat4::look_at_rh(Vec3::ZERO, -facing, Vec3::Y).inverse()
}

/// A named wandering actor
#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
    pub wanderer: Wanderer,
    pub style: ActorStyle,
}

impl Actor {
    pub fn new(name: impl Into<String>, wanderer: Wanderer, style: ActorStyle) -> Self {
        Self {
            name: name.into(),
            wanderer,
            style,
        }
    }

    /// The large firebird circling above the scene
    pub fn ho_oh() -> Self {
        Self::new(
            "Ho-oh",
            Wanderer::new(WanderParams::ho_oh(), Vec3::new(40.0, 30.0, 0.0)),
            ActorStyle::ho_oh(),
        )
    }

    /// The small psychic cat darting near the ground
    pub fn mew() -> Self {
        Self::new(
            "Mew",
            Wanderer::new(WanderParams::mew(), Vec3::new(0.0, 2.0, 0.0)),
            ActorStyle::mew(),
        )
    }

    /// Stock actor matching `name`, ignoring case. Unknown names get the
    /// Ho-oh tuning under their own name.
    pub fn preset(name: &str) -> Self {
        let stock = if name.eq_ignore_ascii_case("mew") {
            Self::mew()
        } else {
            Self::ho_oh()
        };
        Self {
            name: name.to_string(),
            ..stock
        }
    }

    pub fn tick<R: RandomSource + ?Sized>(&mut self, dt: f32, elapsed: f32, rng: &mut R) {
        self.wanderer.tick(dt, elapsed, rng);
    }

    pub fn pose(&self) -> ActorPose {
        self.wanderer.pose()
    }

    /// Build uniform data for shaders
    pub fn uniform_data(&self, elapsed: f32) -> TransformUniformData {
        let model = self.style.model_matrix(&self.pose(), elapsed);
        TransformUniformData {
            model,
            normal_matrix: model.inverse().transpose(),
        }
    }
}

/// Transform uniform data for GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TransformUniformData {
    pub model: Mat4,
    pub normal_matrix: Mat4,
}
