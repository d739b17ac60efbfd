//! Viewer configuration
//!
//! Every field has a default matching the stock scene, so a TOML file only
//! needs the values it wants to change:
//!
//! ```toml
//! seed = 7
//!
//! [camera]
//! position = [0.0, 15.0, 55.0]
//! speed = 30.0
//!
//! [sky]
//! rate = 0.25
//!
//! [[actors]]
//! name = "Ho-oh"
//! spawn = [40.0, 30.0, 0.0]
//! wander = { speed = 12.0, min_altitude = 50.0 }
//! ```
//!
//! An actor's omitted `spawn`, `wander` and `style` keys fall back to the
//! stock actor with the same name, so the entry above keeps the rest of
//! Ho-oh's tuning. Names other than Ho-oh and Mew start from Ho-oh.

use std::path::Path;

use glam::Vec3;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scene::{
    Actor, ActorStyle, FlyCamera, Projection, SkyCycle, SkyPalette, WanderParams, Wanderer,
    DEFAULT_PITCH, DEFAULT_SENSITIVITY, DEFAULT_SPEED, DEFAULT_YAW, DEFAULT_ZOOM,
};

/// Initial camera pose and tuning
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Degrees
    pub yaw: f32,
    /// Degrees, clamped to +-89
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let projection = Projection::default();
        Self {
            position: Vec3::new(0.0, 15.0, 55.0),
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
            near: projection.near,
            far: projection.far,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> FlyCamera {
        FlyCamera::new(self.position, Vec3::Y, self.yaw, self.pitch)
            .with_speed(self.speed)
            .with_sensitivity(self.sensitivity)
            .with_zoom(self.zoom)
            .with_projection(Projection::new(self.near, self.far))
    }
}

/// Sky colours and blend speed
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Transition progress per second; a full blend takes `1 / rate` seconds
    pub rate: f32,
    pub palette: SkyPalette,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            rate: 0.5,
            palette: SkyPalette::default(),
        }
    }
}

impl SkyConfig {
    pub fn build(&self) -> SkyCycle {
        SkyCycle::new(self.palette, self.rate)
    }
}

/// One wandering actor
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawActorConfig")]
pub struct ActorConfig {
    pub name: String,
    pub spawn: Vec3,
    pub wander: WanderParams,
    pub style: ActorStyle,
}

/// An `[[actors]]` entry as written, before the stock preset fills the gaps
#[derive(Deserialize)]
struct RawActorConfig {
    name: String,
    spawn: Option<Vec3>,
    #[serde(default)]
    wander: toml::Table,
    #[serde(default)]
    style: toml::Table,
}

impl TryFrom<RawActorConfig> for ActorConfig {
    type Error = toml::de::Error;

    fn try_from(raw: RawActorConfig) -> Result<Self, Self::Error> {
        let stock = Actor::preset(&raw.name);
        Ok(Self {
            spawn: raw.spawn.unwrap_or_else(|| stock.wanderer.position()),
            wander: overlay(*stock.wanderer.params(), raw.wander)?,
            style: overlay(stock.style, raw.style)?,
            name: raw.name,
        })
    }
}

/// Apply top-level keys from `overrides` on top of `base`
fn overlay<T>(base: T, overrides: toml::Table) -> Result<T, toml::de::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = toml::Value::try_from(base).map_err(toml::de::Error::custom)?;
    if let toml::Value::Table(table) = &mut value {
        table.extend(overrides);
    }
    value.try_into()
}

impl ActorConfig {
    pub fn build(&self) -> Actor {
        Actor::new(
            self.name.clone(),
            Wanderer::new(self.wander, self.spawn),
            self.style,
        )
    }

    fn from_actor(actor: &Actor) -> Self {
        Self {
            name: actor.name.clone(),
            spawn: actor.wanderer.position(),
            wander: *actor.wanderer.params(),
            style: actor.style,
        }
    }
}

/// Configuration for the viewer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Seed for goal sampling; entropy when absent
    pub seed: Option<u64>,
    pub camera: CameraConfig,
    pub sky: SkyConfig,
    pub actors: Vec<ActorConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Scene Viewer".to_string(),
            width: 1200,
            height: 800,
            seed: None,
            camera: CameraConfig::default(),
            sky: SkyConfig::default(),
            actors: [Actor::ho_oh(), Actor::mew()]
                .iter()
                .map(ActorConfig::from_actor)
                .collect(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::invalid("width/height", "must be non-zero"));
        }

        let camera = &self.camera;
        require_finite("camera.position", camera.position.to_array())?;
        require_finite("camera.yaw", [camera.yaw])?;
        require_finite("camera.pitch", [camera.pitch])?;
        require_non_negative("camera.speed", camera.speed)?;
        require_non_negative("camera.sensitivity", camera.sensitivity)?;
        if !(camera.zoom > 0.0 && camera.zoom < 180.0) {
            return Err(ConfigError::invalid("camera.zoom", "must be in (0, 180) degrees"));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(ConfigError::invalid(
                "camera.near/far",
                "need 0 < near < far",
            ));
        }

        if !(self.sky.rate > 0.0 && self.sky.rate.is_finite()) {
            return Err(ConfigError::invalid("sky.rate", "must be positive"));
        }
        let palette = &self.sky.palette;
        for (field, color) in [
            ("sky.palette.day", palette.day),
            ("sky.palette.night", palette.night),
            ("sky.palette.sunset", palette.sunset),
            ("sky.palette.sun", palette.sun),
            ("sky.palette.moon", palette.moon),
        ] {
            require_finite(field, color.to_array())?;
        }

        for actor in &self.actors {
            validate_actor(actor)?;
        }
        Ok(())
    }

    pub fn build_camera(&self) -> FlyCamera {
        self.camera.build()
    }

    pub fn build_sky(&self) -> SkyCycle {
        self.sky.build()
    }

    pub fn build_actors(&self) -> Vec<Actor> {
        self.actors.iter().map(ActorConfig::build).collect()
    }
}

fn validate_actor(actor: &ActorConfig) -> Result<(), ConfigError> {
    let field = |name: &str| format!("actors.{}.{name}", actor.name);
    let wander = &actor.wander;

    require_finite(&field("spawn"), actor.spawn.to_array())?;
    require_non_negative(&field("wander.speed"), wander.speed)?;
    require_finite(&field("wander.curve_rate"), [wander.curve_rate])?;
    require_finite(&field("wander.curve_amount"), [wander.curve_amount])?;
    require_finite(&field("wander.min_altitude"), [wander.min_altitude])?;
    if !(wander.arrival_radius > 0.0) {
        return Err(ConfigError::invalid(
            field("wander.arrival_radius"),
            "must be positive or the actor never picks a goal",
        ));
    }
    let [low, high] = wander.horizontal_range;
    require_finite(&field("wander.horizontal_range"), [low, high])?;
    if low > high {
        return Err(ConfigError::invalid(
            field("wander.horizontal_range"),
            format!("min {low} is above max {high}"),
        ));
    }
    require_non_negative(&field("wander.vertical_range"), wander.vertical_range)?;
    if !(actor.style.scale > 0.0) {
        return Err(ConfigError::invalid(field("style.scale"), "must be positive"));
    }
    Ok(())
}

fn require_finite<const N: usize>(field: &str, values: [f32; N]) -> Result<(), ConfigError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be finite"))
    }
}

fn require_non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be a finite, non-negative number"))
    }
}
