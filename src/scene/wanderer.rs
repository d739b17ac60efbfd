//! Autonomous wandering motion
//!
//! A wanderer seeks a random goal inside a box. Its heading is the straight
//! line to the goal bent sideways by a sine of the simulation clock, which
//! turns plain seeking into a weaving flight path.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Uniform range sampler used for goal selection
pub trait RandomSource {
    /// Sample uniformly from `[low, high)`. Returns `low` for an empty range.
    fn uniform(&mut self, low: f32, high: f32) -> f32;
}

/// [`RandomSource`] backed by a `rand` generator
#[derive(Debug, Clone)]
pub struct RandSource<R = StdRng> {
    rng: R,
}

impl RandSource<StdRng> {
    /// Deterministic source for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> RandSource<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RandSource<R> {
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        if high > low {
            self.rng.gen_range(low..high)
        } else {
            low
        }
    }
}

/// Replays a fixed cycle of unit samples in `[0, 1)`, each mapped onto the
/// requested range.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    samples: Vec<f32>,
    next: usize,
}

impl SequenceSource {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples, next: 0 }
    }
}

impl RandomSource for SequenceSource {
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        if self.samples.is_empty() || high <= low {
            return low;
        }
        let t = self.samples[self.next % self.samples.len()].clamp(0.0, 1.0);
        self.next += 1;
        low + t * (high - low)
    }
}

/// Tuning for one wandering actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderParams {
    /// Travel speed in units per second
    pub speed: f32,
    /// Angular rate of the sideways oscillation (radians per second)
    pub curve_rate: f32,
    /// Strength of the sideways oscillation relative to the goal direction
    pub curve_amount: f32,
    /// Goal reached once closer than this
    pub arrival_radius: f32,
    /// `[min, max)` for goal X and Z
    pub horizontal_range: [f32; 2],
    /// Lowest goal altitude
    pub min_altitude: f32,
    /// Goals are sampled in `[min_altitude, min_altitude + vertical_range)`
    pub vertical_range: f32,
}

impl Default for WanderParams {
    fn default() -> Self {
        Self::ho_oh()
    }
}

impl WanderParams {
    /// Wide, slow arcs high above the scene
    pub fn ho_oh() -> Self {
        Self {
            speed: 10.0,
            curve_rate: 0.5,
            curve_amount: 1.0,
            arrival_radius: 2.0,
            horizontal_range: [-60.0, 60.0],
            min_altitude: 60.0,
            vertical_range: 20.0,
        }
    }

    /// Tight, erratic curves close to the ground
    pub fn mew() -> Self {
        Self {
            speed: 2.7,
            curve_rate: 2.7,
            curve_amount: 2.7,
            arrival_radius: 1.0,
            horizontal_range: [-20.0, 20.0],
            min_altitude: 0.5,
            vertical_range: 3.0,
        }
    }

    pub fn max_altitude(&self) -> f32 {
        self.min_altitude + self.vertical_range
    }

    /// Whether `point` lies inside the goal sampling box
    pub fn contains_goal(&self, point: Vec3) -> bool {
        let [low, high] = self.horizontal_range;
        let horizontal = |v: f32| v >= low && (v < high || low == high);
        horizontal(point.x)
            && horizontal(point.z)
            && point.y >= self.min_altitude
            && (point.y < self.max_altitude() || self.vertical_range == 0.0)
    }

    fn sample_goal<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let [low, high] = self.horizontal_range;
        let x = rng.uniform(low, high);
        let z = rng.uniform(low, high);
        let y = rng.uniform(self.min_altitude, self.max_altitude());
        Vec3::new(x, y, z)
    }
}

/// Position and heading handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorPose {
    pub position: Vec3,
    /// Unit-length heading
    pub facing: Vec3,
}

/// Goal-seeking steered motion with sideways curve
#[derive(Debug, Clone)]
pub struct Wanderer {
    params: WanderParams,
    position: Vec3,
    target: Vec3,
    direction: Vec3,
}

impl Wanderer {
    /// Spawn idle at `position`; the first tick picks a goal
    pub fn new(params: WanderParams, position: Vec3) -> Self {
        Self {
            params,
            position,
            target: position,
            direction: Vec3::Z,
        }
    }

    pub fn params(&self) -> &WanderParams {
        &self.params
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn pose(&self) -> ActorPose {
        ActorPose {
            position: self.position,
            facing: self.direction,
        }
    }

    /// Advance by `dt` seconds. `elapsed` is the accumulated simulation time
    /// and drives the curve phase; `dt` only scales the step.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, dt: f32, elapsed: f32, rng: &mut R) {
        if self.position.distance(self.target) < self.params.arrival_radius {
            self.target = self.params.sample_goal(rng);
            log::debug!("New wander goal {:?}", self.target);
        }

        let Some(linear) = (self.target - self.position).try_normalize() else {
            return;
        };
        // Zero when heading straight up or down; the curve then has no axis
        let lateral = linear
            .cross(Vec3::Y)
            .try_normalize()
            .unwrap_or(Vec3::ZERO);
        let curve = (elapsed * self.params.curve_rate).sin();

        let steered = linear + lateral * curve * self.params.curve_amount;
        let Some(direction) = steered.try_normalize() else {
            log::warn!("Degenerate wander heading at {:?}", self.position);
            return;
        };

        self.direction = direction;
        self.position += direction * self.params.speed * dt;
    }
}
