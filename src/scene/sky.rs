//! Day / night / sunset sky colour cycle
//!
//! The sky rests in one of three modes and blends linearly to another when a
//! toggle is accepted. Toggles that arrive mid-transition are dropped; they
//! are neither queued nor allowed to interrupt the running blend.

use glam::Vec3;
use serde::Deserialize;

/// Resting sky mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SkyMode {
    #[default]
    Day,
    Night,
    Sunset,
}

/// Ambient colours for each mode
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkyPalette {
    pub day: Vec3,
    pub night: Vec3,
    pub sunset: Vec3,
    /// Colour of the sun disc (day and sunset)
    pub sun: Vec3,
    /// Colour of the moon disc (night)
    pub moon: Vec3,
}

impl Default for SkyPalette {
    fn default() -> Self {
        Self {
            day: Vec3::new(0.5, 0.8, 1.0),
            night: Vec3::new(0.196, 0.196, 0.274),
            sunset: Vec3::new(1.0, 0.686, 0.0),
            sun: Vec3::new(1.0, 0.5, 0.0),
            moon: Vec3::new(0.8, 0.9, 1.0),
        }
    }
}

impl SkyPalette {
    pub fn color(&self, mode: SkyMode) -> Vec3 {
        match mode {
            SkyMode::Day => self.day,
            SkyMode::Night => self.night,
            SkyMode::Sunset => self.sunset,
        }
    }
}

/// Progress this close to 1.0 counts as finished
const COMPLETION_EPSILON: f64 = 1e-5;

/// A running blend between two colours
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    start: Vec3,
    target: SkyMode,
    /// Seconds spent blending so far
    seconds: f64,
}

impl Transition {
    fn progress(&self, rate: f32) -> f32 {
        (self.seconds * rate as f64).min(1.0) as f32
    }

    fn is_finished(&self, rate: f32) -> bool {
        self.seconds * rate as f64 >= 1.0 - COMPLETION_EPSILON
    }
}

/// Sky colour state machine: {Day, Night, Sunset} x {Stable, Transitioning}
#[derive(Debug, Clone)]
pub struct SkyCycle {
    palette: SkyPalette,
    /// Blend progress per second
    rate: f32,
    mode: SkyMode,
    current: Vec3,
    transition: Option<Transition>,
}

impl Default for SkyCycle {
    fn default() -> Self {
        Self::new(SkyPalette::default(), 0.5)
    }
}

impl SkyCycle {
    /// Start resting in day mode
    pub fn new(palette: SkyPalette, rate: f32) -> Self {
        Self {
            palette,
            rate,
            mode: SkyMode::Day,
            current: palette.day,
            transition: None,
        }
    }

    pub fn palette(&self) -> &SkyPalette {
        &self.palette
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Mode flags as they currently read. While a transition runs this is
    /// the mode left after the toggle cleared the other non-day flag.
    pub fn mode(&self) -> SkyMode {
        self.mode
    }

    pub fn is_night(&self) -> bool {
        self.mode == SkyMode::Night
    }

    pub fn is_sunset(&self) -> bool {
        self.mode == SkyMode::Sunset
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Mode being blended toward, if any
    pub fn target(&self) -> Option<SkyMode> {
        self.transition.map(|t| t.target)
    }

    /// Blend progress in [0, 1]; 1.0 when stable
    pub fn progress(&self) -> f32 {
        self.transition.map_or(1.0, |t| t.progress(self.rate))
    }

    /// Current ambient / clear colour
    pub fn current_color(&self) -> Vec3 {
        self.current
    }

    /// Sun or moon disc colour for the current mode
    pub fn celestial_color(&self) -> Vec3 {
        if self.is_night() {
            self.palette.moon
        } else {
            self.palette.sun
        }
    }

    /// Blend to night, or back to day when already night.
    /// Returns `false` if a transition is already running.
    pub fn toggle_night(&mut self) -> bool {
        self.toggle(SkyMode::Night)
    }

    /// Blend to sunset, or back to day when already sunset.
    /// Returns `false` if a transition is already running.
    pub fn toggle_sunset(&mut self) -> bool {
        self.toggle(SkyMode::Sunset)
    }

    fn toggle(&mut self, toward: SkyMode) -> bool {
        if let Some(running) = self.transition {
            log::warn!(
                "Ignoring {:?} toggle while blending to {:?}",
                toward,
                running.target
            );
            return false;
        }

        let target = if self.mode == toward {
            SkyMode::Day
        } else {
            toward
        };
        // Toggling one effect switches the other one off right away
        if self.mode != toward {
            self.mode = SkyMode::Day;
        }

        self.transition = Some(Transition {
            start: self.current,
            target,
            seconds: 0.0,
        });
        log::info!("Sky transition started: {:?} -> {:?}", self.mode, target);
        true
    }

    /// Advance a running transition by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let Some(mut transition) = self.transition else {
            return;
        };

        transition.seconds += dt.max(0.0) as f64;
        let target_color = self.palette.color(transition.target);

        if transition.is_finished(self.rate) {
            self.current = target_color;
            self.mode = transition.target;
            self.transition = None;
            log::info!("Sky transition finished: {:?}", self.mode);
        } else {
            self.current = transition
                .start
                .lerp(target_color, transition.progress(self.rate));
            self.transition = Some(transition);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish(sky: &mut SkyCycle) {
        while sky.is_transitioning() {
            sky.update(0.25);
        }
    }

    #[test]
    fn starts_in_day() {
        let sky = SkyCycle::default();
        assert_eq!(sky.mode(), SkyMode::Day);
        assert_eq!(sky.current_color(), SkyPalette::default().day);
        assert!(!sky.is_transitioning());
        assert_eq!(sky.progress(), 1.0);
    }

    #[test]
    fn night_after_two_seconds() {
        let mut sky = SkyCycle::default();
        assert!(sky.toggle_night());
        assert_eq!(sky.target(), Some(SkyMode::Night));
        assert_eq!(sky.progress(), 0.0);

        sky.update(1.0);
        assert_eq!(sky.progress(), 0.5);
        assert!(!sky.is_night());
        sky.update(1.0);

        assert!(!sky.is_transitioning());
        assert!(sky.is_night());
        assert_eq!(sky.current_color(), SkyPalette::default().night);
    }

    #[test]
    fn midpoint_is_linear_blend() {
        let palette = SkyPalette::default();
        let mut sky = SkyCycle::new(palette, 0.5);
        sky.toggle_sunset();
        sky.update(1.0);
        let expected = palette.day.lerp(palette.sunset, 0.5);
        assert!(sky.current_color().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn overshoot_clamps_to_target() {
        let mut sky = SkyCycle::new(SkyPalette::default(), 3.0);
        sky.toggle_night();
        sky.update(10.0);
        assert!(sky.is_night());
        assert_eq!(sky.current_color(), sky.palette().night);
    }

    #[test]
    fn toggles_ignored_while_transitioning() {
        let mut sky = SkyCycle::default();
        sky.toggle_night();
        sky.update(0.5);
        let color = sky.current_color();
        let progress = sky.progress();

        assert!(!sky.toggle_night());
        assert!(!sky.toggle_sunset());
        assert_eq!(sky.current_color(), color);
        assert_eq!(sky.progress(), progress);
        assert_eq!(sky.target(), Some(SkyMode::Night));
    }

    #[test]
    fn night_round_trip_returns_to_day() {
        let mut sky = SkyCycle::default();
        sky.toggle_night();
        finish(&mut sky);
        assert!(sky.is_night());

        sky.toggle_night();
        assert_eq!(sky.target(), Some(SkyMode::Day));
        assert!(sky.is_night());
        finish(&mut sky);

        assert_eq!(sky.mode(), SkyMode::Day);
        assert!(!sky.is_night() && !sky.is_sunset());
        assert_eq!(sky.current_color(), sky.palette().day);
    }

    #[test]
    fn night_from_sunset_clears_sunset_first() {
        let mut sky = SkyCycle::default();
        sky.toggle_sunset();
        finish(&mut sky);
        assert!(sky.is_sunset());

        sky.toggle_night();
        assert_eq!(sky.mode(), SkyMode::Day);
        assert_eq!(sky.target(), Some(SkyMode::Night));
        finish(&mut sky);
        assert!(sky.is_night());
        assert_eq!(sky.current_color(), sky.palette().night);
    }

    #[test]
    fn celestial_body_follows_mode() {
        let mut sky = SkyCycle::default();
        assert_eq!(sky.celestial_color(), sky.palette().sun);
        sky.toggle_night();
        finish(&mut sky);
        assert_eq!(sky.celestial_color(), sky.palette().moon);
        sky.toggle_sunset();
        finish(&mut sky);
        assert_eq!(sky.celestial_color(), sky.palette().sun);
    }

    #[test]
    fn frame_rate_ticks_finish_on_time() {
        for (rate, fps) in [(0.5, 60.0), (0.3, 60.0), (0.5, 144.0), (0.7, 30.0)] {
            let palette = SkyPalette::default();
            let mut sky = SkyCycle::new(palette, rate);
            sky.toggle_night();

            let ticks = (fps / rate).round() as usize;
            for _ in 0..ticks - 1 {
                sky.update(1.0 / fps);
            }
            assert!(sky.is_transitioning(), "rate {rate} at {fps} fps ended early");

            sky.update(1.0 / fps);
            assert!(!sky.is_transitioning(), "rate {rate} at {fps} fps ended late");
            assert_eq!(sky.progress(), 1.0);
            assert!(sky.is_night());
            assert_eq!(sky.current_color(), palette.night);
        }
    }

    #[test]
    fn stable_update_is_noop() {
        let mut sky = SkyCycle::default();
        sky.update(100.0);
        assert_eq!(sky.mode(), SkyMode::Day);
        assert_eq!(sky.current_color(), sky.palette().day);
    }
}
