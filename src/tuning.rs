//! Data-driven game balance
//!
//! Every gameplay constant lives in one immutable [`Tuning`] value that a
//! session consumes when it starts. Defaults come from [`crate::consts`];
//! a JSON file may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while reading a tuning file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Gameplay constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Bird ===
    pub bird_size: f32,
    /// Fixed horizontal position of the bird
    pub bird_x: f32,
    pub bird_spawn_y: f32,
    pub gravity: f32,
    pub flap_velocity: f32,
    pub flap_impulse_duration: f32,
    pub death_fade_duration: f32,

    // === Pipes ===
    pub base_pipe_speed: f32,
    pub pipe_width: f32,
    pub initial_gap: f32,
    pub min_gap: f32,
    pub pipe_spacing: f32,
    pub pool_capacity: usize,
    pub initial_pipes: usize,
    pub first_pipe_x: f32,
    pub recycle_margin: f32,
    pub gap_margin_top: f32,
    pub gap_margin_bottom: f32,

    // === Playfield ===
    pub reference_width: f32,
    pub reference_height: f32,
    pub max_frame_dt: f32,

    // === Effects ===
    pub shake_frames: u32,
    pub shake_magnitude: i32,

    // === Interstitial ===
    pub interstitial_interval: u64,
    pub interstitial_probability: f64,
    /// Length of the interstitial media, for collaborators that time it
    pub interstitial_seconds: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bird_size: BIRD_SIZE,
            bird_x: BIRD_X,
            bird_spawn_y: BIRD_SPAWN_Y,
            gravity: GRAVITY,
            flap_velocity: FLAP_VELOCITY,
            flap_impulse_duration: FLAP_IMPULSE_DURATION,
            death_fade_duration: DEATH_FADE_DURATION,

            base_pipe_speed: BASE_PIPE_SPEED,
            pipe_width: PIPE_WIDTH,
            initial_gap: INITIAL_PIPE_GAP,
            min_gap: MIN_PIPE_GAP,
            pipe_spacing: PIPE_SPACING,
            pool_capacity: POOL_CAPACITY,
            initial_pipes: INITIAL_PIPES,
            first_pipe_x: FIRST_PIPE_X,
            recycle_margin: RECYCLE_MARGIN,
            gap_margin_top: GAP_MARGIN_TOP,
            gap_margin_bottom: GAP_MARGIN_BOTTOM,

            reference_width: REFERENCE_WIDTH,
            reference_height: REFERENCE_HEIGHT,
            max_frame_dt: MAX_FRAME_DT,

            shake_frames: SHAKE_FRAMES,
            shake_magnitude: SHAKE_MAGNITUDE,

            interstitial_interval: INTERSTITIAL_INTERVAL,
            interstitial_probability: INTERSTITIAL_PROBABILITY,
            interstitial_seconds: INTERSTITIAL_SECONDS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Read a tuning file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Read a tuning file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({})", e);
                Self::default()
            }
        }
    }

    /// Clamp degenerate values so the core never sees them
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        // Signed quantities only need to be finite
        self.gravity = finite_or(self.gravity, defaults.gravity);
        self.flap_velocity = finite_or(self.flap_velocity, defaults.flap_velocity);
        self.bird_x = finite_or(self.bird_x, defaults.bird_x);
        self.bird_spawn_y = finite_or(self.bird_spawn_y, defaults.bird_spawn_y);
        self.first_pipe_x = finite_or(self.first_pipe_x, defaults.first_pipe_x);
        self.gap_margin_top = finite_or(self.gap_margin_top, defaults.gap_margin_top);
        self.gap_margin_bottom = finite_or(self.gap_margin_bottom, defaults.gap_margin_bottom);

        self.bird_size = positive_or(self.bird_size, defaults.bird_size);
        self.pipe_width = positive_or(self.pipe_width, defaults.pipe_width);
        self.pipe_spacing = positive_or(self.pipe_spacing, defaults.pipe_spacing);
        self.base_pipe_speed = positive_or(self.base_pipe_speed, defaults.base_pipe_speed);
        self.flap_impulse_duration =
            positive_or(self.flap_impulse_duration, defaults.flap_impulse_duration);
        self.death_fade_duration =
            positive_or(self.death_fade_duration, defaults.death_fade_duration);
        self.reference_width = positive_or(self.reference_width, defaults.reference_width);
        self.reference_height = positive_or(self.reference_height, defaults.reference_height);
        self.max_frame_dt = positive_or(self.max_frame_dt, defaults.max_frame_dt);

        self.min_gap = positive_or(self.min_gap, defaults.min_gap);
        self.initial_gap = self.initial_gap.max(self.min_gap);
        self.recycle_margin = self.recycle_margin.max(0.0);
        self.initial_pipes = self.initial_pipes.max(1);
        self.pool_capacity = self.pool_capacity.max(self.initial_pipes);
        self.interstitial_interval = self.interstitial_interval.max(1);
        self.interstitial_probability = if self.interstitial_probability.is_nan() {
            defaults.interstitial_probability
        } else {
            self.interstitial_probability.clamp(0.0, 1.0)
        };
        self.shake_magnitude = self.shake_magnitude.max(0);
        self
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
