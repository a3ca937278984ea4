//! Sky Flap - a side-scrolling bird vs. pipes arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (bird physics, pipe track, particles, game state machine)
//! - `session`: Top-level session wiring the core to its collaborators
//! - `renderer`: Per-frame render snapshot (pure data, no drawing)
//! - `platform`: Input intents and frame timing
//! - `persistence`: Highscore storage collaborators
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, SharedHighScores};
pub use session::{Services, Session};
pub use settings::{DifficultyPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed simulation timestep for hosts that step at a fixed rate (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the core will integrate in one step
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

    /// Bird defaults
    pub const BIRD_SIZE: f32 = 40.0;
    pub const BIRD_X: f32 = 200.0;
    pub const BIRD_SPAWN_Y: f32 = 300.0;
    /// Downward acceleration shared by the bird and death debris (px/s²)
    pub const GRAVITY: f32 = 900.0;
    /// Upward velocity set by a flap (px/s)
    pub const FLAP_VELOCITY: f32 = -320.0;
    pub const FLAP_IMPULSE_DURATION: f32 = 0.18;
    pub const DEATH_FADE_DURATION: f32 = 1.2;

    /// Pipe defaults
    pub const BASE_PIPE_SPEED: f32 = 160.0;
    pub const PIPE_WIDTH: f32 = 72.0;
    pub const INITIAL_PIPE_GAP: f32 = 300.0;
    pub const MIN_PIPE_GAP: f32 = 120.0;
    pub const PIPE_SPACING: f32 = 380.0;
    pub const POOL_CAPACITY: usize = 12;
    pub const INITIAL_PIPES: usize = 4;
    pub const FIRST_PIPE_X: f32 = 700.0;
    /// Pairs whose right edge is further left than this are off screen
    pub const RECYCLE_MARGIN: f32 = 20.0;
    pub const GAP_MARGIN_TOP: f32 = 150.0;
    pub const GAP_MARGIN_BOTTOM: f32 = 150.0;

    /// Reference playfield used when the viewport is degenerate
    pub const REFERENCE_WIDTH: f32 = 800.0;
    pub const REFERENCE_HEIGHT: f32 = 900.0;
    /// Window size the original layout was designed for
    pub const DEFAULT_VIEWPORT: (f32, f32) = (700.0, 900.0);

    /// Screen shake after death
    pub const SHAKE_FRAMES: u32 = 24;
    pub const SHAKE_MAGNITUDE: i32 = 12;

    /// Interstitial rolls happen every Nth point
    pub const INTERSTITIAL_INTERVAL: u64 = 5;
    pub const INTERSTITIAL_PROBABILITY: f64 = 0.30;
    pub const INTERSTITIAL_SECONDS: f32 = 6.0;
}

/// Cubic ease-out on [0, 1]
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let p = t - 1.0;
    1.0 + p * p * p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert!(ease_out_cubic(0.0).abs() < 1e-6);
        assert!((ease_out_cubic(1.0) - 1.0).abs() < 1e-6);
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
