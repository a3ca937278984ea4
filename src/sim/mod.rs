//! Simulation core
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Seeded RNG only (session seed drives gaps, shake and interstitial rolls)
//! - Per-frame delta clamped before integration
//! - No rendering, audio or platform dependencies; collaborators see events

pub mod bird;
pub mod difficulty;
pub mod particles;
pub mod pipe;
pub mod state;
pub mod tick;
pub mod track;

pub use bird::Bird;
pub use difficulty::{difficulty_factor, gap_size, pipe_speed};
pub use particles::{DeathEffect, Debris, ParticleEngine};
pub use pipe::{PipePair, cap_tilt};
pub use state::{GameEvent, GamePhase, GameState, Viewport};
pub use tick::{apply_intent, autopilot, tick};
pub use track::{PipeTrack, TrackStep};
