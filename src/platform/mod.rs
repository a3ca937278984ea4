//! Platform abstraction layer
//!
//! Host-facing seams for:
//! - Input intents (the core never polls devices)
//! - Frame timing (dt clamping, fixed-step accumulation)
//! - Interstitial playback completion

pub mod input;
pub mod interstitial;
pub mod time;

pub use input::Intent;
pub use interstitial::{InterstitialPlayer, InterstitialSignal, SkipInterstitial, TimedInterstitial};
pub use time::{FixedStep, clamp_dt};
