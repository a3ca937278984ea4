//! Interstitial playback seam
//!
//! The core never blocks on media. When an interstitial starts, the session
//! hands the player an [`InterstitialSignal`]; the player fires it from
//! wherever playback ends (any thread) and the session polls it each frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// One-shot completion flag shared with the playback collaborator
#[derive(Debug, Clone, Default)]
pub struct InterstitialSignal {
    done: Arc<AtomicBool>,
}

impl InterstitialSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark playback as finished (idempotent)
    pub fn complete(&self) {
        self.done.store(true, Ordering::Release);
    }

    pub fn is_complete(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

/// Plays the interstitial media and reports completion
pub trait InterstitialPlayer {
    /// Begin playback; `done.complete()` must eventually be called, even on error
    fn start(&mut self, done: InterstitialSignal);
}

/// No media available: finishes immediately
#[derive(Debug, Default)]
pub struct SkipInterstitial;

impl InterstitialPlayer for SkipInterstitial {
    fn start(&mut self, done: InterstitialSignal) {
        log::debug!("No interstitial media, skipping");
        done.complete();
    }
}

/// Stand-in player that completes after a fixed wall-clock duration
#[derive(Debug)]
pub struct TimedInterstitial {
    duration: Duration,
}

impl TimedInterstitial {
    pub fn new(seconds: f32) -> Self {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        Self {
            duration: Duration::from_secs_f32(seconds),
        }
    }
}

impl InterstitialPlayer for TimedInterstitial {
    fn start(&mut self, done: InterstitialSignal) {
        let duration = self.duration;
        let spawned = std::thread::Builder::new()
            .name("interstitial".into())
            .spawn({
                let done = done.clone();
                move || {
                    std::thread::sleep(duration);
                    done.complete();
                }
            });
        if let Err(e) = spawned {
            log::warn!("Failed to start interstitial timer: {e}");
            done.complete();
        }
    }
}
