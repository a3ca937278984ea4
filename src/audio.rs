//! Audio collaborator seam
//!
//! The core fires discrete sound triggers and never waits on playback. The
//! [`AudioManager`] applies volume/mute policy and forwards to whatever
//! [`AudioSink`] the host plugged in (a real mixer, a logger, or nothing).

use std::sync::Arc;

use parking_lot::Mutex;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bird flapped
    Flap,
    /// Passed a pipe pair
    Score,
    /// Bird died
    Death,
    /// (Re)start background music from the top
    MusicStart,
    MusicPause,
    MusicResume,
    /// Interstitial media started; music should duck
    InterstitialStart,
    /// Interstitial media ended; music may resume
    InterstitialEnd,
}

impl SoundEffect {
    /// Music/interstitial control rather than a one-shot effect
    pub fn is_music_control(&self) -> bool {
        !matches!(self, SoundEffect::Flap | SoundEffect::Score | SoundEffect::Death)
    }

    /// Sound triggered by a game event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::Flapped => SoundEffect::Flap,
            GameEvent::Scored { .. } => SoundEffect::Score,
            GameEvent::Died { .. } => SoundEffect::Death,
            GameEvent::MusicStart => SoundEffect::MusicStart,
            GameEvent::MusicPause => SoundEffect::MusicPause,
            GameEvent::MusicResume => SoundEffect::MusicResume,
            GameEvent::InterstitialStart => SoundEffect::InterstitialStart,
            GameEvent::InterstitialEnd => SoundEffect::InterstitialEnd,
        }
    }
}

/// Playback backend. Fire-and-forget; failures are the sink's problem.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Drops everything (no audio device)
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Logs every trigger at debug level
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("audio: {effect:?} @ {volume:.2}");
    }
}

/// Records triggers into a shared list (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    played: Arc<Mutex<Vec<SoundEffect>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything played so far
    pub fn played(&self) -> Vec<SoundEffect> {
        self.played.lock().clone()
    }

    pub fn count(&self, effect: SoundEffect) -> usize {
        self.played.lock().iter().filter(|e| **e == effect).count()
    }
}

impl AudioSink for RecordingSink {
    fn play(&mut self, effect: SoundEffect, _volume: f32) {
        self.played.lock().push(effect);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullSink))
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Take volume and mute preferences from user settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume for an effect
    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else if effect.is_music_control() {
            self.master_volume * self.music_volume
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    ///
    /// Silent one-shots are skipped; music control always reaches the sink so
    /// pause/resume bookkeeping stays consistent while muted.
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 && !effect.is_music_control() {
            return;
        }
        self.sink.play(effect, vol);
    }
}
