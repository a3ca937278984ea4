//! Game state and session-level transitions
//!
//! Everything the state machine mutates lives here. Collaborators never touch
//! it directly: the state records [`GameEvent`]s which the session drains and
//! forwards once per frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bird::Bird;
use super::difficulty::{difficulty_factor, gap_size, pipe_speed};
use super::particles::ParticleEngine;
use super::track::PipeTrack;
use crate::tuning::Tuning;

/// Current phase of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Main menu overlay (the session behind it is frozen)
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Soft pause
    Paused,
    /// Run ended; waiting for restart
    GameOver,
}

/// Things that happened during a frame, for collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Flapped,
    Scored { score: u64 },
    Died { score: u64 },
    MusicStart,
    MusicPause,
    MusicResume,
    InterstitialStart,
    InterstitialEnd,
}

/// Visible playfield size supplied by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        let (width, height) = crate::consts::DEFAULT_VIEWPORT;
        Self { width, height }
    }
}

/// Complete simulation state for one player session
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Seed the session RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Phase restored when the menu closes
    resume_phase: GamePhase,
    /// Highscore board instead of the game-over card
    pub show_highscores: bool,
    /// All simulation suspended until the interstitial completes
    pub interstitial_active: bool,
    last_interstitial_score: Option<u64>,
    pub score: u64,
    /// Seconds of active play this session
    pub play_time: f32,
    /// User-selected difficulty multiplier
    pub difficulty: f32,
    pub bird: Bird,
    pub track: PipeTrack,
    pub particles: ParticleEngine,
    pub viewport: Viewport,
    /// Frames of screen shake left
    pub shake_frames: u32,
    pub shake_offset: Vec2,
    events: Vec<GameEvent>,
}

impl GameState {
    /// New session parked behind the main menu
    pub fn new(tuning: Tuning, seed: u64, difficulty: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let particle_seed = rng.random::<u64>();
        let mut state = Self {
            bird: Bird::new(&tuning),
            track: PipeTrack::new(&tuning),
            particles: ParticleEngine::new(tuning.gravity, particle_seed),
            tuning,
            seed,
            rng,
            phase: GamePhase::Menu,
            resume_phase: GamePhase::Playing,
            show_highscores: false,
            interstitial_active: false,
            last_interstitial_score: None,
            score: 0,
            play_time: 0.0,
            difficulty: 1.0,
            viewport: Viewport::default(),
            shake_frames: 0,
            shake_offset: Vec2::ZERO,
            events: Vec::with_capacity(16),
        };
        state.set_difficulty(difficulty);
        state.start_session();
        state.phase = GamePhase::Menu;
        state
    }

    /// Fresh run: pool, particles, bird and counters back to start, then play
    ///
    /// Safe from any phase. Every active pair goes back to the pool before
    /// reseeding, so no slot is ever double-booked.
    pub fn reset_session(&mut self) {
        self.start_session();
        log::info!("Session reset (difficulty x{:.2})", self.difficulty);
    }

    fn start_session(&mut self) {
        self.track.seed(self.viewport, &mut self.rng);
        self.bird.reset();
        self.particles.clear();
        self.score = 0;
        self.play_time = 0.0;
        self.show_highscores = false;
        self.shake_frames = 0;
        self.shake_offset = Vec2::ZERO;
        self.last_interstitial_score = None;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::MusicStart);
    }

    /// Enter game over (no-op if already over)
    pub fn trigger_death(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        log::info!("Game over: score {} after {:.1}s", self.score, self.play_time);

        self.phase = GamePhase::GameOver;
        self.shake_frames = self.tuning.shake_frames;
        let center = self.bird.center();
        self.particles
            .spawn_death_effect(center.x, center.y, self.difficulty);
        self.bird.start_death_fade();
        self.events.push(GameEvent::Died { score: self.score });
    }

    /// Count one passed pair
    pub(crate) fn add_point(&mut self) {
        self.score += 1;
        self.events.push(GameEvent::Scored { score: self.score });
        self.maybe_trigger_interstitial();
    }

    /// Roll for an interstitial on each not-yet-used score milestone
    fn maybe_trigger_interstitial(&mut self) {
        if self.interstitial_active {
            return;
        }
        let interval = self.tuning.interstitial_interval.max(1);
        if self.score == 0
            || self.score % interval != 0
            || self.last_interstitial_score == Some(self.score)
        {
            return;
        }

        self.last_interstitial_score = Some(self.score);
        let roll = self.rng.random::<f64>();
        if interstitial_hit(roll, self.tuning.interstitial_probability) {
            log::info!("Interstitial triggered at score {}", self.score);
            self.interstitial_active = true;
            self.events.push(GameEvent::InterstitialStart);
        } else {
            log::debug!("Interstitial roll {roll:.2} missed at score {}", self.score);
        }
    }

    /// Completion from the playback collaborator
    pub fn finish_interstitial(&mut self) {
        if self.interstitial_active {
            log::info!("Interstitial finished");
            self.interstitial_active = false;
            self.events.push(GameEvent::InterstitialEnd);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::MusicPause);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.events.push(GameEvent::MusicResume);
            }
            _ => {}
        }
    }

    /// Open the menu from anywhere, or close it back to where we were
    pub fn toggle_menu(&mut self) {
        if self.phase == GamePhase::Menu {
            self.phase = self.resume_phase;
        } else {
            self.resume_phase = self.phase;
            self.phase = GamePhase::Menu;
        }
        log::debug!("Menu toggled, now {:?}", self.phase);
    }

    /// Phase the menu returns to when closed
    pub fn resume_phase(&self) -> GamePhase {
        self.resume_phase
    }

    /// Ignores non-finite or non-positive multipliers
    pub fn set_difficulty(&mut self, multiplier: f32) {
        if multiplier.is_finite() && multiplier > 0.0 {
            self.difficulty = multiplier;
        } else {
            log::warn!("Ignoring difficulty multiplier {multiplier}");
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport { width, height };
    }

    /// Height used for bounds and gap placement
    pub fn playfield_height(&self) -> f32 {
        if self.viewport.height > 0.0 {
            self.viewport.height
        } else {
            self.tuning.reference_height
        }
    }

    pub fn difficulty_factor(&self) -> f32 {
        difficulty_factor(self.play_time, self.score, self.difficulty)
    }

    pub fn pipe_speed(&self) -> f32 {
        pipe_speed(&self.tuning, self.difficulty_factor())
    }

    pub fn current_gap(&self) -> f32 {
        gap_size(&self.tuning, self.play_time, self.score)
    }

    /// Pending events, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Randomized shake offset while frames remain, zero afterwards
    pub(crate) fn update_shake(&mut self) {
        let magnitude = self.tuning.shake_magnitude;
        if self.shake_frames > 0 && magnitude > 0 {
            self.shake_frames -= 1;
            self.shake_offset = Vec2::new(
                self.rng.random_range(-magnitude..magnitude) as f32,
                self.rng.random_range(-magnitude..magnitude) as f32,
            );
        } else {
            self.shake_frames = 0;
            self.shake_offset = Vec2::ZERO;
        }
    }
}

/// A roll equal to the probability still counts
fn interstitial_hit(roll: f64, probability: f64) -> bool {
    roll <= probability
}
