//! Top-level session
//!
//! Owns the game state and every collaborator. Hosts feed it intents and frame
//! deltas; after each call the session drains the state's events and routes
//! them to audio, the highscore store and the interstitial player.

use std::sync::Arc;

use crate::audio::{AudioManager, SoundEffect};
use crate::highscores::{self, HighScores, SharedHighScores};
use crate::persistence::HighScoreStore;
use crate::platform::{Intent, InterstitialPlayer, InterstitialSignal};
use crate::renderer::Frame;
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Collaborators the core talks to
pub struct Services {
    pub audio: AudioManager,
    pub store: Box<dyn HighScoreStore>,
    pub interstitial: Box<dyn InterstitialPlayer>,
}

pub struct Session {
    state: GameState,
    services: Services,
    highscores: SharedHighScores,
    settings: Settings,
    /// Completion handle of the interstitial currently playing
    pending_interstitial: Option<InterstitialSignal>,
    event_buf: Vec<GameEvent>,
}

impl Session {
    pub fn new(tuning: Tuning, settings: Settings, mut services: Services, seed: u64) -> Self {
        let mut scores = services.store.load();
        if scores.ensure_player(&settings.player_name) {
            services.store.save(&scores);
        }
        services.audio.apply_settings(&settings);

        let state = GameState::new(tuning.sanitized(), seed, settings.difficulty_multiplier());
        log::info!(
            "Session for {} (seed {seed}, {} x{:.2})",
            settings.player_name,
            settings.difficulty.as_str(),
            state.difficulty
        );

        let mut session = Self {
            state,
            services,
            highscores: highscores::shared(scores),
            settings,
            pending_interstitial: None,
            event_buf: Vec::with_capacity(16),
        };
        session.dispatch_events();
        session
    }

    /// Apply one player intent
    pub fn handle_intent(&mut self, intent: Intent) {
        match &intent {
            Intent::ChangeUser(name) => self.change_user(name),
            Intent::SetDifficulty(multiplier) => {
                sim::apply_intent(&mut self.state, &intent);
                if self.state.difficulty == *multiplier {
                    self.settings.set_difficulty_multiplier(*multiplier);
                }
            }
            _ => sim::apply_intent(&mut self.state, &intent),
        }
        self.dispatch_events();
    }

    /// Advance one frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self
            .pending_interstitial
            .as_ref()
            .is_some_and(InterstitialSignal::is_complete)
        {
            self.pending_interstitial = None;
            self.state.finish_interstitial();
        }

        sim::tick(&mut self.state, dt);
        self.dispatch_events();
    }

    /// Switch the player highscores are recorded under and start over.
    /// Only honoured from the menu or the game-over screen.
    fn change_user(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            log::debug!("Ignoring empty player name");
            return;
        }
        if self.state.interstitial_active {
            return;
        }
        // Only between runs; a live run is never thrown away
        if !matches!(self.state.phase, GamePhase::Menu | GamePhase::GameOver) {
            log::debug!("Ignoring player change during {:?}", self.state.phase);
            return;
        }

        let snapshot = {
            let mut scores = self.highscores.lock();
            scores.ensure_player(name);
            scores.clone()
        };
        self.services.store.save(&snapshot);

        log::info!("Player changed: {} -> {name}", self.settings.player_name);
        self.settings.player_name = name.to_string();
        self.state.reset_session();
    }

    fn dispatch_events(&mut self) {
        let mut events = std::mem::take(&mut self.event_buf);
        events.extend(self.state.drain_events());

        for event in events.drain(..) {
            self.services.audio.play(SoundEffect::for_event(&event));
            match event {
                GameEvent::Died { score } => self.commit_score(score),
                GameEvent::InterstitialStart => {
                    let signal = InterstitialSignal::new();
                    self.pending_interstitial = Some(signal.clone());
                    self.services.interstitial.start(signal);
                }
                _ => {}
            }
        }

        self.event_buf = events;
    }

    fn commit_score(&mut self, score: u64) {
        let snapshot = {
            let mut scores = self.highscores.lock();
            if !scores.commit(&self.settings.player_name, score) {
                return;
            }
            scores.clone()
        };
        // Lock released before touching the disk
        self.services.store.save(&snapshot);
    }

    /// Render snapshot of the current frame
    pub fn frame(&self) -> Frame {
        let scores = self.highscores.lock();
        Frame::build(&self.state, &self.settings, &scores, &self.settings.player_name)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Resize the playfield (takes effect for new gaps and recycles)
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.state.set_viewport(width, height);
    }

    /// Handle to the shared highscore table
    pub fn highscores(&self) -> SharedHighScores {
        Arc::clone(&self.highscores)
    }

    pub fn player(&self) -> &str {
        &self.settings.player_name
    }

    /// Current player's best score
    pub fn best_score(&self) -> u64 {
        self.highscores.lock().best(&self.settings.player_name)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Final save before the host exits
    pub fn shutdown(&mut self) -> HighScores {
        let snapshot = self.highscores.lock().clone();
        self.services.store.save(&snapshot);
        log::info!("Session closed ({} players on the board)", snapshot.len());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::persistence::MemoryStore;
    use crate::platform::SkipInterstitial;

    /// Player that only completes when the test says so
    #[derive(Clone, Default)]
    struct ManualPlayer {
        started: Arc<parking_lot::Mutex<Vec<InterstitialSignal>>>,
    }

    impl InterstitialPlayer for ManualPlayer {
        fn start(&mut self, done: InterstitialSignal) {
            self.started.lock().push(done);
        }
    }

    fn session_with(
        tuning: Tuning,
        player: Box<dyn InterstitialPlayer>,
    ) -> (Session, RecordingSink, MemoryStore) {
        let sink = RecordingSink::new();
        let store = MemoryStore::new();
        let services = Services {
            audio: AudioManager::new(Box::new(sink.clone())),
            store: Box::new(store.clone()),
            interstitial: player,
        };
        let session = Session::new(tuning, Settings::default(), services, 7);
        (session, sink, store)
    }

    #[test]
    fn test_new_session_registers_player_and_starts_music() {
        let (session, sink, store) = session_with(Tuning::default(), Box::new(SkipInterstitial));
        assert_eq!(session.state().phase, GamePhase::Menu);
        assert_eq!(sink.count(SoundEffect::MusicStart), 1);
        let saved = store.snapshot().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved.best("Player"), 0);
    }

    #[test]
    fn test_death_commits_and_saves_once() {
        let (mut session, sink, store) = session_with(Tuning::default(), Box::new(SkipInterstitial));
        session.handle_intent(Intent::StartGame);
        session.state.score = 3;
        session.state.trigger_death();
        session.update(1.0 / 60.0);

        assert_eq!(session.best_score(), 3);
        assert_eq!(store.snapshot().unwrap().best("Player"), 3);
        assert_eq!(sink.count(SoundEffect::Death), 1);
        let saves = store.save_count();

        // A worse run changes nothing
        session.handle_intent(Intent::Restart);
        session.state.score = 1;
        session.state.trigger_death();
        session.update(1.0 / 60.0);
        assert_eq!(session.best_score(), 3);
        assert_eq!(store.save_count(), saves);
    }

    #[test]
    fn test_change_user() {
        let (mut session, _sink, store) = session_with(Tuning::default(), Box::new(SkipInterstitial));
        session.handle_intent(Intent::ChangeUser("   ".into()));
        assert_eq!(session.player(), "Player");

        session.handle_intent(Intent::ChangeUser("  ada ".into()));
        assert_eq!(session.player(), "ada");
        assert_eq!(session.state().phase, GamePhase::Playing);
        assert_eq!(session.state().score, 0);
        let saved = store.snapshot().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved.best("ada"), 0);
    }

    #[test]
    fn test_change_user_only_between_runs() {
        let (mut session, _sink, store) = session_with(Tuning::default(), Box::new(SkipInterstitial));
        session.handle_intent(Intent::StartGame);
        session.state.score = 4;
        let saves = store.save_count();

        session.handle_intent(Intent::ChangeUser("bo".into()));
        assert_eq!(session.player(), "Player");
        assert_eq!(session.state().score, 4);
        assert_eq!(store.save_count(), saves);

        session.handle_intent(Intent::PauseToggle);
        session.handle_intent(Intent::ChangeUser("bo".into()));
        assert_eq!(session.player(), "Player");
        assert_eq!(session.state().phase, GamePhase::Paused);

        // Allowed again once the run is over
        session.handle_intent(Intent::PauseToggle);
        session.state.trigger_death();
        session.update(1.0 / 60.0);
        assert_eq!(session.best_score(), 4);
        session.handle_intent(Intent::ChangeUser("bo".into()));
        assert_eq!(session.player(), "bo");
        assert_eq!(session.state().phase, GamePhase::Playing);
        assert_eq!(session.best_score(), 0);
        assert_eq!(session.highscores().lock().best("Player"), 4);
    }

    #[test]
    fn test_set_difficulty_updates_settings() {
        let (mut session, _sink, _store) = session_with(Tuning::default(), Box::new(SkipInterstitial));
        session.handle_intent(Intent::SetDifficulty(1.5));
        assert_eq!(session.state().difficulty, 1.5);
        assert_eq!(session.settings().difficulty_multiplier(), 1.5);

        session.handle_intent(Intent::SetDifficulty(-3.0));
        assert_eq!(session.state().difficulty, 1.5);
        assert_eq!(session.settings().difficulty_multiplier(), 1.5);
    }

    #[test]
    fn test_interstitial_waits_for_completion() {
        let tuning = Tuning {
            interstitial_probability: 1.0,
            ..Tuning::default()
        };
        let player = ManualPlayer::default();
        let (mut session, sink, _store) = session_with(tuning, Box::new(player.clone()));
        session.handle_intent(Intent::StartGame);
        for _ in 0..5 {
            session.state.add_point();
        }
        session.update(1.0 / 60.0);
        assert!(session.state().interstitial_active);
        assert_eq!(player.started.lock().len(), 1);
        assert_eq!(sink.count(SoundEffect::InterstitialStart), 1);

        // Frozen until the player reports back
        session.handle_intent(Intent::PauseToggle);
        for _ in 0..10 {
            session.update(1.0 / 60.0);
        }
        assert!(session.state().interstitial_active);
        assert_eq!(session.state().phase, GamePhase::Playing);

        player.started.lock()[0].complete();
        session.update(1.0 / 60.0);
        assert!(!session.state().interstitial_active);
        assert_eq!(sink.count(SoundEffect::InterstitialEnd), 1);
    }

    #[test]
    fn test_skip_player_finishes_on_next_frame() {
        let tuning = Tuning {
            interstitial_probability: 1.0,
            ..Tuning::default()
        };
        let (mut session, _sink, _store) = session_with(tuning, Box::new(SkipInterstitial));
        session.handle_intent(Intent::StartGame);
        for _ in 0..5 {
            session.state.add_point();
        }
        session.update(1.0 / 60.0);
        assert!(session.state().interstitial_active);
        session.update(1.0 / 60.0);
        assert!(!session.state().interstitial_active);
    }

    #[test]
    fn test_frame_and_shutdown() {
        let (mut session, _sink, store) = session_with(Tuning::default(), Box::new(SkipInterstitial));
        let frame = session.frame();
        assert_eq!(frame.hud.player, "Player");
        assert_eq!(frame.pipes.len(), 4);

        let before = store.save_count();
        let final_scores = session.shutdown();
        assert_eq!(store.save_count(), before + 1);
        assert_eq!(store.snapshot(), Some(final_scores));
    }
}
