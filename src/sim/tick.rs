//! Per-frame simulation step and intent handling
//!
//! Frame order while playing: bird, track (collision/recycle/score),
//! particles, then the vertical bounds check.

use super::state::{GameEvent, GamePhase, GameState};
use crate::platform::input::Intent;
use crate::platform::time::clamp_dt;

/// Apply one discrete player intent
///
/// Ignored entirely while an interstitial is running. Changing the player
/// touches the highscore table, so the session handles that one itself.
pub fn apply_intent(state: &mut GameState, intent: &Intent) {
    if state.interstitial_active {
        return;
    }

    match intent {
        Intent::StartGame => {
            if state.phase == GamePhase::Menu {
                state.reset_session();
            }
        }
        Intent::MenuToggle => state.toggle_menu(),
        Intent::Flap => match state.phase {
            GamePhase::Playing => {
                state.bird.flap();
                state.push_event(GameEvent::Flapped);
            }
            GamePhase::Paused => state.toggle_pause(),
            GamePhase::GameOver => state.reset_session(),
            GamePhase::Menu => {}
        },
        Intent::PauseToggle => state.toggle_pause(),
        Intent::Restart => {
            if state.phase != GamePhase::Menu {
                state.reset_session();
            }
        }
        Intent::ToggleHighscores => {
            if state.phase == GamePhase::GameOver {
                state.show_highscores = !state.show_highscores;
            }
        }
        Intent::SetDifficulty(multiplier) => state.set_difficulty(*multiplier),
        Intent::ChangeUser(_) => {}
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, dt: f32) {
    let dt = clamp_dt(dt, state.tuning.max_frame_dt);

    if state.interstitial_active {
        return;
    }

    match state.phase {
        GamePhase::Playing => step_playing(state, dt),
        GamePhase::GameOver => step_game_over(state, dt),
        // The menu over a finished run keeps the run's aftermath going
        GamePhase::Menu if state.resume_phase() == GamePhase::GameOver => {
            step_game_over(state, dt)
        }
        GamePhase::Paused | GamePhase::Menu => {
            // Obstacles freeze; the body keeps falling
            state.bird.advance(dt);
            state.particles.advance(dt);
        }
    }
}

fn step_game_over(state: &mut GameState, dt: f32) {
    state.update_shake();
    // Keep falling while fading out
    state.bird.advance(dt);
    state.particles.advance(dt);
}

fn step_playing(state: &mut GameState, dt: f32) {
    state.play_time += dt;

    state.bird.advance(dt);
    state.bird.pos.x = state.tuning.bird_x;

    let speed = state.pipe_speed();
    let gap = state.current_gap();
    let viewport = state.viewport;
    let step = state
        .track
        .advance(dt, speed, gap, viewport, &state.bird, &mut state.rng);

    // The whole track step completes before reacting to a hit
    for _ in 0..step.recycled {
        state.add_point();
    }
    if step.hit {
        log::debug!("Pipe collision at y={:.1}", state.bird.pos.y);
        state.trigger_death();
    }

    let floor = state.playfield_height();
    if state.bird.top() < 0.0 || state.bird.bottom() > floor {
        state.trigger_death();
    }

    state.particles.advance(dt);
}

/// Stop flapping once climbing faster than this (px/s, upward is negative)
const AUTOPILOT_CLIMB_LIMIT: f32 = -150.0;

/// Demo-mode pilot: flap while below the next gap unless already climbing hard
pub fn autopilot(state: &GameState) -> Option<Intent> {
    if state.phase != GamePhase::Playing || state.interstitial_active {
        return None;
    }

    let bird = &state.bird;
    let target = state
        .track
        .pipes()
        .find(|p| p.right() > bird.pos.x)
        .map(|p| p.gap_center_y + p.gap_size * 0.15)
        .unwrap_or(state.playfield_height() / 2.0);

    if bird.center().y > target && bird.vel_y > AUTOPILOT_CLIMB_LIMIT {
        Some(Intent::Flap)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::track::PipeTrack;
    use crate::tuning::Tuning;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(Tuning::default(), seed, 1.0);
        apply_intent(&mut state, &Intent::StartGame);
        state.drain_events().for_each(drop);
        state
    }

    fn deaths(state: &mut GameState) -> usize {
        state
            .drain_events()
            .filter(|e| matches!(e, GameEvent::Died { .. }))
            .count()
    }

    #[test]
    fn test_menu_to_playing() {
        let mut state = GameState::new(Tuning::default(), 12345, 1.0);
        assert_eq!(state.phase, GamePhase::Menu);

        // Flapping in the menu does nothing
        apply_intent(&mut state, &Intent::Flap);
        assert_eq!(state.phase, GamePhase::Menu);

        apply_intent(&mut state, &Intent::StartGame);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_menu_does_not_advance_play() {
        let mut state = GameState::new(Tuning::default(), 12345, 1.0);
        let before: Vec<f32> = state.track.pipes().map(|p| p.x).collect();
        for _ in 0..60 {
            tick(&mut state, SIM_DT);
        }
        let after: Vec<f32> = state.track.pipes().map(|p| p.x).collect();
        assert_eq!(before, after);
        assert_eq!(state.play_time, 0.0);
    }

    #[test]
    fn test_pause_freezes_pipes_but_not_gravity() {
        let mut state = playing(1);
        tick(&mut state, SIM_DT);
        apply_intent(&mut state, &Intent::PauseToggle);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.drain_events().any(|e| e == GameEvent::MusicPause));

        let xs: Vec<f32> = state.track.pipes().map(|p| p.x).collect();
        let y = state.bird.pos.y;
        let v = state.bird.vel_y;
        let t = state.play_time;
        for _ in 0..30 {
            tick(&mut state, 1.0 / 60.0);
        }
        assert_eq!(xs, state.track.pipes().map(|p| p.x).collect::<Vec<_>>());
        assert_eq!(t, state.play_time);
        assert!(state.bird.vel_y > v);
        assert!(state.bird.pos.y > y);
        // No bounds check while paused
        assert_eq!(state.phase, GamePhase::Paused);

        // Flap while paused unpauses instead of flapping
        apply_intent(&mut state, &Intent::Flap);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.drain_events().any(|e| e == GameEvent::MusicResume));
    }

    #[test]
    fn test_menu_over_game_over_keeps_shaking_and_falling() {
        let mut state = playing(11);
        state.trigger_death();
        apply_intent(&mut state, &Intent::MenuToggle);
        assert_eq!(state.phase, GamePhase::Menu);

        let y = state.bird.pos.y;
        let alpha = state.bird.alpha();
        for _ in 0..10 {
            tick(&mut state, 1.0 / 60.0);
        }
        assert_eq!(state.shake_frames, 14);
        assert!(state.bird.pos.y > y);
        assert!(state.bird.alpha() < alpha);

        apply_intent(&mut state, &Intent::MenuToggle);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_menu_restores_prior_phase() {
        let mut state = playing(2);
        apply_intent(&mut state, &Intent::PauseToggle);
        apply_intent(&mut state, &Intent::MenuToggle);
        assert_eq!(state.phase, GamePhase::Menu);
        apply_intent(&mut state, &Intent::MenuToggle);
        assert_eq!(state.phase, GamePhase::Paused);

        apply_intent(&mut state, &Intent::PauseToggle);
        apply_intent(&mut state, &Intent::MenuToggle);
        apply_intent(&mut state, &Intent::MenuToggle);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_flap_emits_event() {
        let mut state = playing(3);
        apply_intent(&mut state, &Intent::Flap);
        assert_eq!(state.bird.vel_y, state.tuning.flap_velocity);
        assert!(state.drain_events().any(|e| e == GameEvent::Flapped));
    }

    #[test]
    fn test_falling_out_of_bounds_dies_once() {
        let mut state = playing(4);
        // Keep pipes out of the way
        state.track = PipeTrack::new(&state.tuning);
        state.bird.pos.y = 0.0;
        state.bird.vel_y = 400.0;

        let mut died = 0;
        for _ in 0..600 {
            tick(&mut state, 1.0 / 60.0);
            died += deaths(&mut state);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(died, 1);
        assert!(state.bird.pos.y + state.bird.size > 900.0);
    }

    #[test]
    fn test_flying_above_the_top_dies() {
        let mut state = playing(5);
        state.track = PipeTrack::new(&state.tuning);
        state.bird.pos.y = 2.0;
        apply_intent(&mut state, &Intent::Flap);
        tick(&mut state, 1.0 / 60.0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_game_over_keeps_animating_then_restarts() {
        let mut state = playing(6);
        state.trigger_death();
        state.drain_events().for_each(drop);
        let y = state.bird.pos.y;
        tick(&mut state, 1.0 / 60.0);
        assert!(state.bird.pos.y > y);
        assert!(state.shake_frames < 24);

        apply_intent(&mut state, &Intent::ToggleHighscores);
        assert!(state.show_highscores);

        apply_intent(&mut state, &Intent::Restart);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.show_highscores);
        assert!(state.particles.is_empty());
        assert_eq!(state.track.len(), 4);
        assert_eq!(state.track.len() + state.track.idle_count(), state.track.slot_count());
        assert!(state.drain_events().any(|e| e == GameEvent::MusicStart));
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = playing(7);
        tick(&mut state, 5.0);
        assert!((state.play_time - 1.0 / 30.0).abs() < 1e-6);
        tick(&mut state, -1.0);
        assert!((state.play_time - 1.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_interstitial_suspends_everything() {
        let tuning = Tuning {
            interstitial_probability: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 8, 1.0);
        apply_intent(&mut state, &Intent::StartGame);
        for _ in 0..5 {
            state.add_point();
        }
        assert!(state.interstitial_active);

        let xs: Vec<f32> = state.track.pipes().map(|p| p.x).collect();
        let y = state.bird.pos.y;
        for _ in 0..30 {
            tick(&mut state, SIM_DT);
        }
        apply_intent(&mut state, &Intent::PauseToggle);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(xs, state.track.pipes().map(|p| p.x).collect::<Vec<_>>());
        assert_eq!(y, state.bird.pos.y);

        state.finish_interstitial();
        tick(&mut state, SIM_DT);
        assert!(state.track.pipes().next().map(|p| p.x) < xs.first().copied());
    }

    #[test]
    fn test_scoring_through_the_gaps() {
        let mut state = playing(10);
        let mut scored = 0;
        // Ten simulated seconds holding the bird in each gap
        for _ in 0..(10 * 120) {
            if let Some(pipe) = state.track.pipes().find(|p| p.right() > state.bird.pos.x) {
                state.bird.pos.y = pipe.gap_center_y - state.bird.size / 2.0;
                state.bird.vel_y = 0.0;
            }
            tick(&mut state, SIM_DT);
            scored += state
                .drain_events()
                .filter(|e| matches!(e, GameEvent::Scored { .. }))
                .count();
            if state.interstitial_active {
                state.finish_interstitial();
            }
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.score > 0);
        assert_eq!(scored as u64, state.score);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(99999);
        let mut b = playing(99999);
        for i in 0..600 {
            if i % 25 == 0 {
                apply_intent(&mut a, &Intent::Flap);
                apply_intent(&mut b, &Intent::Flap);
            }
            tick(&mut a, SIM_DT);
            tick(&mut b, SIM_DT);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.bird.pos, b.bird.pos);
        let gaps_a: Vec<f32> = a.track.pipes().map(|p| p.gap_center_y).collect();
        let gaps_b: Vec<f32> = b.track.pipes().map(|p| p.gap_center_y).collect();
        assert_eq!(gaps_a, gaps_b);
    }

    #[test]
    fn test_autopilot_survives_a_while() {
        let mut state = playing(2024);
        state.tuning.interstitial_probability = 0.0;
        for _ in 0..(20 * 120) {
            if let Some(intent) = autopilot(&state) {
                apply_intent(&mut state, &intent);
            }
            tick(&mut state, SIM_DT);
        }
        assert!(state.score >= 1, "autopilot scored {}", state.score);
    }
}
