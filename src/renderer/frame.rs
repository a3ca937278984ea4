//! Per-frame render snapshot
//!
//! Built from the game state once per frame. Holds plain data only; drawing
//! is up to the host.

use glam::Vec2;

use super::vertex::{
    BirdInstance, GlowInstance, ParticleInstance, PipeInstance, StreakInstance, hsb_to_rgba,
};
use crate::highscores::{HighScores, MAX_BOARD_ROWS};
use crate::settings::Settings;
use crate::sim::particles::{DeathEffect, STREAK_INNER_RADIUS};
use crate::sim::{GamePhase, GameState, Viewport};

/// Debris dots are drawn this big regardless of difficulty
const DEBRIS_RADIUS: f32 = 3.0;

/// Overlay text the host draws on top of the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    /// Current player's best
    pub best: u64,
    /// Best score on the whole board
    pub top_score: Option<u64>,
    /// Current player's 1-based board position
    pub rank: Option<usize>,
    pub player: String,
    pub phase: GamePhase,
    pub show_highscores: bool,
    pub interstitial: bool,
    /// Ranked rows, only filled while the board is showing
    pub board: Vec<(String, u64)>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub bird: BirdInstance,
    pub pipes: Vec<PipeInstance>,
    pub particles: Vec<ParticleInstance>,
    pub glows: Vec<GlowInstance>,
    pub streaks: Vec<StreakInstance>,
    /// Camera offset for the whole scene
    pub shake: Vec2,
    pub viewport: Viewport,
    pub hud: Hud,
}

impl Frame {
    pub fn build(state: &GameState, settings: &Settings, scores: &HighScores, player: &str) -> Self {
        let bird = &state.bird;
        let bird = BirdInstance {
            pos: bird.pos.to_array(),
            size: bird.size,
            rotation: bird.tilt_degrees(),
            bob: bird.bob_offset(),
            alpha: bird.alpha(),
        };

        let pipes = state
            .track
            .pipes()
            .map(|p| PipeInstance {
                x: p.x,
                width: p.width,
                gap_top: p.gap_top(),
                gap_bottom: p.gap_bottom(),
                top_cap_tilt: p.top_cap_tilt,
                bottom_cap_tilt: p.bottom_cap_tilt,
            })
            .collect();

        let mut particles = Vec::new();
        let mut glows = Vec::new();
        let mut streaks = Vec::new();
        for effect in state.particles.effects() {
            push_effect(effect, &mut particles, &mut glows, &mut streaks);
        }

        let shake = if settings.effective_screen_shake() {
            state.shake_offset
        } else {
            Vec2::ZERO
        };

        let board = if state.show_highscores {
            let mut rows = scores.ranked();
            rows.truncate(MAX_BOARD_ROWS);
            rows
        } else {
            Vec::new()
        };

        Self {
            bird,
            pipes,
            particles,
            glows,
            streaks,
            shake,
            viewport: state.viewport,
            hud: Hud {
                score: state.score,
                best: scores.best(player),
                top_score: scores.top_score(),
                rank: scores.rank_of(player),
                player: player.to_string(),
                phase: state.phase,
                show_highscores: state.show_highscores,
                interstitial: state.interstitial_active,
                board,
            },
        }
    }
}

fn push_effect(
    effect: &DeathEffect,
    particles: &mut Vec<ParticleInstance>,
    glows: &mut Vec<GlowInstance>,
    streaks: &mut Vec<StreakInstance>,
) {
    let center = effect.center;

    if let Some(glow) = effect.glow() {
        glows.push(GlowInstance {
            center: center.to_array(),
            radius: glow.radius,
            alpha: glow.alpha,
        });
    }

    if let Some(local) = effect.streak_progress() {
        let alpha = (1.0 - local).max(0.0);
        let width = 1.5 + (1.0 - local) * 2.0;
        let reach = crate::ease_out_cubic(local);
        streaks.extend(effect.streaks.iter().map(|s| {
            let dir = Vec2::from_angle(s.angle);
            let start = center + dir * STREAK_INNER_RADIUS;
            let end = center + dir * (s.length * reach + STREAK_INNER_RADIUS);
            StreakInstance {
                start: start.to_array(),
                end: end.to_array(),
                color: hsb_to_rgba(s.hue, 0.9, 1.0, alpha),
                width,
            }
        }));
    }

    particles.extend(effect.debris.iter().map(|d| ParticleInstance {
        pos: d.pos.to_array(),
        color: hsb_to_rgba(d.hue, 0.9, 0.9, d.alpha()),
        radius: DEBRIS_RADIUS,
    }));
}
