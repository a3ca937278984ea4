//! Particle effects
//!
//! Visual only, never gameplay-affecting. Each effect expires by itself; the
//! engine just advances and culls them.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Flash/glow phase length (seconds)
pub const GLOW_DURATION: f32 = 0.45;
/// Radial streak phase length, starting after the glow (seconds)
pub const STREAK_DURATION: f32 = 0.75;
/// Nominal debris window (seconds)
pub const DEBRIS_WINDOW: f32 = 1.6;
/// Longest life a debris particle can roll (seconds)
pub const DEBRIS_MAX_LIFE: f32 = 2.0;
const DEBRIS_MIN_LIFE: f32 = 0.7;

const BASE_DEBRIS: usize = 18;
const DEBRIS_PER_DIFFICULTY: f32 = 6.0;
const DEBRIS_MIN_SPEED: f32 = 120.0;
const DEBRIS_MAX_SPEED: f32 = 400.0;
/// Extra upward kick so the burst blooms before falling
const DEBRIS_LIFT: f32 = 100.0;
const DEBRIS_HUE_MIN: f32 = 10.0;
const DEBRIS_HUE_MAX: f32 = 70.0;

pub const STREAK_COUNT: usize = 16;
/// Streaks start this far from the center
pub const STREAK_INNER_RADIUS: f32 = 12.0;

/// A single debris particle
#[derive(Debug, Clone)]
pub struct Debris {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    /// Hue in degrees (saturation/brightness are fixed)
    pub hue: f32,
}

impl Debris {
    fn advance(&mut self, dt: f32, gravity: f32) {
        self.vel.y += gravity * dt;
        self.pos += self.vel * dt;
        self.life -= dt;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Fades linearly with remaining life
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).max(0.0)
    }
}

/// One radial streak, rolled when the effect spawns
#[derive(Debug, Clone, Copy)]
pub struct Streak {
    /// Direction in radians
    pub angle: f32,
    /// Full extension length
    pub length: f32,
    pub hue: f32,
}

/// Glow phase sample for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub radius: f32,
    pub alpha: f32,
}

/// Burst played where the bird died: glow, then streaks, with debris throughout
#[derive(Debug, Clone)]
pub struct DeathEffect {
    pub center: Vec2,
    pub difficulty: f32,
    /// Seconds since spawn
    pub time: f32,
    pub debris: Vec<Debris>,
    pub streaks: Vec<Streak>,
}

impl DeathEffect {
    fn spawn<R: Rng + ?Sized>(center: Vec2, difficulty: f32, rng: &mut R) -> Self {
        use std::f32::consts::TAU;

        let count = BASE_DEBRIS + (difficulty.max(0.0) * DEBRIS_PER_DIFFICULTY) as usize;
        let debris = (0..count)
            .map(|_| {
                let angle = rng.random::<f32>() * TAU;
                let speed = rng.random_range(DEBRIS_MIN_SPEED..DEBRIS_MAX_SPEED);
                let life = rng.random_range(DEBRIS_MIN_LIFE..DEBRIS_MAX_LIFE);
                Debris {
                    pos: center,
                    vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - DEBRIS_LIFT),
                    life,
                    max_life: life,
                    hue: rng.random_range(DEBRIS_HUE_MIN..DEBRIS_HUE_MAX),
                }
            })
            .collect();

        let streaks = (0..STREAK_COUNT)
            .map(|i| Streak {
                angle: TAU * i as f32 / STREAK_COUNT as f32 + (rng.random::<f32>() - 0.5) * 0.15,
                length: 100.0 + rng.random::<f32>() * 80.0,
                hue: 30.0 + rng.random::<f32>() * 50.0,
            })
            .collect();

        Self {
            center,
            difficulty,
            time: 0.0,
            debris,
            streaks,
        }
    }

    /// Length of the named phases (glow + streaks, or the debris window)
    pub fn phase_span() -> f32 {
        (GLOW_DURATION + STREAK_DURATION).max(DEBRIS_WINDOW)
    }

    fn advance(&mut self, dt: f32, gravity: f32) {
        self.time += dt;
        for d in &mut self.debris {
            d.advance(dt, gravity);
        }
        self.debris.retain(Debris::is_alive);
    }

    /// Alive while the phase span runs OR any debris is still flying
    pub fn is_alive(&self) -> bool {
        self.time <= Self::phase_span() || !self.debris.is_empty()
    }

    /// Expanding glow, only during the glow phase
    pub fn glow(&self) -> Option<Glow> {
        if self.time > GLOW_DURATION {
            return None;
        }
        let t = (self.time / GLOW_DURATION).min(1.0);
        let radius = 36.0 + crate::ease_out_cubic(t) * 160.0 * (1.0 + self.difficulty * 0.25);
        let alpha = (0.9 * (1.0 - t)).max(0.0) * 0.9;
        Some(Glow { radius, alpha })
    }

    /// Progress through the streak phase in [0, 1], if it is running
    pub fn streak_progress(&self) -> Option<f32> {
        let local = self.time - GLOW_DURATION;
        if local <= 0.0 || local > STREAK_DURATION {
            None
        } else {
            Some(local / STREAK_DURATION)
        }
    }
}

/// Owns every live effect
#[derive(Debug, Clone)]
pub struct ParticleEngine {
    effects: Vec<DeathEffect>,
    gravity: f32,
    rng: Pcg32,
}

impl ParticleEngine {
    pub fn new(gravity: f32, seed: u64) -> Self {
        Self {
            effects: Vec::new(),
            gravity,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Debris count grows with the difficulty multiplier
    pub fn spawn_death_effect(&mut self, x: f32, y: f32, difficulty: f32) {
        let effect = DeathEffect::spawn(Vec2::new(x, y), difficulty, &mut self.rng);
        log::debug!("Death effect at ({x:.0}, {y:.0}) with {} debris", effect.debris.len());
        self.effects.push(effect);
    }

    pub fn advance(&mut self, dt: f32) {
        let gravity = self.gravity;
        for effect in &mut self.effects {
            effect.advance(dt, gravity);
        }
        self.effects.retain(DeathEffect::is_alive);
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Live effects in draw order (later on top)
    pub fn effects(&self) -> &[DeathEffect] {
        &self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
