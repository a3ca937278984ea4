//! The player's bird
//!
//! Plain vertical kinematics plus visual-only animation state. Tilt, bob and
//! fade are derived from the physical state on demand and never feed back
//! into physics.

use glam::Vec2;

use crate::tuning::Tuning;

/// Tilt when freshly flapped (degrees, negative = nose up)
pub const FLAP_TILT_DEG: f32 = -25.0;
/// Steepest nose-down tilt while falling (degrees)
pub const MAX_DOWN_TILT_DEG: f32 = 65.0;
/// Highest nose-up tilt from upward velocity alone (degrees)
pub const MAX_UP_TILT_DEG: f32 = -30.0;
/// Velocity that maps to the full nose-down tilt
const TILT_VELOCITY_SCALE: f32 = 600.0;
/// Upward bob offset at the start of a flap
const FLAP_BOB: f32 = -6.0;
const IDLE_BOB_AMPLITUDE: f32 = 2.0;
const IDLE_BOB_RATE: f32 = 6.0;

/// The bird (top-left anchored square)
#[derive(Debug, Clone)]
pub struct Bird {
    /// Top-left corner
    pub pos: Vec2,
    /// Vertical velocity (positive = down)
    pub vel_y: f32,
    pub size: f32,
    gravity: f32,
    flap_velocity: f32,
    spawn: Vec2,
    /// Seconds since spawn (drives the idle bob)
    state_time: f32,
    flap_timer: f32,
    flap_duration: f32,
    death_fading: bool,
    fade_time: f32,
    fade_duration: f32,
}

impl Bird {
    pub fn new(tuning: &Tuning) -> Self {
        let spawn = Vec2::new(tuning.bird_x, tuning.bird_spawn_y);
        Self {
            pos: spawn,
            vel_y: 0.0,
            size: tuning.bird_size,
            gravity: tuning.gravity,
            flap_velocity: tuning.flap_velocity,
            spawn,
            state_time: 0.0,
            flap_timer: 0.0,
            flap_duration: tuning.flap_impulse_duration,
            death_fading: false,
            fade_time: 0.0,
            fade_duration: tuning.death_fade_duration,
        }
    }

    /// Integrate gravity and position, then the animation timers
    pub fn advance(&mut self, dt: f32) {
        self.vel_y += self.gravity * dt;
        self.pos.y += self.vel_y * dt;
        self.state_time += dt;

        if self.flap_timer > 0.0 {
            self.flap_timer = (self.flap_timer - dt).max(0.0);
        }

        if self.death_fading {
            self.fade_time = (self.fade_time + dt).min(self.fade_duration);
        }
    }

    /// Override vertical velocity with the flap impulse
    pub fn flap(&mut self) {
        self.vel_y = self.flap_velocity;
        self.flap_timer = self.flap_duration;
    }

    /// Begin the death fade (no-op if already fading)
    pub fn start_death_fade(&mut self) {
        if !self.death_fading {
            self.death_fading = true;
            self.fade_time = 0.0;
        }
    }

    /// Return to spawn state
    pub fn reset(&mut self) {
        self.pos = self.spawn;
        self.vel_y = 0.0;
        self.state_time = 0.0;
        self.flap_timer = 0.0;
        self.death_fading = false;
        self.fade_time = 0.0;
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }

    pub fn is_fading(&self) -> bool {
        self.death_fading
    }

    pub fn flap_timer(&self) -> f32 {
        self.flap_timer
    }

    /// Rotation in degrees (positive = nose down)
    pub fn tilt_degrees(&self) -> f32 {
        if self.flap_timer > 0.0 {
            FLAP_TILT_DEG * (self.flap_timer / self.flap_duration)
        } else {
            (self.vel_y / TILT_VELOCITY_SCALE * MAX_DOWN_TILT_DEG)
                .clamp(MAX_UP_TILT_DEG, MAX_DOWN_TILT_DEG)
        }
    }

    /// Vertical draw offset
    pub fn bob_offset(&self) -> f32 {
        if self.flap_timer > 0.0 {
            FLAP_BOB * (self.flap_timer / self.flap_duration)
        } else {
            (self.state_time * IDLE_BOB_RATE).sin() * IDLE_BOB_AMPLITUDE
        }
    }

    /// Sprite alpha (1 = opaque, 0 once the death fade completes)
    pub fn alpha(&self) -> f32 {
        if self.death_fading {
            (1.0 - self.fade_time / self.fade_duration).max(0.0)
        } else {
            1.0
        }
    }
}
