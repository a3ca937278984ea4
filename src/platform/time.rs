//! Frame timing helpers

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Clamp a host frame delta into `[0, max]` (NaN counts as zero)
///
/// Large steps let the bird tunnel through thin gaps, so every integration
/// goes through this.
#[inline]
pub fn clamp_dt(dt: f32, max: f32) -> f32 {
    if dt.is_nan() { 0.0 } else { dt.clamp(0.0, max) }
}

/// Fixed-timestep accumulator for hosts with a variable frame clock
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps: max_substeps.max(1),
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed elapsed wall time; returns how many fixed steps to run now
    ///
    /// Backlog beyond `max_substeps` is dropped to avoid a spiral of death.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += clamp_dt(frame_dt, 0.1);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        substeps
    }

    /// Leftover fraction of a step, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}
