//! Pipe track: pooled pipe pairs scrolling right to left
//!
//! Pairs live in a pre-allocated arena. The active sequence holds slot
//! indices in spawn order (head = oldest); idle slots sit on a free list.
//! Steady-state play recycles pairs in place and never allocates.

use std::collections::VecDeque;

use rand::Rng;

use super::bird::Bird;
use super::pipe::PipePair;
use super::state::Viewport;
use crate::tuning::Tuning;

/// Layout constants copied out of [`Tuning`]
#[derive(Debug, Clone, Copy)]
struct TrackLayout {
    pipe_width: f32,
    spacing: f32,
    recycle_margin: f32,
    margin_top: f32,
    margin_bottom: f32,
    reference_width: f32,
    reference_height: f32,
    initial_pipes: usize,
    first_pipe_x: f32,
    initial_gap: f32,
    min_gap: f32,
}

impl TrackLayout {
    fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            pipe_width: tuning.pipe_width,
            spacing: tuning.pipe_spacing,
            recycle_margin: tuning.recycle_margin,
            margin_top: tuning.gap_margin_top,
            margin_bottom: tuning.gap_margin_bottom,
            reference_width: tuning.reference_width,
            reference_height: tuning.reference_height,
            initial_pipes: tuning.initial_pipes,
            first_pipe_x: tuning.first_pipe_x,
            initial_gap: tuning.initial_gap,
            min_gap: tuning.min_gap,
        }
    }
}

/// Outcome of one track step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackStep {
    /// At least one pair overlapped the bird this step
    pub hit: bool,
    /// Pairs that scrolled off and were respawned (one point each)
    pub recycled: u32,
}

/// Fixed-capacity recycling track of pipe pairs
#[derive(Debug, Clone)]
pub struct PipeTrack {
    slots: Vec<PipePair>,
    free: Vec<usize>,
    active: VecDeque<usize>,
    /// Reused per step for off-screen indices
    scratch: Vec<usize>,
    layout: TrackLayout,
}

impl PipeTrack {
    /// Pre-allocate `pool_capacity` idle pairs
    pub fn new(tuning: &Tuning) -> Self {
        let capacity = tuning.pool_capacity;
        let slots = (0..capacity)
            .map(|_| PipePair::new(tuning.pipe_width))
            .collect();
        Self {
            slots,
            free: (0..capacity).rev().collect(),
            active: VecDeque::with_capacity(capacity),
            scratch: Vec::with_capacity(capacity),
            layout: TrackLayout::from_tuning(tuning),
        }
    }

    /// Take an idle slot, growing the arena if the pool is exhausted
    fn obtain(&mut self) -> usize {
        match self.free.pop() {
            Some(idx) => idx,
            None => {
                log::debug!("Pipe pool exhausted, growing to {}", self.slots.len() + 1);
                self.slots.push(PipePair::new(self.layout.pipe_width));
                self.slots.len() - 1
            }
        }
    }

    /// Return every pair to the pool
    pub fn reset_all(&mut self) {
        while let Some(idx) = self.active.pop_front() {
            self.free.push(idx);
        }
        self.scratch.clear();
    }

    /// Start-of-session layout: evenly spaced pairs off the right edge
    pub fn seed<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        self.reset_all();
        let layout = self.layout;
        for i in 0..layout.initial_pipes {
            let idx = self.obtain();
            let x = layout.first_pipe_x + i as f32 * layout.spacing;
            let gap_y = choose_gap_center(rng, &layout, viewport.height, layout.initial_gap);
            self.slots[idx].reset(x, gap_y, layout.initial_gap);
            self.active.push_back(idx);
        }
    }

    /// Scroll every pair, test collisions and recycle off-screen pairs
    ///
    /// Every pair is processed even after a hit; the caller reacts to the
    /// returned [`TrackStep`] once the whole step has completed.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        speed: f32,
        gap: f32,
        viewport: Viewport,
        bird: &Bird,
        rng: &mut R,
    ) -> TrackStep {
        let layout = self.layout;
        let mut step = TrackStep::default();

        for &idx in self.active.iter() {
            let pipe = &mut self.slots[idx];
            pipe.advance(speed, dt);
            if pipe.collides_with(bird) {
                step.hit = true;
            }
            if pipe.is_offscreen(layout.recycle_margin) {
                self.scratch.push(idx);
            }
        }

        if self.scratch.is_empty() {
            return step;
        }

        let offscreen = &self.scratch;
        self.active.retain(|idx| !offscreen.contains(idx));

        let gap = gap.max(layout.min_gap);
        let spawn_x = viewport.width.max(layout.reference_width) + layout.spacing;
        for idx in self.scratch.drain(..) {
            let gap_y = choose_gap_center(rng, &layout, viewport.height, gap);
            self.slots[idx].reset(spawn_x, gap_y, gap);
            self.active.push_back(idx);
            step.recycled += 1;
        }

        step
    }

    /// Active pairs, oldest first
    pub fn pipes(&self) -> impl Iterator<Item = &PipePair> + '_ {
        self.active.iter().map(move |&idx| &self.slots[idx])
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Total pairs ever allocated (active + idle)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn idle_count(&self) -> usize {
        self.free.len()
    }
}

/// Uniform gap center that keeps the whole gap inside the margins
///
/// A non-positive height falls back to the reference height; a range that
/// collapses clamps to its lower bound.
fn choose_gap_center<R: Rng + ?Sized>(
    rng: &mut R,
    layout: &TrackLayout,
    screen_height: f32,
    gap: f32,
) -> f32 {
    let height = if screen_height > 0.0 {
        screen_height
    } else {
        layout.reference_height
    };
    let min = layout.margin_top + gap / 2.0;
    let max = height - layout.margin_bottom - gap / 2.0;
    min + rng.random::<f32>() * (max - min).max(0.0)
}
