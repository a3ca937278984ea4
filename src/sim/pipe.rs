//! Pipe pairs: one vertically gapped barrier
//!
//! A pair owns its collision geometry. Horizontal motion is applied by the
//! track so the scroll speed is computed in one place.

use super::bird::Bird;

/// Largest cap tilt either side of level (degrees)
const CAP_TILT_RANGE: f32 = 14.0;
/// Bottom cap leans the other way, a bit less
const BOTTOM_CAP_RATIO: f32 = -0.6;

/// A pipe pair (top pipe above the gap, bottom pipe below it)
#[derive(Debug, Clone, Default)]
pub struct PipePair {
    /// Left edge
    pub x: f32,
    pub gap_center_y: f32,
    pub gap_size: f32,
    pub width: f32,
    /// Cosmetic cap rotations in degrees
    pub top_cap_tilt: f32,
    pub bottom_cap_tilt: f32,
}

impl PipePair {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Re-activate this pair at a new spawn position
    pub fn reset(&mut self, x: f32, gap_center_y: f32, gap_size: f32) {
        self.x = x;
        self.gap_center_y = gap_center_y;
        self.gap_size = gap_size;

        let tilt = cap_tilt(x, gap_center_y);
        self.top_cap_tilt = tilt;
        self.bottom_cap_tilt = tilt * BOTTOM_CAP_RATIO;
    }

    pub fn advance(&mut self, speed: f32, dt: f32) {
        self.x -= speed * dt;
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge of the top pipe
    pub fn gap_top(&self) -> f32 {
        self.gap_center_y - self.gap_size / 2.0
    }

    /// Top edge of the bottom pipe
    pub fn gap_bottom(&self) -> f32 {
        self.gap_center_y + self.gap_size / 2.0
    }

    /// True once the right edge has passed `margin` units left of the origin
    pub fn is_offscreen(&self, margin: f32) -> bool {
        self.right() < -margin
    }

    /// Rectangle-with-gap test against the bird's bounding square
    pub fn collides_with(&self, bird: &Bird) -> bool {
        let bird_left = bird.pos.x;
        let bird_right = bird.pos.x + bird.size;
        if bird_right < self.x || bird_left > self.right() {
            return false;
        }

        bird.top() < self.gap_top() || bird.bottom() > self.gap_bottom()
    }
}

/// Deterministic cap tilt for a spawn position, in [-14, 14] degrees
pub fn cap_tilt(x: f32, gap_center_y: f32) -> f32 {
    let seed = x * 0.13 + gap_center_y * 0.37;
    let frac = seed.sin().abs();
    frac * (CAP_TILT_RANGE * 2.0) - CAP_TILT_RANGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn pair_at(x: f32, gap_y: f32, gap: f32) -> PipePair {
        let mut p = PipePair::new(72.0);
        p.reset(x, gap_y, gap);
        p
    }

    fn bird_at(x: f32, y: f32) -> Bird {
        let mut b = Bird::new(&Tuning::default());
        b.pos.x = x;
        b.pos.y = y;
        b
    }

    #[test]
    fn test_cap_tilt_is_deterministic() {
        let a = pair_at(1180.0, 420.0, 300.0);
        let b = pair_at(1180.0, 420.0, 220.0);
        assert_eq!(a.top_cap_tilt, b.top_cap_tilt);
        assert_eq!(a.bottom_cap_tilt, b.bottom_cap_tilt);
        assert!((a.bottom_cap_tilt + a.top_cap_tilt * 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_bird_inside_gap_is_safe() {
        let pipe = pair_at(180.0, 450.0, 300.0);
        // Gap spans 300..600, bird spans 400..440
        assert!(!pipe.collides_with(&bird_at(200.0, 400.0)));
    }

    #[test]
    fn test_bird_breaching_gap_collides() {
        let pipe = pair_at(180.0, 450.0, 300.0);
        assert!(pipe.collides_with(&bird_at(200.0, 290.0)));
        assert!(pipe.collides_with(&bird_at(200.0, 570.0)));
    }

    #[test]
    fn test_no_horizontal_overlap_never_collides() {
        let pipe = pair_at(400.0, 450.0, 300.0);
        assert!(!pipe.collides_with(&bird_at(200.0, 0.0)));
        assert!(!pipe.collides_with(&bird_at(480.0, 0.0)));
    }

    #[test]
    fn test_offscreen_uses_right_edge() {
        let mut pipe = pair_at(-20.0, 450.0, 300.0);
        assert!(!pipe.is_offscreen(20.0));
        pipe.advance(160.0, 0.5);
        assert!(pipe.is_offscreen(20.0));
    }

    proptest! {
        #[test]
        fn prop_cap_tilt_bounded(x in -2000.0f32..4000.0, y in -500.0f32..1500.0) {
            let t = cap_tilt(x, y);
            prop_assert!((-14.0..=14.0).contains(&t));
        }

        #[test]
        fn prop_contained_bird_never_collides(
            gap_y in 300.0f32..600.0,
            gap in 120.0f32..300.0,
            frac in 0.0f32..0.99,
            dx in -100.0f32..100.0,
        ) {
            let pipe = pair_at(200.0, gap_y, gap);
            let room = gap - 40.0;
            prop_assume!(room >= 0.0);
            let y = pipe.gap_top() + room * frac;
            prop_assert!(!pipe.collides_with(&bird_at(200.0 + dx, y)));
        }

        #[test]
        fn prop_far_bird_never_collides(y in -1000.0f32..2000.0) {
            let pipe = pair_at(500.0, 450.0, 150.0);
            prop_assert!(!pipe.collides_with(&bird_at(100.0, y)));
            prop_assert!(!pipe.collides_with(&bird_at(600.0, y)));
        }
    }
}
