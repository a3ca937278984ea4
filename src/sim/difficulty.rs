//! Difficulty model
//!
//! Pure functions of play time, score and the user's multiplier. Safe to
//! call every frame.

use crate::tuning::Tuning;

/// The factor never drops below this
pub const MIN_FACTOR: f32 = 0.6;

/// Overall difficulty factor
pub fn difficulty_factor(play_time_secs: f32, score: u64, user_multiplier: f32) -> f32 {
    let time_factor = 1.0 + play_time_secs.max(0.0).ln_1p() / 8.0;
    let score_factor = 1.0 + score as f32 * 0.02;
    (user_multiplier * time_factor * score_factor).max(MIN_FACTOR)
}

/// Horizontal scroll speed for a given factor
pub fn pipe_speed(tuning: &Tuning, factor: f32) -> f32 {
    tuning.base_pipe_speed * factor
}

/// Gap size for newly spawned pairs (shrinks with score and time)
pub fn gap_size(tuning: &Tuning, play_time_secs: f32, score: u64) -> f32 {
    let shrink = (score as f32 * 1.5 + play_time_secs.max(0.0).ln_1p() * 6.0).trunc();
    (tuning.initial_gap - shrink).max(tuning.min_gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fresh_session_factor() {
        assert!((difficulty_factor(0.0, 0, 1.0) - 1.0).abs() < 1e-6);
        assert!((difficulty_factor(0.0, 0, 1.5) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_factor_floor() {
        assert_eq!(difficulty_factor(0.0, 0, 0.1), MIN_FACTOR);
        assert_eq!(difficulty_factor(0.0, 0, 0.0), MIN_FACTOR);
    }

    #[test]
    fn test_known_values() {
        // e - 1 seconds -> ln(1 + t) == 1
        let t = std::f32::consts::E - 1.0;
        let f = difficulty_factor(t, 10, 1.0);
        assert!((f - 1.125 * 1.2).abs() < 1e-4);

        let tuning = Tuning::default();
        assert!((pipe_speed(&tuning, 1.0) - 160.0).abs() < 1e-6);
        assert_eq!(gap_size(&tuning, 0.0, 10), 285.0);
        // 11 * 1.5 = 16.5 truncates to 16
        assert_eq!(gap_size(&tuning, 0.0, 11), 284.0);
        let g = gap_size(&tuning, t, 10);
        assert!((279.0..=280.0).contains(&g));
    }

    #[test]
    fn test_gap_floor() {
        let tuning = Tuning::default();
        assert_eq!(gap_size(&tuning, 0.0, 0), 300.0);
        assert_eq!(gap_size(&tuning, 3600.0, 500), tuning.min_gap);
    }

    proptest! {
        #[test]
        fn prop_monotone_in_time(
            t in 0.0f32..10_000.0, dt in 0.0f32..100.0, score in 0u64..1000, m in 0.1f32..3.0
        ) {
            prop_assert!(difficulty_factor(t + dt, score, m) >= difficulty_factor(t, score, m));
        }

        #[test]
        fn prop_monotone_in_score(
            t in 0.0f32..10_000.0, score in 0u64..1000, extra in 0u64..100, m in 0.1f32..3.0
        ) {
            prop_assert!(difficulty_factor(t, score + extra, m) >= difficulty_factor(t, score, m));
        }

        #[test]
        fn prop_never_below_floor(t in 0.0f32..10_000.0, score in 0u64..1000, m in 0.0f32..3.0) {
            let f = difficulty_factor(t, score, m);
            prop_assert!(f >= MIN_FACTOR);
            prop_assert!(f >= MIN_FACTOR * m);
        }

        #[test]
        fn prop_gap_at_least_min(t in 0.0f32..10_000.0, score in 0u64..10_000) {
            let tuning = Tuning::default();
            prop_assert!(gap_size(&tuning, t, score) >= tuning.min_gap);
        }
    }
}
