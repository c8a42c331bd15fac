//! Obstacle spawning
//!
//! Pipes enter at the right edge of the viewport once the previous one has
//! scrolled far enough in. Spacing shrinks with the tier's speed multiplier so
//! the time between pipes stays roughly constant as the world speeds up.

use glam::Vec2;
use rand::Rng;

use super::state::{FloatingCoin, GameState, Pipe};
use crate::consts::LOGICAL_HEIGHT;
use crate::tuning::Tuning;

/// Gap height for the next pipe: narrows with score, never below `min_gap`
pub fn gap_height(tuning: &Tuning, score: u32) -> f32 {
    (tuning.base_gap - score as f32 * tuning.gap_shrink_rate).max(tuning.min_gap)
}

/// Horizontal distance required between consecutive pipes
pub fn spawn_spacing(base_spacing: f32, speed_multiplier: f32) -> f32 {
    base_spacing / speed_multiplier.max(f32::EPSILON)
}

/// Valid range for the top of a gap of height `gap`
pub fn gap_top_range(tuning: &Tuning, gap: f32) -> (f32, f32) {
    let min = tuning.min_pipe_margin;
    let max = (LOGICAL_HEIGHT - gap - tuning.min_pipe_margin).max(min);
    (min, max)
}

/// Whether a new pipe is due, given where the most recent one is now
pub fn should_spawn(last_spawn_x: Option<f32>, viewport_width: f32, spacing: f32) -> bool {
    match last_spawn_x {
        None => true,
        Some(x) => viewport_width - x >= spacing,
    }
}

/// Spawn a pipe at the right edge, maybe with a coin in its gap
pub fn spawn_pipe(state: &mut GameState) {
    let tuning = &state.tuning;
    let gap = gap_height(tuning, state.distance_score);
    let (min_top, max_top) = gap_top_range(tuning, gap);

    // Whole-pixel gap tops, uniform over [min_top, max_top]
    let slots = (max_top - min_top + 1.0).floor().max(1.0);
    let gap_top = (min_top + (state.rng.random::<f32>() * slots).floor()).min(max_top);

    let x = state.viewport_width;
    let width = tuning.pipe_width;
    let with_coin = state.rng.random_bool(tuning.coin_chance.clamp(0.0, 1.0));

    state.spawn_marker = Some(x);
    state.pipes.push_back(Pipe {
        x,
        gap_top,
        gap_height: gap,
        width,
        passed: false,
    });

    if with_coin {
        state.coins.push(FloatingCoin {
            pos: Vec2::new(x + width / 2.0, gap_top + gap / 2.0),
            collected: false,
            angle: 0.0,
        });
    }

    log::debug!(
        "Spawned pipe at x={:.0} gap_top={:.0} gap={:.1} coin={}",
        x,
        gap_top,
        gap,
        with_coin
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::default_profile;
    use crate::sim::level::LEVELS;
    use crate::sim::state::Mode;
    use proptest::prelude::*;

    #[test]
    fn test_gap_height_examples() {
        let t = Tuning::default();
        assert_eq!(gap_height(&t, 0), 160.0);
        assert_eq!(gap_height(&t, 10), 152.0);
        assert!((gap_height(&t, 62) - 110.4).abs() < 1e-3);
        assert_eq!(gap_height(&t, 63), 110.0);
        assert_eq!(gap_height(&t, 10_000), 110.0);
    }

    #[test]
    fn test_spacing_per_tier() {
        let spacings: Vec<f32> = LEVELS
            .iter()
            .map(|l| spawn_spacing(600.0, l.speed_multiplier))
            .collect();
        assert_eq!(spacings[0], 600.0);
        assert!((spacings[1] - 500.0).abs() < 1e-3);
        assert!(spacings.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_should_spawn() {
        let pipe = Pipe {
            x: 100.0,
            gap_top: 100.0,
            gap_height: 160.0,
            width: 52.0,
            passed: false,
        };
        assert!(should_spawn(None, 360.0, 600.0));
        assert!(!should_spawn(Some(pipe.x), 360.0, 600.0));
        assert!(should_spawn(Some(pipe.x), 700.0, 600.0));
        // The last pipe may already be gone; its position keeps counting
        assert!(!should_spawn(Some(-200.0), 360.0, 600.0));
        assert!(should_spawn(Some(-240.0), 360.0, 600.0));
    }

    #[test]
    fn test_spawn_pipe_places_gap_in_band() {
        let mut state = GameState::new(default_profile().clone(), Mode::Interactive, 3);
        state.viewport_width = 480.0;
        for _ in 0..200 {
            spawn_pipe(&mut state);
        }
        assert_eq!(state.pipes.len(), 200);
        for pipe in &state.pipes {
            assert_eq!(pipe.x, 480.0);
            assert_eq!(pipe.gap_height, 160.0);
            assert!(pipe.gap_top >= 60.0);
            assert!(pipe.gap_top <= 640.0 - 160.0 - 60.0);
            assert_eq!(pipe.gap_top.fract(), 0.0);
        }
        // Roughly half the pipes carry a coin
        assert!(state.coins.len() > 60 && state.coins.len() < 140);
        for coin in &state.coins {
            assert_eq!(coin.pos.x, 480.0 + 26.0);
        }
    }

    #[test]
    fn test_coin_sits_in_gap_center() {
        let mut tuning = Tuning::default();
        tuning.coin_chance = 1.0;
        let mut state =
            GameState::with_tuning(default_profile().clone(), Mode::Interactive, 9, tuning);
        spawn_pipe(&mut state);
        let pipe = &state.pipes[0];
        assert_eq!(state.coins[0].pos.y, pipe.gap_center());
    }

    proptest! {
        #[test]
        fn prop_gap_never_below_minimum(score in 0u32..u32::MAX) {
            let t = Tuning::default();
            let gap = gap_height(&t, score);
            prop_assert!(gap >= t.min_gap);
            prop_assert!(gap <= t.base_gap);
        }

        #[test]
        fn prop_spacing_non_increasing(a in 1.0f32..4.0, b in 1.0f32..4.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(spawn_spacing(600.0, hi) <= spawn_spacing(600.0, lo));
        }
    }
}
