//! Difficulty tiers
//!
//! Tiers are ordered by threshold. The current tier is always derived from
//! the distance score, never stored independently of it.

use crate::{Rgba, rgb_hex, with_alpha};

/// Visual identity of a tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub sky_top: Rgba,
    pub sky_bottom: Rgba,
    pub pipe: Rgba,
    pub pipe_stripe: Rgba,
    pub mountains: Rgba,
    /// Number of twinkling stars drawn behind everything
    pub stars: u32,
}

/// One difficulty tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelTier {
    /// Minimum distance score to enter the tier
    pub threshold: u32,
    pub name: &'static str,
    /// Scroll speed relative to the base speed
    pub speed_multiplier: f32,
    pub theme: Theme,
}

const DAY_PIPE: Rgba = rgb_hex(0x22c55e);
const DAY_STRIPE: Rgba = rgb_hex(0x16a34a);
const DAY_MOUNTAINS: Rgba = with_alpha([1.0, 1.0, 1.0, 1.0], 0.3);
const DARK_MOUNTAINS: Rgba = [20.0 / 255.0, 20.0 / 255.0, 30.0 / 255.0, 0.5];

pub const LEVELS: [LevelTier; 4] = [
    LevelTier {
        threshold: 0,
        name: "START",
        speed_multiplier: 1.0,
        theme: Theme {
            sky_top: rgb_hex(0x38bdf8),
            sky_bottom: rgb_hex(0xc084fc),
            pipe: DAY_PIPE,
            pipe_stripe: DAY_STRIPE,
            mountains: DAY_MOUNTAINS,
            stars: 0,
        },
    },
    LevelTier {
        threshold: 10,
        name: "SPEED UP",
        speed_multiplier: 1.2,
        theme: Theme {
            sky_top: rgb_hex(0xf97316),
            sky_bottom: rgb_hex(0xec4899),
            pipe: DAY_PIPE,
            pipe_stripe: DAY_STRIPE,
            mountains: DAY_MOUNTAINS,
            stars: 0,
        },
    },
    LevelTier {
        threshold: 25,
        name: "TURBO",
        speed_multiplier: 1.4,
        theme: Theme {
            sky_top: rgb_hex(0x1e1b4b),
            sky_bottom: rgb_hex(0x4c1d95),
            pipe: rgb_hex(0x15803d),
            pipe_stripe: rgb_hex(0x166534),
            mountains: DARK_MOUNTAINS,
            stars: 40,
        },
    },
    LevelTier {
        threshold: 50,
        name: "HYPER",
        speed_multiplier: 1.6,
        theme: Theme {
            sky_top: rgb_hex(0x000000),
            sky_bottom: rgb_hex(0x1e293b),
            pipe: rgb_hex(0x64748b),
            pipe_stripe: rgb_hex(0x475569),
            mountains: DARK_MOUNTAINS,
            stars: 40,
        },
    },
];

/// Index of the highest tier whose threshold is <= `score`.
///
/// Falls back to 0 when no tier qualifies (never happens with `LEVELS`).
pub fn resolve_tier(levels: &[LevelTier], score: u32) -> usize {
    levels
        .iter()
        .enumerate()
        .filter(|(_, lvl)| lvl.threshold <= score)
        .max_by_key(|(_, lvl)| lvl.threshold)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Tier by index, clamped to the last one
pub fn tier(index: usize) -> &'static LevelTier {
    &LEVELS[index.min(LEVELS.len() - 1)]
}

/// Move `speed` toward `target` by exponential smoothing
#[inline]
pub fn smooth_speed(speed: f32, target: f32, smoothing: f32, dt: f32) -> f32 {
    speed + (target - speed) * smoothing * dt
}
