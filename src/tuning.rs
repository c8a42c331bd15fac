//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. The defaults reproduce the
//! shipped game; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::LOGICAL_HEIGHT;

/// Gameplay constants, all expressed per nominal (60 Hz) frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Scroll speed at tier 0 (pixels per frame)
    pub base_speed: f32,
    /// Exponential smoothing factor for speed changes
    pub speed_smoothing: f32,
    /// Floor sits this far above the bottom of the logical height
    pub floor_offset: f32,
    /// Player may travel this far above y=0 before failing (negative = off-screen)
    pub ceiling_margin: f32,

    // === Player ===
    pub player_start_x: f32,
    pub player_start_y: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Rotation applied on jump (degrees)
    pub jump_rotation: f32,
    /// Velocity to rotation scale (radians per unit velocity)
    pub rotation_per_velocity: f32,

    // === Pipes ===
    pub pipe_width: f32,
    pub base_gap: f32,
    pub min_gap: f32,
    /// Gap shrink per point of distance score
    pub gap_shrink_rate: f32,
    /// Horizontal distance between pipes at multiplier 1.0
    pub base_spacing: f32,
    /// Minimum solid pipe length above and below the gap
    pub min_pipe_margin: f32,
    /// Probability that a pipe carries a coin
    pub coin_chance: f64,

    // === Collision ===
    /// Hit-box inset on every side of the player
    pub hitbox_inset: f32,
    pub coin_pickup_radius: f32,
    /// Coins further left than this are dropped
    pub coin_despawn_x: f32,
    /// Coin spin per frame (radians)
    pub coin_spin: f32,

    // === Effects ===
    /// Particle life lost per frame
    pub particle_decay: f32,
    /// Particle velocity range is +/- half of this
    pub particle_spread: f32,
    pub particle_min_size: f32,
    pub particle_max_size: f32,
    pub floor_crash_shake: f32,
    pub pipe_crash_shake: f32,
    pub level_up_flash: f32,
    pub pass_flash: f32,
    /// Flash fade per frame
    pub flash_decay: f32,
    /// Level banner lifetime in frames
    pub level_banner_frames: f32,

    // === Ambient ===
    pub cloud_count: usize,
    pub snow_count: usize,
    /// Rate applied to clouds and snow outside of active play
    pub idle_ambient_rate: f32,

    // === Attract mode ===
    /// Fraction of the gap the autopilot aims for, measured from the top
    pub autopilot_gap_bias: f32,
    /// Autopilot flaps once this far below its target
    pub autopilot_slack: f32,
    /// Downward velocity forced when the autopilot overshoots the top
    pub autopilot_drop_velocity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 3.5,
            speed_smoothing: 0.05,
            floor_offset: 10.0,
            ceiling_margin: -50.0,

            player_start_x: 60.0,
            player_start_y: 240.0,
            player_width: 34.0,
            player_height: 28.0,
            jump_rotation: -25.0,
            rotation_per_velocity: 0.1,

            pipe_width: 52.0,
            base_gap: 160.0,
            min_gap: 110.0,
            gap_shrink_rate: 0.8,
            base_spacing: 600.0,
            min_pipe_margin: 60.0,
            coin_chance: 0.5,

            hitbox_inset: 6.0,
            coin_pickup_radius: 30.0,
            coin_despawn_x: -50.0,
            coin_spin: 0.1,

            particle_decay: 0.03,
            particle_spread: 12.0,
            particle_min_size: 2.0,
            particle_max_size: 8.0,
            floor_crash_shake: 15.0,
            pipe_crash_shake: 20.0,
            level_up_flash: 0.8,
            pass_flash: 0.1,
            flash_decay: 0.1,
            level_banner_frames: 120.0,

            cloud_count: 5,
            snow_count: 60,
            idle_ambient_rate: 0.5,

            autopilot_gap_bias: 0.6,
            autopilot_slack: 20.0,
            autopilot_drop_velocity: 2.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Y coordinate of the floor
    pub fn floor_y(&self) -> f32 {
        LOGICAL_HEIGHT - self.floor_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "min_gap": 90.0, "cloud_count": 2 }"#).unwrap();
        assert_eq!(tuning.min_gap, 90.0);
        assert_eq!(tuning.cloud_count, 2);
        assert_eq!(tuning.base_gap, Tuning::default().base_gap);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_floor_y() {
        assert_eq!(Tuning::default().floor_y(), 630.0);
    }
}
