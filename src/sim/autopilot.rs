//! Attract-mode autopilot
//!
//! Deliberately simple: aim slightly below the middle of the next gap and
//! flap whenever the player sinks past that line.

use super::state::{GameState, Pipe};
use crate::consts::LOGICAL_HEIGHT;
use crate::tuning::Tuning;

/// Height the autopilot tries to hold
pub fn target_y(next_pipe: Option<&Pipe>, tuning: &Tuning) -> f32 {
    match next_pipe {
        Some(pipe) => pipe.gap_top + pipe.gap_height * tuning.autopilot_gap_bias,
        None => LOGICAL_HEIGHT * 0.5,
    }
}

/// What the autopilot wants to do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Hold,
    Jump,
    /// Too high: push the player back down
    Drop,
}

/// Decide without mutating anything
pub fn decide(state: &GameState) -> Steer {
    let player = &state.player;
    let target = target_y(state.current_pipe(), &state.tuning);

    if player.pos.y > target + state.tuning.autopilot_slack && player.velocity > 0.0 {
        Steer::Jump
    } else if player.pos.y < 0.0 {
        Steer::Drop
    } else {
        Steer::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::default_profile;
    use crate::sim::state::Mode;

    fn attract_state() -> GameState {
        GameState::new(default_profile().clone(), Mode::Attract, 5)
    }

    #[test]
    fn test_target_without_pipe_is_mid_screen() {
        assert_eq!(target_y(None, &Tuning::default()), 320.0);
    }

    #[test]
    fn test_target_biased_low_in_gap() {
        let pipe = Pipe {
            x: 100.0,
            gap_top: 200.0,
            gap_height: 100.0,
            width: 52.0,
            passed: false,
        };
        assert_eq!(target_y(Some(&pipe), &Tuning::default()), 260.0);
    }

    #[test]
    fn test_jumps_only_when_low_and_falling() {
        let mut state = attract_state();
        state.player.pos.y = 400.0;
        state.player.velocity = 1.0;
        assert_eq!(decide(&state), Steer::Jump);

        state.player.velocity = -1.0;
        assert_eq!(decide(&state), Steer::Hold);

        state.player.pos.y = 330.0;
        state.player.velocity = 1.0;
        assert_eq!(decide(&state), Steer::Hold);
    }

    #[test]
    fn test_drops_when_above_screen() {
        let mut state = attract_state();
        state.player.pos.y = -5.0;
        state.player.velocity = -3.0;
        assert_eq!(decide(&state), Steer::Drop);
    }

    #[test]
    fn test_ignores_pipes_already_behind() {
        let mut state = attract_state();
        state.pipes.push_back(Pipe {
            x: -10.0,
            gap_top: 500.0,
            gap_height: 100.0,
            width: 52.0,
            passed: true,
        });
        state.player.pos.y = 345.0;
        state.player.velocity = 1.0;
        // Behind pipe would put the target at 560; the live target is 320
        assert_eq!(decide(&state), Steer::Jump);
    }
}
