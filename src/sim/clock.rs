//! Frame clock
//!
//! Converts animation-frame timestamps into a delta-time measured in nominal
//! 60 Hz frames, so `dt == 1.0` means "exactly one frame elapsed".

use crate::consts::{FRAME_TIME_MS, MAX_DELTA_TIME};

/// Delta-time for `elapsed_ms`, clamped to `[0, MAX_DELTA_TIME]`
#[inline]
pub fn delta_time(elapsed_ms: f64) -> f32 {
    ((elapsed_ms / FRAME_TIME_MS) as f32).clamp(0.0, MAX_DELTA_TIME)
}

/// Tracks the previous frame timestamp
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta-time since the previous call.
    ///
    /// The first call has nothing to measure against and returns one nominal frame.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => delta_time(now_ms - last),
            None => 1.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// Forget the previous timestamp (e.g. after the loop was suspended)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
