//! Rudolph Flap - a side-scrolling flappy arcade game
//!
//! Core modules:
//! - `sim`: Simulation (physics, spawning, collisions, difficulty, lifecycle)
//! - `session`: Tick driver, input queue and host callbacks
//! - `renderer`: Procedural 2D drawing onto a WebGPU triangle pipeline
//! - `character`: Playable character roster
//! - `economy`: Wallet, inventory and unlocks
//! - `storage` / `audio`: Best-effort platform collaborators
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod character;
pub mod economy;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod storage;
pub mod tuning;

pub use character::{CharacterId, CharacterProfile};
pub use economy::Economy;
pub use session::{Action, FrameStatus, Session, SessionHost};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate the simulation is tuned for
    pub const TARGET_FPS: f64 = 60.0;
    /// Milliseconds in one nominal frame
    pub const FRAME_TIME_MS: f64 = 1000.0 / TARGET_FPS;
    /// Largest delta-time a single tick may integrate (stall protection)
    pub const MAX_DELTA_TIME: f32 = 3.0;

    /// Fixed physics height; width follows the viewport aspect ratio
    pub const LOGICAL_HEIGHT: f32 = 640.0;
    /// Width used until the host reports a real viewport
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 360.0;
}

/// Linear RGBA colour
pub type Rgba = [f32; 4];

/// Build an opaque colour from a `0xRRGGBB` literal
#[inline]
pub const fn rgb_hex(hex: u32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Same colour with a different alpha
#[inline]
pub const fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex() {
        let c = rgb_hex(0xff8000);
        assert_eq!(c[0], 1.0);
        assert!((c[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[2], 0.0);
        assert_eq!(c[3], 1.0);
        assert_eq!(with_alpha(c, 0.5)[3], 0.5);
    }
}
