//! Simulation
//!
//! Everything that decides what happens in a run lives here. Nothing in this
//! module touches the DOM, the GPU or the audio device:
//! - Delta-time scaled, clamped per tick
//! - Seeded RNG per `GameState`
//! - Output is state plus a drained event list

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod level;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::{FrameClock, delta_time};
pub use level::{LEVELS, LevelTier, Theme, resolve_tier};
pub use state::{
    Cloud, CrashCause, FloatingCoin, GameEvent, GamePhase, GameState, LevelBanner, Mode,
    Particle, Pipe, Player, Snowflake,
};
pub use tick::{Action, tick};
