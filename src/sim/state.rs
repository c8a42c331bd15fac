//! Game state and core simulation types
//!
//! One [`GameState`] is one simulation instance. It owns every entity
//! collection and its own RNG, so two instances never alias anything.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::character::CharacterProfile;
use crate::consts::{DEFAULT_VIEWPORT_WIDTH, LOGICAL_HEIGHT};
use crate::tuning::Tuning;
use crate::Rgba;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first tap
    Start,
    /// Active gameplay
    Playing,
    /// Gameplay frozen, ambient motion continues
    Paused,
    /// Run ended, waiting for retry or close
    GameOver,
}

/// Who is driving the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// A player session with HUD, audio and scoring callbacks
    Interactive,
    /// Autopiloted backdrop; ignores input and never ends
    Attract,
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Hit the floor or flew too far above the screen
    Bounds,
    /// Hit a pipe
    Pipe,
}

/// One-shot notifications produced by a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh run began (from Start or GameOver)
    Started,
    Jumped,
    Paused,
    Resumed,
    /// Passed a pipe
    Scored { distance: u32 },
    CoinCollected { coins: u32 },
    LevelUp { tier: usize },
    Crashed { cause: CrashCause, coins: u32 },
    /// Attract mode silently restarted after a failure
    Reset,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (positive = down)
    pub velocity: f32,
    /// Cosmetic tilt in degrees
    pub rotation: f32,
    /// Animation frame counter (advances with delta-time)
    pub frame: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_start_x, tuning.player_start_y),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            velocity: 0.0,
            rotation: 0.0,
            frame: 0.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Apply a jump impulse
    pub fn jump(&mut self, jump_strength: f32, rotation: f32) {
        self.velocity = jump_strength;
        self.rotation = rotation;
    }

    /// Semi-implicit Euler step: velocity first, then position
    pub fn integrate(&mut self, gravity: f32, rotation_per_velocity: f32, dt: f32) {
        self.velocity += gravity * dt;
        self.pos.y += self.velocity * dt;

        let quarter_turn = std::f32::consts::FRAC_PI_4;
        self.rotation = (self.velocity * rotation_per_velocity)
            .clamp(-quarter_turn, quarter_turn)
            .to_degrees();
    }
}

/// An obstacle pair (top and bottom pipe around one gap)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    /// Y where the gap begins
    pub gap_top: f32,
    pub gap_height: f32,
    pub width: f32,
    /// Already scored
    pub passed: bool,
}

impl Pipe {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_height
    }

    pub fn gap_center(&self) -> f32 {
        self.gap_top + self.gap_height / 2.0
    }
}

/// A spinning coin floating in a pipe gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingCoin {
    pub pos: Vec2,
    pub collected: bool,
    /// Spin angle (radians)
    pub angle: f32,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at birth, removed at 0
    pub life: f32,
    pub size: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub speed: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snowflake {
    pub pos: Vec2,
    pub speed: f32,
    pub size: f32,
    pub alpha: f32,
}

/// Transient "LEVEL UP" banner
#[derive(Debug, Clone, PartialEq)]
pub struct LevelBanner {
    pub name: &'static str,
    /// Frames left on screen
    pub remaining: f32,
}

/// Complete state of one simulation instance
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: Mode,
    pub phase: GamePhase,
    pub tuning: Tuning,
    /// Selected character, read-only for the session
    pub character: CharacterProfile,
    /// Current logical viewport width (height is fixed)
    pub viewport_width: f32,
    pub player: Player,
    /// Ordered by spawn time: push at the back, expire from the front
    pub pipes: VecDeque<Pipe>,
    pub coins: Vec<FloatingCoin>,
    pub particles: Vec<Particle>,
    pub clouds: Vec<Cloud>,
    pub snow: Vec<Snowflake>,
    /// Pipes passed this run (drives difficulty)
    pub distance_score: u32,
    /// Coins earned this run (pipes passed + coins picked up)
    pub coins_collected: u32,
    /// Current scroll speed (pixels per frame)
    pub speed: f32,
    /// Screen shake magnitude
    pub shake: f32,
    /// White overlay alpha
    pub flash: f32,
    pub level_index: usize,
    pub level_banner: Option<LevelBanner>,
    /// Ticks processed since creation
    pub time_ticks: u64,
    /// Scrolled position of the most recently spawned pipe, kept after it expires
    pub spawn_marker: Option<f32>,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new simulation for the given character
    pub fn new(character: CharacterProfile, mode: Mode, seed: u64) -> Self {
        Self::with_tuning(character, mode, seed, Tuning::default())
    }

    pub fn with_tuning(character: CharacterProfile, mode: Mode, seed: u64, tuning: Tuning) -> Self {
        let phase = match mode {
            Mode::Interactive => GamePhase::Start,
            Mode::Attract => GamePhase::Playing,
        };
        let mut state = Self {
            mode,
            phase,
            player: Player::new(&tuning),
            speed: tuning.base_speed,
            tuning,
            character,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            pipes: VecDeque::new(),
            coins: Vec::new(),
            particles: Vec::new(),
            clouds: Vec::new(),
            snow: Vec::new(),
            distance_score: 0,
            coins_collected: 0,
            shake: 0.0,
            flash: 0.0,
            level_index: 0,
            level_banner: None,
            time_ticks: 0,
            spawn_marker: None,
            events: Vec::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.reset_run();
        state
    }

    /// Re-initialise every per-run entity and counter.
    ///
    /// Phase, mode, character, viewport and RNG stream are left alone.
    pub fn reset_run(&mut self) {
        let width = self.viewport_width;
        self.player = Player::new(&self.tuning);
        self.pipes.clear();
        self.spawn_marker = None;
        self.coins.clear();
        self.particles.clear();

        let rng = &mut self.rng;
        self.snow = (0..self.tuning.snow_count)
            .map(|_| Snowflake {
                pos: Vec2::new(rng.random::<f32>() * width, rng.random::<f32>() * LOGICAL_HEIGHT),
                speed: rng.random::<f32>() * 2.0 + 1.0,
                size: rng.random::<f32>() * 2.0 + 1.0,
                alpha: rng.random::<f32>() * 0.5 + 0.3,
            })
            .collect();
        self.clouds = (0..self.tuning.cloud_count)
            .map(|i| Cloud {
                pos: Vec2::new(
                    i as f32 * 150.0 + rng.random::<f32>() * 50.0,
                    rng.random::<f32>() * 200.0 + 30.0,
                ),
                speed: 0.2 + rng.random::<f32>() * 0.5,
                width: 30.0 + rng.random::<f32>() * 50.0,
            })
            .collect();

        self.distance_score = 0;
        self.coins_collected = 0;
        self.speed = self.tuning.base_speed;
        self.shake = 0.0;
        self.flash = 0.0;
        self.level_index = 0;
        self.level_banner = None;
    }

    /// Emit a burst of particles at `origin`, colours picked from `palette`
    pub fn spawn_particles(&mut self, origin: Vec2, count: usize, palette: &[Rgba]) {
        if palette.is_empty() {
            return;
        }
        let spread = self.tuning.particle_spread;
        let (min_size, max_size) = (self.tuning.particle_min_size, self.tuning.particle_max_size);
        for _ in 0..count {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * spread,
                (self.rng.random::<f32>() - 0.5) * spread,
            );
            let size = min_size + self.rng.random::<f32>() * (max_size - min_size);
            let color = palette[self.rng.random_range(0..palette.len())];
            self.particles.push(Particle {
                pos: origin,
                vel,
                life: 1.0,
                size,
                color,
            });
        }
    }

    /// Drain pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Where the spacing rule measures from: the newest pipe on screen, else the spawn marker
    pub fn last_spawn_x(&self) -> Option<f32> {
        self.pipes.back().map(|p| p.x).or(self.spawn_marker)
    }

    /// The pipe the player is currently dealing with: the first one whose
    /// right edge is still ahead of the player's left edge
    pub fn current_pipe(&self) -> Option<&Pipe> {
        self.pipes.iter().find(|p| p.right() > self.player.pos.x)
    }

    pub fn is_attract(&self) -> bool {
        self.mode == Mode::Attract
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::default_profile;

    #[test]
    fn test_new_interactive_starts_in_start() {
        let state = GameState::new(default_profile().clone(), Mode::Interactive, 1);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.player.pos, Vec2::new(60.0, 240.0));
        assert_eq!(state.clouds.len(), 5);
        assert_eq!(state.snow.len(), 60);
        assert!(state.pipes.is_empty());
    }

    #[test]
    fn test_new_attract_starts_playing() {
        let state = GameState::new(default_profile().clone(), Mode::Attract, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.is_attract());
    }

    #[test]
    fn test_player_integrate_and_rotation_clamp() {
        let mut player = Player::new(&Tuning::default());
        player.integrate(0.25, 0.1, 1.0);
        assert_eq!(player.velocity, 0.25);
        assert_eq!(player.pos.y, 240.25);

        player.velocity = 50.0;
        player.integrate(0.0, 0.1, 1.0);
        assert!((player.rotation - 45.0).abs() < 1e-4);

        player.velocity = -50.0;
        player.integrate(0.0, 0.1, 1.0);
        assert!((player.rotation + 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_spawn_particles_and_drain_events() {
        let mut state = GameState::new(default_profile().clone(), Mode::Interactive, 7);
        state.spawn_particles(Vec2::new(10.0, 20.0), 6, &[[1.0; 4]]);
        assert_eq!(state.particles.len(), 6);
        for p in &state.particles {
            assert_eq!(p.life, 1.0);
            assert!(p.vel.x.abs() <= 6.0 && p.vel.y.abs() <= 6.0);
            assert!(p.size >= 2.0 && p.size <= 8.0);
        }

        state.events.push(GameEvent::Jumped);
        assert_eq!(state.take_events(), vec![GameEvent::Jumped]);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_current_pipe_skips_passed() {
        let mut state = GameState::new(default_profile().clone(), Mode::Interactive, 1);
        let pipe = |x| Pipe {
            x,
            gap_top: 100.0,
            gap_height: 150.0,
            width: 52.0,
            passed: false,
        };
        state.pipes.push_back(pipe(0.0)); // right edge 52 < player x 60
        state.pipes.push_back(pipe(200.0));
        assert_eq!(state.current_pipe().map(|p| p.x), Some(200.0));
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(default_profile().clone(), Mode::Attract, 42);
        let b = GameState::new(default_profile().clone(), Mode::Attract, 42);
        assert_eq!(a.clouds[3].pos, b.clouds[3].pos);
        assert_eq!(a.snow[59].pos, b.snow[59].pos);
    }
}
