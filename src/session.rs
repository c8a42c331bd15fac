//! Game session
//!
//! A `Session` owns one `GameState` and drives it from animation-frame
//! timestamps. Input is queued and applied at the start of the next tick;
//! events coming out of the tick are routed to the sound player and to the
//! host shell.

use crate::audio::{SoundEffect, SoundPlayer};
use crate::character::{CharacterProfile, default_profile};
use crate::consts::LOGICAL_HEIGHT;
use crate::sim::clock::FrameClock;
use crate::sim::state::{GameEvent, GamePhase, GameState, Mode};
use crate::sim::tick::tick;
use crate::tuning::Tuning;

pub use crate::sim::tick::Action;

/// Port for the shell that hosts a session.
pub trait SessionHost {
    /// Character for the next session
    fn character(&self) -> CharacterProfile;
    /// A run ended; called exactly once per game over
    fn on_session_end(&mut self, coins_earned: u32);
    /// The player asked to leave
    fn on_request_close(&mut self);
}

/// Host with no shell behind it (attract sessions, headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl SessionHost for NullHost {
    fn character(&self) -> CharacterProfile {
        default_profile().clone()
    }

    fn on_session_end(&mut self, _coins_earned: u32) {}

    fn on_request_close(&mut self) {}
}

/// Whether the frame loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Running,
    Stopped,
}

pub struct Session<H: SessionHost, A: SoundPlayer> {
    state: GameState,
    host: H,
    audio: A,
    queue: Vec<Action>,
    clock: FrameClock,
    closed: bool,
}

impl<H: SessionHost, A: SoundPlayer> Session<H, A> {
    pub fn new(mode: Mode, host: H, audio: A, seed: u64, tuning: Tuning) -> Self {
        let character = host.character();
        log::info!("New {:?} session with {}", mode, character.name);
        Self {
            state: GameState::with_tuning(character, mode, seed, tuning),
            host,
            audio,
            queue: Vec::new(),
            clock: FrameClock::new(),
            closed: false,
        }
    }

    /// Player-controlled session, waiting on the start screen
    pub fn new_interactive(host: H, audio: A, seed: u64) -> Self {
        Self::new(Mode::Interactive, host, audio, seed, Tuning::default())
    }

    /// Self-playing background session
    pub fn new_attract(host: H, audio: A, seed: u64) -> Self {
        Self::new(Mode::Attract, host, audio, seed, Tuning::default())
    }

    /// Queue an input action for the next tick
    pub fn push(&mut self, action: Action) {
        if self.closed || self.state.is_attract() {
            return;
        }
        self.queue.push(action);
    }

    /// Track the viewport aspect ratio; the logical height stays fixed
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.state.viewport_width = LOGICAL_HEIGHT * width / height;
        log::debug!("Viewport width now {:.0}", self.state.viewport_width);
    }

    /// Run one animation frame at timestamp `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> FrameStatus {
        if self.closed {
            return FrameStatus::Stopped;
        }
        let dt = self.clock.tick(now_ms);
        self.advance(dt)
    }

    /// Run one tick of `dt` nominal frames
    pub fn advance(&mut self, dt: f32) -> FrameStatus {
        if self.closed {
            return FrameStatus::Stopped;
        }

        let actions = std::mem::take(&mut self.queue);
        if actions.contains(&Action::Cancel) {
            self.closed = true;
            log::info!("Session closed by player");
            self.host.on_request_close();
            return FrameStatus::Stopped;
        }

        tick(&mut self.state, &actions, dt);

        let events = self.state.take_events();
        if !self.state.is_attract() {
            for event in events {
                self.dispatch(event);
            }
        }

        FrameStatus::Running
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::Started => self.audio.play(SoundEffect::Click),
            GameEvent::Jumped => self.audio.play(SoundEffect::Jump),
            GameEvent::Scored { .. } | GameEvent::CoinCollected { .. } | GameEvent::LevelUp { .. } => {
                self.audio.play(SoundEffect::Score)
            }
            GameEvent::Crashed { coins, .. } => {
                self.audio.play(SoundEffect::Crash);
                self.host.on_session_end(coins);
            }
            GameEvent::Paused | GameEvent::Resumed | GameEvent::Reset => {}
        }
    }

    /// Stop the session without notifying the host
    pub fn close(&mut self) {
        if !self.closed {
            log::debug!("Session closed by host");
        }
        self.closed = true;
        self.queue.clear();
    }

    /// Forget the last frame timestamp (after the loop was suspended)
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}
