//! Full sessions driven through the public API with recording collaborators.

use std::cell::RefCell;
use std::rc::Rc;

use rudolph_flap::audio::{SoundEffect, SoundPlayer};
use rudolph_flap::character::profile;
use rudolph_flap::consts::FRAME_TIME_MS;
use rudolph_flap::economy::WALLET_KEY;
use rudolph_flap::renderer::build_scene;
use rudolph_flap::session::NullHost;
use rudolph_flap::sim::autopilot::{Steer, decide};
use rudolph_flap::sim::{GamePhase, Mode};
use rudolph_flap::storage::{KeyValueStore, MemoryStore};
use rudolph_flap::{
    Action, CharacterId, CharacterProfile, Economy, FrameStatus, Session, SessionHost, Settings,
    Tuning,
};

#[derive(Clone, Default)]
struct RecordingAudio(Rc<RefCell<Vec<SoundEffect>>>);

impl SoundPlayer for RecordingAudio {
    fn play(&self, effect: SoundEffect) {
        self.0.borrow_mut().push(effect);
    }
}

/// Host backed by a real economy and store
struct WalletHost {
    economy: Economy,
    store: Rc<MemoryStore>,
    ended: Vec<u32>,
    close_requests: u32,
}

impl WalletHost {
    fn new(economy: Economy) -> Self {
        Self {
            economy,
            store: Rc::new(MemoryStore::new()),
            ended: Vec::new(),
            close_requests: 0,
        }
    }
}

impl SessionHost for WalletHost {
    fn character(&self) -> CharacterProfile {
        self.economy.active_character().clone()
    }

    fn on_session_end(&mut self, coins_earned: u32) {
        self.ended.push(coins_earned);
        self.economy.credit(coins_earned);
        self.economy.save(&self.store);
    }

    fn on_request_close(&mut self) {
        self.close_requests += 1;
    }
}

fn run_frames<H: SessionHost, A: SoundPlayer>(session: &mut Session<H, A>, frames: u32) {
    for i in 0..frames {
        session.frame(f64::from(i) * FRAME_TIME_MS);
    }
}

#[test]
fn test_tap_then_fall_plays_start_and_crash() {
    let audio = RecordingAudio::default();
    let mut session = Session::new_interactive(WalletHost::new(Economy::default()), audio.clone(), 1);

    session.push(Action::Primary);
    run_frames(&mut session, 300);

    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(*audio.0.borrow(), vec![SoundEffect::Click, SoundEffect::Crash]);
    assert_eq!(session.host().ended, vec![0]);
}

#[test]
fn test_game_over_holds_until_retry() {
    let audio = RecordingAudio::default();
    let mut session = Session::new_interactive(WalletHost::new(Economy::default()), audio.clone(), 2);
    session.push(Action::Primary);
    run_frames(&mut session, 300);
    assert_eq!(session.phase(), GamePhase::GameOver);

    // Pause is ignored on the game-over screen
    session.push(Action::PauseToggle);
    session.advance(1.0);
    assert_eq!(session.phase(), GamePhase::GameOver);

    session.push(Action::Primary);
    session.advance(1.0);
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.state().distance_score, 0);
    assert_eq!(session.state().coins_collected, 0);

    // A second crash reports again, once
    run_frames(&mut session, 300);
    assert_eq!(session.host().ended.len(), 2);
}

#[test]
fn test_exit_from_game_over_stops_frames() {
    let mut session =
        Session::new_interactive(WalletHost::new(Economy::default()), RecordingAudio::default(), 3);
    session.push(Action::Primary);
    run_frames(&mut session, 300);

    session.push(Action::Cancel);
    assert_eq!(session.advance(1.0), FrameStatus::Stopped);
    assert_eq!(session.host().close_requests, 1);

    let ticks = session.state().time_ticks;
    for _ in 0..10 {
        session.push(Action::Primary);
        assert_eq!(session.advance(1.0), FrameStatus::Stopped);
    }
    assert_eq!(session.state().time_ticks, ticks);
    assert_eq!(session.host().ended.len(), 1);
}

#[test]
fn test_coins_earned_reach_the_wallet() {
    let tuning = Tuning {
        coin_chance: 1.0,
        ..Tuning::default()
    };
    let economy = Economy {
        wallet: 7,
        ..Economy::default()
    };
    let mut session = Session::new(
        Mode::Interactive,
        WalletHost::new(economy),
        RecordingAudio::default(),
        42,
        tuning,
    );

    session.push(Action::Primary);
    // Steer like the autopilot for a while, then let go
    for _ in 0..1_500 {
        if session.phase() != GamePhase::Playing {
            break;
        }
        if decide(session.state()) == Steer::Jump {
            session.push(Action::Primary);
        }
        session.advance(1.0);
    }
    run_frames(&mut session, 600);

    assert_eq!(session.phase(), GamePhase::GameOver);
    let host = session.host();
    assert_eq!(host.ended.len(), 1);
    let earned = host.ended[0];
    assert_eq!(earned, session.state().coins_collected);
    assert_eq!(host.economy.wallet, 7 + u64::from(earned));
    let stored = host.store.get(WALLET_KEY);
    assert_eq!(stored, Some((7 + u64::from(earned)).to_string()));
}

#[test]
fn test_attract_is_silent_and_endless() {
    let audio = RecordingAudio::default();
    let mut session = Session::new_attract(NullHost, audio.clone(), 9);
    assert_eq!(session.phase(), GamePhase::Playing);

    for i in 0..20_000u32 {
        if i % 7 == 0 {
            session.push(Action::Cancel);
        }
        assert_eq!(session.advance(1.0), FrameStatus::Running);
        assert_ne!(session.phase(), GamePhase::GameOver);
    }
    assert!(audio.0.borrow().is_empty());
    assert!(!session.is_closed());
}

#[test]
fn test_sessions_do_not_share_state() {
    let mut attract = Session::new_attract(NullHost, RecordingAudio::default(), 5);
    let mut play =
        Session::new_interactive(WalletHost::new(Economy::default()), RecordingAudio::default(), 5);

    for _ in 0..200 {
        attract.advance(1.0);
    }
    assert_eq!(play.phase(), GamePhase::Start);
    assert!(play.state().pipes.is_empty());

    play.push(Action::Primary);
    play.advance(1.0);
    attract.close();
    assert_eq!(play.advance(1.0), FrameStatus::Running);
}

#[test]
fn test_equipped_character_drives_the_run() {
    let mut economy = Economy {
        wallet: 500,
        ..Economy::default()
    };
    economy.purchase("bot").unwrap();
    economy.equip("bot").unwrap();

    let session =
        Session::new_interactive(WalletHost::new(economy), RecordingAudio::default(), 11);
    let character = &session.state().character;
    assert_eq!(character.id, CharacterId::Bot);
    assert_eq!(character.gravity, profile(CharacterId::Bot).gravity);
}

#[test]
fn test_every_phase_renders() {
    let settings = Settings::default();
    let mut session =
        Session::new_interactive(WalletHost::new(Economy::default()), RecordingAudio::default(), 13);
    session.resize(1280.0, 720.0);

    let mut seen = Vec::new();
    let script = [
        (Action::Primary, 30),
        (Action::PauseToggle, 5),
        (Action::PauseToggle, 300),
    ];
    for (action, frames) in script {
        session.push(action);
        for _ in 0..frames {
            session.advance(1.0);
            let vertices = build_scene(session.state(), &settings, 1.0);
            assert!(!vertices.is_empty());
            assert_eq!(vertices.len() % 3, 0);
            if !seen.contains(&session.phase()) {
                seen.push(session.phase());
            }
        }
    }
    assert!(seen.contains(&GamePhase::Playing));
    assert!(seen.contains(&GamePhase::Paused));
    assert!(seen.contains(&GamePhase::GameOver));
}
