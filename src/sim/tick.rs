//! Per-frame simulation tick
//!
//! Core game loop: apply queued input, advance ambient effects, then (while
//! playing) integrate the player, spawn, collide, score and clean up.

use glam::Vec2;
use rand::Rng;

use super::autopilot::{self, Steer};
use super::collision::{coin_in_reach, has_passed, out_of_bounds, pipe_collision};
use super::level::{LEVELS, resolve_tier, smooth_speed, tier};
use super::spawn::{should_spawn, spawn_pipe, spawn_spacing};
use super::state::{CrashCause, GameEvent, GamePhase, GameState, LevelBanner};
use crate::consts::{LOGICAL_HEIGHT, MAX_DELTA_TIME};
use crate::{Rgba, rgb_hex};

/// Discrete input actions, in the order the player produced them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Jump / confirm / retry
    Primary,
    PauseToggle,
    /// Leave the game (handled by the session, ignored by the tick)
    Cancel,
}

const JUMP_PUFF: [Rgba; 2] = [rgb_hex(0xffffff), rgb_hex(0xeeeeee)];
const COIN_SPARKLE: [Rgba; 2] = [rgb_hex(0xfbbf24), rgb_hex(0xffffff)];
const FLOOR_DEBRIS: [Rgba; 2] = [rgb_hex(0x8d6e63), rgb_hex(0xff0000)];
const PIPE_DEBRIS: [Rgba; 3] = [rgb_hex(0xffffff), rgb_hex(0xff0000), rgb_hex(0x00ff00)];

/// Advance the game state by one frame of `dt` nominal frames
pub fn tick(state: &mut GameState, actions: &[Action], dt: f32) {
    let dt = dt.clamp(0.0, MAX_DELTA_TIME);

    if !state.is_attract() {
        for &action in actions {
            apply_action(state, action);
        }
    }

    state.time_ticks += 1;

    let idle_dt = dt * state.tuning.idle_ambient_rate;
    if state.phase == GamePhase::Paused {
        update_ambient(state, idle_dt, idle_dt, false);
        return;
    }

    decay_effects(state, dt);

    // Clouds slow down off the playfield; snow only slows while paused
    let playing = state.phase == GamePhase::Playing;
    let cloud_dt = if playing { dt } else { idle_dt };
    update_ambient(state, cloud_dt, dt, playing);

    if playing {
        step_playing(state, dt);
    }

    update_particles(state, dt);
}

/// Apply one input action to the lifecycle state machine
pub fn apply_action(state: &mut GameState, action: Action) {
    match (action, state.phase) {
        (Action::Primary, GamePhase::Playing) => jump(state),
        (Action::Primary, GamePhase::Start | GamePhase::GameOver) => start_run(state),
        (Action::Primary, GamePhase::Paused) | (Action::PauseToggle, GamePhase::Paused) => {
            state.phase = GamePhase::Playing;
            state.events.push(GameEvent::Resumed);
        }
        (Action::PauseToggle, GamePhase::Playing) => {
            state.phase = GamePhase::Paused;
            state.events.push(GameEvent::Paused);
        }
        // Pause outside play and cancel are not the simulation's business
        (Action::PauseToggle, _) | (Action::Cancel, _) => {}
    }
}

/// Begin a fresh run
fn start_run(state: &mut GameState) {
    state.reset_run();
    state.phase = GamePhase::Playing;
    state.events.push(GameEvent::Started);
    log::info!("Run started as {}", state.character.name);
}

/// Flap
fn jump(state: &mut GameState) {
    let strength = state.character.jump_strength;
    state.player.jump(strength, state.tuning.jump_rotation);
    let origin = state.player.pos + Vec2::new(0.0, 20.0);
    state.spawn_particles(origin, 5, &JUMP_PUFF);
    state.events.push(GameEvent::Jumped);
}

/// End the run (interactive) or silently restart it (attract)
fn crash(state: &mut GameState, cause: CrashCause) {
    if state.is_attract() {
        log::debug!("Attract run reset after {:?} at distance {}", cause, state.distance_score);
        state.reset_run();
        state.events.push(GameEvent::Reset);
        return;
    }

    let origin = state.player.pos;
    match cause {
        CrashCause::Bounds => {
            state.shake = state.tuning.floor_crash_shake;
            state.spawn_particles(origin, 20, &FLOOR_DEBRIS);
        }
        CrashCause::Pipe => {
            state.shake = state.tuning.pipe_crash_shake;
            state.spawn_particles(origin, 15, &PIPE_DEBRIS);
        }
    }
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::Crashed {
        cause,
        coins: state.coins_collected,
    });
    log::info!(
        "Game over ({:?}): distance {}, coins {}",
        cause,
        state.distance_score,
        state.coins_collected
    );
}

fn decay_effects(state: &mut GameState, dt: f32) {
    if state.shake > 0.0 {
        state.shake *= 0.9f32.powf(dt);
    }
    if state.shake < 0.5 {
        state.shake = 0.0;
    }

    if state.flash > 0.0 {
        state.flash = (state.flash - state.tuning.flash_decay * dt).max(0.0);
    }

    if let Some(banner) = &mut state.level_banner {
        banner.remaining -= dt;
        if banner.remaining <= 0.0 {
            state.level_banner = None;
        }
    }
}

/// Clouds and snow: purely cosmetic, keep moving outside of play
fn update_ambient(state: &mut GameState, cloud_dt: f32, snow_dt: f32, playing: bool) {
    let width = state.viewport_width;
    let world_speed = state.speed;
    let rng = &mut state.rng;

    for cloud in &mut state.clouds {
        let drift = if playing {
            cloud.speed + world_speed * 0.05
        } else {
            cloud.speed
        };
        cloud.pos.x -= drift * cloud_dt;
        if cloud.pos.x + 100.0 < 0.0 {
            cloud.pos.x = width + 50.0;
            cloud.pos.y = rng.random::<f32>() * 200.0 + 30.0;
        }
    }

    for flake in &mut state.snow {
        flake.pos.y += flake.speed * snow_dt;
        flake.pos.x -= world_speed * 0.2 * snow_dt;
        if flake.pos.y > LOGICAL_HEIGHT {
            flake.pos.y = -10.0;
            flake.pos.x = rng.random::<f32>() * width;
        }
        if flake.pos.x < 0.0 {
            flake.pos.x = width;
        }
    }
}

fn update_particles(state: &mut GameState, dt: f32) {
    let decay = state.tuning.particle_decay;
    for p in &mut state.particles {
        p.pos += p.vel * dt;
        p.life -= decay * dt;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Re-derive the tier from the score and fire the level-up side effects once
fn update_level(state: &mut GameState) {
    let index = resolve_tier(&LEVELS, state.distance_score);
    if index == state.level_index {
        return;
    }

    state.level_index = index;
    let reached = tier(index);
    state.events.push(GameEvent::LevelUp { tier: index });

    if !state.is_attract() {
        state.flash = state.tuning.level_up_flash;
        state.level_banner = Some(LevelBanner {
            name: reached.name,
            remaining: state.tuning.level_banner_frames,
        });
        log::info!("Level up: {} (x{:.1})", reached.name, reached.speed_multiplier);
    }
}

fn step_playing(state: &mut GameState, dt: f32) {
    state.player.frame += dt;

    if state.is_attract() {
        match autopilot::decide(state) {
            Steer::Jump => jump(state),
            Steer::Drop => state.player.velocity = state.tuning.autopilot_drop_velocity,
            Steer::Hold => {}
        }
    }

    update_level(state);
    let multiplier = tier(state.level_index).speed_multiplier;
    let target_speed = state.tuning.base_speed * multiplier;
    state.speed = smooth_speed(state.speed, target_speed, state.tuning.speed_smoothing, dt);

    state.player.integrate(
        state.character.gravity,
        state.tuning.rotation_per_velocity,
        dt,
    );

    if out_of_bounds(
        &state.player,
        state.tuning.floor_y(),
        state.tuning.ceiling_margin,
    ) {
        crash(state, CrashCause::Bounds);
        return;
    }

    let spacing = spawn_spacing(state.tuning.base_spacing, multiplier);
    if should_spawn(state.last_spawn_x(), state.viewport_width, spacing) {
        spawn_pipe(state);
    }

    update_coins(state, dt);

    if update_pipes(state, dt) {
        crash(state, CrashCause::Pipe);
        return;
    }

    // Pipes scroll left in spawn order, so expired ones are always at the front
    while state.pipes.front().is_some_and(|p| p.x < -p.width) {
        state.pipes.pop_front();
    }
}

fn update_coins(state: &mut GameState, dt: f32) {
    let center = state.player.center();
    let radius = state.tuning.coin_pickup_radius;
    let spin = state.tuning.coin_spin;
    let mut pickups = Vec::new();

    for coin in &mut state.coins {
        coin.pos.x -= state.speed * dt;
        coin.angle += spin * dt;

        if !coin.collected && coin_in_reach(center, coin.pos, radius) {
            coin.collected = true;
            state.coins_collected += 1;
            state.events.push(GameEvent::CoinCollected {
                coins: state.coins_collected,
            });
            pickups.push(coin.pos);
        }
    }

    let despawn_x = state.tuning.coin_despawn_x;
    state.coins.retain(|c| c.pos.x > despawn_x && !c.collected);

    for pos in pickups {
        state.spawn_particles(pos, 8, &COIN_SPARKLE);
    }
}

/// Scroll pipes, score passes; returns true on a pipe hit
fn update_pipes(state: &mut GameState, dt: f32) -> bool {
    let inset = state.tuning.hitbox_inset;
    let interactive = !state.is_attract();
    let mut hit = false;

    if let Some(x) = &mut state.spawn_marker {
        *x -= state.speed * dt;
    }

    for pipe in &mut state.pipes {
        pipe.x -= state.speed * dt;

        if pipe_collision(&state.player, pipe, inset) {
            hit = true;
        }

        if !pipe.passed && has_passed(pipe, &state.player) {
            pipe.passed = true;
            state.distance_score += 1;
            state.coins_collected += 1;
            state.events.push(GameEvent::Scored {
                distance: state.distance_score,
            });
            if interactive {
                state.flash = state.tuning.pass_flash;
            }
        }
    }

    hit
}
