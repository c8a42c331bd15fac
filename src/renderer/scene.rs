//! Scene assembly
//!
//! Turns a read-only `GameState` into one triangle list in logical
//! coordinates (height 640, width = viewport width). Draw order, back to
//! front: sky, stars, mountains, clouds, pipes, coins, snow, character,
//! particles, flash.

use glam::Vec2;

use super::canvas::Canvas;
use super::shapes;
use super::sprites::draw_character;
use super::vertex::{Vertex, colors};
use crate::consts::LOGICAL_HEIGHT;
use crate::settings::Settings;
use crate::sim::level::{Theme, tier};
use crate::sim::state::{FloatingCoin, GamePhase, GameState, Pipe};
use crate::with_alpha;

const STAR_STRIDE_X: u32 = 4321;
const STAR_STRIDE_Y: u32 = 1234;
const PIPE_CAP_HEIGHT: f32 = 20.0;
const PIPE_CAP_OVERHANG: f32 = 4.0;
const STRIPE_SPACING: f32 = 40.0;
const COIN_RADIUS: f32 = 12.0;

/// Build the frame for `state`; `time_secs` drives purely cosmetic animation
pub fn build_scene(state: &GameState, settings: &Settings, time_secs: f64) -> Vec<Vertex> {
    let width = state.viewport_width;
    let theme = &tier(state.level_index).theme;
    let mut canvas = Canvas::new();

    canvas.save();
    if settings.effective_screen_shake() && state.shake > 0.0 {
        canvas.translate(shake_offset(state.time_ticks, state.shake));
    }

    draw_background(&mut canvas, theme, width, state.player.frame, time_secs);

    for cloud in &state.clouds {
        let cw = cloud.width;
        let c = cloud.pos;
        canvas.fill_circle(Vec2::new(c.x + cw * 0.2, c.y), cw * 0.2, colors::CLOUD);
        canvas.fill_circle(Vec2::new(c.x + cw * 0.5, c.y - cw * 0.1), cw * 0.25, colors::CLOUD);
        canvas.fill_circle(Vec2::new(c.x + cw * 0.8, c.y), cw * 0.2, colors::CLOUD);
    }

    for pipe in &state.pipes {
        draw_pipe(&mut canvas, pipe, theme);
    }

    for coin in state.coins.iter().filter(|c| !c.collected) {
        draw_coin(&mut canvas, coin);
    }

    for flake in &state.snow {
        canvas.fill_circle(flake.pos, flake.size, with_alpha(colors::WHITE, flake.alpha));
    }

    let id = state.character.id;
    if state.phase == GamePhase::Start && !state.is_attract() {
        // Idle bob on the start screen
        let bob = (time_secs * 1000.0 / 300.0).sin() as f32 * 10.0;
        let pos = Vec2::new(width / 2.0 - 20.0, LOGICAL_HEIGHT / 2.0 - 60.0 + bob);
        draw_character(&mut canvas, id, pos, 0.0, (time_secs * 10.0) as f32);
    } else {
        let player = &state.player;
        draw_character(&mut canvas, id, player.pos, player.rotation, player.frame);
    }

    if settings.particles {
        for p in &state.particles {
            canvas.set_alpha(p.life);
            canvas.fill_circle(p.pos, p.size, p.color);
        }
        canvas.set_alpha(1.0);
    }

    if settings.effective_flash() && state.flash > 0.0 {
        canvas.fill_rect(0.0, 0.0, width, LOGICAL_HEIGHT, with_alpha(colors::WHITE, state.flash));
    }

    canvas.restore();
    canvas.into_vertices()
}

/// Deterministic jitter in `[-shake/2, shake/2]` per axis
pub fn shake_offset(tick: u64, shake: f32) -> Vec2 {
    let h = tick.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    let unit = |bits: u64| (bits & 0xff_ffff) as f32 / 0xff_ffff as f32 - 0.5;
    Vec2::new(unit(h >> 8), unit(h >> 32)) * shake
}

fn draw_background(canvas: &mut Canvas, theme: &Theme, width: f32, frame: f32, time_secs: f64) {
    canvas.push(shapes::rect_gradient(
        0.0,
        0.0,
        width,
        LOGICAL_HEIGHT,
        theme.sky_top,
        theme.sky_bottom,
    ));

    if theme.stars > 0 && width >= 1.0 {
        let w = width as u32;
        let h = LOGICAL_HEIGHT as u32;
        for i in 0..theme.stars {
            let x = (i * STAR_STRIDE_X + 50) % w;
            let y = (i * STAR_STRIDE_Y + 20) % h;
            let flicker = (time_secs + i as f64).sin() as f32 * 0.5 + 0.5;
            canvas.set_alpha(flicker);
            canvas.fill_rect(x as f32, y as f32, 2.0, 2.0, colors::WHITE);
        }
        canvas.set_alpha(1.0);
    }

    canvas.push(shapes::area_under(
        &mountain_ridge(width, frame),
        LOGICAL_HEIGHT,
        theme.mountains,
    ));
}

/// Ridge line sampled every 20 units, scrolling with the animation frame
pub fn mountain_ridge(width: f32, frame: f32) -> Vec<Vec2> {
    let mut points = Vec::new();
    let mut x = 0.0;
    while x <= width {
        points.push(Vec2::new(x, ridge_height(x, frame)));
        x += 20.0;
    }
    if points.last().is_some_and(|p| p.x < width) {
        points.push(Vec2::new(width, ridge_height(width, frame)));
    }
    points
}

fn ridge_height(x: f32, frame: f32) -> f32 {
    LOGICAL_HEIGHT - 40.0 - ((x + frame * 0.5) * 0.01).sin() * 20.0
}

fn draw_pipe(canvas: &mut Canvas, pipe: &Pipe, theme: &Theme) {
    draw_pipe_segment(canvas, pipe, theme, 0.0, pipe.gap_top, true);
    let bottom = pipe.gap_bottom();
    draw_pipe_segment(canvas, pipe, theme, bottom, LOGICAL_HEIGHT - bottom, false);
}

fn draw_pipe_segment(canvas: &mut Canvas, pipe: &Pipe, theme: &Theme, y: f32, h: f32, is_top: bool) {
    if h <= 0.0 {
        return;
    }
    let (x, w) = (pipe.x, pipe.width);
    canvas.fill_rect(x, y, w, h, theme.pipe);

    // Stripes run from (x - 20, i) to (x + w + 20, i + 40); sample them at the pipe edges
    let slope = STRIPE_SPACING / (w + 40.0);
    let thickness = 8.0 * (1.0 + slope * slope).sqrt();
    let mut i = y - 50.0;
    while i < y + h + 50.0 {
        canvas.push(shapes::stripe(
            x,
            w,
            i + 20.0 * slope,
            i + (w + 20.0) * slope,
            thickness,
            y,
            y + h,
            theme.pipe_stripe,
        ));
        i += STRIPE_SPACING;
    }

    let cap_y = if is_top { y + h - PIPE_CAP_HEIGHT } else { y };
    let cap_x = x - PIPE_CAP_OVERHANG;
    let cap_w = w + PIPE_CAP_OVERHANG * 2.0;
    canvas.fill_rect(cap_x, cap_y, cap_w, PIPE_CAP_HEIGHT, theme.pipe);
    canvas.stroke_rect(cap_x, cap_y, cap_w, PIPE_CAP_HEIGHT, 2.0, colors::BLACK);
    canvas.stroke_rect(x, y, w, h, 2.0, colors::BLACK);
}

fn draw_coin(canvas: &mut Canvas, coin: &FloatingCoin) {
    canvas.save();
    canvas.translate(coin.pos);
    canvas.scale(Vec2::new(coin.angle.sin().abs(), 1.0));
    canvas.fill_circle(Vec2::ZERO, COIN_RADIUS, colors::COIN);
    canvas.push(shapes::ring(
        Vec2::ZERO,
        COIN_RADIUS - 4.0,
        COIN_RADIUS - 2.0,
        colors::COIN_RIM,
        20,
    ));
    // "$" mark
    canvas.fill_rect(-1.0, -5.0, 2.0, 11.0, colors::COIN_MARK);
    canvas.fill_rect(-3.0, -3.0, 6.0, 2.0, colors::COIN_MARK);
    canvas.fill_rect(-3.0, 2.0, 6.0, 2.0, colors::COIN_MARK);
    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::default_profile;
    use crate::sim::state::Mode;

    fn state() -> GameState {
        GameState::new(default_profile().clone(), Mode::Interactive, 11)
    }

    #[test]
    fn test_scene_is_triangles() {
        let v = build_scene(&state(), &Settings::default(), 1.0);
        assert!(!v.is_empty());
        assert_eq!(v.len() % 3, 0);
    }

    #[test]
    fn test_build_scene_is_pure() {
        let s = state();
        let a = build_scene(&s, &Settings::default(), 2.5);
        let b = build_scene(&s, &Settings::default(), 2.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sky_matches_tier() {
        let mut s = state();
        s.level_index = 3;
        let v = build_scene(&s, &Settings::default(), 0.0);
        assert_eq!(v[0].color, tier(3).theme.sky_top);
    }

    #[test]
    fn test_settings_disable_effects() {
        let mut s = state();
        s.flash = 0.5;
        s.shake = 10.0;
        s.spawn_particles(Vec2::new(100.0, 100.0), 5, &[[1.0; 4]]);

        let full = build_scene(&s, &Settings::default(), 0.0);
        let calm = Settings {
            particles: false,
            reduced_motion: true,
            ..Settings::default()
        };
        let reduced = build_scene(&s, &calm, 0.0);
        assert!(reduced.len() < full.len());
        // No shake: the sky starts exactly at the origin
        assert_eq!(reduced[0].position, [0.0, 0.0]);
    }

    #[test]
    fn test_shake_offset_bounded() {
        for tick in 0..500 {
            let o = shake_offset(tick, 20.0);
            assert!(o.x.abs() <= 10.0 && o.y.abs() <= 10.0);
        }
        assert_eq!(shake_offset(3, 0.0), Vec2::ZERO);
    }

    #[test]
    fn test_mountain_ridge_covers_width() {
        let ridge = mountain_ridge(370.0, 0.0);
        assert_eq!(ridge.first().map(|p| p.x), Some(0.0));
        assert_eq!(ridge.last().map(|p| p.x), Some(370.0));
        assert!(ridge.iter().all(|p| p.y >= 580.0 && p.y <= 620.0));
    }
}
