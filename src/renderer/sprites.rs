//! Character sprites
//!
//! Each sprite draws itself in a 34x28 local box (the player's collision
//! size) with the origin at the top-left; `draw_character` places, tilts and
//! animates it.

use std::f32::consts::{FRAC_PI_4, PI};

use glam::Vec2;

use super::canvas::Canvas;
use super::shapes;
use crate::character::CharacterId;
use crate::{Rgba, rgb_hex};

const HALF_SIZE: Vec2 = Vec2::new(17.0, 14.0);

/// Procedural drawing for one playable character
pub trait CharacterSprite {
    /// Draw in local sprite space; `frame` is the animation clock in nominal frames
    fn draw(&self, canvas: &mut Canvas, frame: f32);
}

pub struct RudolphSprite;
pub struct BotSprite;
pub struct GliderSprite;
pub struct UfoSprite;

impl CharacterSprite for RudolphSprite {
    fn draw(&self, canvas: &mut Canvas, frame: f32) {
        const BODY: Rgba = rgb_hex(0x8d6e63);
        const HEAD: Rgba = rgb_hex(0xa1887f);
        const ANTLER: Rgba = rgb_hex(0x5d4037);
        const NOSE: Rgba = rgb_hex(0xff0000);
        const WHITE: Rgba = rgb_hex(0xffffff);
        const BLACK: Rgba = rgb_hex(0x000000);

        canvas.fill_rect(4.0, 10.0, 24.0, 14.0, BODY);
        canvas.fill_rect(20.0, 6.0, 14.0, 14.0, HEAD);
        canvas.fill_rect(22.0, 0.0, 2.0, 8.0, ANTLER);
        canvas.fill_rect(28.0, 2.0, 2.0, 6.0, ANTLER);
        canvas.fill_rect(20.0, 3.0, 6.0, 2.0, ANTLER);
        canvas.fill_rect(26.0, 8.0, 4.0, 4.0, WHITE);
        canvas.fill_rect(28.0, 9.0, 2.0, 2.0, BLACK);

        // Pulsing glow behind the nose
        let glow = (frame * 0.1).sin().abs() * 5.0;
        let nose = Vec2::new(34.0, 13.0);
        canvas.fill_circle(nose, 4.0 + (10.0 + glow) * 0.4, [1.0, 0.0, 0.0, 0.25]);
        canvas.fill_circle(nose, 4.0, NOSE);

        let wing_y = if (frame.floor() as i64 / 6) % 2 == 0 {
            12.0
        } else {
            16.0
        };
        canvas.fill_ellipse(Vec2::new(12.0, wing_y), Vec2::new(8.0, 4.0), FRAC_PI_4, WHITE);
    }
}

impl CharacterSprite for BotSprite {
    fn draw(&self, canvas: &mut Canvas, frame: f32) {
        const BODY: Rgba = rgb_hex(0x94a3b8);
        const HEAD: Rgba = rgb_hex(0x64748b);
        const RED: Rgba = rgb_hex(0xef4444);
        const AMBER: Rgba = rgb_hex(0xf59e0b);
        const ANTENNA: Rgba = rgb_hex(0xcbd5e1);
        const BLACK: Rgba = rgb_hex(0x000000);

        let anim = frame.floor() as i64;

        canvas.fill_rect(4.0, 10.0, 24.0, 14.0, BODY);
        canvas.fill_rect(20.0, 6.0, 14.0, 14.0, HEAD);
        canvas.fill_rect(24.0, 9.0, 10.0, 4.0, RED);

        // Thruster flame
        let flame = if anim % 4 < 2 { AMBER } else { RED };
        canvas.fill_triangle(
            Vec2::new(4.0, 15.0),
            Vec2::new(-5.0, 12.0),
            Vec2::new(-5.0, 18.0),
            flame,
        );

        canvas.line(Vec2::new(25.0, 6.0), Vec2::new(25.0, 0.0), 1.0, ANTENNA);
        let beacon = if anim % 10 < 5 { RED } else { BLACK };
        canvas.fill_rect(24.0, 0.0, 3.0, 3.0, beacon);
    }
}

impl CharacterSprite for GliderSprite {
    fn draw(&self, canvas: &mut Canvas, frame: f32) {
        const GOLD_LIGHT: Rgba = rgb_hex(0xfcd34d);
        const GOLD_DARK: Rgba = rgb_hex(0xd97706);
        const WING: Rgba = rgb_hex(0xfffbeb);

        // Diagonal gold gradient from the top-left to the bottom-right corner
        let diagonal = Vec2::new(34.0, 28.0);
        let shade = |p: Vec2| {
            let t = (p.dot(diagonal) / diagonal.length_squared()).clamp(0.0, 1.0);
            lerp_color(GOLD_LIGHT, GOLD_DARK, t)
        };
        canvas.push(shapes::ellipse_with(
            HALF_SIZE,
            Vec2::new(16.0, 10.0),
            0.0,
            24,
            shade,
        ));

        let anim = frame.floor() as i64;
        let wing_y = if (anim / 10) % 2 == 0 { 10.0 } else { 20.0 };
        canvas.fill_triangle(
            Vec2::new(10.0, 14.0),
            Vec2::new(25.0, wing_y),
            Vec2::new(25.0, 14.0),
            WING,
        );

        if anim % 20 < 5 {
            let (x, y) = sparkle_position(anim);
            canvas.fill_rect(x, y, 2.0, 2.0, [1.0; 4]);
        }
    }
}

impl CharacterSprite for UfoSprite {
    fn draw(&self, canvas: &mut Canvas, frame: f32) {
        const DOME: Rgba = rgb_hex(0x10b981);
        const SAUCER: Rgba = rgb_hex(0x6b7280);
        const LIGHT_ON: Rgba = rgb_hex(0xf472b6);
        const LIGHT: Rgba = rgb_hex(0xec4899);

        canvas.push(shapes::dome(Vec2::new(17.0, 10.0), 8.0, DOME, 12));
        canvas.fill_ellipse(Vec2::new(17.0, 16.0), Vec2::new(16.0, 6.0), 0.0, SAUCER);

        let light = if frame.floor() as i64 % 4 == 0 {
            LIGHT_ON
        } else {
            LIGHT
        };
        canvas.fill_circle(Vec2::new(17.0 + (frame * 0.5).sin() * 12.0, 16.0), 2.0, light);
    }
}

fn lerp_color(a: Rgba, b: Rgba, t: f32) -> Rgba {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Cheap hash so the sparkle jumps around without touching any RNG
fn sparkle_position(anim: i64) -> (f32, f32) {
    let h = (anim as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    let x = (h >> 40) as f32 / (1u64 << 24) as f32;
    let y = ((h >> 16) & 0xff_ffff) as f32 / (1u64 << 24) as f32;
    (x * 30.0, y * 20.0)
}

/// Sprite for a character id
pub fn sprite_for(id: CharacterId) -> &'static dyn CharacterSprite {
    match id {
        CharacterId::Rudolph => &RudolphSprite,
        CharacterId::Bot => &BotSprite,
        CharacterId::Glider => &GliderSprite,
        CharacterId::Ufo => &UfoSprite,
    }
}

/// Draw a character with its top-left at `pos`, tilted `rotation_deg` about its centre
pub fn draw_character(canvas: &mut Canvas, id: CharacterId, pos: Vec2, rotation_deg: f32, frame: f32) {
    canvas.save();
    canvas.translate(pos + HALF_SIZE);
    canvas.rotate(rotation_deg * PI / 180.0);
    canvas.translate(-HALF_SIZE);
    sprite_for(id).draw(canvas, frame);
    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CHARACTERS;

    #[test]
    fn test_every_character_draws_something() {
        for c in &CHARACTERS {
            let mut canvas = Canvas::new();
            draw_character(&mut canvas, c.id, Vec2::new(60.0, 240.0), 0.0, 3.0);
            assert!(!canvas.is_empty(), "{} drew nothing", c.name);
            assert_eq!(canvas.len() % 3, 0);
        }
    }

    #[test]
    fn test_sprite_stays_near_player_box() {
        for c in &CHARACTERS {
            for rot in [-45.0, 0.0, 45.0] {
                let mut canvas = Canvas::new();
                draw_character(&mut canvas, c.id, Vec2::new(100.0, 100.0), rot, 7.0);
                for v in canvas.into_vertices() {
                    // Box diagonal plus the nose glow and thruster overhang
                    let d = Vec2::from(v.position).distance(Vec2::new(117.0, 114.0));
                    assert!(d < 40.0, "{} vertex {:?} too far", c.name, v.position);
                }
            }
        }
    }

    #[test]
    fn test_sparkle_inside_sprite() {
        for anim in 0..200 {
            let (x, y) = sparkle_position(anim);
            assert!((0.0..30.0).contains(&x));
            assert!((0.0..20.0).contains(&y));
        }
    }
}
