//! Collision detection
//!
//! Everything here is axis-aligned: the player hit-box is a rectangle shrunk
//! by a forgiving inset, each pipe is two solid rectangles around its gap,
//! and coins are picked up by a plain distance check.

use glam::Vec2;

use super::state::{Pipe, Player};

/// Axis-aligned rectangle stored as edges (y grows downward).
///
/// Edges may be infinite, which lets pipe columns extend past the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + w,
            bottom: y + h,
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// Shrink by `inset` on every side
    pub fn inset(&self, inset: f32) -> Rect {
        Rect {
            left: self.left + inset,
            top: self.top + inset,
            right: self.right - inset,
            bottom: self.bottom - inset,
        }
    }
}

/// The player's collision box
pub fn player_hitbox(player: &Player, inset: f32) -> Rect {
    Rect::new(player.pos.x, player.pos.y, player.size.x, player.size.y).inset(inset)
}

/// The solid top and bottom parts of a pipe
pub fn pipe_rects(pipe: &Pipe) -> (Rect, Rect) {
    let top = Rect {
        left: pipe.x,
        top: f32::NEG_INFINITY,
        right: pipe.right(),
        bottom: pipe.gap_top,
    };
    let bottom = Rect {
        left: pipe.x,
        top: pipe.gap_bottom(),
        right: pipe.right(),
        bottom: f32::INFINITY,
    };
    (top, bottom)
}

/// True if the inset player box touches either solid part of `pipe`
pub fn pipe_collision(player: &Player, pipe: &Pipe, inset: f32) -> bool {
    let hitbox = player_hitbox(player, inset);
    let (top, bottom) = pipe_rects(pipe);
    hitbox.overlaps(&top) || hitbox.overlaps(&bottom)
}

/// True if a coin at `coin` is within `radius` of the player centre
pub fn coin_in_reach(player_center: Vec2, coin: Vec2, radius: f32) -> bool {
    player_center.distance(coin) < radius
}

/// Floor/ceiling check
pub fn out_of_bounds(player: &Player, floor_y: f32, ceiling_margin: f32) -> bool {
    player.pos.y + player.size.y >= floor_y || player.pos.y < ceiling_margin
}

/// The pipe's trailing edge is behind the player's leading (left) edge
pub fn has_passed(pipe: &Pipe, player: &Player) -> bool {
    pipe.right() < player.pos.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn player_at(x: f32, y: f32) -> Player {
        let mut p = Player::new(&Tuning::default());
        p.pos = Vec2::new(x, y);
        p
    }

    fn pipe(x: f32, gap_top: f32, gap_height: f32) -> Pipe {
        Pipe {
            x,
            gap_top,
            gap_height,
            width: 52.0,
            passed: false,
        }
    }

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_gap_matching_player_height_centered_is_safe() {
        // Gap exactly as tall as the player's outer box
        let player = player_at(60.0, 200.0);
        let p = pipe(50.0, 200.0, player.size.y);
        assert!(!pipe_collision(&player, &p, 6.0));
    }

    #[test]
    fn test_offset_within_inset_is_forgiven() {
        let p = pipe(50.0, 200.0, 28.0);
        assert!(!pipe_collision(&player_at(60.0, 205.0), &p, 6.0));
        assert!(!pipe_collision(&player_at(60.0, 194.0), &p, 6.0));
    }

    #[test]
    fn test_offset_beyond_inset_collides() {
        let p = pipe(50.0, 200.0, 28.0);
        // Down into the bottom pipe
        assert!(pipe_collision(&player_at(60.0, 206.5), &p, 6.0));
        // Up into the top pipe
        assert!(pipe_collision(&player_at(60.0, 193.5), &p, 6.0));
    }

    #[test]
    fn test_without_inset_any_offset_collides() {
        let p = pipe(50.0, 200.0, 28.0);
        assert!(!pipe_collision(&player_at(60.0, 200.0), &p, 0.0));
        assert!(pipe_collision(&player_at(60.0, 200.5), &p, 0.0));
    }

    #[test]
    fn test_horizontal_miss() {
        let p = pipe(200.0, 0.0, 10.0);
        assert!(!pipe_collision(&player_at(60.0, 300.0), &p, 6.0));
        // Hit-box right edge is x + 34 - 6; touching the pipe's left edge is not a hit
        let p = pipe(88.0, 0.0, 10.0);
        assert!(!pipe_collision(&player_at(60.0, 300.0), &p, 6.0));
        let p = pipe(87.0, 0.0, 10.0);
        assert!(pipe_collision(&player_at(60.0, 300.0), &p, 6.0));
    }

    #[test]
    fn test_tall_pipe_catches_player_above_screen() {
        let p = pipe(50.0, 100.0, 150.0);
        assert!(pipe_collision(&player_at(60.0, -40.0), &p, 6.0));
    }

    #[test]
    fn test_coin_pickup_radius() {
        let center = Vec2::new(105.0, 103.0);
        let coin = Vec2::new(100.0, 100.0);
        assert!((center.distance(coin) - 5.830_952).abs() < 1e-4);
        assert!(coin_in_reach(center, coin, 30.0));
        assert!(!coin_in_reach(Vec2::new(130.0, 100.0), coin, 30.0));
    }

    #[test]
    fn test_bounds() {
        let t = Tuning::default();
        assert!(!out_of_bounds(&player_at(60.0, 240.0), t.floor_y(), t.ceiling_margin));
        assert!(out_of_bounds(&player_at(60.0, 602.0), t.floor_y(), t.ceiling_margin));
        assert!(!out_of_bounds(&player_at(60.0, -50.0), t.floor_y(), t.ceiling_margin));
        assert!(out_of_bounds(&player_at(60.0, -50.5), t.floor_y(), t.ceiling_margin));
    }

    #[test]
    fn test_has_passed() {
        let player = player_at(60.0, 240.0);
        assert!(!has_passed(&pipe(8.0, 0.0, 10.0), &player));
        assert!(has_passed(&pipe(7.9, 0.0, 10.0), &player));
    }
}
