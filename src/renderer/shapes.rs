//! Shape generation for 2D primitives
//!
//! Every function returns a triangle list in the caller's local space; the
//! canvas applies its transform afterwards.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;
use crate::Rgba;

fn quad(out: &mut Vec<Vertex>, corners: [(Vec2, Rgba); 4]) {
    let [a, b, c, d] = corners;
    for (p, color) in [a, b, c, c, d, a] {
        out.push(Vertex::new(p.x, p.y, color));
    }
}

/// Axis-aligned filled rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: Rgba) -> Vec<Vertex> {
    rect_gradient(x, y, w, h, color, color)
}

/// Rectangle shaded from `top` to `bottom`
pub fn rect_gradient(x: f32, y: f32, w: f32, h: f32, top: Rgba, bottom: Rgba) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        [
            (Vec2::new(x, y), top),
            (Vec2::new(x + w, y), top),
            (Vec2::new(x + w, y + h), bottom),
            (Vec2::new(x, y + h), bottom),
        ],
    );
    vertices
}

/// Rectangle outline of thickness `width`, centred on the edges
pub fn rect_outline(x: f32, y: f32, w: f32, h: f32, width: f32, color: Rgba) -> Vec<Vertex> {
    let half = width / 2.0;
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(x - half, y - half, w + width, width, color));
    vertices.extend(rect(x - half, y + h - half, w + width, width, color));
    vertices.extend(rect(x - half, y + half, width, h - width, color));
    vertices.extend(rect(x + w - half, y + half, width, h - width, color));
    vertices
}

/// Filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: Rgba) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Thick line segment
pub fn line(a: Vec2, b: Vec2, width: f32, color: Rgba) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        [
            (a + perp, color),
            (b + perp, color),
            (b - perp, color),
            (a - perp, color),
        ],
    );
    vertices
}

/// Rotated ellipse with per-vertex shading
pub fn ellipse_with(
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    segments: u32,
    shade: impl Fn(Vec2) -> Rgba,
) -> Vec<Vertex> {
    let (sin, cos) = rotation.sin_cos();
    let point = |theta: f32| {
        let local = Vec2::new(radii.x * theta.cos(), radii.y * theta.sin());
        center + Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
    };

    let center_color = shade(center);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let p1 = point(i as f32 / segments as f32 * TAU);
        let p2 = point((i + 1) as f32 / segments as f32 * TAU);

        vertices.push(Vertex::new(center.x, center.y, center_color));
        vertices.push(Vertex::new(p1.x, p1.y, shade(p1)));
        vertices.push(Vertex::new(p2.x, p2.y, shade(p2)));
    }
    vertices
}

pub fn ellipse(center: Vec2, radii: Vec2, rotation: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    ellipse_with(center, radii, rotation, segments, |_| color)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), 0.0, color, segments)
}

/// Pie slice from `start` to `end` (radians, y down)
pub fn sector(center: Vec2, radius: f32, start: f32, end: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let span = end - start;
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let theta1 = start + i as f32 / segments as f32 * span;
        let theta2 = start + (i + 1) as f32 / segments as f32 * span;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
    vertices
}

/// Upper half-disc (dome)
pub fn dome(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    sector(center, radius, PI, TAU, color, segments)
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Rgba,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        quad(
            &mut vertices,
            [
                (center + dir1 * inner_radius, color),
                (center + dir1 * outer_radius, color),
                (center + dir2 * outer_radius, color),
                (center + dir2 * inner_radius, color),
            ],
        );
    }

    vertices
}

/// Fill the region between a polyline and the horizontal line `y = baseline`
pub fn area_under(points: &[Vec2], baseline: f32, color: Rgba) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len().saturating_sub(1) * 6);
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        quad(
            &mut vertices,
            [
                (a, color),
                (b, color),
                (Vec2::new(b.x, baseline), color),
                (Vec2::new(a.x, baseline), color),
            ],
        );
    }
    vertices
}

/// Diagonal band across a vertical strip `[x, x + w]`, clamped to `[top, bottom]`.
///
/// `y_left`/`y_right` are the band's centre line at the strip's edges.
#[allow(clippy::too_many_arguments)]
pub fn stripe(
    x: f32,
    w: f32,
    y_left: f32,
    y_right: f32,
    thickness: f32,
    top: f32,
    bottom: f32,
    color: Rgba,
) -> Vec<Vertex> {
    let half = thickness / 2.0;
    let clamp = |y: f32| y.clamp(top, bottom);
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        [
            (Vec2::new(x, clamp(y_left - half)), color),
            (Vec2::new(x + w, clamp(y_right - half)), color),
            (Vec2::new(x + w, clamp(y_right + half)), color),
            (Vec2::new(x, clamp(y_left + half)), color),
        ],
    );
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_triangle_counts() {
        assert_eq!(rect(0.0, 0.0, 1.0, 1.0, RED).len(), 6);
        assert_eq!(rect_outline(0.0, 0.0, 10.0, 10.0, 2.0, RED).len(), 24);
        assert_eq!(circle(Vec2::ZERO, 5.0, RED, 12).len(), 36);
        assert_eq!(ring(Vec2::ZERO, 3.0, 5.0, RED, 8).len(), 48);
        let pts = [Vec2::new(0.0, 1.0), Vec2::new(1.0, 2.0), Vec2::new(2.0, 1.0)];
        assert_eq!(area_under(&pts, 10.0, RED).len(), 12);
        assert!(area_under(&pts[..1], 10.0, RED).is_empty());
    }

    #[test]
    fn test_gradient_colors() {
        let blue = [0.0, 0.0, 1.0, 1.0];
        let v = rect_gradient(0.0, 0.0, 10.0, 20.0, RED, blue);
        assert!(v.iter().filter(|v| v.position[1] == 0.0).all(|v| v.color == RED));
        assert!(v.iter().filter(|v| v.position[1] == 20.0).all(|v| v.color == blue));
    }

    #[test]
    fn test_dome_stays_above_center() {
        for v in dome(Vec2::new(17.0, 10.0), 8.0, RED, 8) {
            assert!(v.position[1] <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_stripe_clamped() {
        for v in stripe(0.0, 52.0, -20.0, 30.0, 8.0, 0.0, 100.0, RED) {
            assert!((0.0..=100.0).contains(&v.position[1]));
        }
    }
}
