//! Immediate-mode drawing surface
//!
//! Collects triangles in logical coordinates with a save/restore transform
//! stack and a global alpha, so sprites can be drawn in their own local
//! space and then placed, rotated and scaled.

use glam::{Affine2, Vec2};

use super::shapes;
use super::vertex::Vertex;
use crate::Rgba;

pub struct Canvas {
    vertices: Vec<Vertex>,
    transform: Affine2,
    alpha: f32,
    stack: Vec<(Affine2, f32)>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(4096),
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            stack: Vec::new(),
        }
    }

    pub fn save(&mut self) {
        self.stack.push((self.transform, self.alpha));
    }

    /// Pop the last saved state; unbalanced calls reset to identity
    pub fn restore(&mut self) {
        let (transform, alpha) = self.stack.pop().unwrap_or((Affine2::IDENTITY, 1.0));
        self.transform = transform;
        self.alpha = alpha;
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.transform = self.transform * Affine2::from_translation(offset);
    }

    /// Rotate by `radians` (clockwise on screen, y is down)
    pub fn rotate(&mut self, radians: f32) {
        self.transform = self.transform * Affine2::from_angle(radians);
    }

    pub fn scale(&mut self, factor: Vec2) {
        self.transform = self.transform * Affine2::from_scale(factor);
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Add local-space triangles
    pub fn push(&mut self, vertices: Vec<Vertex>) {
        let transform = self.transform;
        let alpha = self.alpha;
        self.vertices.extend(vertices.into_iter().map(|v| {
            let p = transform.transform_point2(Vec2::from(v.position));
            let mut color = v.color;
            color[3] *= alpha;
            Vertex::new(p.x, p.y, color)
        }));
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.push(shapes::rect(x, y, w, h, color));
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, width: f32, color: Rgba) {
        self.push(shapes::rect_outline(x, y, w, h, width, color));
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        // Small circles don't need many segments
        let segments = (radius * 2.0).clamp(8.0, 32.0) as u32;
        self.push(shapes::circle(center, radius, color, segments));
    }

    pub fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Rgba) {
        self.push(shapes::ellipse(center, radii, rotation, color, 24));
    }

    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Rgba) {
        self.push(shapes::triangle(a, b, c, color));
    }

    pub fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgba) {
        self.push(shapes::line(a, b, width, color));
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = [1.0; 4];

    fn approx(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn test_translate_then_rotate_about_sprite_center() {
        let mut canvas = Canvas::new();
        canvas.save();
        canvas.translate(Vec2::new(60.0 + 17.0, 240.0 + 14.0));
        canvas.rotate(std::f32::consts::FRAC_PI_2);
        canvas.translate(Vec2::new(-17.0, -14.0));
        canvas.fill_rect(17.0, 14.0, 10.0, 0.0, WHITE);
        canvas.restore();

        let v = canvas.into_vertices();
        // Sprite centre stays put, +x maps onto +y
        assert!(approx(v[0].position, [77.0, 254.0]));
        assert!(approx(v[1].position, [77.0, 264.0]));
    }

    #[test]
    fn test_restore_resets_transform_and_alpha() {
        let mut canvas = Canvas::new();
        canvas.save();
        canvas.translate(Vec2::new(100.0, 0.0));
        canvas.set_alpha(0.5);
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, WHITE);
        canvas.restore();
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, WHITE);

        let v = canvas.into_vertices();
        assert_eq!(v[0].position, [100.0, 0.0]);
        assert_eq!(v[0].color[3], 0.5);
        assert_eq!(v[6].position, [0.0, 0.0]);
        assert_eq!(v[6].color[3], 1.0);
    }

    #[test]
    fn test_scale_squashes_x() {
        let mut canvas = Canvas::new();
        canvas.scale(Vec2::new(0.0, 1.0));
        canvas.fill_circle(Vec2::ZERO, 12.0, WHITE);
        assert!(canvas.into_vertices().iter().all(|v| v.position[0] == 0.0));
    }

    #[test]
    fn test_unbalanced_restore() {
        let mut canvas = Canvas::new();
        canvas.translate(Vec2::new(5.0, 5.0));
        canvas.restore();
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, WHITE);
        assert_eq!(canvas.len(), 6);
        assert_eq!(canvas.into_vertices()[0].position, [0.0, 0.0]);
    }
}
