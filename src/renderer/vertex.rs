//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::Rgba;

/// 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Rgba,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Rgba) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements that do not change with the tier
pub mod colors {
    use crate::{Rgba, rgb_hex};

    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
    pub const CLOUD: Rgba = [1.0, 1.0, 1.0, 0.8];
    pub const COIN: Rgba = rgb_hex(0xfbbf24);
    pub const COIN_RIM: Rgba = rgb_hex(0xd97706);
    pub const COIN_MARK: Rgba = rgb_hex(0x92400e);
    pub const BACKGROUND: Rgba = [0.0, 0.0, 0.0, 1.0];
}
