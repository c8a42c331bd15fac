//! GPU side of the renderer
//!
//! The scene arrives as logical-space triangles; this module maps them to
//! clip space, streams them into a vertex buffer and draws them in a single
//! pass over a cleared surface.

use wgpu::util::DeviceExt;

use super::vertex::{Vertex, colors};
use crate::consts::LOGICAL_HEIGHT;

/// wgpu objects for one canvas
pub struct RenderState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_len: u32,
    /// Backing-store size in physical pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("rudolph-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        // Palette colours are already sRGB-encoded
        let format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = scene_pipeline(&device, format);
        let scene_buffer = upload(&device, &[]);

        log::info!("Surface configured: {}x{} {:?}", config.width, config.height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            scene_buffer,
            scene_len: 0,
            size: (width, height),
        })
    }

    /// Reconfigure the surface; zero sizes (minimised canvas) are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw one frame of logical-space triangles.
    ///
    /// `logical_width` is the scene width that spans the full viewport.
    pub fn render(&mut self, vertices: &[Vertex], logical_width: f32) -> Result<(), wgpu::SurfaceError> {
        let clip: Vec<Vertex> = vertices
            .iter()
            .map(|v| {
                let [x, y] = logical_to_ndc(v.position, logical_width);
                Vertex::new(x, y, v.color)
            })
            .collect();
        self.scene_buffer = upload(&self.device, &clip);
        self.scene_len = clip.len() as u32;

        let frame = self.surface.get_current_texture()?;
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene-encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, self.scene_buffer.slice(..));
            pass.draw(0..self.scene_len, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn scene_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene-shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene-layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("scene-pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            // Shapes are emitted with mixed winding
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Vertex buffer for a frame; an empty frame gets one transparent vertex
fn upload(device: &wgpu::Device, vertices: &[Vertex]) -> wgpu::Buffer {
    const EMPTY: [Vertex; 1] = [Vertex::new(0.0, 0.0, [0.0; 4])];
    let contents = if vertices.is_empty() { &EMPTY[..] } else { vertices };
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("scene-vertices"),
        contents: bytemuck::cast_slice(contents),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

/// Logical coordinates (y down, height 640) to normalized device coordinates
pub fn logical_to_ndc(position: [f32; 2], logical_width: f32) -> [f32; 2] {
    let width = logical_width.max(1.0);
    [
        position[0] / width * 2.0 - 1.0,
        1.0 - position[1] / LOGICAL_HEIGHT * 2.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_to_ndc_corners() {
        assert_eq!(logical_to_ndc([0.0, 0.0], 360.0), [-1.0, 1.0]);
        assert_eq!(logical_to_ndc([360.0, 640.0], 360.0), [1.0, -1.0]);
        assert_eq!(logical_to_ndc([180.0, 320.0], 360.0), [0.0, 0.0]);
    }

    #[test]
    fn test_wide_viewport_maps_full_width() {
        let [x, _] = logical_to_ndc([1137.0, 0.0], 1137.0);
        assert_eq!(x, 1.0);
        // Degenerate widths never divide by zero
        assert!(logical_to_ndc([0.0, 0.0], 0.0)[0].is_finite());
    }
}
