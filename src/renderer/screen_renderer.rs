//! GPU side of the pixel layer.
//!
//! The 160x100 [`SemigraphicScreen`] is uploaded every frame into a texture
//! that is stretched over the whole surface with nearest filtering, so every
//! screen pixel becomes a crisp block.

use super::pipeline_builder::{
    BindGroupLayoutBuilder, PipelineBuilder, create_fullscreen_vertices, create_uniform_buffer,
    create_vertex_2d_layout,
};
use super::screen::SemigraphicScreen;
use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Foreground and background colours of the monochrome display.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenColors {
    pub foreground: [f32; 4],
    pub background: [f32; 4],
}

impl ScreenColors {
    pub const CYAN_ON_BLACK: Self = Self {
        foreground: [0.0, 1.0, 1.0, 1.0],
        background: [0.0, 0.0, 0.0, 1.0],
    };
}

impl Default for ScreenColors {
    fn default() -> Self {
        Self::CYAN_ON_BLACK
    }
}

pub struct ScreenRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl ScreenRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Screen Texture"),
            size: Self::extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Screen Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let colors_buffer =
            create_uniform_buffer(device, &ScreenColors::default(), "Screen Colors Buffer");

        let bind_group_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Screen Bind Group Layout")
            .with_texture(0, wgpu::ShaderStages::FRAGMENT)
            .with_sampler(1, wgpu::ShaderStages::FRAGMENT)
            .with_uniform_buffer(2, wgpu::ShaderStages::FRAGMENT)
            .build();

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Screen Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: colors_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline = PipelineBuilder::new(
            device,
            surface_format,
            include_str!("shaders/screen.wgsl"),
        )
        .with_label("Screen Pipeline")
        .with_vertex_buffer(create_vertex_2d_layout())
        .with_bind_group_layout(&bind_group_layout)
        .build();

        Self {
            pipeline,
            vertex_buffer: create_fullscreen_vertices(device),
            texture,
            bind_group,
        }
    }

    fn extent() -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: SCREEN_WIDTH as u32,
            height: SCREEN_HEIGHT as u32,
            depth_or_array_layers: 1,
        }
    }

    /// Copies the current pixel layer into the texture.
    pub fn upload(&self, queue: &wgpu::Queue, screen: &SemigraphicScreen) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &screen.to_rgba(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * SCREEN_WIDTH as u32),
                rows_per_image: Some(SCREEN_HEIGHT as u32),
            },
            Self::extent(),
        );
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..6, 0..1);
    }
}
