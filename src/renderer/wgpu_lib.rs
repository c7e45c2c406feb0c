//! WGPU presenter for the semigraphic screen.
//!
//! This module provides [`WgpuRenderer`], which owns the surface, device and queue and
//! composes each frame from two layers: the pixel layer as a stretched texture
//! ([`ScreenRenderer`]) and the text layer on top of it ([`TextRenderer`]).
//!
//! # Usage
//! Create a [`WgpuRenderer`] via [`WgpuRenderer::new`] and call [`WgpuRenderer::render_frame`]
//! each frame with the screen the scene was drawn onto.

use super::screen::SemigraphicScreen;
use super::screen_renderer::ScreenRenderer;
use super::text::TextRenderer;
use crate::error::RendererError;
use tracing::info;
use wgpu::{SurfaceTexture, TextureView};

pub struct WgpuRenderer {
    /// The WGPU surface for presenting rendered frames.
    pub surface: wgpu::Surface<'static>,
    /// The surface configuration (format, size, etc.).
    pub surface_config: wgpu::SurfaceConfiguration,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    /// Pixel layer pipeline.
    pub screen_renderer: ScreenRenderer,
}

impl WgpuRenderer {
    /// Initializes the device and every GPU resource for the given surface.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self, RendererError> {
        let adapter = Self::create_adapter(instance, &surface).await?;
        let (device, queue) = Self::create_device(&adapter).await?;
        let surface_config = Self::create_surface_config(&surface, &adapter, width, height)?;

        surface.configure(&device, &surface_config);
        info!(
            adapter = %adapter.get_info().name,
            format = ?surface_config.format,
            width,
            height,
            "surface configured"
        );

        let screen_renderer = ScreenRenderer::new(&device, surface_config.format);

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            screen_renderer,
        })
    }

    /// Reconfigures the surface; zero-sized requests are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Reapplies the current configuration, e.g. after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Uploads both layers of `screen` and presents them.
    pub fn render_frame(
        &mut self,
        screen: &SemigraphicScreen,
        text_renderer: &mut TextRenderer,
    ) -> Result<(), RendererError> {
        let (surface_texture, surface_view) = self.get_surface_texture_and_view()?;

        self.screen_renderer.upload(&self.queue, screen);
        text_renderer.update(screen);
        text_renderer.prepare(&self.device, &self.queue)?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Screen Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.screen_renderer.render(&mut render_pass);
            text_renderer.render(&mut render_pass)?;
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        text_renderer.trim();
        Ok(())
    }

    // Private helper methods

    async fn create_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> Result<wgpu::Adapter, RendererError> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(surface),
            })
            .await
            .ok_or(RendererError::NoAdapter)
    }

    async fn create_device(
        adapter: &wgpu::Adapter,
    ) -> Result<(wgpu::Device, wgpu::Queue), RendererError> {
        let pair = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;
        Ok(pair)
    }

    fn create_surface_config(
        surface: &wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<wgpu::SurfaceConfiguration, RendererError> {
        let capabilities = surface.get_capabilities(adapter);
        let format = capabilities
            .formats
            .iter()
            .find(|&&f| f == wgpu::TextureFormat::Bgra8UnormSrgb)
            .or_else(|| capabilities.formats.iter().find(|f| f.is_srgb()))
            .or_else(|| capabilities.formats.first())
            .copied()
            .ok_or(RendererError::UnsupportedSurface)?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        })
    }

    fn get_surface_texture_and_view(&self) -> Result<(SurfaceTexture, TextureView), RendererError> {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Ok((surface_texture, surface_view))
    }
}
