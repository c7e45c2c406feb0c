//! AppState module.
//!
//! This module defines the [`AppState`] struct, which holds everything a running windowed
//! session needs: the GPU backends, the scene, the CPU-side screen and the input state.

use crate::error::RendererError;
use crate::game::World;
use crate::game::keys::KeyState;
use crate::renderer::screen::SemigraphicScreen;
use crate::renderer::text::TextRenderer;
use crate::renderer::wgpu_lib::WgpuRenderer;
use std::time::Instant;
use tracing::debug;
use winit::window::Window;

/// Holds all state required for a running session.
pub struct AppState {
    /// The WGPU renderer that presents the screen.
    pub wgpu_renderer: WgpuRenderer,
    /// The text renderer for the 80x25 text layer.
    pub text_renderer: TextRenderer,
    /// Maze, camera and movement.
    pub world: World,
    /// The frame the scene is drawn onto before upload.
    pub screen: SemigraphicScreen,
    /// The current input state (pressed keys).
    pub key_state: KeyState,
    /// Time of the last frame.
    pub last_frame_time: Instant,
    /// Time elapsed since the last frame (seconds).
    pub delta_time: f32,
    /// Number of frames rendered since the last FPS update.
    pub frame_count: u32,
    /// Current frames per second.
    pub current_fps: u32,
    /// Time of the last FPS update.
    pub last_fps_time: Instant,
}

impl AppState {
    /// Asynchronously creates a new [`AppState`] with initialized renderers.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        window: &Window,
        world: World,
    ) -> Result<Self, RendererError> {
        let size = window.inner_size();
        let wgpu_renderer =
            WgpuRenderer::new(instance, surface, size.width.max(1), size.height.max(1)).await?;

        let text_renderer = TextRenderer::new(
            &wgpu_renderer.device,
            &wgpu_renderer.queue,
            wgpu_renderer.surface_config.format,
            size,
        );

        let now = Instant::now();
        Ok(Self {
            wgpu_renderer,
            text_renderer,
            world,
            screen: SemigraphicScreen::new(),
            key_state: KeyState::new(),
            last_frame_time: now,
            delta_time: 0.0,
            frame_count: 0,
            current_fps: 0,
            last_fps_time: now,
        })
    }

    /// Resizes the surface and rescales the text layer.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        self.wgpu_renderer.resize(width, height);
        self.text_renderer
            .resize(&self.wgpu_renderer.queue, width, height);
    }

    /// Updates delta time and the once-a-second FPS counter.
    pub fn update_frame_timing(&mut self, current_time: Instant) {
        self.delta_time = current_time
            .duration_since(self.last_frame_time)
            .as_secs_f32();
        self.last_frame_time = current_time;
        self.frame_count += 1;

        if current_time.duration_since(self.last_fps_time).as_secs_f32() >= 1.0 {
            self.current_fps = self.frame_count;
            self.frame_count = 0;
            self.last_fps_time = current_time;
            debug!(fps = self.current_fps, "frame rate");
        }
    }
}
