//! Event handler module.
//!
//! Contains the [`App`] struct and its event handling logic.

use crate::app::app_state::AppState;
use crate::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::error::RendererError;
use crate::game::World;
use crate::game::keys::{GameKey, winit_key_to_game_key};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

/// Main application struct that manages the window lifecycle and event handling.
///
/// # Lifecycle
/// 1. Created with [`App::new`] around an already generated [`World`]
/// 2. On `resumed` the window, surface and [`AppState`] are created
/// 3. Events are handled via `ApplicationHandler` trait methods
/// 4. Runs until the window is closed or Escape is pressed
pub struct App {
    /// The WGPU instance for graphics operations.
    pub instance: wgpu::Instance,
    /// The current application state, None until initialized.
    pub state: Option<AppState>,
    /// The application window, None until set.
    pub window: Option<Arc<Window>>,
    /// The scene waiting for a window.
    pending_world: Option<World>,
    /// First fatal error; the event loop exits when one is recorded.
    error: Option<RendererError>,
}

impl App {
    /// Creates a new [`App`] instance with default WGPU configuration.
    pub fn new(world: World) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self {
            instance,
            state: None,
            window: None,
            pending_world: Some(world),
            error: None,
        }
    }

    /// The fatal error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<RendererError> {
        self.error.take()
    }

    /// Asynchronously sets up the surface and application state for `window`.
    pub async fn set_window(&mut self, window: Window) -> Result<(), RendererError> {
        let Some(world) = self.pending_world.take() else {
            return Ok(());
        };
        let window = Arc::new(window);
        let surface = self.instance.create_surface(window.clone())?;
        let state = AppState::new(&self.instance, surface, &window, world).await?;

        window.request_redraw();
        self.window.get_or_insert(window);
        self.state.get_or_insert(state);
        Ok(())
    }

    /// Handles window resize events and updates all rendering systems.
    pub fn handle_resized(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            let Some(state) = self.state.as_mut() else {
                warn!("resize before the renderer was initialized");
                return;
            };
            state.resize_surface(width, height);
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RendererError) {
        error!(%err, "presentation failed");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(game_key) = winit_key_to_game_key(&event.logical_key) else {
            return;
        };

        match event.state {
            ElementState::Pressed => {
                if !state.key_state.press_key(game_key) {
                    return;
                }
                if game_key == GameKey::Quit {
                    event_loop.exit();
                    return;
                }
                if let Some(action) = game_key.action() {
                    if let Err(err) = state.world.handle(action) {
                        error!(%err, ?action, "action failed");
                    }
                }
            }
            ElementState::Released => state.key_state.release_key(game_key),
        }
    }
}

impl ApplicationHandler for App {
    /// Creates the window on first resume.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title("mantrap")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let result = match event_loop.create_window(attributes) {
            Ok(window) => pollster::block_on(self.set_window(window)),
            Err(err) => Err(err.into()),
        };
        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }

    /// Handles window events including input, resize, and close requests.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => self.handle_resized(size.width, size.height),

            WindowEvent::Focused(false) => {
                if let Some(state) = self.state.as_mut() {
                    state.key_state.clear();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, event),

            WindowEvent::RedrawRequested => {
                if let Some(state) = self.state.as_mut() {
                    state.update_frame_timing(Instant::now());
                }
                if let Err(err) = self.handle_redraw() {
                    self.fail(event_loop, err);
                }
            }

            _ => {}
        }
    }
}
