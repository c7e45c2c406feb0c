//! Per-frame update and presentation.

use crate::app::App;
use crate::error::RendererError;
use tracing::warn;

impl App {
    /// Advances the scene by one frame and presents it.
    ///
    /// # Frame Pipeline
    /// 1. The world ticks with the measured delta time and the held keys
    /// 2. The scene is drawn onto the CPU-side semigraphic screen
    /// 3. Both screen layers are uploaded and presented
    ///
    /// Lost or outdated surfaces are reconfigured and the frame is skipped;
    /// any other failure is returned to the caller.
    pub fn handle_redraw(&mut self) -> Result<(), RendererError> {
        let (Some(window), Some(state)) = (self.window.as_ref(), self.state.as_mut()) else {
            return Ok(());
        };
        if window.is_minimized().unwrap_or(false) {
            return Ok(());
        }

        let held = state.key_state.held_input();
        state.world.tick(state.delta_time, held);
        state.world.draw(&mut state.screen);

        match state
            .wgpu_renderer
            .render_frame(&state.screen, &mut state.text_renderer)
        {
            Ok(()) => {}
            Err(RendererError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                state.wgpu_renderer.reconfigure();
            }
            Err(RendererError::Surface(wgpu::SurfaceError::Timeout)) => {
                warn!("surface timed out, skipping frame");
            }
            Err(err) => return Err(err),
        }

        window.request_redraw();
        Ok(())
    }
}
