//! Error types shared across the crate.
//!
//! Only configuration and presentation can fail. Generation with valid
//! dimensions, rendering into a [`crate::renderer::display::Display`],
//! collision and animation never return errors.

use thiserror::Error;

/// Errors raised while building a maze.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Width or height is even, smaller than 5, or too large to address.
    #[error("invalid maze dimensions {width}x{height}: both sides must be odd and between 5 and 4095")]
    InvalidDimensions {
        /// Requested grid width in cells.
        width: usize,
        /// Requested grid height in cells.
        height: usize,
    },
}

/// Errors raised by the windowed GPU presenter.
#[derive(Debug, Error)]
pub enum RendererError {
    /// The window could not be opened.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// The window cannot back a GPU surface.
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    /// No adapter compatible with the window surface.
    #[error("no suitable graphics adapter found")]
    NoAdapter,
    /// The adapter refused to open a device.
    #[error("failed to create graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    /// The surface cannot be presented in any supported format.
    #[error("surface does not support an sRGB or linear 8-bit format")]
    UnsupportedSurface,
    /// Acquiring the next swap chain image failed.
    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    /// Glyph atlas preparation failed.
    #[error("text preparation failed: {0}")]
    TextPrepare(#[from] glyphon::PrepareError),
    /// Drawing prepared glyphs failed.
    #[error("text rendering failed: {0}")]
    TextRender(#[from] glyphon::RenderError),
}
