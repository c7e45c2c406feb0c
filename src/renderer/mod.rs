//! Main renderer module.
//!
//! The CPU side draws every frame as a list of [`display::DrawCommand`]s onto
//! a [`display::Display`]. The GPU side only presents the finished screen.

/// Drawing primitives and the display trait.
pub mod display;
/// Status readout beside the viewport.
pub mod hud;
/// Top-down inset map.
pub mod minimap;
/// Hidden-surface wireframe renderer.
pub mod occlusion;
/// Pipeline building utilities for WGPU.
pub mod pipeline_builder;
/// Perspective projection and clipping.
pub mod projection;
/// CPU-side semigraphic screen.
pub mod screen;
/// GPU upload of the pixel layer.
pub mod screen_renderer;
/// Text layer rendering.
pub mod text;
/// Core WGPU surface and device handling.
pub mod wgpu_lib;
