//! Text layer of the semigraphic screen, drawn with glyphon.
//!
//! One glyphon [`Buffer`] per text row. A row is only reshaped when its
//! content changes, which for the status readout is a few rows per frame.

use super::screen::SemigraphicScreen;
use crate::constants::{TEXT_COLS, TEXT_ROWS};
use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer as GlyphonTextRenderer, Viewport, Weight,
};
use wgpu::{Device, Queue, RenderPass};
use winit::dpi::PhysicalSize;

/// Advance width of a monospace glyph relative to its font size.
const MONOSPACE_ADVANCE: f32 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub weight: Weight,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0, 255, 255),
            weight: Weight::NORMAL,
        }
    }
}

/// Pixel size of one text cell on a surface of `size`.
pub fn cell_size(size: PhysicalSize<u32>) -> (f32, f32) {
    (
        size.width as f32 / TEXT_COLS as f32,
        size.height as f32 / TEXT_ROWS as f32,
    )
}

/// Font metrics that make one monospace glyph fill one text cell.
pub fn row_metrics(size: PhysicalSize<u32>) -> Metrics {
    let (cell_width, cell_height) = cell_size(size);
    let font_size = (cell_width / MONOSPACE_ADVANCE).min(cell_height).max(1.0);
    Metrics::new(font_size, cell_height.max(1.0))
}

struct TextRow {
    buffer: Buffer,
    content: String,
}

pub struct TextRenderer {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
    pub viewport: Viewport,
    pub atlas: TextAtlas,
    pub text_renderer: GlyphonTextRenderer,
    pub style: TextStyle,
    pub window_size: PhysicalSize<u32>,
    rows: Vec<TextRow>,
}

impl TextRenderer {
    pub fn new(
        device: &Device,
        queue: &Queue,
        surface_format: wgpu::TextureFormat,
        window_size: PhysicalSize<u32>,
    ) -> Self {
        let mut font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, surface_format);
        let text_renderer =
            GlyphonTextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);

        let metrics = row_metrics(window_size);
        let rows = (0..TEXT_ROWS)
            .map(|_| {
                let mut buffer = Buffer::new(&mut font_system, metrics);
                buffer.set_size(
                    &mut font_system,
                    Some(window_size.width as f32),
                    Some(metrics.line_height),
                );
                TextRow {
                    buffer,
                    content: String::new(),
                }
            })
            .collect();

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            text_renderer,
            style: TextStyle::default(),
            window_size,
            rows,
        }
    }

    /// Copies the text layer of `screen`, reshaping only rows that changed.
    pub fn update(&mut self, screen: &SemigraphicScreen) {
        let attrs = Attrs::new().family(Family::Monospace).weight(self.style.weight);
        for (index, row) in self.rows.iter_mut().enumerate() {
            let line = screen.text_line(index as i32);
            if line == row.content {
                continue;
            }
            row.buffer
                .set_text(&mut self.font_system, &line, attrs, Shaping::Advanced);
            row.buffer.shape_until_scroll(&mut self.font_system, false);
            row.content = line;
        }
    }

    /// Rescales every row to a new surface size.
    pub fn resize(&mut self, queue: &Queue, width: u32, height: u32) {
        self.window_size = PhysicalSize::new(width, height);
        let metrics = row_metrics(self.window_size);
        for row in &mut self.rows {
            row.buffer.set_metrics(&mut self.font_system, metrics);
            row.buffer
                .set_size(&mut self.font_system, Some(width as f32), Some(metrics.line_height));
            row.buffer.shape_until_scroll(&mut self.font_system, false);
        }
        self.viewport.update(queue, Resolution { width, height });
    }

    /// Prepare text rendering for the current frame
    pub fn prepare(&mut self, device: &Device, queue: &Queue) -> Result<(), glyphon::PrepareError> {
        let (_, cell_height) = cell_size(self.window_size);
        let width = self.window_size.width as i32;
        let color = self.style.color;

        let text_areas: Vec<TextArea> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.content.trim().is_empty())
            .map(|(index, row)| {
                let top = index as f32 * cell_height;
                TextArea {
                    buffer: &row.buffer,
                    left: 0.0,
                    top,
                    scale: 1.0,
                    bounds: TextBounds {
                        left: 0,
                        top: top as i32,
                        right: width,
                        bottom: (top + cell_height).ceil() as i32,
                    },
                    default_color: color,
                    custom_glyphs: &[],
                }
            })
            .collect();

        self.text_renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            text_areas,
            &mut self.swash_cache,
        )
    }

    pub fn render(&mut self, render_pass: &mut RenderPass) -> Result<(), glyphon::RenderError> {
        self.text_renderer
            .render(&self.atlas, &self.viewport, render_pass)
    }

    /// Trim the atlas to free up unused space
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_metrics_fill_a_cell() {
        let size = PhysicalSize::new(1280, 800);
        assert_eq!(cell_size(size), (16.0, 32.0));
        let metrics = row_metrics(size);
        assert_eq!(metrics.line_height, 32.0);
        assert!(metrics.font_size * MONOSPACE_ADVANCE <= 16.0 + 1e-3);
    }

    #[test]
    fn test_row_metrics_survive_tiny_surfaces() {
        let metrics = row_metrics(PhysicalSize::new(0, 0));
        assert!(metrics.font_size >= 1.0);
        assert!(metrics.line_height >= 1.0);
    }
}
