//! CPU-side semigraphic screen: a 160x100 pixel layer under an 80x25 text
//! layer.
//!
//! Each text cell covers a 2x4 block of pixels and the two layers exclude
//! each other per cell. Printing a character blanks its pixel block, and
//! plotting any pixel in a cell erases the character there.

use super::display::{Display, PlotMode};
use crate::constants::{
    CELL_PIXEL_HEIGHT, CELL_PIXEL_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH, TEXT_COLS, TEXT_ROWS,
};

/// Form feed; printing it clears the screen.
const FORM_FEED: char = '\u{c}';

/// The single concrete [`Display`] backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemigraphicScreen {
    pixels: Vec<bool>,
    glyphs: Vec<Option<char>>,
    cursor_col: i32,
    cursor_row: i32,
}

impl Default for SemigraphicScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl SemigraphicScreen {
    /// A blank screen with the cursor at the top-left cell.
    pub fn new() -> Self {
        Self {
            pixels: vec![false; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
            glyphs: vec![None; (TEXT_COLS * TEXT_ROWS) as usize],
            cursor_col: 0,
            cursor_row: 0,
        }
    }

    fn pixel_index(x: i32, y: i32) -> Option<usize> {
        if (0..SCREEN_WIDTH).contains(&x) && (0..SCREEN_HEIGHT).contains(&y) {
            Some((y * SCREEN_WIDTH + x) as usize)
        } else {
            None
        }
    }

    fn glyph_index(col: i32, row: i32) -> usize {
        (row * TEXT_COLS + col) as usize
    }

    /// Whether a pixel is lit; off-screen pixels read as unlit.
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        Self::pixel_index(x, y).is_some_and(|i| self.pixels[i])
    }

    /// Character stored in a text cell.
    pub fn glyph(&self, col: i32, row: i32) -> Option<char> {
        if (0..TEXT_COLS).contains(&col) && (0..TEXT_ROWS).contains(&row) {
            self.glyphs[Self::glyph_index(col, row)]
        } else {
            None
        }
    }

    /// Text cursor as `(col, row)`.
    pub fn cursor(&self) -> (i32, i32) {
        (self.cursor_col, self.cursor_row)
    }

    /// One text row with empty cells as spaces, trailing spaces trimmed.
    pub fn text_line(&self, row: i32) -> String {
        let line: String = (0..TEXT_COLS)
            .map(|col| self.glyph(col, row).unwrap_or(' '))
            .collect();
        line.trim_end().to_string()
    }

    /// Number of lit pixels.
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&lit| lit).count()
    }

    /// Pixel layer as tightly packed RGBA8, row-major from the top.
    ///
    /// Lit pixels are white and unlit ones transparent black; colouring
    /// happens when the texture is drawn.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&lit| if lit { [255, 255, 255, 255] } else { [0, 0, 0, 0] })
            .collect()
    }

    /// Text-mode rendering of both layers at one character per text cell.
    ///
    /// A cell shows its glyph if it has one, `#` when more than half of its
    /// pixels are lit, `+` when some are, and a space otherwise.
    pub fn ascii_snapshot(&self) -> String {
        let mut out = String::with_capacity(((TEXT_COLS + 1) * TEXT_ROWS) as usize);
        for row in 0..TEXT_ROWS {
            for col in 0..TEXT_COLS {
                let glyph = self.glyph(col, row).unwrap_or_else(|| {
                    let lit = self.lit_in_cell(col, row);
                    let area = (CELL_PIXEL_WIDTH * CELL_PIXEL_HEIGHT) as usize;
                    if lit * 2 > area {
                        '#'
                    } else if lit > 0 {
                        '+'
                    } else {
                        ' '
                    }
                });
                out.push(glyph);
            }
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        }
        out
    }

    fn lit_in_cell(&self, col: i32, row: i32) -> usize {
        let (x0, y0) = (col * CELL_PIXEL_WIDTH, row * CELL_PIXEL_HEIGHT);
        (y0..y0 + CELL_PIXEL_HEIGHT)
            .flat_map(|y| (x0..x0 + CELL_PIXEL_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_set(x, y))
            .count()
    }

    fn clear_cell_pixels(&mut self, col: i32, row: i32) {
        let (x0, y0) = (col * CELL_PIXEL_WIDTH, row * CELL_PIXEL_HEIGHT);
        for y in y0..y0 + CELL_PIXEL_HEIGHT {
            for x in x0..x0 + CELL_PIXEL_WIDTH {
                if let Some(i) = Self::pixel_index(x, y) {
                    self.pixels[i] = false;
                }
            }
        }
    }

    fn advance_cursor(&mut self) {
        self.cursor_col += 1;
        if self.cursor_col >= TEXT_COLS {
            self.new_line();
        }
    }

    fn new_line(&mut self) {
        self.cursor_col = 0;
        self.cursor_row = (self.cursor_row + 1).min(TEXT_ROWS - 1);
    }
}

impl Display for SemigraphicScreen {
    fn clear(&mut self) {
        self.pixels.fill(false);
        self.glyphs.fill(None);
        self.cursor_col = 0;
        self.cursor_row = 0;
    }

    fn plot_pixel(&mut self, x: i32, y: i32, mode: PlotMode) {
        let Some(index) = Self::pixel_index(x, y) else {
            return;
        };
        let cell = Self::glyph_index(x / CELL_PIXEL_WIDTH, y / CELL_PIXEL_HEIGHT);
        self.glyphs[cell] = None;
        let pixel = &mut self.pixels[index];
        *pixel = match mode {
            PlotMode::Set => true,
            PlotMode::Clear => false,
            PlotMode::Toggle => !*pixel,
        };
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.plot_pixel(x, y, PlotMode::Set);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += step_x;
            }
            if e2 <= dx {
                err += dx;
                y += step_y;
            }
        }
    }

    fn set_cursor(&mut self, col: i32, row: i32) {
        self.cursor_col = col.clamp(0, TEXT_COLS - 1);
        self.cursor_row = row.clamp(0, TEXT_ROWS - 1);
    }

    fn print_text(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\n' => self.new_line(),
                FORM_FEED => self.clear(),
                _ => {
                    let (col, row) = (self.cursor_col, self.cursor_row);
                    self.clear_cell_pixels(col, row);
                    self.glyphs[Self::glyph_index(col, row)] = Some(ch);
                    self.advance_cursor();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_modes() {
        let mut screen = SemigraphicScreen::new();
        screen.plot_pixel(10, 10, PlotMode::Set);
        assert!(screen.is_set(10, 10));
        screen.plot_pixel(10, 10, PlotMode::Toggle);
        assert!(!screen.is_set(10, 10));
        screen.plot_pixel(10, 10, PlotMode::Toggle);
        screen.plot_pixel(10, 10, PlotMode::Clear);
        assert!(!screen.is_set(10, 10));
        screen.plot_pixel(-1, 500, PlotMode::Set);
        assert_eq!(screen.lit_count(), 0);
    }

    #[test]
    fn test_line_is_inclusive_and_symmetric() {
        let mut forward = SemigraphicScreen::new();
        forward.draw_line(2, 3, 12, 7);
        assert!(forward.is_set(2, 3));
        assert!(forward.is_set(12, 7));
        assert_eq!(forward.lit_count(), 11);

        let mut single = SemigraphicScreen::new();
        single.draw_line(5, 5, 5, 5);
        assert_eq!(single.lit_count(), 1);
    }

    #[test]
    fn test_text_and_pixels_exclude_each_other() {
        let mut screen = SemigraphicScreen::new();
        screen.draw_line(0, 0, 3, 0);
        screen.set_cursor(0, 0);
        screen.print_text("A");
        assert_eq!(screen.glyph(0, 0), Some('A'));
        assert!(!screen.is_set(0, 0));
        assert!(!screen.is_set(1, 0));
        assert!(screen.is_set(2, 0));

        screen.plot_pixel(1, 3, PlotMode::Set);
        assert_eq!(screen.glyph(0, 0), None);
    }

    #[test]
    fn test_cursor_wraps_and_clamps() {
        let mut screen = SemigraphicScreen::new();
        screen.set_cursor(200, -3);
        assert_eq!(screen.cursor(), (TEXT_COLS - 1, 0));
        screen.print_text("xy");
        assert_eq!(screen.glyph(TEXT_COLS - 1, 0), Some('x'));
        assert_eq!(screen.glyph(0, 1), Some('y'));
        screen.print_text("\nz");
        assert_eq!(screen.text_line(2), "z");
    }

    #[test]
    fn test_form_feed_clears() {
        let mut screen = SemigraphicScreen::new();
        screen.print_text("abc");
        screen.plot_pixel(100, 90, PlotMode::Set);
        screen.print_text("\u{c}");
        assert_eq!(screen, SemigraphicScreen::new());
    }

    #[test]
    fn test_rgba_and_snapshot() {
        let mut screen = SemigraphicScreen::new();
        screen.plot_pixel(1, 0, PlotMode::Set);
        let rgba = screen.to_rgba();
        assert_eq!(rgba.len(), (SCREEN_WIDTH * SCREEN_HEIGHT * 4) as usize);
        assert_eq!(&rgba[4..8], &[255, 255, 255, 255]);
        screen.set_cursor(2, 0);
        screen.print_text("ok");
        let snapshot = screen.ascii_snapshot();
        assert!(snapshot.starts_with("+ ok\n"));
        assert_eq!(snapshot.lines().count(), TEXT_ROWS as usize);
    }
}
