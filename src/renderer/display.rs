//! The drawing surface the maze renderer targets.
//!
//! Renderers never touch a backend directly. They return a list of
//! [`DrawCommand`]s, which [`execute`] replays onto any [`Display`].

/// How a plotted pixel combines with the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotMode {
    /// Turn the pixel on.
    Set,
    /// Turn the pixel off.
    Clear,
    /// Flip the pixel (XOR).
    Toggle,
}

/// A low-resolution monochrome bitmap with a character layer on top.
pub trait Display {
    /// Blanks every pixel and character.
    fn clear(&mut self);
    /// Changes one pixel; coordinates outside the surface are ignored.
    fn plot_pixel(&mut self, x: i32, y: i32, mode: PlotMode);
    /// Sets every pixel on the segment between two endpoints, inclusive.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);
    /// Moves the text cursor; out-of-range positions are clamped.
    fn set_cursor(&mut self, col: i32, row: i32);
    /// Prints at the cursor and advances it.
    fn print_text(&mut self, text: &str);
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear,
    Plot { x: i32, y: i32, mode: PlotMode },
    Line { x0: i32, y0: i32, x1: i32, y1: i32 },
    Cursor { col: i32, row: i32 },
    Text(String),
}

/// Replays commands in order onto a display.
pub fn execute<D: Display + ?Sized>(display: &mut D, commands: &[DrawCommand]) {
    for command in commands {
        match command {
            DrawCommand::Clear => display.clear(),
            DrawCommand::Plot { x, y, mode } => display.plot_pixel(*x, *y, *mode),
            DrawCommand::Line { x0, y0, x1, y1 } => display.draw_line(*x0, *y0, *x1, *y1),
            DrawCommand::Cursor { col, row } => display.set_cursor(*col, *row),
            DrawCommand::Text(text) => display.print_text(text),
        }
    }
}

/// Appends a one-pixel rectangle outline.
pub fn push_frame(commands: &mut Vec<DrawCommand>, x0: i32, y0: i32, x1: i32, y1: i32) {
    commands.extend([
        DrawCommand::Line { x0, y0, x1, y1: y0 },
        DrawCommand::Line { x0: x1, y0, x1, y1 },
        DrawCommand::Line { x0: x1, y0: y1, x1: x0, y1 },
        DrawCommand::Line { x0, y0: y1, x1: x0, y1: y0 },
    ]);
}

/// Appends a cursor move followed by text.
pub fn push_text(commands: &mut Vec<DrawCommand>, col: i32, row: i32, text: impl Into<String>) {
    commands.push(DrawCommand::Cursor { col, row });
    commands.push(DrawCommand::Text(text.into()));
}
