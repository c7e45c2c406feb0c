//! Fixed layout of the semigraphic screen and the 3D viewport on it.

/// Width of the pixel layer.
pub const SCREEN_WIDTH: i32 = 160;
/// Height of the pixel layer.
pub const SCREEN_HEIGHT: i32 = 100;
/// Text columns; each covers two pixel columns.
pub const TEXT_COLS: i32 = 80;
/// Text rows; each covers four pixel rows.
pub const TEXT_ROWS: i32 = 25;
/// Pixel width of one text cell.
pub const CELL_PIXEL_WIDTH: i32 = SCREEN_WIDTH / TEXT_COLS;
/// Pixel height of one text cell.
pub const CELL_PIXEL_HEIGHT: i32 = SCREEN_HEIGHT / TEXT_ROWS;

/// Side of the square 3D viewport, frame included.
pub const VIEW_SIZE: i32 = 96;
/// Left edge of the viewport frame.
pub const VIEW_X0: i32 = 8;
/// Top edge of the viewport frame.
pub const VIEW_Y0: i32 = 2;
/// Right edge of the viewport frame.
pub const VIEW_X1: i32 = VIEW_X0 + VIEW_SIZE - 1;
/// Bottom edge of the viewport frame.
pub const VIEW_Y1: i32 = VIEW_Y0 + VIEW_SIZE - 1;

/// Eye height above the floor; walls span `0.0..=1.0`.
pub const EYE_HEIGHT: f32 = 0.5;
/// Height of every wall quad.
pub const WALL_HEIGHT: f32 = 1.0;

/// Window size used by the GPU presenter.
pub const WINDOW_WIDTH: u32 = 1280;
/// Window size used by the GPU presenter.
pub const WINDOW_HEIGHT: u32 = 800;
