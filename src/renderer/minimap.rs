//! Top-down occupancy inset around the player.
//!
//! North is up. Wall cells are drawn as horizontal run-length strokes, one
//! line per pixel row of the inset, and the heading is a four-pixel XOR
//! marker at the centre cell.

use super::display::{DrawCommand, PlotMode, push_frame};
use crate::config::Config;
use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::game::camera::Camera;
use crate::maze::Grid;

/// Draws the inset in the bottom-right corner of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiniMapRenderer {
    /// Cells shown on each side of the player.
    pub radius: i32,
    /// Pixel size of one cell.
    pub cell_size: i32,
    /// Left pixel column of the inset; the frame sits one pixel outside.
    pub x0: i32,
    /// Top pixel row of the inset.
    pub y0: i32,
}

impl MiniMapRenderer {
    /// Places the inset at the bottom right, kept to the right of `min_x`.
    pub fn new(radius: i32, cell_size: i32, min_x: i32) -> Self {
        let side = (radius * 2 + 1) * cell_size;
        let right_aligned = SCREEN_WIDTH - side - 2;
        Self {
            radius,
            cell_size,
            x0: right_aligned.max(min_x),
            y0: SCREEN_HEIGHT - side - 2,
        }
    }

    pub fn from_config(config: &Config, min_x: i32) -> Self {
        Self::new(config.minimap_radius, config.minimap_cell_size, min_x)
    }

    /// Pixel side of the inset, frame excluded.
    pub fn side(&self) -> i32 {
        (self.radius * 2 + 1) * self.cell_size
    }

    pub fn render(&self, grid: &Grid, camera: &Camera) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        let side = self.side();
        push_frame(&mut commands, self.x0 - 1, self.y0 - 1, self.x0 + side, self.y0 + side);

        let centre_row = camera.position.z.round() as i64;
        let centre_col = camera.position.x.round() as i64;
        let r = self.radius;

        for dy in -r..=r {
            let row = centre_row - dy as i64;
            let runs = Self::wall_runs(grid, row, centre_col, r);
            for offset in 0..self.cell_size {
                let y = self.y0 + (dy + r) * self.cell_size + offset;
                for &(start, end) in &runs {
                    commands.push(DrawCommand::Line {
                        x0: self.x0 + (start + r) * self.cell_size,
                        y0: y,
                        x1: self.x0 + (end + r) * self.cell_size + self.cell_size - 1,
                        y1: y,
                    });
                }
            }
        }

        self.push_heading_marker(&mut commands, camera.yaw);
        commands
    }

    /// Inclusive `dx` ranges of consecutive wall cells in one grid row.
    fn wall_runs(grid: &Grid, row: i64, centre_col: i64, radius: i32) -> Vec<(i32, i32)> {
        let mut runs = Vec::new();
        let mut open_run: Option<i32> = None;
        for dx in -radius..=radius {
            let wall = grid.is_wall(row, centre_col + dx as i64);
            match (wall, open_run) {
                (true, None) => open_run = Some(dx),
                (false, Some(start)) => {
                    runs.push((start, dx - 1));
                    open_run = None;
                }
                _ => {}
            }
        }
        if let Some(start) = open_run {
            runs.push((start, radius));
        }
        runs
    }

    fn push_heading_marker(&self, commands: &mut Vec<DrawCommand>, yaw: f32) {
        let cx = self.x0 + self.radius * self.cell_size + self.cell_size / 2;
        let cy = self.y0 + self.radius * self.cell_size + self.cell_size / 2;
        let sx = yaw.sin().round() as i32;
        let sy = -(yaw.cos().round() as i32);
        for (x, y) in [
            (cx, cy),
            (cx + sx, cy + sy),
            (cx + sy, cy - sx),
            (cx - sy, cy + sx),
        ] {
            commands.push(DrawCommand::Plot {
                x,
                y,
                mode: PlotMode::Toggle,
            });
        }
    }
}
