//! Maze grid, generation and wall geometry.
//!
//! The [`Grid`] is produced once per generation by [`generator::generate`] and
//! then treated as read-only. [`geometry::build`] turns it into the wall quads
//! and silhouette edges the renderer consumes.

pub mod generator;
pub mod geometry;

use std::fmt;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Solid, blocks movement and sight.
    Wall,
    /// Open floor.
    Passage,
}

/// Represents a cell in the maze grid
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Row index of the cell, growing towards world +Z
    pub row: usize,
    /// Column index of the cell, growing towards world +X
    pub col: usize,
}

impl Cell {
    /// Creates a new Cell with the given coordinates
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbour at a signed offset, or `None` if it would leave the grid.
    pub fn offset(self, d_row: i32, d_col: i32, grid: &Grid) -> Option<Cell> {
        let row = self.row as i64 + d_row as i64;
        let col = self.col as i64 + d_col as i64;
        if row < 0 || col < 0 || row >= grid.height as i64 || col >= grid.width as i64 {
            return None;
        }
        Some(Cell::new(row as usize, col as usize))
    }
}

/// A wall/passage grid of odd dimensions with a solid border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
    /// Row-major cell states, `cells[row][col]`.
    pub cells: Vec<Vec<CellState>>,
    /// Forced-open start cell.
    pub entry: Cell,
    /// Forced-open cell in the opposite corner.
    pub exit: Cell,
}

impl Grid {
    /// A grid of the given size with every cell set to [`CellState::Wall`].
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![CellState::Wall; width]; height],
            entry: Cell::new(1, 1),
            exit: Cell::new(height.saturating_sub(2), width.saturating_sub(2)),
        }
    }

    /// Cell state at signed coordinates; anything outside the grid is a wall.
    pub fn get(&self, row: i64, col: i64) -> CellState {
        if row < 0 || col < 0 || row >= self.height as i64 || col >= self.width as i64 {
            return CellState::Wall;
        }
        self.cells[row as usize][col as usize]
    }

    /// Whether the cell at signed coordinates blocks movement.
    pub fn is_wall(&self, row: i64, col: i64) -> bool {
        self.get(row, col) == CellState::Wall
    }

    /// Cell state of an in-bounds cell.
    pub fn state(&self, cell: Cell) -> CellState {
        self.get(cell.row as i64, cell.col as i64)
    }

    pub(crate) fn set(&mut self, cell: Cell, state: CellState) {
        self.cells[cell.row][cell.col] = state;
    }

    /// Number of passage cells.
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&state| state == CellState::Passage)
            .count()
    }

    /// Iterates every cell in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(move |(col, &state)| (Cell::new(row, col), state))
        })
    }

    /// Nearest passage cell to `cell`, searching rings of growing radius.
    ///
    /// The cell is clamped into the grid first. Within a ring, cells are
    /// visited in row-major order. Falls back to the entry cell when the grid
    /// has no passage at all.
    pub fn nearest_passage(&self, cell: Cell) -> Cell {
        let row = cell.row.min(self.height.saturating_sub(1));
        let col = cell.col.min(self.width.saturating_sub(1));
        let start = Cell::new(row, col);
        if self.state(start) == CellState::Passage {
            return start;
        }

        let max_radius = self.width.max(self.height) as i64;
        for radius in 1..=max_radius {
            for d_row in -radius..=radius {
                for d_col in -radius..=radius {
                    if d_row.abs() != radius && d_col.abs() != radius {
                        continue;
                    }
                    let r = row as i64 + d_row;
                    let c = col as i64 + d_col;
                    if self.get(r, c) == CellState::Passage {
                        return Cell::new(r as usize, c as usize);
                    }
                }
            }
        }
        self.entry
    }
}

/// Renders the grid with `#` for walls, `S` for the entry and `E` for the exit.
///
/// Row 0 is printed last so north is up, matching the minimap.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.height).rev() {
            for col in 0..self.width {
                let cell = Cell::new(row, col);
                let glyph = if cell == self.entry {
                    'S'
                } else if cell == self.exit {
                    'E'
                } else if self.state(cell) == CellState::Wall {
                    '#'
                } else {
                    ' '
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid() -> Grid {
        let mut grid = Grid::filled(5, 5);
        for row in 1..4 {
            for col in 1..4 {
                grid.set(Cell::new(row, col), CellState::Passage);
            }
        }
        grid
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let grid = open_grid();
        assert_eq!(grid.get(-1, 2), CellState::Wall);
        assert_eq!(grid.get(2, 5), CellState::Wall);
        assert_eq!(grid.get(2, 2), CellState::Passage);
    }

    #[test]
    fn test_nearest_passage_prefers_exact_cell() {
        let grid = open_grid();
        assert_eq!(grid.nearest_passage(Cell::new(2, 3)), Cell::new(2, 3));
    }

    #[test]
    fn test_nearest_passage_searches_outward() {
        let grid = open_grid();
        assert_eq!(grid.nearest_passage(Cell::new(0, 0)), Cell::new(1, 1));
        assert_eq!(grid.nearest_passage(Cell::new(40, 40)), Cell::new(3, 3));
    }

    #[test]
    fn test_display_marks_entry_and_exit() {
        let grid = open_grid();
        let text = grid.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "#####");
        assert_eq!(lines[1], "#  E#");
        assert_eq!(lines[3], "#S  #");
    }

    #[test]
    fn test_cell_offset_stays_in_bounds() {
        let grid = open_grid();
        assert_eq!(Cell::new(0, 0).offset(-1, 0, &grid), None);
        assert_eq!(Cell::new(1, 1).offset(1, -1, &grid), Some(Cell::new(2, 0)));
    }
}
