//! Maze generation by randomized depth-first backtracking.
//!
//! The carve runs over a logical lattice of `((W-1)/2) x ((H-1)/2)` cells
//! embedded at odd grid coordinates. An explicit stack replaces recursion so
//! large mazes cannot overflow the call stack. Every logical cell is visited
//! exactly once, which yields a perfect maze: one simple path between any two
//! passage cells.
//!
//! # Examples
//!
//! ```rust
//! use mantrap::maze::generator::generate;
//!
//! let grid = generate(21, 21, Some(42)).expect("valid dimensions");
//! assert_eq!(grid, generate(21, 21, Some(42)).expect("valid dimensions"));
//! ```

use super::{Cell, CellState, Grid};
use crate::error::MazeError;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

/// Smallest accepted side length.
pub const MIN_SIDE: usize = 5;
/// Largest accepted side length.
pub const MAX_SIDE: usize = 4095;

/// Logical neighbour offsets in inspection order: `+col, -col, +row, -row`.
const LOGICAL_STEPS: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Checks that both sides are odd and within `MIN_SIDE..=MAX_SIDE`.
pub fn validate_dimensions(width: usize, height: usize) -> Result<(), MazeError> {
    let valid = |side: usize| side % 2 == 1 && (MIN_SIDE..=MAX_SIDE).contains(&side);
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(MazeError::InvalidDimensions { width, height })
    }
}

/// Generates a maze, seeded when `seed` is given and from entropy otherwise.
pub fn generate(width: usize, height: usize, seed: Option<u64>) -> Result<Grid, MazeError> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_with_rng(width, height, &mut rng)
}

/// Generates a maze drawing every neighbour choice from `rng`.
pub fn generate_with_rng<R: Rng>(
    width: usize,
    height: usize,
    rng: &mut R,
) -> Result<Grid, MazeError> {
    validate_dimensions(width, height)?;

    let mut grid = Grid::filled(width, height);
    let logical_cols = (width - 1) / 2;
    let logical_rows = (height - 1) / 2;
    let mut visited = vec![vec![false; logical_cols]; logical_rows];

    let embed = |l_row: usize, l_col: usize| Cell::new(2 * l_row + 1, 2 * l_col + 1);

    let start = (logical_rows / 2, logical_cols - 1);
    visited[start.0][start.1] = true;
    grid.set(embed(start.0, start.1), CellState::Passage);
    let mut stack = vec![start];

    let mut candidates: Vec<(usize, usize)> = Vec::with_capacity(4);
    while let Some(&(l_row, l_col)) = stack.last() {
        candidates.clear();
        for (d_row, d_col) in LOGICAL_STEPS {
            let n_row = l_row as i64 + d_row;
            let n_col = l_col as i64 + d_col;
            if n_row < 0 || n_col < 0 || n_row >= logical_rows as i64 || n_col >= logical_cols as i64
            {
                continue;
            }
            let (n_row, n_col) = (n_row as usize, n_col as usize);
            if !visited[n_row][n_col] {
                candidates.push((n_row, n_col));
            }
        }

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let (n_row, n_col) = candidates[rng.gen_range(0..candidates.len())];
        let here = embed(l_row, l_col);
        let there = embed(n_row, n_col);
        let between = Cell::new((here.row + there.row) / 2, (here.col + there.col) / 2);
        grid.set(between, CellState::Passage);
        grid.set(there, CellState::Passage);
        visited[n_row][n_col] = true;
        stack.push((n_row, n_col));
    }

    let (entry, exit) = (grid.entry, grid.exit);
    grid.set(entry, CellState::Passage);
    grid.set(exit, CellState::Passage);

    debug!(
        width,
        height,
        passages = grid.passage_count(),
        "maze carved"
    );
    Ok(grid)
}
