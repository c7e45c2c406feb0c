//! Wall quads and silhouette edges derived from a [`Grid`].
//!
//! Every passage cell contributes one unit-height quad per blocked side,
//! facing back into the passage. Quad outlines are then merged: an edge
//! shared only by quads with the same normal is an interior seam of a flat
//! wall and is dropped, so long corridors render as single outlines.

use super::{CellState, Grid};
use crate::constants::WALL_HEIGHT;
use crate::math::vec::Vec3;
use std::collections::HashMap;

/// Axis-aligned direction a wall quad faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalCode {
    /// Faces world +X (east).
    PosX,
    /// Faces world -X (west).
    NegX,
    /// Faces world +Z (north).
    PosZ,
    /// Faces world -Z (south).
    NegZ,
}

impl NormalCode {
    /// Unit vector of the normal.
    pub fn vector(self) -> Vec3 {
        match self {
            NormalCode::PosX => Vec3::new(1.0, 0.0, 0.0),
            NormalCode::NegX => Vec3::new(-1.0, 0.0, 0.0),
            NormalCode::PosZ => Vec3::new(0.0, 0.0, 1.0),
            NormalCode::NegZ => Vec3::new(0.0, 0.0, -1.0),
        }
    }
}

/// One unit-height wall face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallQuad {
    /// Corners in outline order: bottom, bottom, top, top.
    pub vertices: [Vec3; 4],
    /// Direction the face points, towards the passage it borders.
    pub normal: NormalCode,
}

impl WallQuad {
    /// The four outline segments of the quad.
    pub fn outline(&self) -> [(Vec3, Vec3); 4] {
        let v = &self.vertices;
        [(v[0], v[1]), (v[1], v[2]), (v[2], v[3]), (v[3], v[0])]
    }
}

/// A wireframe segment that survives seam removal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilhouetteEdge {
    pub a: Vec3,
    pub b: Vec3,
}

/// Renderable wall geometry for one generation of the maze.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub quads: Vec<WallQuad>,
    pub edges: Vec<SilhouetteEdge>,
}

/// Orientation-free identity of a segment; coordinates doubled so half-cell
/// positions become integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct EdgeKey([i32; 3], [i32; 3]);

impl EdgeKey {
    fn new(a: Vec3, b: Vec3) -> Self {
        let quantize = |v: Vec3| {
            [
                (v.x() * 2.0).round() as i32,
                (v.y() * 2.0).round() as i32,
                (v.z() * 2.0).round() as i32,
            ]
        };
        let (qa, qb) = (quantize(a), quantize(b));
        if qa <= qb { Self(qa, qb) } else { Self(qb, qa) }
    }
}

struct EdgeUse {
    edge: SilhouetteEdge,
    normal: NormalCode,
    mixed_normals: bool,
}

/// Builds wall quads and the deduplicated silhouette edge set.
///
/// Output order follows the grid's row-major order, so identical grids
/// always produce identical geometry.
pub fn build(grid: &Grid) -> Geometry {
    let mut quads = Vec::new();

    for (cell, state) in grid.iter_cells() {
        if state != CellState::Passage {
            continue;
        }
        let row = cell.row as i64;
        let col = cell.col as i64;
        let x = cell.col as f32;
        let z = cell.row as f32;
        let (w, e) = (x - 0.5, x + 0.5);
        let (s, n) = (z - 0.5, z + 0.5);
        let h = WALL_HEIGHT;

        if grid.is_wall(row, col + 1) {
            quads.push(WallQuad {
                vertices: [
                    Vec3::new(e, 0.0, s),
                    Vec3::new(e, 0.0, n),
                    Vec3::new(e, h, n),
                    Vec3::new(e, h, s),
                ],
                normal: NormalCode::NegX,
            });
        }
        if grid.is_wall(row, col - 1) {
            quads.push(WallQuad {
                vertices: [
                    Vec3::new(w, 0.0, n),
                    Vec3::new(w, 0.0, s),
                    Vec3::new(w, h, s),
                    Vec3::new(w, h, n),
                ],
                normal: NormalCode::PosX,
            });
        }
        if grid.is_wall(row + 1, col) {
            quads.push(WallQuad {
                vertices: [
                    Vec3::new(e, 0.0, n),
                    Vec3::new(w, 0.0, n),
                    Vec3::new(w, h, n),
                    Vec3::new(e, h, n),
                ],
                normal: NormalCode::NegZ,
            });
        }
        if grid.is_wall(row - 1, col) {
            quads.push(WallQuad {
                vertices: [
                    Vec3::new(w, 0.0, s),
                    Vec3::new(e, 0.0, s),
                    Vec3::new(e, h, s),
                    Vec3::new(w, h, s),
                ],
                normal: NormalCode::PosZ,
            });
        }
    }

    let edges = silhouette_edges(&quads);
    Geometry { quads, edges }
}

/// Keeps edges used by exactly one quad or by quads with different normals.
fn silhouette_edges(quads: &[WallQuad]) -> Vec<SilhouetteEdge> {
    let mut index: HashMap<EdgeKey, usize> = HashMap::new();
    let mut uses: Vec<(EdgeUse, usize)> = Vec::new();

    for quad in quads {
        for (a, b) in quad.outline() {
            let key = EdgeKey::new(a, b);
            match index.get(&key) {
                Some(&slot) => {
                    let (entry, count) = &mut uses[slot];
                    *count += 1;
                    if entry.normal != quad.normal {
                        entry.mixed_normals = true;
                    }
                }
                None => {
                    index.insert(key, uses.len());
                    uses.push((
                        EdgeUse {
                            edge: SilhouetteEdge { a, b },
                            normal: quad.normal,
                            mixed_normals: false,
                        },
                        1,
                    ));
                }
            }
        }
    }

    uses.into_iter()
        .filter(|(entry, count)| *count == 1 || entry.mixed_normals)
        .map(|(entry, _)| entry.edge)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Cell;
    use crate::maze::generator::generate;

    fn grid_with_passages(cells: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::filled(7, 7);
        for &(row, col) in cells {
            grid.set(Cell::new(row, col), CellState::Passage);
        }
        grid
    }

    #[test]
    fn test_single_cell_is_a_closed_box() {
        let geometry = build(&grid_with_passages(&[(3, 3)]));
        assert_eq!(geometry.quads.len(), 4);
        // 4 corners + 4 top + 4 bottom
        assert_eq!(geometry.edges.len(), 12);
    }

    #[test]
    fn test_corridor_seams_are_removed() {
        let geometry = build(&grid_with_passages(&[(1, 1), (1, 2)]));
        assert_eq!(geometry.quads.len(), 6);
        let vertical = geometry
            .edges
            .iter()
            .filter(|edge| edge.a.y() != edge.b.y())
            .count();
        assert_eq!(vertical, 4);
        assert!(
            !geometry
                .edges
                .iter()
                .any(|edge| edge.a.y() != edge.b.y() && (edge.a.x() - 1.5).abs() < 1e-6)
        );
        assert_eq!(geometry.edges.len(), 16);
    }

    #[test]
    fn test_normals_point_into_the_passage() {
        let geometry = build(&grid_with_passages(&[(3, 3)]));
        for quad in &geometry.quads {
            let centre = Vec3::new(3.0, 0.5, 3.0);
            let to_centre = centre - quad.vertices[0];
            assert!(quad.normal.vector().dot(&to_centre) > 0.0, "{quad:?}");
        }
    }

    #[test]
    fn test_edge_key_ignores_direction() {
        let a = Vec3::new(0.5, 0.0, 1.5);
        let b = Vec3::new(0.5, 1.0, 1.5);
        assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
    }

    #[test]
    fn test_build_is_deterministic() {
        let grid = generate(15, 15, Some(5)).unwrap();
        assert_eq!(build(&grid), build(&grid));
        assert!(!build(&grid).edges.is_empty());
    }
}
