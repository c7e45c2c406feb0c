//! Circle-versus-grid collision with wall sliding.
//!
//! # Overview
//!
//! The player is a circle of fixed radius on the floor plane and every wall
//! cell is an axis-aligned unit box. Instead of testing the circle against
//! the boxes, each box is inflated by the radius and the player's centre is
//! tested against the inflated box.
//!
//! # How the System Works
//!
//! 1. The requested displacement is shortened to the grid's width plus
//!    height, then cut into sub-steps no longer than
//!    [`CollisionSystem::max_sub_step`], so fast motion cannot tunnel
//!    through a one-cell wall.
//! 2. For each sub-step the candidate position is pushed out of every
//!    overlapping inflated box within two cells, along whichever axis has
//!    the smaller penetration. Correcting only one axis keeps the motion
//!    along the other, which is what makes the player slide along walls.
//! 3. The push-out repeats for a fixed number of passes, then the candidate
//!    is clamped to the playable bounds.
//! 4. A sub-step that still overlaps a wall after all passes is dropped and
//!    the previous position kept. A player that starts clear of every wall
//!    therefore never ends up inside one.

use crate::config::Config;
use crate::math::vec::Vec2;
use crate::maze::Grid;

/// Overlap tolerated after resolution.
pub const PENETRATION_EPSILON: f32 = 1e-4;
/// Cells searched on each side of the candidate.
const NEIGHBOURHOOD: i64 = 2;
/// Floor for the configured sub-step length.
const MIN_SUB_STEP: f32 = 1e-3;

/// Axis-aligned box on the floor plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of wall cell `(row, col)` grown by `radius` on every side.
    pub fn inflated_cell(row: i64, col: i64, radius: f32) -> Self {
        let half = 0.5 + radius;
        Self {
            min: Vec2::new(col as f32 - half, row as f32 - half),
            max: Vec2::new(col as f32 + half, row as f32 + half),
        }
    }

    /// Whether `point` lies strictly inside; the boundary counts as outside.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.min.x && point.x < self.max.x && point.z > self.min.z && point.z < self.max.z
    }

    /// Depth of `point` along the axis it would leave the box through
    /// fastest, or zero when outside.
    pub fn penetration(&self, point: Vec2) -> f32 {
        if !self.contains(point) {
            return 0.0;
        }
        let x = (point.x - self.min.x).min(self.max.x - point.x);
        let z = (point.z - self.min.z).min(self.max.z - point.z);
        x.min(z)
    }

    /// Moves `point` onto the nearest face of the axis with the smaller
    /// penetration; the other coordinate is kept.
    fn push_out(&self, point: Vec2) -> Vec2 {
        let left = point.x - self.min.x;
        let right = self.max.x - point.x;
        let below = point.z - self.min.z;
        let above = self.max.z - point.z;
        if left.min(right) < below.min(above) {
            let x = if left < right { self.min.x } else { self.max.x };
            Vec2::new(x, point.z)
        } else {
            let z = if below < above { self.min.z } else { self.max.z };
            Vec2::new(point.x, z)
        }
    }
}

/// Resolves desired player displacements against the maze walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSystem {
    /// Radius of the player's circle.
    pub radius: f32,
    /// Longest displacement handled in one sub-step.
    pub max_sub_step: f32,
    /// Push-out passes per sub-step.
    pub iterations: u32,
}

impl CollisionSystem {
    pub fn new(radius: f32, max_sub_step: f32, iterations: u32) -> Self {
        Self {
            radius,
            max_sub_step,
            iterations,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.player_radius,
            config.max_sub_step,
            config.collision_iterations,
        )
    }

    /// Moves `position` by `delta`, sliding along walls instead of entering
    /// them. Never fails; at worst the clamped start position comes back.
    pub fn resolve(&self, grid: &Grid, position: Vec2, delta: Vec2) -> Vec2 {
        let length = delta.length();
        if !length.is_finite() {
            return position;
        }
        // Nothing past the grid's extent can be reached anyway.
        let reach = (grid.width + grid.height) as f32;
        let (delta, length) = if length > reach {
            (delta * (reach / length), reach)
        } else {
            (delta, length)
        };
        let sub_step = self.max_sub_step.max(MIN_SUB_STEP);
        let sub_steps = ((length / sub_step).ceil() as u32).max(1);
        let step = delta * (1.0 / sub_steps as f32);

        let mut current = position;
        for _ in 0..sub_steps {
            let mut candidate = current + step;
            for _ in 0..self.iterations {
                if !self.push_out_once(grid, &mut candidate) {
                    break;
                }
            }
            candidate = self.clamp_to_bounds(grid, candidate);
            if self.penetration(grid, candidate) > PENETRATION_EPSILON {
                continue;
            }
            current = candidate;
        }
        current
    }

    /// One pass over nearby walls; true if anything moved the candidate.
    fn push_out_once(&self, grid: &Grid, candidate: &mut Vec2) -> bool {
        let mut moved = false;
        for (row, col) in Self::nearby_walls(grid, *candidate) {
            let bounds = Aabb::inflated_cell(row, col, self.radius);
            if bounds.contains(*candidate) {
                *candidate = bounds.push_out(*candidate);
                moved = true;
            }
        }
        moved
    }

    /// Largest overlap of `position` with any nearby inflated wall box.
    pub fn penetration(&self, grid: &Grid, position: Vec2) -> f32 {
        Self::nearby_walls(grid, position)
            .map(|(row, col)| Aabb::inflated_cell(row, col, self.radius).penetration(position))
            .fold(0.0, f32::max)
    }

    /// Clamps into `[radius, (W-1) - radius] x [radius, (H-1) - radius]`.
    pub fn clamp_to_bounds(&self, grid: &Grid, position: Vec2) -> Vec2 {
        let max_x = (grid.width as f32 - 1.0 - self.radius).max(self.radius);
        let max_z = (grid.height as f32 - 1.0 - self.radius).max(self.radius);
        Vec2::new(
            position.x.clamp(self.radius, max_x),
            position.z.clamp(self.radius, max_z),
        )
    }

    fn nearby_walls(grid: &Grid, position: Vec2) -> impl Iterator<Item = (i64, i64)> + '_ {
        let row = position.z.round() as i64;
        let col = position.x.round() as i64;
        (row - NEIGHBOURHOOD..=row + NEIGHBOURHOOD)
            .flat_map(move |r| (col - NEIGHBOURHOOD..=col + NEIGHBOURHOOD).map(move |c| (r, c)))
            .filter(move |&(r, c)| grid.is_wall(r, c))
    }
}
