//! Camera pose and the world-to-view transform.
//!
//! The camera only ever yaws. Yaw `0` looks north (+Z) and grows clockwise
//! seen from above, so `+π/2` looks east (+X).

use crate::constants::EYE_HEIGHT;
use crate::math::vec::{Vec2, Vec3};
use crate::math::wrap_pi;
use crate::maze::Cell;
use std::f32::consts::{FRAC_PI_2, PI};

/// One of the four cardinal headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    North,
    East,
    South,
    West,
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

impl Facing {
    /// All headings in index order.
    pub const ALL: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    /// Index in `N=0, E=1, S=2, W=3` order.
    pub fn index(self) -> usize {
        match self {
            Facing::North => 0,
            Facing::East => 1,
            Facing::South => 2,
            Facing::West => 3,
        }
    }

    fn from_index(index: usize) -> Self {
        Self::ALL[index & 3]
    }

    /// Heading after a quarter turn.
    pub fn turned(self, turn: Turn) -> Self {
        match turn {
            Turn::Right => Self::from_index(self.index() + 1),
            Turn::Left => Self::from_index(self.index() + 3),
        }
    }

    /// Canonical yaw constant in `[-π, π)`.
    pub fn yaw(self) -> f32 {
        match self {
            Facing::North => 0.0,
            Facing::East => FRAC_PI_2,
            Facing::South => -PI,
            Facing::West => -FRAC_PI_2,
        }
    }

    /// Heading closest to an arbitrary yaw.
    pub fn nearest(yaw: f32) -> Self {
        let quarter = (wrap_pi(yaw) / FRAC_PI_2).round() as i32;
        Self::from_index(quarter.rem_euclid(4) as usize)
    }

    /// Grid step `(d_row, d_col)` one cell ahead.
    pub fn step(self) -> (i32, i32) {
        match self {
            Facing::North => (1, 0),
            Facing::East => (0, 1),
            Facing::South => (-1, 0),
            Facing::West => (0, -1),
        }
    }

    pub fn label(self) -> char {
        match self {
            Facing::North => 'N',
            Facing::East => 'E',
            Facing::South => 'S',
            Facing::West => 'W',
        }
    }
}

/// World-space centre of a cell on the floor plane.
pub fn cell_center(cell: Cell) -> Vec2 {
    Vec2::new(cell.col as f32, cell.row as f32)
}

/// Player pose. Mutated by the animation and collision code, read by the
/// renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Physical position on the floor plane.
    pub position: Vec2,
    /// Heading in radians, kept in `[-π, π)`.
    pub yaw: f32,
    /// Discrete heading, exact whenever the camera is snapped.
    pub facing: Facing,
    /// Discrete cell, exact whenever the camera is snapped.
    pub cell: Cell,
}

impl Camera {
    /// A camera snapped to the centre of `cell`, looking along `facing`.
    pub fn new(cell: Cell, facing: Facing) -> Self {
        Self {
            position: cell_center(cell),
            yaw: facing.yaw(),
            facing,
            cell,
        }
    }

    /// Re-snaps position and yaw to the discrete cell and facing.
    pub fn snap(&mut self, cell: Cell, facing: Facing) {
        *self = Self::new(cell, facing);
    }

    /// Unit forward vector on the floor plane.
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.yaw.sin(), self.yaw.cos())
    }

    /// Unit vector to the camera's right on the floor plane.
    pub fn right(&self) -> Vec2 {
        let forward = self.forward();
        Vec2::new(forward.z, -forward.x)
    }

    /// Eye position at eye height, pulled back along the forward axis.
    pub fn eye(&self, back_offset: f32) -> Vec3 {
        (self.position - self.forward() * back_offset).at_height(EYE_HEIGHT)
    }

    /// Translates by `-eye` and rotates by `-yaw` about the vertical axis.
    pub fn to_view(&self, world: Vec3, eye: Vec3) -> Vec3 {
        let d = world - eye;
        let (sin, cos) = self.yaw.sin_cos();
        Vec3::new(cos * d.x() - sin * d.z(), d.y(), sin * d.x() + cos * d.z())
    }

    /// Rotates a direction into view space.
    pub fn rotate_to_view(&self, direction: Vec3) -> Vec3 {
        let (sin, cos) = self.yaw.sin_cos();
        Vec3::new(
            cos * direction.x() - sin * direction.z(),
            direction.y(),
            sin * direction.x() + cos * direction.z(),
        )
    }
}
