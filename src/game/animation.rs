//! Discrete turn and step animations for grid movement.
//!
//! At most one animation runs at a time. Requests made while one is in
//! flight are refused, and each [`AnimationController::advance`] call moves
//! the active animation forward by exactly one frame. On its last frame the
//! camera snaps to the exact yaw constant or cell centre of the target.

use super::camera::{Camera, Facing, Turn, cell_center};
use crate::math::{smoothstep, wrap_pi};
use crate::maze::{Cell, CellState, Grid};
use tracing::debug;

/// Direction of a one-cell step relative to the facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Backward,
}

impl Step {
    fn sign(self) -> i32 {
        match self {
            Step::Forward => 1,
            Step::Backward => -1,
        }
    }
}

/// The single animation slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationState {
    Idle,
    Turning {
        from: f32,
        to: f32,
        facing: Facing,
        frame: u32,
        frames: u32,
    },
    Moving {
        from: Cell,
        to: Cell,
        frame: u32,
        frames: u32,
    },
}

impl AnimationState {
    /// Linear progress in `[0, 1]`; zero when idle.
    pub fn progress(&self) -> f32 {
        match *self {
            AnimationState::Idle => 0.0,
            AnimationState::Turning { frame, frames, .. }
            | AnimationState::Moving { frame, frames, .. } => frame as f32 / frames as f32,
        }
    }
}

/// Drives the camera between snapped poses.
#[derive(Debug, Clone)]
pub struct AnimationController {
    state: AnimationState,
    turn_frames: u32,
    move_frames: u32,
}

impl AnimationController {
    /// Frame counts below one are raised to one.
    pub fn new(turn_frames: u32, move_frames: u32) -> Self {
        Self {
            state: AnimationState::Idle,
            turn_frames: turn_frames.max(1),
            move_frames: move_frames.max(1),
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state != AnimationState::Idle
    }

    /// Starts a quarter turn; `false` if another animation is running.
    pub fn request_turn(&mut self, camera: &Camera, turn: Turn) -> bool {
        if self.is_busy() {
            debug!(?turn, "turn ignored while animating");
            return false;
        }
        let facing = camera.facing.turned(turn);
        self.state = AnimationState::Turning {
            from: camera.yaw,
            to: facing.yaw(),
            facing,
            frame: 0,
            frames: self.turn_frames,
        };
        true
    }

    /// Starts a one-cell step; `false` if busy or the target is not open.
    pub fn request_move(&mut self, grid: &Grid, camera: &Camera, step: Step) -> bool {
        if self.is_busy() {
            debug!(?step, "move ignored while animating");
            return false;
        }
        let (d_row, d_col) = camera.facing.step();
        let sign = step.sign();
        let target = camera.cell.offset(d_row * sign, d_col * sign, grid);
        match target {
            Some(to) if grid.state(to) == CellState::Passage => {
                self.state = AnimationState::Moving {
                    from: camera.cell,
                    to,
                    frame: 0,
                    frames: self.move_frames,
                };
                true
            }
            _ => {
                debug!(?step, cell = ?camera.cell, "move blocked");
                false
            }
        }
    }

    /// Runs one frame of the active animation. Returns `true` on the frame
    /// the animation completes.
    pub fn advance(&mut self, camera: &mut Camera) -> bool {
        match &mut self.state {
            AnimationState::Idle => false,
            AnimationState::Turning {
                from,
                to,
                facing,
                frame,
                frames,
            } => {
                *frame += 1;
                if *frame >= *frames {
                    let facing = *facing;
                    camera.snap(camera.cell, facing);
                    self.state = AnimationState::Idle;
                    debug!(?facing, "turn finished");
                    return true;
                }
                let eased = smoothstep(*frame as f32 / *frames as f32);
                camera.yaw = wrap_pi(*from + wrap_pi(*to - *from) * eased);
                false
            }
            AnimationState::Moving {
                from,
                to,
                frame,
                frames,
            } => {
                *frame += 1;
                if *frame >= *frames {
                    let to = *to;
                    camera.snap(to, camera.facing);
                    self.state = AnimationState::Idle;
                    debug!(?to, "step finished");
                    return true;
                }
                let eased = smoothstep(*frame as f32 / *frames as f32);
                let start = cell_center(*from);
                let end = cell_center(*to);
                camera.position = start + (end - start) * eased;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room() -> Grid {
        let mut grid = Grid::filled(7, 7);
        for row in 1..6 {
            for col in 1..6 {
                grid.set(Cell::new(row, col), CellState::Passage);
            }
        }
        grid.set(Cell::new(4, 3), CellState::Wall);
        grid
    }

    fn run_to_idle(controller: &mut AnimationController, camera: &mut Camera) -> u32 {
        let mut frames = 0;
        while controller.is_busy() {
            controller.advance(camera);
            frames += 1;
        }
        frames
    }

    #[test]
    fn test_turns_snap_to_exact_yaw_from_every_facing() {
        for start in Facing::ALL {
            for turn in [Turn::Left, Turn::Right] {
                let mut camera = Camera::new(Cell::new(3, 3), start);
                let mut controller = AnimationController::new(6, 6);
                assert!(controller.request_turn(&camera, turn));
                assert_eq!(run_to_idle(&mut controller, &mut camera), 6);
                let expected = start.turned(turn);
                assert_eq!(camera.facing, expected);
                assert_eq!(camera.yaw, expected.yaw());
                assert_eq!(camera.position, cell_center(Cell::new(3, 3)));
            }
        }
    }

    #[test]
    fn test_turn_takes_the_short_way_round() {
        let mut camera = Camera::new(Cell::new(3, 3), Facing::South);
        let mut controller = AnimationController::new(6, 6);
        controller.request_turn(&camera, Turn::Right);
        for _ in 0..3 {
            controller.advance(&mut camera);
        }
        // halfway between south (-π) and west (-π/2)
        let expected = -std::f32::consts::PI * 0.75;
        assert!((camera.yaw - expected).abs() < 1e-5, "{}", camera.yaw);
    }

    #[test]
    fn test_move_reaches_exact_cell_centre() {
        let grid = open_room();
        let mut camera = Camera::new(Cell::new(3, 3), Facing::East);
        let mut controller = AnimationController::new(6, 6);
        assert!(controller.request_move(&grid, &camera, Step::Forward));
        controller.advance(&mut camera);
        assert!(camera.position.x > 3.0 && camera.position.x < 4.0);
        assert_eq!(camera.cell, Cell::new(3, 3));
        run_to_idle(&mut controller, &mut camera);
        assert_eq!(camera.cell, Cell::new(3, 4));
        assert_eq!(camera.position, cell_center(Cell::new(3, 4)));
        assert_eq!(camera.yaw, Facing::East.yaw());
    }

    #[test]
    fn test_backward_step_keeps_facing() {
        let grid = open_room();
        let mut camera = Camera::new(Cell::new(3, 3), Facing::East);
        let mut controller = AnimationController::new(6, 6);
        assert!(controller.request_move(&grid, &camera, Step::Backward));
        run_to_idle(&mut controller, &mut camera);
        assert_eq!(camera.cell, Cell::new(3, 2));
        assert_eq!(camera.facing, Facing::East);
    }

    #[test]
    fn test_move_into_wall_is_rejected_without_side_effects() {
        let grid = open_room();
        let camera = Camera::new(Cell::new(3, 3), Facing::North);
        let before = camera;
        let mut controller = AnimationController::new(6, 6);
        assert!(!controller.request_move(&grid, &camera, Step::Forward));
        assert_eq!(controller.state(), &AnimationState::Idle);
        assert_eq!(camera, before);

        let edge = Camera::new(Cell::new(0, 0), Facing::South);
        assert!(!controller.request_move(&grid, &edge, Step::Forward));
    }

    #[test]
    fn test_requests_while_busy_are_ignored() {
        let grid = open_room();
        let mut camera = Camera::new(Cell::new(3, 3), Facing::East);
        let mut controller = AnimationController::new(6, 6);
        assert!(controller.request_turn(&camera, Turn::Left));
        controller.advance(&mut camera);
        let in_flight = *controller.state();
        assert!(!controller.request_turn(&camera, Turn::Right));
        assert!(!controller.request_move(&grid, &camera, Step::Forward));
        assert_eq!(controller.state(), &in_flight);
        assert!((in_flight.progress() - 1.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_advance_when_idle_is_a_no_op() {
        let mut camera = Camera::new(Cell::new(1, 1), Facing::West);
        let before = camera;
        let mut controller = AnimationController::new(0, 0);
        assert!(!controller.advance(&mut camera));
        assert_eq!(camera, before);
        assert!(controller.request_turn(&camera, Turn::Right));
        assert!(controller.advance(&mut camera));
        assert_eq!(camera.facing, Facing::North);
    }
}
