//! Scene state management module.
//!
//! This module defines the [`World`] struct, which owns everything the frame loop mutates:
//! the maze, its wall geometry, the camera, the grid-mode animation and the
//! free-mode collision system. Input reaches it either as one-shot [`Action`]s
//! or as a [`HeldInput`] snapshot passed to [`World::tick`].

pub mod animation;
pub mod camera;
pub mod collision;
pub mod keys;

use self::animation::{AnimationController, Step};
use self::camera::{Camera, Facing, Turn};
use self::collision::CollisionSystem;
use crate::config::{Config, MovementMode};
use crate::error::MazeError;
use crate::math::vec::Vec2;
use crate::math::{deg_to_rad, wrap_pi};
use crate::maze::geometry::{self, Geometry};
use crate::maze::{Cell, Grid, generator};
use crate::renderer::display::{Display, DrawCommand, execute};
use crate::renderer::hud::status_commands;
use crate::renderer::minimap::MiniMapRenderer;
use crate::renderer::occlusion::OcclusionRenderer;
use crate::renderer::projection::Viewport;
use tracing::{debug, info};

/// Edge-triggered requests, one per key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Turn(Turn),
    Step(Step),
    Regenerate,
    ToggleMinimap,
    ToggleMode,
}

/// Keys held during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldInput {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
}

impl HeldInput {
    fn step(&self) -> Option<Step> {
        match (self.forward, self.backward) {
            (true, false) => Some(Step::Forward),
            (false, true) => Some(Step::Backward),
            _ => None,
        }
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i32 - negative as i32) as f32
}

/// Represents the entire mutable state of the maze walk.
///
/// The grid and its geometry are always replaced together, so the renderer
/// never sees walls from one maze and cells from another.
#[derive(Debug)]
pub struct World {
    pub config: Config,
    pub grid: Grid,
    pub geometry: Geometry,
    pub camera: Camera,
    pub animation: AnimationController,
    pub collision: CollisionSystem,
    pub mode: MovementMode,
    pub show_minimap: bool,
    /// Number of regenerations so far.
    pub generation: u64,
    renderer: OcclusionRenderer,
    minimap: MiniMapRenderer,
    repeat_timer: f32,
}

impl World {
    /// Generates the first maze and places the camera at the entry, facing East.
    pub fn new(config: Config) -> Result<Self, MazeError> {
        let grid = generator::generate(config.width, config.height, config.seed)?;
        let geometry = geometry::build(&grid);
        let camera = Camera::new(grid.entry, Facing::East);
        let viewport = Viewport::default();
        info!(
            width = grid.width,
            height = grid.height,
            quads = geometry.quads.len(),
            edges = geometry.edges.len(),
            "maze ready"
        );

        Ok(Self {
            animation: AnimationController::new(config.turn_frames, config.move_frames),
            collision: CollisionSystem::from_config(&config),
            mode: config.mode,
            show_minimap: config.show_minimap,
            generation: 0,
            renderer: OcclusionRenderer::new(&config, viewport),
            minimap: MiniMapRenderer::from_config(&config, viewport.x1 + 2),
            repeat_timer: 0.0,
            grid,
            geometry,
            camera,
            config,
        })
    }

    /// Builds a fresh maze and keeps the camera on the nearest open cell.
    ///
    /// Returns `Ok(false)` without touching anything while an animation runs.
    pub fn regenerate(&mut self) -> Result<bool, MazeError> {
        if self.animation.is_busy() {
            debug!("regenerate ignored while animating");
            return Ok(false);
        }
        let generation = self.generation + 1;
        let seed = self.config.seed.map(|seed| seed.wrapping_add(generation));
        let grid = generator::generate(self.config.width, self.config.height, seed)?;
        let geometry = geometry::build(&grid);

        let cell = grid.nearest_passage(self.camera.cell);
        self.camera.snap(cell, self.camera.facing);
        self.grid = grid;
        self.geometry = geometry;
        self.generation = generation;
        info!(generation, ?seed, row = cell.row, col = cell.col, "maze regenerated");
        Ok(true)
    }

    /// Switches between grid and free movement; refused while animating.
    ///
    /// Entering grid mode snaps the camera to the nearest open cell and the
    /// closest cardinal facing.
    pub fn toggle_mode(&mut self) -> bool {
        if self.animation.is_busy() {
            debug!("mode toggle ignored while animating");
            return false;
        }
        self.mode = self.mode.toggled();
        if self.mode == MovementMode::Grid {
            let cell = self.grid.nearest_passage(self.position_cell());
            self.camera.snap(cell, Facing::nearest(self.camera.yaw));
        }
        self.repeat_timer = 0.0;
        info!(mode = self.mode.label(), "movement mode");
        true
    }

    pub fn toggle_minimap(&mut self) {
        self.show_minimap = !self.show_minimap;
    }

    /// Dispatches one key press. Returns whether the action took effect.
    pub fn handle(&mut self, action: Action) -> Result<bool, MazeError> {
        let handled = match action {
            Action::Turn(turn) => {
                self.mode == MovementMode::Grid && self.animation.request_turn(&self.camera, turn)
            }
            Action::Step(step) => {
                let started = self.mode == MovementMode::Grid
                    && self.animation.request_move(&self.grid, &self.camera, step);
                if started {
                    self.repeat_timer = self.config.move_repeat;
                }
                started
            }
            Action::Regenerate => return self.regenerate(),
            Action::ToggleMinimap => {
                self.toggle_minimap();
                true
            }
            Action::ToggleMode => self.toggle_mode(),
        };
        Ok(handled)
    }

    /// Advances the scene by one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32, held: HeldInput) {
        match self.mode {
            MovementMode::Grid => self.tick_grid(dt, held),
            MovementMode::Free => self.tick_free(dt, held),
        }
    }

    fn tick_grid(&mut self, dt: f32, held: HeldInput) {
        self.animation.advance(&mut self.camera);

        let Some(step) = held.step() else {
            return;
        };
        self.repeat_timer -= dt.max(0.0);
        if self.repeat_timer <= 0.0 && !self.animation.is_busy() {
            if self.animation.request_move(&self.grid, &self.camera, step) {
                self.repeat_timer = self.config.move_repeat;
            } else {
                self.repeat_timer = 0.0;
            }
        }
    }

    fn tick_free(&mut self, dt: f32, held: HeldInput) {
        if !dt.is_finite() {
            return;
        }
        let dt = dt.clamp(0.0, self.config.max_frame_dt);

        let turn = axis(held.turn_right, held.turn_left);
        if turn != 0.0 {
            let rate = deg_to_rad(self.config.turn_speed_degrees);
            self.camera.yaw = wrap_pi(self.camera.yaw + turn * rate * dt);
        }

        let walk = axis(held.forward, held.backward) * self.config.move_speed * dt;
        let strafe = axis(held.strafe_right, held.strafe_left) * self.config.strafe_speed * dt;
        let delta: Vec2 = self.camera.forward() * walk + self.camera.right() * strafe;
        if delta.length() > 0.0 {
            self.camera.position = self.collision.resolve(&self.grid, self.camera.position, delta);
        }

        self.camera.cell = self.position_cell();
        self.camera.facing = Facing::nearest(self.camera.yaw);
    }

    /// Cell containing the physical position, clamped into the grid.
    fn position_cell(&self) -> Cell {
        let clamp = |value: f32, len: usize| {
            (value.round().max(0.0) as usize).min(len.saturating_sub(1))
        };
        Cell::new(
            clamp(self.camera.position.z, self.grid.height),
            clamp(self.camera.position.x, self.grid.width),
        )
    }

    /// The complete frame: clear, 3D view, status readout and minimap.
    pub fn render(&mut self) -> Vec<DrawCommand> {
        let mut commands = vec![DrawCommand::Clear];
        commands.extend(self.renderer.render(&self.grid, &self.geometry, &self.camera));
        commands.extend(status_commands(&self.camera, self.mode, self.renderer.viewport.x1));
        if self.show_minimap {
            commands.extend(self.minimap.render(&self.grid, &self.camera));
        }
        commands
    }

    /// Renders a frame straight onto `display`.
    pub fn draw<D: Display + ?Sized>(&mut self, display: &mut D) {
        let commands = self.render();
        execute(display, &commands);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::animation::AnimationState;
    use crate::maze::CellState;
    use crate::renderer::screen::SemigraphicScreen;

    fn seeded(seed: u64) -> World {
        World::new(Config {
            seed: Some(seed),
            ..Config::default()
        })
        .unwrap()
    }

    fn settle(world: &mut World) {
        for _ in 0..100 {
            if !world.animation.is_busy() {
                return;
            }
            world.tick(1.0 / 60.0, HeldInput::default());
        }
        panic!("animation never finished");
    }

    #[test]
    fn test_new_starts_at_entry_facing_east() {
        let world = seeded(1);
        assert_eq!(world.camera.cell, Cell::new(1, 1));
        assert_eq!(world.camera.facing, Facing::East);
        assert_eq!(world.camera.position, Vec2::new(1.0, 1.0));
        assert_eq!(world.camera.yaw, Facing::East.yaw());
    }

    #[test]
    fn test_invalid_dimensions_are_reported() {
        let err = World::new(Config {
            width: 4,
            ..Config::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            MazeError::InvalidDimensions {
                width: 4,
                height: 21
            }
        );
    }

    #[test]
    fn test_turn_left_then_step_forward() {
        let mut world = seeded(1);
        assert!(world.handle(Action::Turn(Turn::Left)).unwrap());
        settle(&mut world);
        assert_eq!(world.camera.facing, Facing::North);
        assert_eq!(world.camera.yaw, 0.0);

        // Seed 1 walls off the cell north of the entry and opens the one east of it.
        assert_eq!(world.grid.state(Cell::new(2, 1)), CellState::Wall);
        assert_eq!(world.grid.state(Cell::new(1, 2)), CellState::Passage);

        assert!(!world.handle(Action::Step(Step::Forward)).unwrap());
        assert!(!world.animation.is_busy());
        assert_eq!(world.camera.cell, Cell::new(1, 1));
        assert_eq!(world.camera.position, Vec2::new(1.0, 1.0));

        assert!(world.handle(Action::Turn(Turn::Right)).unwrap());
        settle(&mut world);
        assert_eq!(world.camera.facing, Facing::East);
        assert!(world.handle(Action::Step(Step::Forward)).unwrap());
        settle(&mut world);
        assert_eq!(world.camera.cell, Cell::new(1, 2));
        assert_eq!(world.camera.position, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_requests_while_busy_are_refused() {
        let mut world = seeded(3);
        assert!(world.handle(Action::Turn(Turn::Right)).unwrap());
        assert!(!world.handle(Action::Turn(Turn::Right)).unwrap());
        assert!(!world.handle(Action::Regenerate).unwrap());
        assert!(!world.handle(Action::ToggleMode).unwrap());
        assert_eq!(world.generation, 0);
        settle(&mut world);
        assert_eq!(world.camera.facing, Facing::South);
    }

    #[test]
    fn test_regenerate_uses_offset_seed_and_lands_on_passage() {
        let mut world = seeded(5);
        assert!(world.regenerate().unwrap());
        assert_eq!(world.generation, 1);
        let expected = generator::generate(21, 21, Some(6)).unwrap();
        assert_eq!(world.grid, expected);
        assert_eq!(world.geometry, geometry::build(&expected));
        assert_eq!(world.grid.state(world.camera.cell), CellState::Passage);
        assert_eq!(world.camera.yaw, world.camera.facing.yaw());
        assert_eq!(*world.animation.state(), AnimationState::Idle);
    }

    #[test]
    fn test_free_mode_walks_and_stays_out_of_walls() {
        let mut world = seeded(9);
        assert!(world.toggle_mode());
        assert_eq!(world.mode, MovementMode::Free);
        let held = HeldInput {
            forward: true,
            turn_left: true,
            ..HeldInput::default()
        };
        for _ in 0..600 {
            world.tick(1.0 / 60.0, held);
            assert!(world.collision.penetration(&world.grid, world.camera.position) <= 1e-3);
        }
        assert!((-std::f32::consts::PI..std::f32::consts::PI).contains(&world.camera.yaw));
    }

    #[test]
    fn test_step_actions_are_ignored_in_free_mode() {
        let mut world = seeded(2);
        world.toggle_mode();
        assert!(!world.handle(Action::Step(Step::Forward)).unwrap());
        assert!(!world.handle(Action::Turn(Turn::Left)).unwrap());
    }

    #[test]
    fn test_back_to_grid_snaps_pose() {
        let mut world = seeded(4);
        world.toggle_mode();
        world.camera.yaw = 0.3;
        world.camera.position = Vec2::new(1.2, 0.9);
        assert!(world.toggle_mode());
        assert_eq!(world.mode, MovementMode::Grid);
        assert_eq!(world.camera.facing, Facing::North);
        assert_eq!(world.camera.yaw, 0.0);
        assert_eq!(world.camera.cell, Cell::new(1, 1));
        assert_eq!(world.camera.position, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_held_step_repeats() {
        let mut world = seeded(7);
        let start = world.camera.cell;
        let held = HeldInput {
            forward: true,
            ..HeldInput::default()
        };
        for _ in 0..120 {
            world.tick(1.0 / 60.0, held);
        }
        settle(&mut world);
        assert_eq!(world.grid.state(Cell::new(1, 2)), CellState::Passage);
        assert!(world.camera.cell.col > start.col + 1, "{:?}", world.camera.cell);
        assert_eq!(world.camera.cell.row, start.row);
    }

    #[test]
    fn test_degenerate_fov_still_renders() {
        let mut world = World::new(Config {
            seed: Some(1),
            fov_degrees: 0.0,
            ..Config::default()
        })
        .unwrap();
        let commands = world.render();
        assert_eq!(commands.first(), Some(&DrawCommand::Clear));
        let mut screen = SemigraphicScreen::new();
        world.draw(&mut screen);
        assert!(screen.lit_count() > 0);
    }

    #[test]
    fn test_render_frame() {
        let mut world = seeded(1);
        let with_map = world.render();
        assert_eq!(with_map.first(), Some(&DrawCommand::Clear));
        world.toggle_minimap();
        let without_map = world.render();
        assert!(without_map.len() < with_map.len());

        let mut screen = SemigraphicScreen::new();
        world.draw(&mut screen);
        assert!(screen.lit_count() > 0);
        assert!(screen.text_line(5).contains("Mode:GRID"));
    }
}
