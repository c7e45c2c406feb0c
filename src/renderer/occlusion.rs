//! Hidden-line renderer for the first-person view.
//!
//! Each frame runs in two passes over a dense inverse-depth buffer that
//! covers the inside of the viewport frame:
//!
//! 1. Every front-facing wall quad is clipped, projected and scan-converted
//!    column by column. Inverse depth comes from the quad's plane equation,
//!    which is affine in screen X for vertical walls, and is stored as a
//!    per-pixel maximum.
//! 2. Every silhouette edge is clipped to the viewport, then stepped in
//!    screen space with its inverse depth interpolated linearly, which is
//!    exact under perspective. A pixel is plotted only where the edge is
//!    at least as near as the buffer, minus a small bias so an outline wins
//!    against its own face.
//!
//! The buffer is reset at the start of every [`OcclusionRenderer::render`]
//! call, so rendering the same inputs twice yields the same commands.

use super::display::{DrawCommand, PlotMode, push_frame};
use super::projection::{Projection, Viewport, clip_segment_far, clip_segment_rect, to_pixel};
use crate::config::Config;
use crate::game::camera::Camera;
use crate::math::vec::{Vec2, Vec3};
use crate::maze::Grid;
use crate::maze::geometry::{Geometry, WallQuad};

/// Plane offsets below this are treated as edge-on and skipped.
const PLANE_EPSILON: f32 = 1e-8;

/// Per-pixel nearest inverse depth over the inside of a viewport.
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    values: Vec<f32>,
}

impl DepthBuffer {
    /// A buffer covering the pixels strictly inside `viewport`'s frame.
    pub fn new(viewport: &Viewport) -> Self {
        let width = viewport.inner_width().max(0);
        let height = viewport.inner_height().max(0);
        Self {
            left: viewport.x0 + 1,
            top: viewport.y0 + 1,
            width,
            height,
            values: vec![f32::NEG_INFINITY; (width * height) as usize],
        }
    }

    /// Forgets every surface; all pixels become infinitely far.
    pub fn reset(&mut self) {
        self.values.fill(f32::NEG_INFINITY);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (col, row) = (x - self.left, y - self.top);
        if (0..self.width).contains(&col) && (0..self.height).contains(&row) {
            Some((row * self.width + col) as usize)
        } else {
            None
        }
    }

    /// Stored inverse depth; pixels outside the buffer read as infinitely far.
    pub fn get(&self, x: i32, y: i32) -> f32 {
        self.index(x, y)
            .map_or(f32::NEG_INFINITY, |index| self.values[index])
    }

    /// Keeps the nearer of the stored and the given inverse depth.
    pub fn write_max(&mut self, x: i32, y: i32, inv_z: f32) {
        if let Some(index) = self.index(x, y) {
            let slot = &mut self.values[index];
            if inv_z > *slot {
                *slot = inv_z;
            }
        }
    }

    /// Whether every pixel is still at its reset value.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|value| *value == f32::NEG_INFINITY)
    }
}

/// Distance along `direction` to the first wall cell, walking grid lines
/// with a DDA. `direction` must be a unit vector; `None` when no wall lies
/// within `max_distance`.
pub fn cast_ray(grid: &Grid, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<f32> {
    // shift so cell (row, col) covers [col, col+1) x [row, row+1)
    let ox = origin.x + 0.5;
    let oz = origin.z + 0.5;
    let mut col = ox.floor() as i64;
    let mut row = oz.floor() as i64;
    if grid.is_wall(row, col) {
        return Some(0.0);
    }

    let axis = |origin: f32, cell: i64, dir: f32| -> (i64, f32, f32) {
        if dir == 0.0 {
            return (0, f32::INFINITY, f32::INFINITY);
        }
        let delta = (1.0 / dir).abs();
        if dir < 0.0 {
            (-1, delta, (origin - cell as f32) * delta)
        } else {
            (1, delta, (cell as f32 + 1.0 - origin) * delta)
        }
    };
    let (step_col, delta_x, mut side_x) = axis(ox, col, direction.x);
    let (step_row, delta_z, mut side_z) = axis(oz, row, direction.z);

    loop {
        let distance = if side_x < side_z {
            col += step_col;
            let d = side_x;
            side_x += delta_x;
            d
        } else {
            row += step_row;
            let d = side_z;
            side_z += delta_z;
            d
        };
        if !(distance <= max_distance) {
            return None;
        }
        if grid.is_wall(row, col) {
            return Some(distance);
        }
    }
}

/// Renders the 3D view into draw commands.
#[derive(Debug, Clone)]
pub struct OcclusionRenderer {
    pub viewport: Viewport,
    pub projection: Projection,
    max_depth: f32,
    edge_bias: f32,
    eye_back_offset: f32,
    depth: DepthBuffer,
}

impl OcclusionRenderer {
    pub fn new(config: &Config, viewport: Viewport) -> Self {
        Self {
            viewport,
            projection: Projection::new(&viewport, config.fov_degrees, config.near),
            max_depth: config.max_render_depth,
            edge_bias: config.edge_bias,
            eye_back_offset: config.eye_back_offset,
            depth: DepthBuffer::new(&viewport),
        }
    }

    /// The depth buffer as left by the last frame.
    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Draws the viewport frame and the visible wireframe of the maze.
    pub fn render(&mut self, grid: &Grid, geometry: &Geometry, camera: &Camera) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        let viewport = self.viewport;
        push_frame(&mut commands, viewport.x0, viewport.y0, viewport.x1, viewport.y1);

        self.depth.reset();
        let eye = camera.eye(self.eye_back_offset);

        for quad in &geometry.quads {
            self.fill_quad(quad, camera, eye);
        }
        for edge in &geometry.edges {
            let a = camera.to_view(edge.a, eye);
            let b = camera.to_view(edge.b, eye);
            self.draw_edge(a, b, &mut commands);
        }

        if cast_ray(grid, camera.position, camera.forward(), self.max_depth).is_none() {
            self.push_vanishing_marker(&mut commands);
        }
        commands
    }

    /// Writes a quad's inverse depth into the buffer.
    fn fill_quad(&mut self, quad: &WallQuad, camera: &Camera, eye: Vec3) {
        let view = quad.vertices.map(|vertex| camera.to_view(vertex, eye));
        let normal = camera.rotate_to_view(quad.normal.vector());
        if normal.dot(&-view[0]) <= 0.0 {
            return;
        }
        if view.iter().all(|v| v.z() > self.max_depth) {
            return;
        }
        let polygon = self.projection.clip_polygon(&view);
        if polygon.len() < 3 {
            return;
        }

        // plane: normal . p + d0 = 0
        let d0 = -normal.dot(&polygon[0]);
        if d0.abs() < PLANE_EPSILON {
            return;
        }

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for point in &polygon {
            let sx = self.projection.screen_x(*point);
            min_x = min_x.min(sx);
            max_x = max_x.max(sx);
            min_y = min_y.min(point.y());
            max_y = max_y.max(point.y());
        }

        let viewport = self.viewport;
        let first = (to_pixel(min_x) - 1).max(viewport.x0 + 1);
        let last = (to_pixel(max_x) + 1).min(viewport.x1 - 1);
        let Projection {
            focal,
            center_x,
            center_y,
            ..
        } = self.projection;

        for x in first..=last {
            let rx = (x - center_x) as f32 / focal;
            let inv_z = -(normal.x() * rx + normal.z()) / d0;
            if !(inv_z > 0.0) {
                continue;
            }
            let top = center_y - to_pixel(max_y * focal * inv_z) - 1;
            let bottom = center_y - to_pixel(min_y * focal * inv_z) + 1;
            for y in top.max(viewport.y0 + 1)..=bottom.min(viewport.y1 - 1) {
                self.depth.write_max(x, y, inv_z);
            }
        }
    }

    /// Steps a view-space segment across the screen, plotting the pixels
    /// where it is not behind a nearer surface.
    pub fn draw_edge(&mut self, a: Vec3, b: Vec3, commands: &mut Vec<DrawCommand>) {
        let Some((a, b)) = self.projection.clip_segment(a, b) else {
            return;
        };
        let Some((a, b)) = clip_segment_far(a, b, self.max_depth) else {
            return;
        };
        let (Some(oa), Some(ob)) = (self.projection.offset(a), self.projection.offset(b)) else {
            return;
        };

        // Offsets that round onto pixels strictly inside the frame.
        let Projection { center_x, center_y, .. } = self.projection;
        let viewport = self.viewport;
        let min = (
            (viewport.x0 + 1 - center_x) as f32 - 0.5,
            (viewport.y0 + 1 - center_y) as f32 - 0.5,
        );
        let max = (
            (viewport.x1 - 1 - center_x) as f32 + 0.5,
            (viewport.y1 - 1 - center_y) as f32 + 0.5,
        );
        let Some((t0, t1)) = clip_segment_rect(oa, ob, min, max) else {
            return;
        };

        let (ia, ib) = (1.0 / a.z(), 1.0 / b.z());
        let at = |t: f32| {
            if t >= 1.0 {
                (ob.0, ob.1, ib)
            } else {
                (
                    oa.0 + (ob.0 - oa.0) * t,
                    oa.1 + (ob.1 - oa.1) * t,
                    ia + (ib - ia) * t,
                )
            }
        };
        let (sx, sy, iz0) = at(t0);
        let (ex, ey, iz1) = at(t1);
        let (x0, y0) = (center_x + to_pixel(sx), center_y + to_pixel(sy));
        let (x1, y1) = (center_x + to_pixel(ex), center_y + to_pixel(ey));

        let steps = (x1 - x0).abs().max((y1 - y0).abs());
        let n = steps.max(1) as f32;
        let step_x = (x1 - x0) as f32 / n;
        let step_y = (y1 - y0) as f32 / n;
        let step_z = (iz1 - iz0) / n;

        for i in 0..=steps {
            let t = i as f32;
            let x = (x0 as f32 + step_x * t).round() as i32;
            let y = (y0 as f32 + step_y * t).round() as i32;
            let inv_z = iz0 + step_z * t;
            if !self.viewport.contains_inner(x, y) {
                continue;
            }
            if inv_z >= self.depth.get(x, y) - self.edge_bias {
                self.depth.write_max(x, y, inv_z);
                commands.push(DrawCommand::Plot {
                    x,
                    y,
                    mode: PlotMode::Set,
                });
            }
        }
    }

    /// Clears the buffer ahead of drawing edges by hand.
    pub fn begin_frame(&mut self) {
        self.depth.reset();
    }

    /// An X spanning a one-cell corridor cross-section at maximum depth.
    fn push_vanishing_marker(&self, commands: &mut Vec<DrawCommand>) {
        let depth = self.max_depth;
        let corner = |x: f32, y: f32| self.projection.project(Vec3::new(x, y, depth));
        let diagonals = [
            (corner(-0.5, 0.5), corner(0.5, -0.5)),
            (corner(0.5, 0.5), corner(-0.5, -0.5)),
        ];
        for (start, end) in diagonals {
            if let (Some((x0, y0)), Some((x1, y1))) = (start, end) {
                commands.push(DrawCommand::Line { x0, y0, x1, y1 });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::camera::Facing;
    use crate::maze::geometry::build;
    use crate::maze::generator::generate;
    use crate::maze::{Cell, CellState};
    use crate::renderer::display::execute;
    use crate::renderer::screen::SemigraphicScreen;

    fn corridor(length: usize) -> Grid {
        let mut grid = Grid::filled(length + 2, 5);
        for col in 1..=length {
            grid.set(Cell::new(2, col), CellState::Passage);
        }
        grid
    }

    fn renderer() -> OcclusionRenderer {
        OcclusionRenderer::new(&Config::default(), Viewport::default())
    }

    fn marker_lines(commands: &[DrawCommand]) -> usize {
        // the first four lines are the viewport frame
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
            - 4
    }

    #[test]
    fn test_render_is_idempotent() {
        let grid = generate(21, 21, Some(1)).unwrap();
        let geometry = build(&grid);
        let camera = Camera::new(grid.entry, Facing::East);
        let mut renderer = renderer();
        let first = renderer.render(&grid, &geometry, &camera);
        let second = renderer.render(&grid, &geometry, &camera);
        assert_eq!(first, second);
        assert!(first.len() > 4);
    }

    #[test]
    fn test_wall_ahead_draws_outline_without_marker() {
        let grid = corridor(3);
        let geometry = build(&grid);
        let camera = Camera::new(Cell::new(2, 1), Facing::East);
        let mut renderer = renderer();
        let commands = renderer.render(&grid, &geometry, &camera);
        assert_eq!(marker_lines(&commands), 0);
        assert!(!renderer.depth().is_empty());

        let mut screen = SemigraphicScreen::new();
        execute(&mut screen, &commands);
        let viewport = renderer.viewport;
        let inside = (viewport.x0 + 1..viewport.x1)
            .flat_map(|x| (viewport.y0 + 1..viewport.y1).map(move |y| (x, y)))
            .filter(|&(x, y)| screen.is_set(x, y))
            .count();
        assert!(inside > 0);
    }

    #[test]
    fn test_open_corridor_draws_vanishing_marker() {
        let grid = corridor(15);
        let geometry = build(&grid);
        let camera = Camera::new(Cell::new(2, 1), Facing::East);
        let commands = renderer().render(&grid, &geometry, &camera);
        assert_eq!(marker_lines(&commands), 2);
    }

    #[test]
    fn test_cast_ray_hits_end_wall() {
        let grid = corridor(3);
        let hit = cast_ray(&grid, Vec2::new(1.0, 2.0), Vec2::new(1.0, 0.0), 8.0).unwrap();
        assert!((hit - 2.5).abs() < 1e-5);
        let side = cast_ray(&grid, Vec2::new(1.0, 2.0), Vec2::new(0.0, 1.0), 8.0).unwrap();
        assert!((side - 0.5).abs() < 1e-5);
        assert!(cast_ray(&corridor(20), Vec2::new(1.0, 2.0), Vec2::new(1.0, 0.0), 8.0).is_none());
    }

    #[test]
    fn test_back_facing_and_distant_quads_leave_depth_empty() {
        let mut renderer = renderer();
        let camera = Camera::new(Cell::new(2, 2), Facing::North);
        let eye = camera.eye(0.0);
        // faces north while sitting north of the camera: seen from behind
        let behind = WallQuad {
            vertices: [
                Vec3::new(1.5, 0.0, 4.5),
                Vec3::new(2.5, 0.0, 4.5),
                Vec3::new(2.5, 1.0, 4.5),
                Vec3::new(1.5, 1.0, 4.5),
            ],
            normal: crate::maze::geometry::NormalCode::PosZ,
        };
        renderer.begin_frame();
        renderer.fill_quad(&behind, &camera, eye);
        assert!(renderer.depth().is_empty());

        let far = WallQuad {
            vertices: behind.vertices.map(|v| Vec3::new(v.x(), v.y(), 40.0)),
            normal: crate::maze::geometry::NormalCode::NegZ,
        };
        renderer.fill_quad(&far, &camera, eye);
        assert!(renderer.depth().is_empty());

        let near = WallQuad {
            vertices: behind.vertices,
            normal: crate::maze::geometry::NormalCode::NegZ,
        };
        renderer.fill_quad(&near, &camera, eye);
        assert!(!renderer.depth().is_empty());
    }

    #[test]
    fn test_nearer_edge_wins_in_either_order() {
        let near_a = Vec3::new(-0.5, 0.0, 2.0);
        let near_b = Vec3::new(0.5, 0.0, 2.0);
        let far_a = Vec3::new(-1.0, 0.0, 4.0);
        let far_b = Vec3::new(1.0, 0.0, 4.0);

        let draw = |edges: &[(Vec3, Vec3)]| {
            let mut renderer = renderer();
            renderer.begin_frame();
            let mut commands = Vec::new();
            for &(a, b) in edges {
                renderer.draw_edge(a, b, &mut commands);
            }
            let mut screen = SemigraphicScreen::new();
            execute(&mut screen, &commands);
            (screen, renderer)
        };

        let (near_only, reference) = draw(&[(near_a, near_b)]);
        let (near_first, _) = draw(&[(near_a, near_b), (far_a, far_b)]);
        let (far_first, _) = draw(&[(far_a, far_b), (near_a, near_b)]);

        let viewport = reference.viewport;
        let y = viewport.center_y();
        let mut shared = 0;
        for x in viewport.x0 + 1..viewport.x1 {
            if near_only.is_set(x, y) {
                shared += 1;
                assert!(near_first.is_set(x, y));
                assert!(far_first.is_set(x, y));
                assert!(reference.depth().get(x, y) > 0.49);
            }
        }
        assert!(shared > 0);
    }

    #[test]
    fn test_far_edge_is_hidden_behind_near_edge() {
        let mut renderer = renderer();
        renderer.begin_frame();
        let mut near = Vec::new();
        renderer.draw_edge(Vec3::new(-0.5, 0.0, 2.0), Vec3::new(0.5, 0.0, 2.0), &mut near);
        let mut far = Vec::new();
        renderer.draw_edge(Vec3::new(-0.25, 0.0, 4.0), Vec3::new(0.25, 0.0, 4.0), &mut far);
        assert!(!near.is_empty());
        assert!(far.is_empty());
    }

    #[test]
    fn test_long_edge_is_clipped_to_the_viewport() {
        let mut renderer = renderer();
        renderer.begin_frame();
        let mut commands = Vec::new();
        // spans hundreds of thousands of pixels, mostly off screen
        renderer.draw_edge(
            Vec3::new(-1000.0, 0.0, 0.2),
            Vec3::new(1000.0, 0.0, 0.2),
            &mut commands,
        );
        let viewport = renderer.viewport;
        let plotted: Vec<(i32, i32)> = commands
            .iter()
            .filter_map(|command| match *command {
                DrawCommand::Plot { x, y, .. } => Some((x, y)),
                _ => None,
            })
            .collect();
        assert_eq!(plotted.len() as i32, viewport.inner_width());
        assert!(plotted.iter().all(|&(_, y)| y == viewport.center_y()));
        assert!(plotted.iter().all(|&(x, y)| viewport.contains_inner(x, y)));
        assert!((renderer.depth().get(viewport.center_x(), viewport.center_y()) - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_fov_renders_without_overflow() {
        let grid = generate(21, 21, Some(1)).unwrap();
        let geometry = build(&grid);
        let camera = Camera::new(grid.entry, Facing::East);
        for fov_degrees in [0.0, 180.0, f32::NAN] {
            let config = Config {
                fov_degrees,
                ..Config::default()
            };
            let mut renderer = OcclusionRenderer::new(&config, Viewport::default());
            let commands = renderer.render(&grid, &geometry, &camera);
            assert!(commands.len() >= 4);
        }
    }

    #[test]
    fn test_edge_behind_eye_is_dropped() {
        let mut renderer = renderer();
        renderer.begin_frame();
        let mut commands = Vec::new();
        renderer.draw_edge(Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 0.0, -2.0), &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_camera_on_wall_plane_does_not_panic() {
        let grid = corridor(3);
        let geometry = build(&grid);
        let mut camera = Camera::new(Cell::new(2, 1), Facing::North);
        camera.position = Vec2::new(0.5, 2.0);
        let commands = renderer().render(&grid, &geometry, &camera);
        assert!(commands.len() >= 4);
    }
}
