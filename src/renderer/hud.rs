//! Status readout printed to the right of the viewport.

use super::display::{DrawCommand, push_text};
use crate::config::MovementMode;
use crate::game::camera::Camera;
use crate::math::{rad_to_deg, wrap_360};

/// Text column the readout starts at, just right of the viewport frame.
pub fn status_column(viewport_right: i32) -> i32 {
    (viewport_right + 2) / 2
}

/// Position, heading, mode and key help on text rows 1, 3, 5 and 7.
pub fn status_commands(camera: &Camera, mode: MovementMode, viewport_right: i32) -> Vec<DrawCommand> {
    let col = status_column(viewport_right);
    let yaw_degrees = wrap_360(rad_to_deg(camera.yaw).round()) as i32 % 360;
    let mut commands = Vec::with_capacity(8);
    push_text(
        &mut commands,
        col,
        1,
        format!("X:{:5.2}  Z:{:5.2}", camera.position.x, camera.position.z),
    );
    push_text(
        &mut commands,
        col,
        3,
        format!("Yaw:{:03} Dir:{}", yaw_degrees, camera.facing.label()),
    );
    push_text(&mut commands, col, 5, format!("Mode:{}", mode.label()));
    push_text(&mut commands, col, 7, "T:Mode  G:New  M:Mini");
    commands
}
