//! Command line parsing and runtime tunables.

use clap::{Parser, ValueEnum};

/// How the player moves through the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MovementMode {
    /// Discrete quarter turns and single-cell steps, animated.
    Grid,
    /// Continuous turning and walking with collide-and-slide.
    Free,
}

impl MovementMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            MovementMode::Grid => MovementMode::Free,
            MovementMode::Free => MovementMode::Grid,
        }
    }

    /// Short label shown in the status readout.
    pub fn label(self) -> &'static str {
        match self {
            MovementMode::Grid => "GRID",
            MovementMode::Free => "FREE",
        }
    }
}

/// First-person wireframe maze on a 160x100 semigraphic screen.
#[derive(Debug, Parser)]
#[command(name = "mantrap", version, about)]
pub struct Cli {
    /// Maze width in cells (odd, at least 5)
    #[arg(long, default_value_t = 21)]
    pub width: usize,

    /// Maze height in cells (odd, at least 5)
    #[arg(long, default_value_t = 21)]
    pub height: usize,

    /// Seed for reproducible mazes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Starting movement mode
    #[arg(long, value_enum, default_value_t = MovementMode::Grid)]
    pub mode: MovementMode,

    /// Vertical field of view in degrees, strictly between 0 and 180
    #[arg(long, default_value_t = 60.0, value_parser = parse_fov)]
    pub fov: f32,

    /// Start with the minimap hidden
    #[arg(long)]
    pub no_minimap: bool,

    /// Print the generated maze as ASCII and exit
    #[arg(long)]
    pub print_maze: bool,

    /// Render one frame headlessly, print it and exit
    #[arg(long)]
    pub snapshot: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Every tunable of the simulation and renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Base seed; regeneration `n` uses `seed + n`.
    pub seed: Option<u64>,
    /// Initial movement mode.
    pub mode: MovementMode,
    /// Whether the minimap is drawn at startup.
    pub show_minimap: bool,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// View-space depth below which geometry is clipped.
    pub near: f32,
    /// Distance the rendering eye sits behind the physical position.
    pub eye_back_offset: f32,
    /// Farthest depth that is drawn, also the vanishing ray range.
    pub max_render_depth: f32,
    /// Inverse-depth slack granted to an edge against its own face.
    pub edge_bias: f32,
    /// Frames a quarter turn takes in grid mode.
    pub turn_frames: u32,
    /// Frames a single-cell step takes in grid mode.
    pub move_frames: u32,
    /// Seconds between auto-repeated steps while a step key is held.
    pub move_repeat: f32,
    /// Free-mode forward speed in cells per second.
    pub move_speed: f32,
    /// Free-mode strafe speed in cells per second.
    pub strafe_speed: f32,
    /// Free-mode turn rate in degrees per second.
    pub turn_speed_degrees: f32,
    /// Upper bound for a single frame's delta time in free mode.
    pub max_frame_dt: f32,
    /// Collision circle radius.
    pub player_radius: f32,
    /// Longest displacement resolved in one collision sub-step.
    pub max_sub_step: f32,
    /// Push-out passes per collision sub-step.
    pub collision_iterations: u32,
    /// Cells drawn on each side of the player on the minimap.
    pub minimap_radius: i32,
    /// Pixel size of one minimap cell.
    pub minimap_cell_size: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 21,
            height: 21,
            seed: None,
            mode: MovementMode::Grid,
            show_minimap: true,
            fov_degrees: 60.0,
            near: 0.12,
            eye_back_offset: 0.14,
            max_render_depth: 8.0,
            edge_bias: 0.00025,
            turn_frames: 6,
            move_frames: 6,
            move_repeat: 0.12,
            move_speed: 1.8,
            strafe_speed: 1.6,
            turn_speed_degrees: 150.0,
            max_frame_dt: 0.05,
            player_radius: 0.28,
            max_sub_step: 0.15,
            collision_iterations: 3,
            minimap_radius: 5,
            minimap_cell_size: 4,
        }
    }
}

/// Parses a field of view that a pinhole projection can represent.
fn parse_fov(value: &str) -> Result<f32, String> {
    let degrees: f32 = value.parse().map_err(|err| format!("{err}"))?;
    if degrees > 0.0 && degrees < 180.0 {
        Ok(degrees)
    } else {
        Err(format!("{value} is not between 0 and 180 degrees"))
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            width: cli.width,
            height: cli.height,
            seed: cli.seed,
            mode: cli.mode,
            show_minimap: !cli.no_minimap,
            fov_degrees: cli.fov,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::parse_from([
            "mantrap",
            "--width",
            "31",
            "--seed",
            "7",
            "--mode",
            "free",
            "--no-minimap",
        ]);
        let config = Config::from(&cli);
        assert_eq!(config.width, 31);
        assert_eq!(config.height, 21);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.mode, MovementMode::Free);
        assert!(!config.show_minimap);
        assert_eq!(config.turn_frames, Config::default().turn_frames);
    }

    #[test]
    fn test_fov_outside_open_range_is_rejected() {
        for fov in ["0", "180", "-10", "NaN", "wide"] {
            assert!(Cli::try_parse_from(["mantrap", "--fov", fov]).is_err(), "{fov}");
        }
        let cli = Cli::try_parse_from(["mantrap", "--fov", "90"]).unwrap();
        assert_eq!(Config::from(&cli).fov_degrees, 90.0);
    }

    #[test]
    fn test_mode_toggle_round_trips() {
        assert_eq!(MovementMode::Grid.toggled(), MovementMode::Free);
        assert_eq!(MovementMode::Grid.toggled().toggled(), MovementMode::Grid);
        assert_eq!(MovementMode::Free.label(), "FREE");
    }
}
