//! Mantrap entry point.
//!
//! Parses the command line, installs logging and either prints the maze,
//! prints a headless snapshot of the first frame, or opens the window.
//!
//! # Usage
//! `cargo run -- --seed 7 --mode free`. Set `RUST_LOG` to override the log filter.

#![warn(missing_docs)]

use anyhow::Context;
use clap::Parser;
use mantrap::app::App;
use mantrap::config::{Cli, Config};
use mantrap::game::World;
use mantrap::renderer::screen::SemigraphicScreen;
use tracing::info;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from(&cli);
    let mut world = World::new(config).context("failed to build the maze")?;

    if cli.print_maze {
        print!("{}", world.grid);
        return Ok(());
    }

    if cli.snapshot {
        let mut screen = SemigraphicScreen::new();
        world.draw(&mut screen);
        print!("{}", screen.ascii_snapshot());
        return Ok(());
    }

    pollster::block_on(run(world))
}

/// Logs at `info`, or `debug` with `-v`, unless `RUST_LOG` says otherwise.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Runs the window until it is closed.
async fn run(world: World) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(world);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.take_error() {
        return Err(err.into());
    }
    info!("window closed");
    Ok(())
}
