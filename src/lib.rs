//! Mantrap - a first-person wireframe maze.
//!
//! A perfect maze is carved by randomized depth-first search, turned into
//! wall quads and silhouette edges, and drawn with hidden-line removal onto
//! a 160x100 monochrome semigraphic screen with an 80x25 text layer.
//!
//! # Architecture
//! - `maze/`: grid model, generator and wall geometry
//! - `game/`: camera, grid-mode animation, free-mode collision and the [`game::World`]
//! - `renderer/`: projection, occlusion renderer, minimap, status text, and the
//!   wgpu/glyphon presenter for the finished screen
//! - `app/`: winit application shell
//! - `math/`: small vector types and angle helpers

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod math;
pub mod maze;
pub mod renderer;
