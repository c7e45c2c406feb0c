//! Windowed application shell.
//!
//! # Module Structure
//!
//! - [`app_state`]: Contains the [`AppState`] struct which holds all application state
//! - [`event_handler`]: Contains the [`App`] struct and event handling logic
//! - [`update`]: Contains the per-frame update and presentation
//!
//! # Event Flow
//!
//! 1. **Input Events**: key presses become one-shot actions, held keys are tracked
//! 2. **State Updates**: each redraw ticks the world with the held keys
//! 3. **Rendering**: the world is drawn onto the semigraphic screen and presented
//!
//! Everything runs on the event loop thread.

pub mod app_state;
pub mod event_handler;
pub mod update;

pub use app_state::AppState;
pub use event_handler::App;
