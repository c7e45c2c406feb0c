//! Keyboard input handling.
//!
//! This module defines the [`GameKey`] enum for abstracting maze actions from physical keys,
//! and provides [`KeyState`] for tracking held keys. Presses are turned into one-shot
//! [`Action`]s, while the held set becomes a [`HeldInput`] snapshot each frame.

use super::animation::Step;
use super::camera::Turn;
use super::{Action, HeldInput};
use std::collections::HashSet;
use winit::keyboard;

/// Every key the maze reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Turn left (Left Arrow).
    TurnLeft,
    /// Turn right (Right Arrow).
    TurnRight,
    /// Step or walk forward (W or Up Arrow).
    Forward,
    /// Step or walk backward (S or Down Arrow).
    Backward,
    /// Strafe left in free mode (A).
    StrafeLeft,
    /// Strafe right in free mode (D).
    StrafeRight,
    /// Generate a new maze (G).
    Regenerate,
    /// Show or hide the minimap (M).
    ToggleMinimap,
    /// Switch between grid and free movement (T).
    ToggleMode,
    /// Quit (Escape).
    Quit,
}

impl GameKey {
    /// The one-shot action a fresh press triggers, if any.
    pub fn action(self) -> Option<Action> {
        match self {
            GameKey::TurnLeft => Some(Action::Turn(Turn::Left)),
            GameKey::TurnRight => Some(Action::Turn(Turn::Right)),
            GameKey::Forward => Some(Action::Step(Step::Forward)),
            GameKey::Backward => Some(Action::Step(Step::Backward)),
            GameKey::Regenerate => Some(Action::Regenerate),
            GameKey::ToggleMinimap => Some(Action::ToggleMinimap),
            GameKey::ToggleMode => Some(Action::ToggleMode),
            GameKey::StrafeLeft | GameKey::StrafeRight | GameKey::Quit => None,
        }
    }
}

/// Tracks the set of currently pressed game keys.
#[derive(Debug, Default)]
pub struct KeyState {
    /// Set of currently pressed keys.
    pub pressed_keys: HashSet<GameKey>,
}

impl KeyState {
    /// Creates a new, empty [`KeyState`]
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
        }
    }

    /// Marks a key as pressed; `true` if it was not already held.
    pub fn press_key(&mut self, key: GameKey) -> bool {
        self.pressed_keys.insert(key)
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed_keys.remove(&key);
    }

    /// Checks if a key is currently pressed.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Forgets every held key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
    }

    /// Snapshot of the held keys for one frame.
    pub fn held_input(&self) -> HeldInput {
        HeldInput {
            forward: self.is_pressed(GameKey::Forward),
            backward: self.is_pressed(GameKey::Backward),
            turn_left: self.is_pressed(GameKey::TurnLeft),
            turn_right: self.is_pressed(GameKey::TurnRight),
            strafe_left: self.is_pressed(GameKey::StrafeLeft),
            strafe_right: self.is_pressed(GameKey::StrafeRight),
        }
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a [`GameKey`] if it matches a mapped action.
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => GameKey::Forward,
            ArrowDown => GameKey::Backward,
            ArrowLeft => GameKey::TurnLeft,
            ArrowRight => GameKey::TurnRight,
            Escape => GameKey::Quit,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => GameKey::Forward,
            "s" => GameKey::Backward,
            "a" => GameKey::StrafeLeft,
            "d" => GameKey::StrafeRight,
            "g" => GameKey::Regenerate,
            "m" => GameKey::ToggleMinimap,
            "t" => GameKey::ToggleMode,
        }),

        _ => None,
    }
}
