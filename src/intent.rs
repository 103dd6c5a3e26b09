//! Run intent component.
//!
//! Intents carry what the input collaborator wants this tick. The pipeline
//! reads them; it never writes them.

use bevy::prelude::*;

/// Horizontal intent and jump state for an actor.
///
/// # Example
///
/// ```rust
/// use msg_slope_controller::prelude::*;
///
/// let mut intent = RunIntent::new();
/// intent.set_run(1.0);
/// assert!(intent.is_running());
///
/// intent.set_jump_held(true);
/// assert!(intent.jump_held);
///
/// intent.clear();
/// assert!(!intent.is_running());
/// assert!(!intent.jump_held);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct RunIntent {
    /// Horizontal intent (-1.0 = left, 1.0 = right).
    pub run: f32,
    /// Whether jump is held this tick.
    ///
    /// Jumping is level-triggered: holding jump while grounded keeps
    /// re-launching on every landing.
    pub jump_held: bool,
}

impl RunIntent {
    /// Create a new empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intent for an auto-running actor heading toward +X.
    pub fn auto_run() -> Self {
        Self {
            run: 1.0,
            jump_held: false,
        }
    }

    /// Set the horizontal intent (clamped to `[-1, 1]`).
    pub fn set_run(&mut self, direction: f32) {
        self.run = if direction.is_finite() {
            direction.clamp(-1.0, 1.0)
        } else {
            0.0
        };
    }

    /// Set the jump state.
    ///
    /// ```rust,ignore
    /// intent.set_jump_held(keyboard.pressed(KeyCode::Space));
    /// ```
    pub fn set_jump_held(&mut self, held: bool) {
        self.jump_held = held;
    }

    /// Clear all intents.
    pub fn clear(&mut self) {
        self.run = 0.0;
        self.jump_held = false;
    }

    /// Check if there is active horizontal input.
    pub fn is_running(&self) -> bool {
        self.run.abs() > 0.001
    }
}
