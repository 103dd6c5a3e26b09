//! Jump modifier pickups.
//!
//! A modifier is level content. The pipeline only reads it on ticks where the
//! actor overlaps it and never keeps a reference past that tick.

use bevy::prelude::*;

/// How a modifier changes the jump.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModifierKind {
    /// Launch against gravity using the modifier's height.
    #[default]
    Default,
    /// Launch along gravity using the magnitude of the modifier's height.
    Inverting,
}

/// A jump/gravity modifier attached to a level entity.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct Modifier {
    /// Polarity of the modifier.
    pub kind: ModifierKind,
    /// Launch height parameter.
    pub height: f32,
}

impl Default for Modifier {
    fn default() -> Self {
        Self {
            kind: ModifierKind::Default,
            height: 2.0,
        }
    }
}

impl Modifier {
    /// Modifier launching against gravity to `height`.
    pub fn launch(height: f32) -> Self {
        Self {
            kind: ModifierKind::Default,
            height,
        }
    }

    /// Modifier slamming the actor along gravity.
    pub fn inverting(height: f32) -> Self {
        Self {
            kind: ModifierKind::Inverting,
            height,
        }
    }

    /// Launch speed along world Y this modifier sets, or `None` if inert.
    ///
    /// `gravity` is the magnitude and `gravity_sign` the sign of gravity along
    /// world Y (`-1.0` when gravity pulls down).
    pub fn launch_speed(&self, gravity: f32, gravity_sign: f32) -> Option<f32> {
        match self.kind {
            ModifierKind::Default if self.height >= 0.0 => {
                Some(-gravity_sign * launch_speed(gravity, self.height))
            }
            ModifierKind::Default => None,
            ModifierKind::Inverting => {
                Some(gravity_sign * launch_speed(gravity, self.height.abs()))
            }
        }
    }
}

/// Closed-form speed reaching `height` under `gravity`: `sqrt(2 g h)`.
#[inline]
pub fn launch_speed(gravity: f32, height: f32) -> f32 {
    (2.0 * gravity.max(0.0) * height.max(0.0)).sqrt()
}
