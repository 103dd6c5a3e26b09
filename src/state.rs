//! Actor state and marker components.
//!
//! [`ActorState`] is the single record the locomotion pipeline mutates. The
//! marker components mirror it for queries and are synced after every tick.

use bevy::prelude::*;

/// Per-actor locomotion state.
///
/// Grounded flag, ground normal and cast direction are re-derived from
/// scratch every tick; only position, orientation, vertical speed and the
/// dead flag carry over between ticks.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct ActorState {
    /// Box center in world space.
    pub position: Vec2,
    /// Rotation around the facing axis, radians.
    pub angle: f32,
    /// Full box size of the actor.
    pub extent: Vec2,
    /// Signed speed along world Y (positive = world up).
    pub vertical_speed: f32,
    /// Signed horizontal speed applied last tick (units/second).
    pub horizontal_speed: f32,
    /// Whether a walkable contact was found this tick.
    pub grounded: bool,
    /// Normal of the supporting surface (anti-gravity when airborne).
    pub ground_normal: Vec2,
    /// Slope-corrected "down" used by the contact sweep.
    pub cast_direction: Vec2,
    /// Signed slope angle (radians) used to rotate the contact sweep.
    pub cast_angle: f32,
    /// Set when a hazard was touched. Cleared only by [`ActorState::respawn`].
    pub dead: bool,
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            angle: 0.0,
            extent: Vec2::ONE,
            vertical_speed: 0.0,
            horizontal_speed: 0.0,
            grounded: false,
            ground_normal: Vec2::Y,
            cast_direction: Vec2::NEG_Y,
            cast_angle: 0.0,
            dead: false,
        }
    }
}

impl ActorState {
    /// Create a state for an actor spawned at `position` with the given box size.
    pub fn new(position: Vec2, extent: Vec2) -> Self {
        Self {
            position,
            extent: extent.abs(),
            ..default()
        }
    }

    /// Reset everything except the extent and place the actor at `position`.
    pub fn respawn(&mut self, position: Vec2) {
        *self = Self::new(position, self.extent);
    }

    /// Half the box size.
    #[inline]
    pub fn half_extent(&self) -> Vec2 {
        self.extent * 0.5
    }
}

/// Marker component indicating the actor is grounded.
///
/// This is a marker component - it has no data, just indicates state.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use msg_slope_controller::prelude::*;
///
/// fn check_grounded(grounded: Option<&Grounded>) -> bool {
///     grounded.is_some()
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the actor is airborne.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Marker component indicating the actor touched a hazard and is frozen
/// until respawned.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Dead;

/// Sent when an actor gains or loses ground contact.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct GroundedChanged {
    /// Actor whose contact changed.
    pub entity: Entity,
    /// New grounded flag.
    pub grounded: bool,
    /// Ground normal on landing, "up" on takeoff.
    pub normal: Vec2,
}

/// Sent once when an actor touches a hazard.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ActorDied {
    /// Actor that died.
    pub entity: Entity,
    /// Where the actor was when it died.
    pub position: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_airborne_and_neutral() {
        let state = ActorState::default();
        assert!(!state.grounded);
        assert!(!state.dead);
        assert_eq!(state.ground_normal, Vec2::Y);
        assert_eq!(state.cast_direction, Vec2::NEG_Y);
        assert_eq!(state.extent, Vec2::ONE);
    }

    #[test]
    fn new_takes_absolute_extent() {
        let state = ActorState::new(Vec2::new(1.0, 2.0), Vec2::new(-2.0, 4.0));
        assert_eq!(state.position, Vec2::new(1.0, 2.0));
        assert_eq!(state.extent, Vec2::new(2.0, 4.0));
        assert_eq!(state.half_extent(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn respawn_clears_motion_and_death() {
        let mut state = ActorState::new(Vec2::ZERO, Vec2::splat(2.0));
        state.vertical_speed = -12.0;
        state.angle = 1.0;
        state.dead = true;
        state.grounded = true;

        state.respawn(Vec2::new(5.0, 5.0));

        assert_eq!(state.position, Vec2::new(5.0, 5.0));
        assert_eq!(state.extent, Vec2::splat(2.0));
        assert_eq!(state.vertical_speed, 0.0);
        assert_eq!(state.angle, 0.0);
        assert!(!state.dead);
        assert!(!state.grounded);
    }
}
