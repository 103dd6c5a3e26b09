//! Vertical integrator.
//!
//! Vertical speed is signed along world Y. Gravity is a positive magnitude and
//! [`GravityDirection`](crate::config::GravityDirection) supplies its sign, so
//! inverted levels flip every formula here through one factor.
//!
//! A tick runs in two phases: [`advance`] settles the new speed (ground reset,
//! gravity, jump or modifier launch) and [`clamp_to_ground`] shortens the
//! displacement so the box never tunnels through the surface found by the
//! landing probe.

use bevy::prelude::*;

use crate::collision::Contact;
use crate::config::LocomotionConfig;
use crate::modifier::{launch_speed, Modifier};

/// What the vertical integrator needs to know about this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalInput {
    /// Ground sensor result for this tick.
    pub grounded: bool,
    /// Jump is held this tick.
    pub jump_held: bool,
    /// Modifier the actor overlaps this tick.
    pub modifier: Option<Modifier>,
    /// Tick length in seconds.
    pub dt: f32,
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VerticalStep {
    /// Displacement along world Y for this tick.
    pub displacement: f32,
    /// A jump or modifier set the speed this tick.
    pub launched: bool,
    /// The displacement was shortened to land exactly on the ground.
    pub clamped: bool,
}

/// Settle the vertical speed for this tick.
///
/// Returns `true` when a jump or modifier overrode the speed.
pub fn advance(speed: &mut f32, input: &VerticalInput, config: &LocomotionConfig) -> bool {
    let sign = config.gravity_direction.sign();
    let gravity = config.gravity.max(0.0);
    let modifier = input.modifier.filter(|_| input.jump_held);

    // Resting on ground: no accumulation while not moving away from it.
    if input.grounded && !input.jump_held && *speed * sign >= 0.0 {
        *speed = 0.0;
    } else {
        *speed += sign * gravity * input.dt;
    }

    match modifier {
        // Held jump over a modifier always belongs to the modifier, even when
        // the modifier is inert.
        Some(modifier) => match modifier.launch_speed(gravity, sign) {
            Some(launch) => {
                *speed = launch;
                true
            }
            None => false,
        },
        None if input.jump_held && input.grounded => {
            *speed = -sign * launch_speed(gravity, config.jump_height);
            true
        }
        None => false,
    }
}

/// Shorten `displacement` so the box stops on `ground`.
///
/// Only clamps when the move heads into the surface and would pass it.
/// Landing zeroes the speed. Returns the possibly shortened displacement and
/// whether it was clamped.
pub fn clamp_to_ground(speed: &mut f32, displacement: f32, ground: Option<&Contact>) -> (f32, bool) {
    let Some(ground) = ground else {
        return (displacement, false);
    };
    let into_surface = Vec2::new(0.0, displacement).dot(ground.normal) < 0.0;
    if into_surface && ground.distance < displacement.abs() {
        *speed = 0.0;
        (ground.distance.copysign(displacement), true)
    } else {
        (displacement, false)
    }
}

/// Run both phases for one tick.
///
/// `landing` is asked for the ground contact once the new speed is known and
/// receives the unclamped displacement, so the probe can reach far enough.
pub fn integrate(
    speed: &mut f32,
    input: &VerticalInput,
    config: &LocomotionConfig,
    landing: impl FnOnce(f32) -> Option<Contact>,
) -> VerticalStep {
    let launched = advance(speed, input, config);
    let raw = *speed * input.dt;
    let ground = landing(raw);
    let (displacement, clamped) = clamp_to_ground(speed, raw, ground.as_ref());
    VerticalStep {
        displacement,
        launched,
        clamped,
    }
}
