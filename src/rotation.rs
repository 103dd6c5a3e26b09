//! Rotation aligner.
//!
//! Airborne actors spin clockwise at a rate that completes half a turn over a
//! full jump. Grounded actors settle onto the nearest right-angle orientation
//! relative to the slope they stand on.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy::prelude::*;

use crate::config::LocomotionConfig;
use crate::slope::signed_angle;

/// Time from launch to landing for a default jump: `2 * sqrt(2h / g)`.
///
/// Returns `None` when gravity or jump height makes the flight degenerate.
pub fn full_flight_time(gravity: f32, jump_height: f32) -> Option<f32> {
    if gravity <= 0.0 || jump_height <= 0.0 {
        return None;
    }
    let time = 2.0 * (2.0 * jump_height / gravity).sqrt();
    (time.is_finite() && time > 0.0).then_some(time)
}

/// Angular rate in radians/second for `config`.
pub fn rotation_rate(config: &LocomotionConfig) -> f32 {
    match full_flight_time(config.gravity, config.jump_height) {
        Some(time) => PI / time,
        None => config.fallback_rotation_rate,
    }
}

/// Wrap an angle into `[-PI, PI)`.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Step `current` toward `target` along the shorter arc by at most `max_step`.
pub fn rotate_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = wrap_angle(target - current);
    if delta.abs() <= max_step {
        current + delta
    } else {
        current + max_step * delta.signum()
    }
}

/// Resting orientation for an actor at `current` on a surface with `normal`.
///
/// The nearest multiple of 90 degrees to `current`, offset by the signed
/// slope angle. Halfway cases round to an even quarter turn, so a box resting
/// at 45 degrees on a 45 degree incline keeps its target.
pub fn resting_angle(current: f32, normal: Vec2, up: Vec2) -> f32 {
    let slope = signed_angle(up, normal);
    (current / FRAC_PI_2).round_ties_even() * FRAC_PI_2 + slope
}

/// Advance the actor's orientation by one tick.
pub fn align(
    current: f32,
    grounded: bool,
    jump_held: bool,
    normal: Vec2,
    config: &LocomotionConfig,
    dt: f32,
) -> f32 {
    let step = rotation_rate(config) * dt;
    let next = if grounded && !jump_held {
        rotate_towards(current, resting_angle(current, normal, config.up()), step)
    } else {
        current - step
    };
    wrap_angle(next)
}
