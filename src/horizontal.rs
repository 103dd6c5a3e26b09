//! Horizontal projector.
//!
//! Grounded motion follows the surface: the intent velocity is projected onto
//! the ground tangent and rescaled so the world-X component is unchanged.
//! Running up or down an incline therefore covers the same horizontal ground
//! per second as running on the flat.

use bevy::prelude::*;

/// Below this tangent X component the surface is treated as vertical.
const MIN_TANGENT_X: f32 = 1e-4;

/// Velocity the actor wants this tick before any surface correction.
#[inline]
pub fn intent_velocity(run: f32, horizontal_speed: f32) -> Vec2 {
    Vec2::new(run * horizontal_speed, 0.0)
}

/// Project `velocity` onto the surface with `normal` and scale it for `dt`.
///
/// Airborne actors move by the raw velocity. A near-vertical tangent yields
/// no horizontal motion at all.
pub fn project(velocity: Vec2, grounded: bool, normal: Vec2, dt: f32) -> Vec2 {
    if !grounded {
        return velocity * dt;
    }
    let normal = normal.normalize_or_zero();
    if normal == Vec2::ZERO {
        return velocity * dt;
    }

    let tangent = (velocity - velocity.dot(normal) * normal).normalize_or_zero();
    if tangent.x.abs() < MIN_TANGENT_X {
        return Vec2::ZERO;
    }
    tangent * (velocity.x / tangent.x) * dt
}
