//! Slope solver.
//!
//! Turns the alignment sweep's contact into the rotation and direction of the
//! short contact sweep, so grounded detection leans into inclines instead of
//! always firing straight down.

use bevy::prelude::*;

use crate::collision::Contact;

/// Orientation of the contact sweep for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeSolution {
    /// Signed angle (radians, counter-clockwise positive) from "up" to the surface normal.
    pub cast_angle: f32,
    /// Direction the contact sweep travels (negated surface normal).
    pub cast_direction: Vec2,
}

impl SlopeSolution {
    /// Flat-ground solution for the given "up".
    pub fn flat(up: Vec2) -> Self {
        Self {
            cast_angle: 0.0,
            cast_direction: -up,
        }
    }
}

/// Signed angle in radians rotating `from` onto `to`, counter-clockwise positive.
#[inline]
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    from.perp_dot(to).atan2(from.dot(to))
}

/// Solve the contact sweep orientation from the alignment contact.
///
/// No contact gives the flat-ground default: zero angle, straight down.
pub fn solve(alignment: Option<&Contact>, up: Vec2) -> SlopeSolution {
    match alignment {
        Some(contact) => {
            let normal = contact.normal.normalize_or(up);
            SlopeSolution {
                cast_angle: signed_angle(up, normal),
                cast_direction: -normal,
            }
        }
        None => SlopeSolution::flat(up),
    }
}
