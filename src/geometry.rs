//! Geometry query abstraction.
//!
//! The locomotion pipeline never talks to a physics engine directly. It issues
//! oriented box sweeps through [`GeometryQuery`] and reduces whatever comes back.

use bevy::prelude::*;

use crate::collision::Contact;

/// Service that sweeps oriented boxes through the level.
///
/// Implementations must report *every* surface the box touches before
/// travelling `max_distance`, not just the first one. Ordering is free; the
/// sensors reduce the set themselves.
///
/// A backend may cap how many hits one sweep reports. A capped backend must
/// keep the nearest hits and leave trigger volumes out of the count.
///
/// A query whose `max_distance` is zero or whose direction is zero is an
/// overlap test: every returned contact has distance `0.0`.
pub trait GeometryQuery {
    /// Sweep the box described by `query` and return all contacts.
    fn sweep(&self, query: &SweepQuery) -> Vec<Contact>;
}

impl<G: GeometryQuery + ?Sized> GeometryQuery for &G {
    fn sweep(&self, query: &SweepQuery) -> Vec<Contact> {
        (**self).sweep(query)
    }
}

/// Helper struct for building box sweeps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepQuery {
    /// Box center in world space.
    pub center: Vec2,
    /// Full box size (not half extents).
    pub size: Vec2,
    /// Box rotation in radians, counter-clockwise.
    pub angle: f32,
    /// Sweep direction (normalized, or zero for an overlap test).
    pub direction: Vec2,
    /// Maximum sweep distance.
    pub max_distance: f32,
    /// Collision layer mask; `None` means every layer.
    pub mask: Option<u32>,
    /// Collider to leave out of the results (usually the actor itself).
    pub exclude: Option<Entity>,
}

impl SweepQuery {
    /// Create a new sweep.
    pub fn new(center: Vec2, size: Vec2, direction: Vec2, max_distance: f32) -> Self {
        Self {
            center,
            size,
            angle: 0.0,
            direction: direction.normalize_or_zero(),
            max_distance: max_distance.max(0.0),
            mask: None,
            exclude: None,
        }
    }

    /// Create a zero-distance overlap test.
    pub fn overlap(center: Vec2, size: Vec2) -> Self {
        Self::new(center, size, Vec2::ZERO, 0.0)
    }

    /// Rotate the swept box.
    pub fn rotated(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// Restrict the sweep to a layer mask.
    pub fn with_mask(mut self, mask: u32) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Exclude an entity from the sweep.
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }

    /// Whether this query is an overlap test rather than a sweep.
    pub fn is_overlap(&self) -> bool {
        self.max_distance <= 0.0 || self.direction == Vec2::ZERO
    }

    /// Half extents of the swept box.
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }
}
