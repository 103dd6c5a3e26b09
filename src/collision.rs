//! Contact records returned by geometry queries.
//!
//! A [`Contact`] lives for exactly one simulation tick: it is produced by a
//! sweep, reduced by the sensors and then dropped.

use bevy::prelude::*;

/// Collision layer bits used by the default [`SensorMasks`](crate::config::SensorMasks).
///
/// Backends map these onto their own filtering scheme (Rapier collision groups
/// for the bundled backend).
pub mod layers {
    /// Walkable level geometry.
    pub const GROUND: u32 = 1 << 0;
    /// Spikes and other geometry that kills on touch.
    pub const HAZARD: u32 = 1 << 1;
    /// Jump/gravity modifier pickups.
    pub const MODIFIER: u32 = 1 << 2;
    /// Every layer.
    pub const ALL: u32 = u32::MAX;
}

/// A single surface reported by a sweep or overlap query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Distance travelled along the sweep before touching (0 when already overlapping).
    pub distance: f32,
    /// Outward surface normal at the contact.
    pub normal: Vec2,
    /// World position of the contact point.
    pub point: Vec2,
    /// Collider that was hit (if the backend knows it).
    pub entity: Option<Entity>,
    /// Whether the collider is a non-blocking trigger volume.
    pub is_trigger: bool,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            distance: 0.0,
            normal: Vec2::Y,
            point: Vec2::ZERO,
            entity: None,
            is_trigger: false,
        }
    }
}

impl Contact {
    /// Create a blocking contact.
    pub fn new(distance: f32, normal: Vec2, point: Vec2, entity: Option<Entity>) -> Self {
        Self {
            distance: distance.max(0.0),
            normal: normal.normalize_or(Vec2::Y),
            point,
            entity,
            is_trigger: false,
        }
    }

    /// Create a zero-distance overlap contact.
    pub fn overlap(point: Vec2, entity: Option<Entity>) -> Self {
        Self::new(0.0, Vec2::Y, point, entity)
    }

    /// Mark this contact as a trigger volume.
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Whether this contact belongs to `entity`.
    #[inline]
    pub fn is_from(&self, entity: Option<Entity>) -> bool {
        entity.is_some() && self.entity == entity
    }

    /// Unsigned angle in radians between this contact's normal and `up`.
    pub fn angle_from(&self, up: Vec2) -> f32 {
        self.normal.dot(up).clamp(-1.0, 1.0).acos()
    }
}
