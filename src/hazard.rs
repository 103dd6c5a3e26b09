//! Hazard check.
//!
//! Two overlaps decide death: the full box against lethal geometry, and a
//! shrunken core box against solid geometry. The core test catches actors
//! crushed into walls or ceilings without killing them for brushing a floor.

use bevy::prelude::*;

use crate::config::LocomotionConfig;
use crate::geometry::{GeometryQuery, SweepQuery};

/// What killed the actor.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardCause {
    /// Full extent overlapped lethal geometry.
    Lethal,
    /// The core box was wedged into solid geometry.
    Obstruction,
}

/// Overlap both hazard masks around the actor.
///
/// Hits on the actor itself, trigger volumes and anything `is_exempt` accepts
/// (modifier pickups) are ignored.
pub fn check<G: GeometryQuery>(
    geometry: &G,
    config: &LocomotionConfig,
    actor: Option<Entity>,
    center: Vec2,
    extent: Vec2,
    angle: f32,
    is_exempt: impl Fn(Entity) -> bool,
) -> Option<HazardCause> {
    let overlaps = |size: Vec2, mask: u32| {
        let mut query = SweepQuery::overlap(center, size).rotated(angle).with_mask(mask);
        if let Some(entity) = actor {
            query = query.excluding(entity);
        }
        geometry.sweep(&query).into_iter().any(|contact| {
            !contact.is_from(actor)
                && !contact.is_trigger
                && !contact.entity.is_some_and(&is_exempt)
        })
    };

    if overlaps(extent, config.masks.lethal) {
        return Some(HazardCause::Lethal);
    }
    if overlaps(extent * config.obstruction_extent_scale, config.masks.obstruction) {
        return Some(HazardCause::Obstruction);
    }
    None
}
