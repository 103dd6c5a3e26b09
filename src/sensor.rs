//! Ground sensor.
//!
//! Every sensor here issues one sweep and reduces the hit set to the single
//! most relevant contact. Nothing is cached between ticks.
//!
//! The reduction drops self hits, trigger volumes and anything steeper than
//! the slope filter, then keeps the nearest contact. Equal distances are
//! broken by the flatter normal so the choice does not depend on the order
//! the backend reports hits in.

use std::cmp::Ordering;

use bevy::prelude::*;

use crate::collision::Contact;
use crate::config::LocomotionConfig;
use crate::geometry::{GeometryQuery, SweepQuery};
use crate::modifier::Modifier;

/// Result of the short contact sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    /// At least one walkable contact was found.
    pub grounded: bool,
    /// Normal of the nearest walkable contact, or "up" when none was found.
    pub normal: Vec2,
    /// Number of walkable contacts.
    pub count: usize,
    /// The nearest walkable contact.
    pub nearest: Option<Contact>,
}

impl GroundContact {
    /// Airborne result with a neutral normal.
    pub fn airborne(up: Vec2) -> Self {
        Self {
            grounded: false,
            normal: up,
            count: 0,
            nearest: None,
        }
    }
}

/// Reduce a hit set to its nearest walkable contact and the walkable count.
pub fn reduce_ground(
    contacts: impl IntoIterator<Item = Contact>,
    actor: Option<Entity>,
    config: &LocomotionConfig,
) -> (Option<Contact>, usize) {
    let up = config.up();
    let mut count = 0;
    let mut nearest: Option<Contact> = None;

    for contact in contacts {
        if contact.is_from(actor) || contact.is_trigger || !config.is_walkable(contact.normal) {
            continue;
        }
        count += 1;
        let closer = match nearest {
            None => true,
            Some(best) => match contact.distance.total_cmp(&best.distance) {
                Ordering::Less => true,
                Ordering::Equal => contact.angle_from(up) < best.angle_from(up),
                Ordering::Greater => false,
            },
        };
        if closer {
            nearest = Some(contact);
        }
    }

    (nearest, count)
}

/// Ground sensor bound to one actor and its geometry service.
pub struct GroundSensor<'a, G: GeometryQuery> {
    geometry: &'a G,
    config: &'a LocomotionConfig,
    actor: Option<Entity>,
}

impl<'a, G: GeometryQuery> GroundSensor<'a, G> {
    /// Create a sensor for `actor` (pass `None` for a headless actor).
    pub fn new(geometry: &'a G, config: &'a LocomotionConfig, actor: Option<Entity>) -> Self {
        Self {
            geometry,
            config,
            actor,
        }
    }

    fn query(&self, query: SweepQuery, mask: u32) -> Vec<Contact> {
        let query = query.with_mask(mask);
        let query = match self.actor {
            Some(entity) => query.excluding(entity),
            None => query,
        };
        self.geometry.sweep(&query)
    }

    /// Long-range sweep of the full extent along `down`, unrotated.
    ///
    /// Returns the nearest walkable contact, if any.
    pub fn sense_alignment(
        &self,
        center: Vec2,
        extent: Vec2,
        down: Vec2,
        max_distance: f32,
    ) -> Option<Contact> {
        let hits = self.query(
            SweepQuery::new(center, extent, down, max_distance),
            self.config.masks.ground,
        );
        let (nearest, _) = reduce_ground(hits, self.actor, self.config);
        nearest
    }

    /// Short-range sweep of the box rotated by `cast_angle` along `cast_direction`.
    ///
    /// Grounded means at least one walkable contact. With no contact the normal
    /// is "up" so the rotation aligner does not snap.
    pub fn sense_contact(
        &self,
        center: Vec2,
        extent: Vec2,
        cast_angle: f32,
        cast_direction: Vec2,
        distance: f32,
    ) -> GroundContact {
        let hits = self.query(
            SweepQuery::new(center, extent, cast_direction, distance).rotated(cast_angle),
            self.config.masks.ground,
        );
        let (nearest, count) = reduce_ground(hits, self.actor, self.config);
        match nearest {
            Some(contact) => GroundContact {
                grounded: true,
                normal: contact.normal,
                count,
                nearest: Some(contact),
            },
            None => GroundContact::airborne(self.config.up()),
        }
    }

    /// Sweep along gravity to measure how far the actor may fall this tick.
    pub fn sense_landing(
        &self,
        center: Vec2,
        extent: Vec2,
        cast_angle: f32,
        reach: f32,
    ) -> Option<Contact> {
        let reach = reach.max(self.config.landing_probe_distance);
        let hits = self.query(
            SweepQuery::new(center, extent, self.config.down(), reach).rotated(cast_angle),
            self.config.masks.ground,
        );
        let (nearest, _) = reduce_ground(hits, self.actor, self.config);
        nearest
    }

    /// Overlap the full extent with the modifier mask and return the first
    /// modifier found. Trigger volumes count here.
    pub fn probe_modifier(
        &self,
        center: Vec2,
        extent: Vec2,
        lookup: impl Fn(Entity) -> Option<Modifier>,
    ) -> Option<Modifier> {
        self.query(SweepQuery::overlap(center, extent), self.config.masks.modifier)
            .into_iter()
            .filter(|contact| !contact.is_from(self.actor))
            .find_map(|contact| contact.entity.and_then(&lookup))
    }
}
