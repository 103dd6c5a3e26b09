//! Rapier2D geometry backend implementation.
//!
//! This module provides the geometry backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.
//!
//! Actors are kinematic position-based bodies: the pipeline moves their
//! `Transform` directly and Rapier only answers box sweeps. Level colliders
//! opt into the sensor layers through [`layer_groups`]. A collider without
//! `CollisionGroups` is a member of every group and therefore counts as
//! ground, hazard and modifier at once.

use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;

use crate::backend::SlopeControllerBackend;
use crate::collision::Contact;
use crate::geometry::{GeometryQuery, SweepQuery};
use crate::modifier::Modifier;
use crate::state::ActorState;
use crate::systems::{drive_actors, fixed_delta, ActorQuery};
use crate::SlopeControllerSet;

/// Upper bound on solid colliders reported by a single sweep.
///
/// Hits arrive nearest first, so only contacts beyond the eighth solid
/// collider along the path can be dropped.
const MAX_SWEEP_HITS: usize = 8;

/// Rapier2D backend for the slope controller.
pub struct Rapier2dBackend;

impl SlopeControllerBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }
}

/// Plugin that sets up Rapier2D-specific systems for the slope controller.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        // Extent must be current before the step sweeps with it.
        app.add_systems(
            FixedUpdate,
            (sync_cuboid_extent, rapier_locomotion_step)
                .chain()
                .in_set(SlopeControllerSet::Step),
        );
    }
}

/// Collision groups placing a level collider on `layers`.
///
/// Give every level collider groups from here. One without
/// `CollisionGroups` is on every layer, so a plain floor also counts as a
/// hazard and kills whatever touches it.
///
/// ```rust
/// use bevy_rapier2d::prelude::*;
/// use msg_slope_controller::prelude::*;
/// use msg_slope_controller::rapier::layer_groups;
///
/// let spikes = (Collider::cuboid(0.5, 0.5), layer_groups(layers::HAZARD));
/// ```
pub fn layer_groups(layers: u32) -> CollisionGroups {
    CollisionGroups::new(Group::from_bits_truncate(layers), Group::ALL)
}

/// [`GeometryQuery`] over a Rapier context.
///
/// Overlap tests report `Sensor` colliders as triggers rather than filtering
/// them, so the pipeline decides per sensor whether they matter. Sweeps skip
/// sensors entirely.
pub struct RapierGeometry<'a, 'c> {
    context: &'a RapierContext<'c>,
    is_sensor: &'a dyn Fn(Entity) -> bool,
}

impl<'a, 'c> RapierGeometry<'a, 'c> {
    /// Wrap `context`, flagging entities for which `is_sensor` holds as triggers.
    pub fn new(context: &'a RapierContext<'c>, is_sensor: &'a dyn Fn(Entity) -> bool) -> Self {
        Self { context, is_sensor }
    }

    fn groups(query: &SweepQuery) -> Option<CollisionGroups> {
        query
            .mask
            .map(|mask| CollisionGroups::new(Group::ALL, Group::from_bits_truncate(mask)))
    }

    fn contact(&self, contact: Contact) -> Contact {
        match contact.entity {
            Some(entity) if (self.is_sensor)(entity) => contact.as_trigger(),
            _ => contact,
        }
    }

    fn overlaps(&self, query: &SweepQuery, shape: &Collider) -> Vec<Contact> {
        let mut filter = QueryFilter::default();
        if let Some(groups) = Self::groups(query) {
            filter = filter.groups(groups);
        }
        if let Some(entity) = query.exclude {
            filter = filter.exclude_collider(entity).exclude_rigid_body(entity);
        }

        let mut contacts = Vec::new();
        self.context
            .intersections_with_shape(query.center, query.angle, shape, filter, |entity| {
                contacts.push(self.contact(Contact::overlap(query.center, Some(entity))));
                true
            });
        contacts
    }

    fn sweeps(&self, query: &SweepQuery, shape: &Collider) -> Vec<Contact> {
        let mut contacts = Vec::new();
        let mut seen: Vec<Entity> = Vec::new();

        while seen.len() < MAX_SWEEP_HITS {
            let unseen = |entity: Entity| !seen.contains(&entity);
            // Triggers never stop a sweep; keep them from using up the cap.
            let mut filter = QueryFilter::default().exclude_sensors().predicate(&unseen);
            if let Some(groups) = Self::groups(query) {
                filter = filter.groups(groups);
            }
            if let Some(entity) = query.exclude {
                filter = filter.exclude_collider(entity).exclude_rigid_body(entity);
            }

            let Some((entity, hit)) = self.context.cast_shape(
                query.center,
                query.angle,
                query.direction,
                shape,
                ShapeCastOptions {
                    max_time_of_impact: query.max_distance,
                    stop_at_penetration: true,
                    compute_impact_geometry_on_penetration: true,
                    ..default()
                },
                filter,
            ) else {
                break;
            };

            let fallback_point = query.center + query.direction * hit.time_of_impact;
            let (normal, point) = hit
                .details
                .map(|details| (details.normal1, details.witness1))
                .unwrap_or((-query.direction, fallback_point));
            contacts.push(self.contact(Contact::new(
                hit.time_of_impact,
                normal,
                point,
                Some(entity),
            )));
            seen.push(entity);
        }
        contacts
    }
}

impl GeometryQuery for RapierGeometry<'_, '_> {
    fn sweep(&self, query: &SweepQuery) -> Vec<Contact> {
        let half = query.half_extents();
        let shape = Collider::cuboid(half.x, half.y);
        if query.is_overlap() {
            self.overlaps(query, &shape)
        } else {
            self.sweeps(query, &shape)
        }
    }
}

/// Keep [`ActorState::extent`] in line with the actor's cuboid collider.
fn sync_cuboid_extent(mut q_actors: Query<(&Collider, &mut ActorState), Changed<Collider>>) {
    for (collider, mut state) in &mut q_actors {
        if let Some(cuboid) = collider.as_cuboid() {
            state.extent = cuboid.half_extents() * 2.0;
        }
    }
}

/// Run the pipeline for every actor against the Rapier world.
fn rapier_locomotion_step(
    rapier_context: ReadRapierContext,
    time: Res<Time<Fixed>>,
    q_sensors: Query<(), With<Sensor>>,
    q_modifiers: Query<&Modifier>,
    mut q_actors: ActorQuery,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };
    let is_sensor = |entity: Entity| q_sensors.contains(entity);
    let geometry = RapierGeometry::new(&context, &is_sensor);

    drive_actors(&geometry, &q_modifiers, fixed_delta(&time), &mut q_actors);
}

/// Bundle containing the Rapier components a box actor needs.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use msg_slope_controller::prelude::*;
///
/// fn spawn_runner(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 4.0, 0.0),
///         ActorState::new(Vec2::new(0.0, 4.0), Vec2::ONE),
///         LocomotionConfig::default(),
///         RunIntent::auto_run(),
///         Rapier2dActorBundle::new(Vec2::ONE),
///     ));
/// }
/// ```
///
/// # Defaults
///
/// - `rigid_body`: [`RigidBody::KinematicPositionBased`], moved only by the pipeline
/// - `collider`: cuboid matching the requested size
/// - `groups`: member of no sensor layer, so sweeps never see the actor
#[derive(Bundle)]
pub struct Rapier2dActorBundle {
    pub rigid_body: RigidBody,
    pub collider: Collider,
    pub groups: CollisionGroups,
}

impl Rapier2dActorBundle {
    /// Create a bundle for a box of the given full size.
    pub fn new(size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            rigid_body: RigidBody::KinematicPositionBased,
            collider: Collider::cuboid(half.x, half.y),
            groups: CollisionGroups::new(Group::GROUP_32, Group::NONE),
        }
    }

    /// Builder: replace the rigid body type.
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = body;
        self
    }
}
