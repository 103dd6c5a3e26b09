//! Core controller systems.
//!
//! [`drive_actors`] is the bridge between the ECS and the pure pipeline. It is
//! not a system by itself: each backend wraps it in a system that builds its
//! own [`GeometryQuery`] first. The remaining systems here are backend
//! independent and run in [`SlopeControllerSet::Publish`](crate::SlopeControllerSet::Publish).

use bevy::prelude::*;

use crate::config::LocomotionConfig;
use crate::geometry::GeometryQuery;
use crate::intent::RunIntent;
use crate::modifier::Modifier;
use crate::pipeline::LocomotionCore;
use crate::state::{ActorDied, ActorState, Airborne, Dead, Grounded, GroundedChanged};

/// Query over every actor the pipeline drives.
pub type ActorQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static mut Transform,
        &'static mut ActorState,
        &'static LocomotionConfig,
        Option<&'static RunIntent>,
    ),
>;

/// Length of the current fixed tick.
///
/// Falls back to the configured timestep when the schedule is run by hand
/// and no time has elapsed.
pub fn fixed_delta(time: &Time<Fixed>) -> f32 {
    let delta = time.delta_secs();
    if delta > 0.0 {
        delta
    } else {
        time.timestep().as_secs_f32()
    }
}

/// Advance every actor by one tick against `geometry`.
///
/// `Transform` edits made outside the pipeline (teleports, respawn points)
/// are pulled into [`ActorState`] first; afterwards the new position and
/// rotation are written back.
pub fn drive_actors<G: GeometryQuery>(
    geometry: &G,
    modifiers: &Query<&Modifier>,
    dt: f32,
    actors: &mut ActorQuery,
) {
    for (entity, mut transform, mut state, config, intent) in actors.iter_mut() {
        if transform.is_changed() {
            state.position = transform.translation.truncate();
            state.angle = transform.rotation.to_euler(EulerRot::ZYX).0;
        }
        let intent = intent.copied().unwrap_or_default();

        let report = LocomotionCore::new(geometry, config)
            .with_actor(entity)
            .with_modifiers(|other| modifiers.get(other).ok().copied())
            .step(&mut state, &intent, dt);

        if report.frozen {
            continue;
        }
        trace!(
            "{entity:?}: grounded={} landed={} normal={:?} moved={:?}",
            report.grounded,
            report.landed,
            state.ground_normal,
            report.displacement
        );
        if let Some(cause) = report.died {
            debug!("{entity:?} died at {:?} ({cause:?})", state.position);
        }

        transform.translation = state.position.extend(transform.translation.z);
        transform.rotation = Quat::from_rotation_z(state.angle);
    }
}

/// Synchronize marker components and emit transition events.
///
/// Runs after the step so markers always reflect this tick's [`ActorState`].
pub fn publish_transitions(
    mut commands: Commands,
    q_actors: Query<(Entity, &ActorState, Has<Grounded>, Has<Airborne>, Has<Dead>)>,
    mut grounded_events: EventWriter<GroundedChanged>,
    mut died_events: EventWriter<ActorDied>,
) {
    for (entity, state, has_grounded, has_airborne, has_dead) in &q_actors {
        // Sync Grounded/Airborne
        if state.grounded && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
            grounded_events.write(GroundedChanged {
                entity,
                grounded: true,
                normal: state.ground_normal,
            });
            debug!("{entity:?} landed on {:?}", state.ground_normal);
        } else if !state.grounded && has_grounded {
            commands.entity(entity).remove::<Grounded>().insert(Airborne);
            grounded_events.write(GroundedChanged {
                entity,
                grounded: false,
                normal: state.ground_normal,
            });
            debug!("{entity:?} left the ground");
        } else if !state.grounded && !has_airborne && !has_grounded {
            commands.entity(entity).insert(Airborne);
        }

        // Sync Dead
        if state.dead && !has_dead {
            commands.entity(entity).insert(Dead);
            died_events.write(ActorDied {
                entity,
                position: state.position,
            });
        } else if !state.dead && has_dead {
            commands.entity(entity).remove::<Dead>();
            debug!("{entity:?} respawned at {:?}", state.position);
        }
    }
}

/// Warn once for every newly added config that hits a fallback path.
pub fn warn_degenerate_configs(
    q_configs: Query<(Entity, &LocomotionConfig), Added<LocomotionConfig>>,
) {
    for (entity, config) in &q_configs {
        if let Some(reason) = config.degenerate_setting() {
            warn!("{entity:?}: {reason}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fixed_delta_falls_back_to_timestep() {
        let time = Time::<Fixed>::from_hz(50.0);
        assert!((fixed_delta(&time) - 0.02).abs() < 1e-6);
    }

    #[test]
    fn fixed_delta_uses_elapsed_tick() {
        let mut time = Time::<Fixed>::from_duration(Duration::from_millis(10));
        time.advance_by(Duration::from_millis(10));
        assert!((fixed_delta(&time) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn publish_inserts_markers_and_events() {
        let mut app = App::new();
        app.add_event::<GroundedChanged>();
        app.add_event::<ActorDied>();
        app.add_systems(Update, publish_transitions);

        let grounded = app
            .world_mut()
            .spawn(ActorState {
                grounded: true,
                ..default()
            })
            .id();
        let dead = app
            .world_mut()
            .spawn(ActorState {
                dead: true,
                ..default()
            })
            .id();

        app.update();

        let world = app.world();
        assert!(world.entity(grounded).contains::<Grounded>());
        assert!(!world.entity(grounded).contains::<Airborne>());
        assert!(world.entity(dead).contains::<Airborne>());
        assert!(world.entity(dead).contains::<Dead>());

        let died = world.resource::<Events<ActorDied>>();
        let mut cursor = died.get_cursor();
        let events: Vec<_> = cursor.read(died).collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entity, dead);

        let landed = world.resource::<Events<GroundedChanged>>();
        let mut cursor = landed.get_cursor();
        assert_eq!(cursor.read(landed).count(), 1);
    }

    #[test]
    fn publish_removes_dead_after_respawn() {
        let mut app = App::new();
        app.add_event::<GroundedChanged>();
        app.add_event::<ActorDied>();
        app.add_systems(Update, publish_transitions);

        let actor = app
            .world_mut()
            .spawn(ActorState {
                dead: true,
                ..default()
            })
            .id();
        app.update();
        assert!(app.world().entity(actor).contains::<Dead>());

        app.world_mut()
            .get_mut::<ActorState>(actor)
            .unwrap()
            .respawn(Vec2::ZERO);
        app.update();
        assert!(!app.world().entity(actor).contains::<Dead>());
    }
}
