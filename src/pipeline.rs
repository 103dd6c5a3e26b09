//! Per-tick locomotion pipeline.
//!
//! One call to [`LocomotionCore::step`] runs every stage for one actor in a
//! fixed order:
//!
//! 1. Alignment sweep and slope solve
//! 2. Contact sweep (grounded + ground normal)
//! 3. Modifier probe
//! 4. Vertical integration with the landing probe
//! 5. Horizontal projection
//! 6. Motion composition
//! 7. Rotation alignment
//! 8. Hazard check
//!
//! All sensing happens at the position the actor held when the tick started.
//! The hazard check runs after the move, at the new position.
//!
//! The core holds its collaborators by reference and owns no state of its
//! own, so the same geometry service can drive any number of actors.

use bevy::prelude::*;

use crate::config::LocomotionConfig;
use crate::geometry::GeometryQuery;
use crate::hazard::{self, HazardCause};
use crate::horizontal;
use crate::intent::RunIntent;
use crate::modifier::Modifier;
use crate::rotation;
use crate::sensor::GroundSensor;
use crate::slope;
use crate::state::ActorState;
use crate::vertical::{self, VerticalInput};

/// Modifier lookup that never finds anything.
pub type NoModifiers = fn(Entity) -> Option<Modifier>;

fn no_modifiers(_: Entity) -> Option<Modifier> {
    None
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// World-space displacement applied this tick.
    pub displacement: Vec2,
    /// Grounded flag after this tick.
    pub grounded: bool,
    /// A jump or modifier launched the actor.
    pub launched: bool,
    /// The fall was clamped onto the ground.
    pub landed: bool,
    /// The actor died this tick.
    pub died: Option<HazardCause>,
    /// The actor was already dead and did not move.
    pub frozen: bool,
}

/// Combine both displacements, move the actor and record the speeds.
pub fn compose(state: &mut ActorState, horizontal: Vec2, vertical: f32, dt: f32) -> Vec2 {
    let displacement = horizontal + Vec2::new(0.0, vertical);
    state.position += displacement;
    state.horizontal_speed = if dt > 0.0 { horizontal.x / dt } else { 0.0 };
    displacement
}

/// Locomotion core bound to a geometry service and configuration.
pub struct LocomotionCore<'a, G: GeometryQuery, M = NoModifiers> {
    geometry: &'a G,
    config: &'a LocomotionConfig,
    actor: Option<Entity>,
    modifiers: M,
}

impl<'a, G: GeometryQuery> LocomotionCore<'a, G> {
    /// Create a core with no modifier lookup and no actor entity.
    pub fn new(geometry: &'a G, config: &'a LocomotionConfig) -> Self {
        Self {
            geometry,
            config,
            actor: None,
            modifiers: no_modifiers,
        }
    }
}

impl<'a, G, M> LocomotionCore<'a, G, M>
where
    G: GeometryQuery,
    M: Fn(Entity) -> Option<Modifier>,
{
    /// Set the entity sweeps should ignore.
    pub fn with_actor(mut self, entity: Entity) -> Self {
        self.actor = Some(entity);
        self
    }

    /// Set how modifier entities are resolved.
    pub fn with_modifiers<N>(self, modifiers: N) -> LocomotionCore<'a, G, N>
    where
        N: Fn(Entity) -> Option<Modifier>,
    {
        LocomotionCore {
            geometry: self.geometry,
            config: self.config,
            actor: self.actor,
            modifiers,
        }
    }

    /// Run one tick for `state` with `intent` over `dt` seconds.
    ///
    /// Dead actors are left untouched until [`ActorState::respawn`].
    pub fn step(&self, state: &mut ActorState, intent: &RunIntent, dt: f32) -> StepReport {
        if state.dead {
            return StepReport {
                grounded: state.grounded,
                frozen: true,
                ..default()
            };
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let config = self.config;
        let up = config.up();
        let center = state.position;
        let extent = state.extent;
        let sensor = GroundSensor::new(self.geometry, config, self.actor);

        // 1-2: sensing
        let alignment =
            sensor.sense_alignment(center, extent, config.down(), config.alignment_distance);
        let solution = slope::solve(alignment.as_ref(), up);
        let ground = sensor.sense_contact(
            center,
            extent,
            solution.cast_angle,
            solution.cast_direction,
            config.contact_distance,
        );
        state.cast_angle = solution.cast_angle;
        state.cast_direction = solution.cast_direction;
        state.grounded = ground.grounded;
        state.ground_normal = ground.normal;

        // 3
        let modifier = sensor.probe_modifier(center, extent, &self.modifiers);

        // 4
        let input = VerticalInput {
            grounded: ground.grounded,
            jump_held: intent.jump_held,
            modifier,
            dt,
        };
        let vertical_step = vertical::integrate(&mut state.vertical_speed, &input, config, |raw| {
            sensor.sense_landing(center, extent, solution.cast_angle, raw.abs())
        });

        // 5
        let run = intent.run.clamp(-1.0, 1.0);
        let velocity = horizontal::intent_velocity(run, config.horizontal_speed);
        let horizontal_move = horizontal::project(velocity, ground.grounded, ground.normal, dt);

        // 6-7
        let displacement = compose(state, horizontal_move, vertical_step.displacement, dt);
        state.angle = rotation::align(
            state.angle,
            ground.grounded,
            intent.jump_held,
            ground.normal,
            config,
            dt,
        );

        // 8
        let died = hazard::check(
            self.geometry,
            config,
            self.actor,
            state.position,
            extent,
            state.angle,
            |entity| (self.modifiers)(entity).is_some(),
        );
        state.dead = died.is_some();

        StepReport {
            displacement,
            grounded: ground.grounded,
            launched: vertical_step.launched,
            landed: vertical_step.clamped,
            died,
            frozen: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{layers, Contact};
    use crate::config::SensorMasks;
    use crate::geometry::fixtures::ScriptedGeometry;

    const DT: f32 = 0.02;

    // Scripted contacts have no shape, so keep the floor out of the core overlap.
    fn config() -> LocomotionConfig {
        LocomotionConfig::default().with_masks(SensorMasks {
            obstruction: 1 << 8,
            ..default()
        })
    }

    fn floor(distance: f32) -> Contact {
        Contact::new(distance, Vec2::Y, Vec2::ZERO, Some(Entity::from_raw(100)))
    }

    #[test]
    fn resting_actor_stays_put() {
        let config = config();
        let geometry = ScriptedGeometry::default().with(Some(layers::GROUND), floor(0.0));
        let mut state = ActorState::default();

        let report = LocomotionCore::new(&geometry, &config)
            .step(&mut state, &RunIntent::default(), DT);

        assert!(report.grounded);
        assert_eq!(state.vertical_speed, 0.0);
        assert_eq!(report.displacement, Vec2::ZERO);
        assert!(report.died.is_none());
    }

    #[test]
    fn free_fall_accumulates() {
        let config = config();
        let geometry = ScriptedGeometry::default();
        let mut state = ActorState::default();

        for _ in 0..3 {
            LocomotionCore::new(&geometry, &config).step(&mut state, &RunIntent::default(), DT);
        }

        assert!(!state.grounded);
        assert!((state.vertical_speed + 1.2).abs() < 1e-5);
        assert!(state.position.y < 0.0);
    }

    #[test]
    fn grounded_jump_launches() {
        let config = config();
        let geometry = ScriptedGeometry::default().with(Some(layers::GROUND), floor(0.0));
        let mut state = ActorState::default();
        let intent = RunIntent {
            run: 0.0,
            jump_held: true,
        };

        let report = LocomotionCore::new(&geometry, &config).step(&mut state, &intent, DT);

        assert!(report.launched);
        assert!((state.vertical_speed - 8.944_272).abs() < 1e-4);
        assert!((report.displacement.y - 0.178_885).abs() < 1e-4);
    }

    #[test]
    fn running_on_flat_ground_moves_along_x() {
        let config = config();
        let geometry = ScriptedGeometry::default().with(Some(layers::GROUND), floor(0.0));
        let mut state = ActorState::default();

        let report = LocomotionCore::new(&geometry, &config)
            .step(&mut state, &RunIntent::auto_run(), DT);

        assert!((report.displacement - Vec2::new(0.1, 0.0)).length() < 1e-6);
        assert!((state.horizontal_speed - 5.0).abs() < 1e-4);
    }

    #[test]
    fn out_of_range_run_is_clamped() {
        let config = config();
        let geometry = ScriptedGeometry::default().with(Some(layers::GROUND), floor(0.0));
        let mut state = ActorState::default();
        let intent = RunIntent {
            run: -3.0,
            jump_held: false,
        };

        let report = LocomotionCore::new(&geometry, &config).step(&mut state, &intent, DT);

        assert!((report.displacement - Vec2::new(-0.1, 0.0)).length() < 1e-6);
        assert!((state.horizontal_speed + 5.0).abs() < 1e-4);
    }

    #[test]
    fn modifier_pickup_overrides_speed() {
        let config = config();
        let orb = Entity::from_raw(7);
        let geometry = ScriptedGeometry::default()
            .with(Some(layers::MODIFIER), Contact::overlap(Vec2::ZERO, Some(orb)));
        let mut state = ActorState::default();
        let intent = RunIntent {
            run: 0.0,
            jump_held: true,
        };

        let report = LocomotionCore::new(&geometry, &config)
            .with_modifiers(|entity| (entity == orb).then(|| Modifier::launch(4.0)))
            .step(&mut state, &intent, DT);

        assert!(report.launched);
        assert!((state.vertical_speed - 160f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn hazard_kills_and_freezes() {
        let config = config();
        let geometry = ScriptedGeometry::default().with(
            Some(layers::HAZARD),
            Contact::overlap(Vec2::ZERO, Some(Entity::from_raw(3))),
        );
        let mut state = ActorState::default();

        let report = LocomotionCore::new(&geometry, &config)
            .step(&mut state, &RunIntent::auto_run(), DT);
        assert_eq!(report.died, Some(HazardCause::Lethal));
        assert!(state.dead);

        let frozen_at = state;
        let report = LocomotionCore::new(&geometry, &config)
            .step(&mut state, &RunIntent::auto_run(), DT);
        assert!(report.frozen);
        assert_eq!(state, frozen_at);
    }

    #[test]
    fn zero_dt_moves_nothing() {
        let config = config();
        let geometry = ScriptedGeometry::default();
        let mut state = ActorState::default();

        let report = LocomotionCore::new(&geometry, &config)
            .step(&mut state, &RunIntent::auto_run(), 0.0);

        assert_eq!(report.displacement, Vec2::ZERO);
        assert_eq!(state.vertical_speed, 0.0);
    }

    #[test]
    fn actor_entity_is_excluded_from_every_query() {
        let config = config();
        let actor = Entity::from_raw(11);
        let geometry = ScriptedGeometry::default();
        let mut state = ActorState::default();

        LocomotionCore::new(&geometry, &config)
            .with_actor(actor)
            .step(&mut state, &RunIntent::default(), DT);

        let queries = geometry.queries.borrow();
        assert_eq!(queries.len(), 6);
        assert!(queries.iter().all(|query| query.exclude == Some(actor)));
    }
}
