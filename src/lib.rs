//! # `msg_slope_controller`
//!
//! A kinematic 2D box-actor controller for auto-running platformers, with a
//! swappable geometry backend.
//!
//! This crate drives box-shaped actors that:
//! - Detect ground with oriented box sweeps and a slope filter
//! - Lean their ground sensing into inclines
//! - Integrate gravity and closed-form jumps without tunnelling
//! - Follow slopes while keeping constant horizontal speed
//! - Spin in the air and settle flat on landing
//! - Die on hazards and when wedged into solid geometry
//! - Support inverted gravity and jump modifier pickups
//!
//! ## Architecture
//!
//! Every fixed tick each actor runs one pass of a pure pipeline
//! ([`pipeline::LocomotionCore`]):
//! 1. An alignment sweep finds the surface below and its slope
//! 2. A short contact sweep, rotated to the slope, decides grounded
//! 3. Vertical speed is integrated and clamped by a landing probe
//! 4. Horizontal intent is projected onto the ground tangent
//! 5. Orientation is advanced and hazards are checked
//!
//! The pipeline reads the level only through [`geometry::GeometryQuery`], so
//! it can be tested without a physics engine. The backend plugin supplies the
//! real query (Rapier2D included).
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use msg_slope_controller::prelude::*;
//!
//! // Components for an auto-running actor on an inverted level
//! let config = LocomotionConfig::inverted().with_jump_height(3.0);
//! let state = ActorState::new(Vec2::new(0.0, 4.0), Vec2::ONE);
//! let intent = RunIntent::auto_run();
//!
//! // Spawn these together with a Transform and the backend's collider
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod collision;
pub mod config;
pub mod geometry;
pub mod hazard;
pub mod horizontal;
pub mod intent;
pub mod modifier;
pub mod pipeline;
pub mod rotation;
pub mod sensor;
pub mod slope;
pub mod state;
pub mod systems;
pub mod vertical;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::SlopeControllerBackend;
    pub use crate::collision::{layers, Contact};
    pub use crate::config::{GravityDirection, LocomotionConfig, SensorMasks};
    pub use crate::geometry::{GeometryQuery, SweepQuery};
    pub use crate::hazard::HazardCause;
    pub use crate::intent::RunIntent;
    pub use crate::modifier::{Modifier, ModifierKind};
    pub use crate::pipeline::{LocomotionCore, StepReport};
    pub use crate::state::{ActorDied, ActorState, Airborne, Dead, Grounded, GroundedChanged};
    pub use crate::systems::{drive_actors, fixed_delta, ActorQuery};
    pub use crate::{SlopeControllerPlugin, SlopeControllerSet};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{Rapier2dActorBundle, Rapier2dBackend};
}

/// System sets the controller runs in, chained inside `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlopeControllerSet {
    /// The backend advances every actor.
    Step,
    /// Markers and events are brought in line with the new state.
    Publish,
}

/// Main plugin for the slope controller.
///
/// This plugin is generic over a backend `B` which provides the geometry
/// queries and runs the pipeline.
///
/// # Type Parameters
/// - `B`: The backend implementation (e.g., `Rapier2dBackend`)
///
/// # Examples
///
/// With Rapier2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use msg_slope_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(SlopeControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct SlopeControllerPlugin<B: backend::SlopeControllerBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::SlopeControllerBackend> Default for SlopeControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::SlopeControllerBackend> Plugin for SlopeControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::LocomotionConfig>();
        app.register_type::<config::GravityDirection>();
        app.register_type::<config::SensorMasks>();
        app.register_type::<intent::RunIntent>();
        app.register_type::<modifier::Modifier>();
        app.register_type::<modifier::ModifierKind>();
        app.register_type::<state::ActorState>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<state::Dead>();

        app.add_event::<state::GroundedChanged>();
        app.add_event::<state::ActorDied>();

        app.configure_sets(
            FixedUpdate,
            (SlopeControllerSet::Step, SlopeControllerSet::Publish).chain(),
        );

        // Add the backend plugin
        app.add_plugins(B::plugin());

        app.add_systems(
            FixedUpdate,
            (
                systems::warn_degenerate_configs,
                systems::publish_transitions,
            )
                .chain()
                .in_set(SlopeControllerSet::Publish),
        );
    }
}
