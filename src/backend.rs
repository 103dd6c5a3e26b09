//! Geometry backend abstraction.
//!
//! The locomotion pipeline only needs oriented box sweeps, so a backend's
//! whole job is to expose its physics world as a [`GeometryQuery`] and run
//! [`drive_actors`] against it inside [`SlopeControllerSet::Step`].
//!
//! [`GeometryQuery`]: crate::geometry::GeometryQuery
//! [`drive_actors`]: crate::systems::drive_actors
//! [`SlopeControllerSet::Step`]: crate::SlopeControllerSet::Step

use bevy::prelude::*;

/// Trait for geometry backend implementations.
///
/// The bundled implementation is `Rapier2dBackend` (feature `rapier2d`).
///
/// # Example
///
/// A backend over a geometry resource of your own:
///
/// ```rust,ignore
/// struct MyBackend;
///
/// impl SlopeControllerBackend for MyBackend {
///     fn plugin() -> impl Plugin {
///         |app: &mut App| {
///             app.add_systems(FixedUpdate, my_step.in_set(SlopeControllerSet::Step));
///         }
///     }
/// }
///
/// fn my_step(
///     level: Res<MyLevel>,
///     time: Res<Time<Fixed>>,
///     modifiers: Query<&Modifier>,
///     mut actors: ActorQuery,
/// ) {
///     drive_actors(&*level, &modifiers, fixed_delta(&time), &mut actors);
/// }
/// ```
pub trait SlopeControllerBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    ///
    /// The plugin must add exactly one system to
    /// [`SlopeControllerSet::Step`](crate::SlopeControllerSet::Step) that
    /// advances every actor once per fixed tick.
    fn plugin() -> impl Plugin;
}
