//! Deterministic test level and backend.
//!
//! Planes are infinite half-spaces (solid behind the normal) and answer both
//! sweeps and overlaps exactly. Blocks are axis-aligned boxes used for spikes
//! and modifier pickups; they only answer overlap tests.

#![allow(dead_code)]

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use msg_slope_controller::prelude::*;

pub const DT: f32 = 0.02;

/// Solid half-space behind `normal` through `point`.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub entity: Entity,
    pub point: Vec2,
    pub normal: Vec2,
    pub layers: u32,
}

/// Axis-aligned box that answers overlap tests.
#[derive(Debug, Clone, Copy)]
pub struct Block {
    pub entity: Entity,
    pub center: Vec2,
    pub half: Vec2,
    pub layers: u32,
    pub trigger: bool,
}

#[derive(Resource, Default)]
pub struct PlaneWorld {
    pub planes: Vec<Plane>,
    pub blocks: Vec<Block>,
}

impl PlaneWorld {
    fn accepts(query: &SweepQuery, entity: Entity, layers: u32) -> bool {
        query.exclude != Some(entity) && query.mask.map_or(true, |mask| mask & layers != 0)
    }
}

impl GeometryQuery for PlaneWorld {
    fn sweep(&self, query: &SweepQuery) -> Vec<Contact> {
        let half = query.half_extents();
        let axis_x = Vec2::from_angle(query.angle);
        let axis_y = axis_x.perp();
        let mut contacts = Vec::new();

        for plane in &self.planes {
            if !Self::accepts(query, plane.entity, plane.layers) {
                continue;
            }
            let n = plane.normal;
            let support = half.x * n.dot(axis_x).abs() + half.y * n.dot(axis_y).abs();
            let height = n.dot(query.center - plane.point);
            let gap = height - support;
            let point = query.center - n * height;

            if gap <= 0.0 {
                contacts.push(Contact::new(0.0, n, point, Some(plane.entity)));
            } else if !query.is_overlap() {
                let closing = -n.dot(query.direction);
                if closing > 1e-6 {
                    let distance = gap / closing;
                    if distance <= query.max_distance {
                        let point = point + query.direction * distance;
                        contacts.push(Contact::new(distance, n, point, Some(plane.entity)));
                    }
                }
            }
        }

        if query.is_overlap() {
            let (sin, cos) = query.angle.sin_cos();
            let reach = Vec2::new(
                half.x * cos.abs() + half.y * sin.abs(),
                half.x * sin.abs() + half.y * cos.abs(),
            );
            for block in &self.blocks {
                if !Self::accepts(query, block.entity, block.layers) {
                    continue;
                }
                let offset = (query.center - block.center).abs();
                let limit = reach + block.half;
                if offset.x < limit.x && offset.y < limit.y {
                    let contact = Contact::overlap(query.center, Some(block.entity));
                    contacts.push(if block.trigger {
                        contact.as_trigger()
                    } else {
                        contact
                    });
                }
            }
        }

        contacts
    }
}

pub struct PlaneBackend;

impl SlopeControllerBackend for PlaneBackend {
    fn plugin() -> impl Plugin {
        PlaneBackendPlugin
    }
}

pub struct PlaneBackendPlugin;

impl Plugin for PlaneBackendPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlaneWorld>();
        app.add_systems(FixedUpdate, plane_step.in_set(SlopeControllerSet::Step));
    }
}

fn plane_step(
    level: Res<PlaneWorld>,
    time: Res<Time<Fixed>>,
    q_modifiers: Query<&Modifier>,
    mut q_actors: ActorQuery,
) {
    drive_actors(&*level, &q_modifiers, fixed_delta(&time), &mut q_actors);
}

/// Create a headless app driving actors against a [`PlaneWorld`].
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(SlopeControllerPlugin::<PlaneBackend>::default());
    app.insert_resource(Time::<Fixed>::from_seconds(DT as f64));
    app
}

/// Unit normal of a surface rising toward +X at `degrees`.
pub fn incline(degrees: f32) -> Vec2 {
    Vec2::from_angle(FRAC_PI_2 + degrees.to_radians())
}

pub fn add_plane(app: &mut App, point: Vec2, normal: Vec2, layers: u32) -> Entity {
    let entity = app.world_mut().spawn_empty().id();
    app.world_mut().resource_mut::<PlaneWorld>().planes.push(Plane {
        entity,
        point,
        normal: normal.normalize(),
        layers,
    });
    entity
}

/// Flat ground whose surface is at `y`.
pub fn add_floor(app: &mut App, y: f32) -> Entity {
    add_plane(app, Vec2::new(0.0, y), Vec2::Y, layers::GROUND)
}

pub fn add_block(app: &mut App, center: Vec2, half: Vec2, layers: u32, trigger: bool) -> Entity {
    let entity = app.world_mut().spawn_empty().id();
    app.world_mut().resource_mut::<PlaneWorld>().blocks.push(Block {
        entity,
        center,
        half,
        layers,
        trigger,
    });
    entity
}

pub fn spawn_actor(app: &mut App, position: Vec2, config: LocomotionConfig) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            ActorState::new(position, Vec2::ONE),
            config,
            RunIntent::default(),
        ))
        .id()
}

/// Run one fixed tick.
pub fn tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        tick(app);
    }
}

pub fn state(app: &App, entity: Entity) -> ActorState {
    *app.world().get::<ActorState>(entity).unwrap()
}

pub fn set_intent(app: &mut App, entity: Entity, run: f32, jump_held: bool) {
    let mut intent = app.world_mut().get_mut::<RunIntent>(entity).unwrap();
    intent.set_run(run);
    intent.set_jump_held(jump_held);
}

/// Every event of type `E` sent so far.
pub fn events<E: Event + Clone>(app: &App) -> Vec<E> {
    let events = app.world().resource::<Events<E>>();
    let mut cursor = events.get_cursor();
    cursor.read(events).cloned().collect()
}
