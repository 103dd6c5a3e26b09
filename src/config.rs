//! Locomotion configuration components.
//!
//! This module defines the tunables for the locomotion pipeline: speeds,
//! jump height, gravity, the slope filter, sensor reaches and layer masks.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use bevy::prelude::*;

use crate::collision::layers;

/// Which way gravity pulls along the world Y axis.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityDirection {
    /// Gravity pulls toward world -Y.
    #[default]
    Down,
    /// Gravity pulls toward world +Y (inverted levels).
    Up,
}

impl GravityDirection {
    /// Sign of gravity along world Y (`-1.0` for `Down`).
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            GravityDirection::Down => -1.0,
            GravityDirection::Up => 1.0,
        }
    }

    /// Unit vector gravity pulls along.
    #[inline]
    pub fn down(self) -> Vec2 {
        Vec2::new(0.0, self.sign())
    }

    /// Unit vector opposite to gravity.
    #[inline]
    pub fn up(self) -> Vec2 {
        -self.down()
    }
}

/// Layer masks for each sensor.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorMasks {
    /// Surfaces the ground sensor and landing probe consider.
    pub ground: u32,
    /// Geometry that kills on overlap at full extent.
    pub lethal: u32,
    /// Geometry that kills when the reduced core box is wedged into it.
    pub obstruction: u32,
    /// Modifier pickups.
    pub modifier: u32,
}

impl Default for SensorMasks {
    fn default() -> Self {
        Self {
            ground: layers::GROUND,
            lethal: layers::HAZARD,
            obstruction: layers::GROUND,
            modifier: layers::MODIFIER,
        }
    }
}

/// Configuration parameters for the locomotion pipeline.
///
/// Angles are in radians. Distances are in world units.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct LocomotionConfig {
    // === Movement ===
    /// Horizontal speed along the slope's run (units/second).
    pub horizontal_speed: f32,

    // === Vertical ===
    /// Gravity magnitude (units/second^2).
    pub gravity: f32,
    /// Direction gravity pulls.
    pub gravity_direction: GravityDirection,
    /// Apex height of a default jump.
    pub jump_height: f32,

    // === Slope ===
    /// Maximum angle between a surface normal and "up" that still counts as ground.
    pub max_slope_angle: f32,

    // === Sensors ===
    /// Reach of the long alignment sweep.
    pub alignment_distance: f32,
    /// Reach of the short contact sweep that decides grounded.
    pub contact_distance: f32,
    /// Minimum reach of the landing probe.
    pub landing_probe_distance: f32,
    /// Scale applied to the body extent for the obstruction check.
    pub obstruction_extent_scale: f32,
    /// Layer masks for every sensor.
    pub masks: SensorMasks,

    // === Rotation ===
    /// Angular rate (radians/second) used when the flight time is degenerate.
    pub fallback_rotation_rate: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            horizontal_speed: 5.0,

            gravity: 20.0,
            gravity_direction: GravityDirection::Down,
            jump_height: 2.0,

            max_slope_angle: FRAC_PI_4, // 45 degrees

            alignment_distance: 2.0,
            contact_distance: 0.01,
            landing_probe_distance: 10.0,
            obstruction_extent_scale: 0.25,
            masks: SensorMasks::default(),

            fallback_rotation_rate: TAU, // 360 degrees/second
        }
    }
}

impl LocomotionConfig {
    /// Config for levels where gravity pulls toward world +Y.
    pub fn inverted() -> Self {
        Self {
            gravity_direction: GravityDirection::Up,
            ..default()
        }
    }

    /// Unit vector opposite to gravity.
    #[inline]
    pub fn up(&self) -> Vec2 {
        self.gravity_direction.up()
    }

    /// Unit vector gravity pulls along.
    #[inline]
    pub fn down(&self) -> Vec2 {
        self.gravity_direction.down()
    }

    /// Signed gravity acceleration along world Y.
    #[inline]
    pub fn signed_gravity(&self) -> f32 {
        self.gravity * self.gravity_direction.sign()
    }

    /// Whether a surface normal passes the slope filter.
    #[inline]
    pub fn is_walkable(&self, normal: Vec2) -> bool {
        normal.dot(self.up()).clamp(-1.0, 1.0).acos() <= self.max_slope_angle
    }

    /// Builder: set horizontal speed.
    pub fn with_horizontal_speed(mut self, speed: f32) -> Self {
        self.horizontal_speed = speed.max(0.0);
        self
    }

    /// Builder: set gravity magnitude.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity.abs();
        self
    }

    /// Builder: set gravity direction.
    pub fn with_gravity_direction(mut self, direction: GravityDirection) -> Self {
        self.gravity_direction = direction;
        self
    }

    /// Builder: set jump height.
    pub fn with_jump_height(mut self, height: f32) -> Self {
        self.jump_height = height.max(0.0);
        self
    }

    /// Builder: set the slope filter in radians (clamped to `[0, PI/2]`).
    pub fn with_max_slope_angle(mut self, angle: f32) -> Self {
        self.max_slope_angle = angle.clamp(0.0, FRAC_PI_2);
        self
    }

    /// Builder: set the slope filter in degrees.
    pub fn with_max_slope_degrees(self, degrees: f32) -> Self {
        self.with_max_slope_angle(degrees.to_radians())
    }

    /// Builder: set the alignment and contact sweep reaches.
    pub fn with_sensor_distances(mut self, alignment: f32, contact: f32) -> Self {
        self.alignment_distance = alignment.max(0.0);
        self.contact_distance = contact.max(0.0);
        self
    }

    /// Builder: set the minimum landing probe reach.
    pub fn with_landing_probe_distance(mut self, distance: f32) -> Self {
        self.landing_probe_distance = distance.max(0.0);
        self
    }

    /// Builder: set the sensor layer masks.
    pub fn with_masks(mut self, masks: SensorMasks) -> Self {
        self.masks = masks;
        self
    }

    /// Describe the first degenerate setting, if any.
    ///
    /// Degenerate settings never break a tick; the pipeline falls back to a
    /// defined default. This is only used to warn once at startup.
    pub fn degenerate_setting(&self) -> Option<&'static str> {
        if self.gravity <= 0.0 {
            Some("gravity is zero; jumps launch at zero speed and rotation uses the fallback rate")
        } else if self.jump_height <= 0.0 {
            Some("jump height is zero; rotation uses the fallback rate")
        } else if self.contact_distance <= 0.0 {
            Some("contact distance is zero; grounded only triggers on overlap")
        } else {
            None
        }
    }
}
