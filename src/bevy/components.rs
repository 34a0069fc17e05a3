//! Bevy component definitions
//!
//! This module contains the component markers and per-entity state records
//! used to tag and drive the animated objects in the scene.

use bevy::prelude::*;

/// Marker component for the offscreen rendering camera
///
/// Entities with this component are cameras that render to an offscreen
/// texture instead of a window.
#[derive(Component)]
pub struct OffscreenCamera;

/// Marker component for the particle field entity
///
/// The field's point positions are fixed at construction; only its Y
/// rotation advances, by a constant per tick.
#[derive(Component)]
pub struct ParticleField;

/// Marker component for the cube swarm group entity (parent of all cubes)
#[derive(Component)]
pub struct CubeSwarm;

/// Accumulated Euler angles for the swarm group rotation.
///
/// Pointer offset is integrated into these every tick and the group's
/// rotation is rewritten from them, so the swarm keeps spinning as long as
/// the pointer stays off-center. Distinct from the robot's orientation,
/// which is assigned absolutely from the same signal.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct SwarmSpin {
    /// Rotation about X (radians)
    pub pitch: f32,
    /// Rotation about Y (radians)
    pub yaw: f32,
}

/// Per-cube drift state: where it's going and how it tumbles.
///
/// Velocity components flip sign when the cube crosses the ±7 bound on the
/// matching axis; magnitudes never change after construction. Tumble is
/// carried as accumulated Euler angles, like [`SwarmSpin`], and the cube's
/// rotation is rewritten from them every tick.
#[derive(Component, Debug, Clone, Copy)]
pub struct Drifter {
    /// Position delta per tick on X and Y
    pub velocity: Vec2,
    /// Rotation delta per tick about X and Y (radians)
    pub angular_rate: Vec2,
    /// Accumulated rotation about X and Y (radians)
    pub spin: Vec2,
}

impl Drifter {
    pub fn new(velocity: Vec2, angular_rate: Vec2) -> Self {
        Drifter {
            velocity,
            angular_rate,
            spin: Vec2::ZERO,
        }
    }
}

/// Marker component for the robot rig's root entity
#[derive(Component)]
pub struct RobotRig;

/// Marker component for the robot's smile, whose X/Y scale pulses
#[derive(Component)]
pub struct MouthPulse;
