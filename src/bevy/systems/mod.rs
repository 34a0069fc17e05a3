//! Bevy systems
//!
//! This module contains all the systems that operate on entities and
//! resources: startup scene construction, the per-tick update model, and
//! the host plumbing around it.

pub mod animation;
pub mod frame_extraction;
pub mod pointer;
pub mod scene;
pub mod viewport;

pub use animation::{
    aim_robot, drift_cubes, float_robot, pulse_mouth, spin_particles, steer_swarm, watch_shutdown,
};
pub use frame_extraction::publish_frame;
pub use pointer::sample_pointer;
pub use scene::setup_scene;
pub use viewport::apply_viewport_resize;
