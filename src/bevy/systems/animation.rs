//! Animation systems
//!
//! The per-tick update model for the backdrop, run in a fixed order every
//! frame after the pointer snapshot is taken:
//!
//! 1. the particle field gains a constant Y rotation,
//! 2. each cube tumbles and drifts, reflecting off the ±7 bound,
//! 3. the swarm group *accumulates* spin from the pointer offset,
//! 4. the robot floats on an absolute sinusoid of elapsed time,
//! 5. the robot's orientation is *assigned* from the pointer,
//! 6. the smile's X/Y scale pulses on an absolute sinusoid.
//!
//! The accumulate-vs-assign split between 3 and 5 is deliberate: the swarm
//! keeps spinning while the pointer is off-center, the robot only tracks it.
//!
//! All deltas are per-tick constants, so k ticks advance the scene by
//! exactly k steps regardless of wall-clock jitter.

use bevy::{app::AppExit, prelude::*};

use crate::bevy::components::{
    CubeSwarm, Drifter, MouthPulse, ParticleField, RobotRig, SwarmSpin,
};
use crate::bevy::resources::{PointerSnapshot, ShutdownRes};
use crate::config::{cubes, particles, robot};

/// Advance the particle field's Y rotation by a constant
pub fn spin_particles(mut query: Query<&mut Transform, With<ParticleField>>) {
    for mut transform in query.iter_mut() {
        transform.rotate_y(particles::SPIN_PER_TICK);
    }
}

/// Tumble and drift each cube, reflecting velocity at the soft bound.
///
/// The reflection is a bare sign flip after the move: a cube may sit past
/// the bound for one tick, and speed is never lost or gained.
pub fn drift_cubes(mut query: Query<(&mut Transform, &mut Drifter)>) {
    for (mut transform, mut drifter) in query.iter_mut() {
        let rate = drifter.angular_rate;
        drifter.spin += rate;
        transform.rotation = Quat::from_euler(EulerRot::XYZ, drifter.spin.x, drifter.spin.y, 0.0);

        transform.translation.x += drifter.velocity.x;
        transform.translation.y += drifter.velocity.y;

        if transform.translation.x.abs() > cubes::BOUND {
            drifter.velocity.x = -drifter.velocity.x;
        }
        if transform.translation.y.abs() > cubes::BOUND {
            drifter.velocity.y = -drifter.velocity.y;
        }
    }
}

/// Integrate pointer offset into the swarm group's spin.
///
/// Accumulation, not assignment: holding the pointer off-center keeps the
/// group rotating, and it never snaps back when the pointer returns.
pub fn steer_swarm(
    pointer: Res<PointerSnapshot>,
    mut query: Query<(&mut Transform, &mut SwarmSpin), With<CubeSwarm>>,
) {
    for (mut transform, mut spin) in query.iter_mut() {
        spin.yaw += pointer.0.x * cubes::SWARM_GAIN;
        spin.pitch += pointer.0.y * cubes::SWARM_GAIN;
        transform.rotation = Quat::from_euler(EulerRot::XYZ, spin.pitch, spin.yaw, 0.0);
    }
}

/// Bob the robot on a sinusoid of elapsed time (absolute assignment)
pub fn float_robot(time: Res<Time>, mut query: Query<&mut Transform, With<RobotRig>>) {
    let height = float_height(time.elapsed_secs_f64() * 1000.0);
    for mut transform in query.iter_mut() {
        transform.translation.y = height;
    }
}

/// Point the robot toward the pointer (absolute assignment, unlike the swarm)
pub fn aim_robot(
    pointer: Res<PointerSnapshot>,
    mut query: Query<&mut Transform, With<RobotRig>>,
) {
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        pointer.0.y * robot::PITCH_GAIN,
        pointer.0.x * robot::YAW_GAIN,
        0.0,
    );
    for mut transform in query.iter_mut() {
        transform.rotation = rotation;
    }
}

/// Pulse the smile's X/Y scale on a sinusoid of elapsed time; Z stays 1
pub fn pulse_mouth(time: Res<Time>, mut query: Query<&mut Transform, With<MouthPulse>>) {
    let pulse = mouth_scale(time.elapsed_secs_f64() * 1000.0);
    for mut transform in query.iter_mut() {
        transform.scale = Vec3::new(pulse, pulse, 1.0);
    }
}

/// Emit `AppExit` once the Tauri side raises the stop flag, so the render
/// thread shuts down instead of animating forever
pub fn watch_shutdown(
    shutdown: Option<Res<ShutdownRes>>,
    mut exit_writer: MessageWriter<AppExit>,
) {
    if let Some(shutdown) = shutdown {
        if shutdown.0.is_requested() {
            println!("[Bevy] Shutdown requested, exiting render loop");
            exit_writer.write(AppExit::Success);
        }
    }
}

/// Robot height at `elapsed_ms`: base + amplitude · sin(t · ω).
/// Time-pure; replaying the same instant yields the same height.
pub fn float_height(elapsed_ms: f64) -> f32 {
    let (_, base, _) = robot::BASE_OFFSET;
    base + robot::FLOAT_AMPLITUDE * (elapsed_ms * robot::FLOAT_RATE).sin() as f32
}

/// Smile scale at `elapsed_ms`: 1 + amplitude · sin(t · ω), always within
/// [1 − amplitude, 1 + amplitude]
pub fn mouth_scale(elapsed_ms: f64) -> f32 {
    1.0 + robot::MOUTH_AMPLITUDE * (elapsed_ms * robot::MOUTH_RATE).sin() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bevy::resources::PointerSnapshot;
    use crate::tauri_bridge::shared_state::{PointerState, SharedShutdown};

    fn pointer_app(pointer: PointerState) -> App {
        let mut app = App::new();
        app.insert_resource(PointerSnapshot(pointer));
        app.add_systems(
            Update,
            (spin_particles, drift_cubes, steer_swarm, aim_robot).chain(),
        );
        app
    }

    fn set_pointer(app: &mut App, x: f32, y: f32) {
        app.world_mut().resource_mut::<PointerSnapshot>().0 = PointerState { x, y };
    }

    #[test]
    fn particle_spin_is_linear_in_ticks() {
        let mut app = pointer_app(PointerState::default());
        let field = app
            .world_mut()
            .spawn((Transform::default(), ParticleField))
            .id();

        let ticks = 250;
        for _ in 0..ticks {
            app.update();
        }

        let transform = app.world().get::<Transform>(field).unwrap();
        let (_, angle, _) = transform.rotation.to_euler(EulerRot::XYZ);
        let expected = ticks as f32 * particles::SPIN_PER_TICK;
        assert!(
            (angle - expected).abs() < 1e-4,
            "angle {angle} != {expected}"
        );
    }

    #[test]
    fn cube_velocity_reflects_at_bound_preserving_speed() {
        let mut app = pointer_app(PointerState::default());
        let cube = app
            .world_mut()
            .spawn((
                Transform::from_xyz(6.995, 0.0, 0.0),
                Drifter::new(Vec2::new(0.01, 0.0), Vec2::ZERO),
            ))
            .id();

        // First tick carries the cube past +7 and flips the sign
        app.update();
        {
            let world = app.world();
            let transform = world.get::<Transform>(cube).unwrap();
            let drifter = world.get::<Drifter>(cube).unwrap();
            assert!(transform.translation.x > cubes::BOUND, "overshoot allowed");
            assert_eq!(drifter.velocity.x, -0.01, "sign flipped, magnitude kept");
        }

        // Second tick moves it back inside; no second flip
        app.update();
        {
            let world = app.world();
            let transform = world.get::<Transform>(cube).unwrap();
            let drifter = world.get::<Drifter>(cube).unwrap();
            assert!(transform.translation.x < cubes::BOUND);
            assert_eq!(drifter.velocity.x, -0.01);
        }
    }

    #[test]
    fn cube_y_reflection_is_independent_of_x() {
        let mut app = pointer_app(PointerState::default());
        let cube = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, -6.995, 0.0),
                Drifter::new(Vec2::new(0.002, -0.01), Vec2::ZERO),
            ))
            .id();

        app.update();

        let drifter = app.world().get::<Drifter>(cube).unwrap();
        assert_eq!(drifter.velocity.y, 0.01, "y flipped at the lower bound");
        assert_eq!(drifter.velocity.x, 0.002, "x untouched");
    }

    #[test]
    fn cube_tumble_accumulates_euler_angles() {
        let mut app = pointer_app(PointerState::default());
        let cube = app
            .world_mut()
            .spawn((
                Transform::default(),
                Drifter::new(Vec2::ZERO, Vec2::new(0.013, 0.007)),
            ))
            .id();

        let ticks = 100;
        for _ in 0..ticks {
            app.update();
        }

        // rotation.x/y advance by the rate each tick, not by quaternion
        // composition about the world axes
        let expected = Quat::from_euler(
            EulerRot::XYZ,
            ticks as f32 * 0.013,
            ticks as f32 * 0.007,
            0.0,
        );
        let rotation = app.world().get::<Transform>(cube).unwrap().rotation;
        assert!(
            rotation.angle_between(expected) < 1e-4,
            "tumble diverged from accumulated angles"
        );
    }

    #[test]
    fn stop_flag_exits_within_one_tick() {
        let flag = SharedShutdown::default();
        let mut app = App::new();
        app.insert_resource(ShutdownRes(flag.clone()));
        app.add_systems(Update, watch_shutdown);

        app.update();
        assert_eq!(app.should_exit(), None);

        flag.request();
        app.update();
        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }

    #[test]
    fn swarm_spin_accumulates_pointer_history() {
        let mut app = pointer_app(PointerState { x: 0.3, y: 0.0 });
        let swarm = app
            .world_mut()
            .spawn((Transform::default(), CubeSwarm, SwarmSpin::default()))
            .id();

        app.update();
        let after_one = app.world().get::<SwarmSpin>(swarm).unwrap().yaw;

        app.update();
        let after_two = app.world().get::<SwarmSpin>(swarm).unwrap().yaw;

        assert!((after_one - 0.3 * cubes::SWARM_GAIN).abs() < 1e-7);
        assert!(
            (after_two - 2.0 * after_one).abs() < 1e-7,
            "two ticks accumulate twice the delta"
        );

        // Centering the pointer stops the accumulation but keeps the spin
        set_pointer(&mut app, 0.0, 0.0);
        app.update();
        assert_eq!(app.world().get::<SwarmSpin>(swarm).unwrap().yaw, after_two);
    }

    #[test]
    fn robot_orientation_is_absolute_not_accumulated() {
        let mut app = pointer_app(PointerState { x: 0.4, y: -0.2 });
        let rig = app
            .world_mut()
            .spawn((Transform::default(), RobotRig))
            .id();

        app.update();
        let after_one = app.world().get::<Transform>(rig).unwrap().rotation;

        for _ in 0..10 {
            app.update();
        }
        let after_many = app.world().get::<Transform>(rig).unwrap().rotation;

        assert_eq!(after_one, after_many, "holding the pointer holds the pose");

        let expected = Quat::from_euler(
            EulerRot::XYZ,
            -0.2 * robot::PITCH_GAIN,
            0.4 * robot::YAW_GAIN,
            0.0,
        );
        assert!(after_one.angle_between(expected) < 1e-6);
    }

    #[test]
    fn centered_pointer_leaves_swarm_and_robot_untouched() {
        // Pointer never moves off center for 1000 ticks
        let mut app = pointer_app(PointerState::default());
        let swarm = app
            .world_mut()
            .spawn((Transform::default(), CubeSwarm, SwarmSpin::default()))
            .id();
        let rig = app
            .world_mut()
            .spawn((Transform::default(), RobotRig))
            .id();

        for _ in 0..1000 {
            app.update();
        }

        assert_eq!(
            *app.world().get::<SwarmSpin>(swarm).unwrap(),
            SwarmSpin::default()
        );
        assert_eq!(
            app.world().get::<Transform>(rig).unwrap().rotation,
            Quat::IDENTITY
        );
    }

    #[test]
    fn float_height_matches_formula() {
        for t in [0.0f64, 1.0, 250.0, 10_000.0, 123_456.789] {
            let expected = 0.5 + 0.2 * ((t * 0.0015).sin() as f32);
            assert_eq!(float_height(t), expected);
        }
    }

    #[test]
    fn mouth_scale_stays_within_pulse_band() {
        for i in 0..10_000 {
            let s = mouth_scale(i as f64 * 3.7);
            assert!((0.95..=1.05).contains(&s), "scale {s} out of band");
        }
    }
}
