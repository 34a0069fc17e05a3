//! Bevy application setup and execution
//!
//! This module handles the creation and configuration of the Bevy app,
//! including plugin registration and system scheduling. The app runs
//! headless in a background thread; the schedule runner drives the tick
//! cadence in place of a window's vsync.

use bevy::{
    app::{App, ScheduleRunnerPlugin},
    prelude::*,
    window::ExitCondition,
};
use std::thread;
use std::time::Duration;

use crate::bevy::plugins::FrameCopyPlugin;
use crate::bevy::resources::*;
use crate::bevy::systems::*;
use crate::config::{PRE_ROLL_FRAMES, TARGET_FPS};
use crate::tauri_bridge::{
    SharedFrameBuffer, SharedPointerState, SharedResizeRequest, SharedShutdown,
};

/// Create and configure the Bevy application
pub fn create_app(
    frame_buffer: SharedFrameBuffer,
    pointer: SharedPointerState,
    resize: SharedResizeRequest,
    shutdown: SharedShutdown,
) -> App {
    let mut app = App::new();

    // Use DefaultPlugins but configure for headless operation
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: None,
                exit_condition: ExitCondition::DontExit,
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    );

    // Add schedule runner for controlled frame rate
    app.add_plugins(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
        1.0 / TARGET_FPS,
    )));

    // Add custom plugins
    app.add_plugins(FrameCopyPlugin);

    // Register systems. Resize and pointer sampling land before the tick's
    // animation; the animation order itself is part of the update contract.
    app.add_systems(Startup, setup_scene);
    app.add_systems(PreUpdate, (apply_viewport_resize, sample_pointer));
    app.add_systems(
        Update,
        (
            spin_particles,
            drift_cubes,
            steer_swarm,
            float_robot,
            aim_robot,
            pulse_mouth,
        )
            .chain(),
    );
    app.add_systems(Update, watch_shutdown);
    app.add_systems(Last, publish_frame);

    // Insert resources
    app.insert_resource(FrameBufferRes(frame_buffer));
    app.insert_resource(PointerInputRes(pointer));
    app.insert_resource(ResizeInbox(resize));
    app.insert_resource(ShutdownRes(shutdown));
    app.insert_resource(PointerSnapshot::default());
    app.insert_resource(FrameCount::default());
    app.insert_resource(PreRollFrames(PRE_ROLL_FRAMES));

    println!("[Bevy] App configured (headless mode)");
    app
}

/// Start Bevy in a background thread
pub fn start_backdrop(
    frame_buffer: SharedFrameBuffer,
    pointer: SharedPointerState,
    resize: SharedResizeRequest,
    shutdown: SharedShutdown,
) {
    thread::spawn(move || {
        println!("[Bevy] Thread started");
        let mut app = create_app(frame_buffer, pointer, resize, shutdown);
        println!("[Bevy] Running render loop...");
        app.run();
        println!("[Bevy] Render loop stopped");
    });
}
