//! Robot backdrop: a decorative animated 3D background in a webview
//!
//! Drifting particles, floating cubes, and a stylized robot head, all
//! reacting to pointer position. Bevy renders the scene headless in a
//! background thread; the Tauri webview hosts the page that displays the
//! frames and feeds pointer/resize events back.
//!
//! Architecture:
//! - Bevy runs in a background thread with NO window (true headless mode)
//! - A render-graph node copies the offscreen target to a mappable buffer
//! - GPU texture -> buffer -> channel -> shared frame cell -> frontend
//! - Frames cross to the page via the `frame://` protocol (JPEG) or a
//!   Base64 command fallback
//!
//! # Module Structure
//!
//! - `config`: every fixed scene and animation constant
//! - `tauri_bridge`: bridge layer between Tauri and Bevy
//!   - `shared_state`: thread-safe cells both sides hold
//!   - `commands`: Tauri command handlers (pointer, resize, frame fetch)
//!   - `protocol`: the `frame://` protocol handler
//! - `bevy`: Bevy engine integration
//!   - `components`: ECS components for the animated objects
//!   - `resources`: global resources
//!   - `plugins`: the GPU-to-CPU frame copy plugin
//!   - `systems`: scene construction and the per-tick update model
//!   - `app`: application setup

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Module declarations
pub mod bevy;
pub mod config;
pub mod tauri_bridge;

use std::{thread, time::Duration};
use tauri_bridge::{
    SharedFrameBuffer, SharedPointerState, SharedResizeRequest, SharedShutdown, SharedViewport,
};

/// Main entry point for the Tauri application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    println!("[Tauri] Starting...");

    // Create shared state
    let frame_buffer = SharedFrameBuffer::default();
    let pointer = SharedPointerState::default();
    let viewport = SharedViewport::default();
    let resize = SharedResizeRequest::default();
    let shutdown = SharedShutdown::default();

    // Start the backdrop renderer in a background thread
    bevy::start_backdrop(
        frame_buffer.clone(),
        pointer.clone(),
        resize.clone(),
        shutdown.clone(),
    );

    // Wait for Bevy to initialize
    thread::sleep(Duration::from_millis(1000));

    // Clone for the custom protocol handler
    let protocol_buffer = frame_buffer.clone();
    let exit_shutdown = shutdown.clone();

    // Build and run Tauri application
    tauri::Builder::default()
        .manage(frame_buffer)
        .manage(pointer)
        .manage(viewport)
        .manage(resize)
        // Register custom protocol "frame://" for direct binary transfer
        // This bypasses Tauri IPC JSON serialization completely!
        .register_asynchronous_uri_scheme_protocol("frame", move |_ctx, request, responder| {
            let buffer = protocol_buffer.clone();

            // Handle the request in a separate thread to avoid blocking
            std::thread::spawn(move || {
                let path = request.uri().path().to_owned();
                let response = tauri_bridge::protocol::handle_frame_protocol(&path, &buffer);
                responder.respond(response);
            });
        })
        .invoke_handler(tauri::generate_handler![
            tauri_bridge::commands::get_frame,
            tauri_bridge::commands::get_render_size,
            tauri_bridge::commands::pointer_moved,
            tauri_bridge::commands::resize_viewport
        ])
        .build(tauri::generate_context!())
        .expect("Tauri error")
        .run(move |_app, event| {
            // Raise the stop flag so the render thread winds down with us
            if let tauri::RunEvent::Exit = event {
                println!("[Tauri] Exiting, stopping render loop");
                exit_shutdown.request();
            }
        });
}
