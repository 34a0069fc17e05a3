//! Headless capture demo
//!
//! Runs the full backdrop app without any Tauri frontend, waits for the
//! first published frame, and writes it to `test_images/capture.png`.
//! Useful for eyeballing the scene composition without a webview.
//!
//! ```sh
//! cargo run --example headless_capture
//! ```

use bevy::{app::AppExit, prelude::*};
use std::path::PathBuf;

use robot_backdrop_lib::bevy::app::create_app;
use robot_backdrop_lib::bevy::resources::FrameBufferRes;
use robot_backdrop_lib::tauri_bridge::shared_state::{
    SharedFrameBuffer, SharedPointerState, SharedResizeRequest, SharedShutdown,
};

fn main() {
    println!("=== Headless backdrop capture ===");

    let frame_buffer = SharedFrameBuffer::default();
    let pointer = SharedPointerState::default();
    let resize = SharedResizeRequest::default();
    let shutdown = SharedShutdown::default();

    let mut app = create_app(frame_buffer, pointer, resize, shutdown);
    app.add_systems(Last, save_first_frame);
    app.run();
}

/// Once the pre-roll is over and a frame lands in the shared buffer, save
/// it and exit
fn save_first_frame(
    buffer: Res<FrameBufferRes>,
    mut exit_writer: MessageWriter<AppExit>,
    mut saved: Local<bool>,
) {
    if *saved {
        return;
    }

    let Ok(guard) = buffer.0 .0.lock() else { return };
    let Some(frame) = guard.as_ref() else { return };

    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba.clone())
        .expect("frame dimensions match pixel data");

    let out_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_images");
    std::fs::create_dir_all(&out_dir).expect("create output dir");
    let out_path = out_dir.join("capture.png");

    img.save(&out_path).expect("write png");
    println!("[Capture] Saved {}x{} frame to {:?}", frame.width, frame.height, out_path);

    *saved = true;
    exit_writer.write(AppExit::Success);
}
