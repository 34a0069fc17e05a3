//! Custom protocol handlers for efficient data transfer
//!
//! This module implements the `frame://` custom protocol for direct binary
//! transfer of render frames, bypassing Tauri's IPC JSON serialization.

use image::{codecs::jpeg::JpegEncoder, ImageBuffer, ImageEncoder, Rgba};
use tauri::http::Response as HttpResponse;

use crate::config::compression::JPEG_QUALITY;
use super::shared_state::{FramePixels, SharedFrameBuffer};

type Response = HttpResponse<Vec<u8>>;

/// Handle requests to the custom `frame://` protocol
///
/// Supported endpoints:
/// - `frame` or `frame.jpg`: JPEG-compressed frame (~50-100KB)
/// - `frame.raw`: Raw RGBA frame
pub fn handle_frame_protocol(uri_path: &str, buffer: &SharedFrameBuffer) -> Response {
    let resource = uri_path.trim_start_matches('/');

    match resource {
        // JPEG compressed frame - much smaller data size!
        "frame" | "frame.jpg" => handle_jpeg_frame(buffer),

        // Raw RGBA frame (for comparison/debugging)
        "frame.raw" => handle_raw_frame(buffer),

        _ => HttpResponse::builder()
            .status(404)
            .header("Content-Type", "text/plain")
            .body("Not Found".as_bytes().to_vec())
            .unwrap(),
    }
}

fn take_frame(buffer: &SharedFrameBuffer) -> Option<FramePixels> {
    buffer.0.lock().ok().and_then(|guard| guard.clone())
}

/// Handle JPEG-compressed frame request
fn handle_jpeg_frame(buffer: &SharedFrameBuffer) -> Response {
    match take_frame(buffer) {
        Some(frame) => {
            let Some(img) = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(
                frame.width,
                frame.height,
                frame.rgba,
            ) else {
                return not_ready();
            };

            // Convert RGBA to RGB for JPEG (no alpha channel)
            let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();

            let mut jpeg_data = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut jpeg_data, JPEG_QUALITY);
            if encoder
                .write_image(
                    rgb_img.as_raw(),
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgb8,
                )
                .is_err()
            {
                return not_ready();
            }

            frame_response(jpeg_data, "image/jpeg", frame.width, frame.height)
        }
        None => not_ready(),
    }
}

/// Handle raw RGBA frame request
fn handle_raw_frame(buffer: &SharedFrameBuffer) -> Response {
    match take_frame(buffer) {
        Some(frame) => frame_response(
            frame.rgba,
            "application/octet-stream",
            frame.width,
            frame.height,
        ),
        None => not_ready(),
    }
}

fn frame_response(body: Vec<u8>, content_type: &str, width: u32, height: u32) -> Response {
    HttpResponse::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("X-Frame-Width", width.to_string())
        .header("X-Frame-Height", height.to_string())
        .header("Access-Control-Allow-Origin", "*")
        .header(
            "Access-Control-Expose-Headers",
            "X-Frame-Width, X-Frame-Height",
        )
        .body(body)
        .unwrap()
}

fn not_ready() -> Response {
    HttpResponse::builder()
        .status(503)
        .header("Content-Type", "text/plain")
        .body("Frame not ready".as_bytes().to_vec())
        .unwrap()
}
