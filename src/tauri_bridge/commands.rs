//! Tauri command handlers
//!
//! This module contains all the Tauri command functions that can be invoked
//! from the frontend JavaScript code. These are the backdrop's only inputs:
//! pointer movement and viewport resizes, plus frame/size queries.

use base64::{engine::general_purpose::STANDARD, Engine};
use tauri::State;

use super::shared_state::{
    FrameResponse, PointerState, SharedFrameBuffer, SharedPointerState, SharedResizeRequest,
    SharedViewport, Viewport,
};

/// Get the current rendered frame as Base64-encoded RGBA data
#[tauri::command]
pub fn get_frame(state: State<SharedFrameBuffer>) -> Result<FrameResponse, String> {
    let guard = state.0.lock().map_err(|e| e.to_string())?;
    match &*guard {
        Some(frame) => Ok(FrameResponse {
            data: STANDARD.encode(&frame.rgba),
            width: frame.width,
            height: frame.height,
        }),
        None => Err("No frame yet (scene still loading)".into()),
    }
}

/// Get the current render resolution
#[tauri::command]
pub fn get_render_size(viewport: State<SharedViewport>) -> Result<(u32, u32), String> {
    let guard = viewport.0.lock().map_err(|e| e.to_string())?;
    Ok((guard.width, guard.height))
}

/// Receive a pointer-move event from the frontend.
///
/// Client coordinates are normalized against the current viewport so the
/// center maps to (0, 0) and the edges to ±0.5. The previous value is
/// overwritten; last-write-wins.
#[tauri::command]
pub fn pointer_moved(
    pointer: State<SharedPointerState>,
    viewport: State<SharedViewport>,
    client_x: f32,
    client_y: f32,
) -> Result<(), String> {
    let vp = *viewport.0.lock().map_err(|e| e.to_string())?;
    let mut guard = pointer.0.lock().map_err(|e| e.to_string())?;
    *guard = PointerState::from_client(client_x, client_y, vp);
    Ok(())
}

/// Receive a viewport resize from the frontend.
///
/// The shared viewport is updated immediately (pointer normalization uses
/// it), and a render-target resize is queued for the backend's next tick.
#[tauri::command]
pub fn resize_viewport(
    viewport: State<SharedViewport>,
    pending: State<SharedResizeRequest>,
    width: u32,
    height: u32,
) -> Result<(), String> {
    let new_viewport = Viewport { width, height };
    {
        let mut guard = viewport.0.lock().map_err(|e| e.to_string())?;
        *guard = new_viewport;
    }
    pending.submit(new_viewport);
    Ok(())
}
