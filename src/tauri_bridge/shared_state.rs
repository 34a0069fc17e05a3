//! Shared state structures for communication between Tauri and Bevy
//!
//! This module defines thread-safe cells that carry frontend events
//! (pointer movement, viewport resizes) into the render backend and rendered
//! frames back out. All of them live for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

// =============================================================================
// Frame Buffer
// =============================================================================

/// Raw pixels of one rendered frame, tagged with the extent they were
/// rendered at so a resize mid-stream can't misreport dimensions
#[derive(Clone)]
pub struct FramePixels {
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixel data, row-major, no padding
    pub rgba: Vec<u8>,
}

/// Thread-safe frame buffer shared between Bevy and Tauri.
/// Holds the latest published frame; earlier frames are overwritten.
#[derive(Clone, Default)]
pub struct SharedFrameBuffer(pub Arc<Mutex<Option<FramePixels>>>);

/// Frame response containing Base64-encoded RGBA pixel data
#[derive(Serialize, Deserialize)]
pub struct FrameResponse {
    /// Base64-encoded RGBA pixel data (avoids slow JSON array serialization)
    pub data: String,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// Pointer State
// =============================================================================

/// Pointer position normalized to `[-0.5, 0.5]` on both axes, with (0, 0) at
/// the viewport center. Overwritten on every pointer-move event;
/// last-write-wins, no queuing.
#[derive(Serialize, Deserialize, Clone, Copy, Default, Debug, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    /// Normalize raw client coordinates against the viewport.
    ///
    /// A zero-sized viewport divides by zero and yields non-finite values;
    /// those propagate into the scene unguarded and produce a degenerate
    /// frame rather than a crash.
    pub fn from_client(client_x: f32, client_y: f32, viewport: Viewport) -> Self {
        Self {
            x: client_x / viewport.width as f32 - 0.5,
            y: client_y / viewport.height as f32 - 0.5,
        }
    }
}

/// Thread-safe pointer state shared between Tauri and Bevy
#[derive(Clone, Default)]
pub struct SharedPointerState(pub Arc<Mutex<PointerState>>);

// =============================================================================
// Viewport
// =============================================================================

/// Current viewport dimensions in pixels
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: crate::config::RENDER_WIDTH,
            height: crate::config::RENDER_HEIGHT,
        }
    }
}

/// Thread-safe current viewport dimensions. Updated immediately when the
/// frontend reports a resize; pointer normalization reads it.
#[derive(Clone, Default)]
pub struct SharedViewport(pub Arc<Mutex<Viewport>>);

/// Pending render-target resize, consumed by the backend on its next tick.
/// Only the most recent request is kept.
#[derive(Clone, Default)]
pub struct SharedResizeRequest(pub Arc<Mutex<Option<Viewport>>>);

impl SharedResizeRequest {
    /// Record a resize, replacing any request not yet consumed
    pub fn submit(&self, viewport: Viewport) {
        if let Ok(mut guard) = self.0.lock() {
            *guard = Some(viewport);
        }
    }

    /// Take the pending request, if any
    pub fn take(&self) -> Option<Viewport> {
        self.0.lock().ok().and_then(|mut guard| guard.take())
    }
}

// =============================================================================
// Shutdown Flag
// =============================================================================

/// Stop flag for the render loop. Set when the Tauri app exits; a Bevy
/// system watches it and emits `AppExit` so the render thread winds down.
#[derive(Clone, Default)]
pub struct SharedShutdown(pub Arc<AtomicBool>);

impl SharedShutdown {
    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_center_normalizes_to_origin() {
        let vp = Viewport {
            width: 800,
            height: 600,
        };
        let p = PointerState::from_client(400.0, 300.0, vp);
        assert_eq!(p, PointerState { x: 0.0, y: 0.0 });
    }

    #[test]
    fn pointer_corners_normalize_to_half() {
        let vp = Viewport {
            width: 1000,
            height: 500,
        };
        let top_left = PointerState::from_client(0.0, 0.0, vp);
        assert_eq!(top_left, PointerState { x: -0.5, y: -0.5 });

        let bottom_right = PointerState::from_client(1000.0, 500.0, vp);
        assert_eq!(bottom_right, PointerState { x: 0.5, y: 0.5 });
    }

    #[test]
    fn zero_viewport_propagates_non_finite() {
        let vp = Viewport {
            width: 0,
            height: 0,
        };
        let p = PointerState::from_client(120.0, 80.0, vp);
        assert!(!p.x.is_finite());
        assert!(!p.y.is_finite());
    }

    #[test]
    fn resize_requests_are_last_write_wins() {
        let pending = SharedResizeRequest::default();
        pending.submit(Viewport {
            width: 640,
            height: 480,
        });
        pending.submit(Viewport {
            width: 1920,
            height: 1080,
        });

        assert_eq!(
            pending.take(),
            Some(Viewport {
                width: 1920,
                height: 1080
            })
        );
        assert_eq!(pending.take(), None);
    }

    #[test]
    fn shutdown_flag_round_trip() {
        let flag = SharedShutdown::default();
        assert!(!flag.is_requested());
        flag.request();
        assert!(flag.is_requested());
    }
}
