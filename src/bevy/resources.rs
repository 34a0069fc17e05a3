//! Bevy resource definitions
//!
//! This module contains all global resources used by Bevy systems, most of
//! them thin wrappers around the shared cells the Tauri side also holds.

use bevy::prelude::*;

use crate::tauri_bridge::shared_state::{
    PointerState, SharedFrameBuffer, SharedPointerState, SharedResizeRequest, SharedShutdown,
};

// =============================================================================
// Pointer Input
// =============================================================================

/// Handle to the pointer state written by the Tauri side
#[derive(Resource)]
pub struct PointerInputRes(pub SharedPointerState);

/// Immutable per-tick snapshot of the pointer.
///
/// Copied from the shared cell once at the start of every tick so all
/// animation systems read the same value, even if a pointer-move lands
/// mid-tick on the Tauri side.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct PointerSnapshot(pub PointerState);

// =============================================================================
// Rendering
// =============================================================================

/// Handle to the offscreen render target texture
#[derive(Resource)]
pub struct RenderTargetHandle(pub Handle<Image>);

/// Extent of the current render target in pixels.
///
/// Tracks the target through resizes; frame unpadding and stale-frame
/// detection read it.
#[derive(Resource, Debug, Clone, Copy)]
pub struct TargetExtent {
    pub width: u32,
    pub height: u32,
}

/// Handle to the pending-resize cell written by the Tauri side
#[derive(Resource)]
pub struct ResizeInbox(pub SharedResizeRequest);

/// Shared frame buffer resource for Bevy
#[derive(Resource, Clone)]
pub struct FrameBufferRes(pub SharedFrameBuffer);

// =============================================================================
// Frame Management
// =============================================================================

/// Counter for total frames published
#[derive(Resource, Default)]
pub struct FrameCount(pub u32);

/// Number of pre-roll frames to skip before starting output
#[derive(Resource, Default)]
pub struct PreRollFrames(pub u32);

// =============================================================================
// Shutdown
// =============================================================================

/// Handle to the stop flag set by the Tauri side on exit
#[derive(Resource)]
pub struct ShutdownRes(pub SharedShutdown);

// =============================================================================
// Channel Communication (Main World <-> Render World)
// =============================================================================

use crossbeam_channel::{Receiver, Sender};

/// Receives copied frame bytes from the render world
#[derive(Resource, Deref)]
pub struct MainWorldReceiver(pub Receiver<Vec<u8>>);

/// Sends copied frame bytes to the main world
#[derive(Resource, Deref)]
pub struct RenderWorldSender(pub Sender<Vec<u8>>);
