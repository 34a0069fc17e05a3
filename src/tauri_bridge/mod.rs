//! Bridge layer between Tauri and Bevy
//!
//! This module handles all communication between the Tauri frontend and
//! the Bevy rendering backend: command handlers, the custom frame protocol,
//! and the shared state cells both sides hold.

pub mod commands;
pub mod protocol;
pub mod shared_state;

// Re-export commonly used types
pub use shared_state::{
    SharedFrameBuffer, SharedPointerState, SharedResizeRequest, SharedShutdown, SharedViewport,
};
