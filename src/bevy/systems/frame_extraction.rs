//! Frame extraction system
//!
//! Drains the channel fed by the render world's copy node, strips GPU row
//! padding, and publishes the newest frame to the shared buffer the Tauri
//! side reads from. Runs in `Last`, after the tick's animation has been
//! drawn.

use bevy::{prelude::*, render::renderer::RenderDevice};

use crate::bevy::resources::{
    FrameBufferRes, FrameCount, MainWorldReceiver, PreRollFrames, TargetExtent,
};
use crate::tauri_bridge::shared_state::FramePixels;

pub fn publish_frame(
    receiver: Res<MainWorldReceiver>,
    buffer: Option<Res<FrameBufferRes>>,
    extent: Option<Res<TargetExtent>>,
    mut count: ResMut<FrameCount>,
    mut pre_roll: ResMut<PreRollFrames>,
) {
    let Some(buffer) = buffer else { return };
    let Some(extent) = extent else { return };

    // Wait for the scene to be fully rendered before publishing anything
    if pre_roll.0 > 0 {
        while receiver.try_recv().is_ok() {}
        pre_roll.0 -= 1;
        if pre_roll.0 == 0 {
            println!("[Bevy] Pre-roll complete, publishing frames");
        }
        return;
    }

    // Keep only the newest frame if several queued up
    let mut raw = Vec::new();
    while let Ok(data) = receiver.try_recv() {
        raw = data;
    }
    if raw.is_empty() {
        return;
    }

    let Some(rgba) = remove_row_padding(&raw, extent.width, extent.height) else {
        // A frame copied before the last resize; its size no longer matches
        return;
    };

    let Ok(mut guard) = buffer.0 .0.lock() else {
        return;
    };
    *guard = Some(FramePixels {
        width: extent.width,
        height: extent.height,
        rgba,
    });
    count.0 += 1;
    if count.0 == 1 {
        println!(
            "[Bevy] First frame published ({}x{})",
            extent.width, extent.height
        );
    }
}

/// Remove GPU buffer row padding alignment, returning tightly packed RGBA.
/// Returns `None` when the byte count doesn't match the expected extent
/// (a stale in-flight frame around a resize).
fn remove_row_padding(data: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    let row_bytes = width as usize * 4;
    let aligned_row_bytes = RenderDevice::align_copy_bytes_per_row(row_bytes);

    if data.len() != aligned_row_bytes * height as usize {
        return None;
    }

    if row_bytes == aligned_row_bytes {
        return Some(data.to_vec());
    }

    Some(
        data.chunks(aligned_row_bytes)
            .take(height as usize)
            .flat_map(|row| &row[..row_bytes.min(row.len())])
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_rows_are_stripped() {
        // 2x2 RGBA with rows padded to 256 bytes (wgpu's copy alignment)
        let width = 2u32;
        let height = 2u32;
        let aligned = RenderDevice::align_copy_bytes_per_row(width as usize * 4);

        let mut data = vec![0u8; aligned * height as usize];
        for row in 0..height as usize {
            for i in 0..8 {
                data[row * aligned + i] = (row * 8 + i) as u8;
            }
        }

        let rgba = remove_row_padding(&data, width, height).expect("valid frame");
        assert_eq!(rgba.len(), 16);
        assert_eq!(&rgba[..8], &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(&rgba[8..], &[8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn copy_buffer_length_matches_publish_check() {
        // A frame of exactly the copier's buffer size at the default extent
        // must survive the length check, or no frame is ever delivered
        use crate::bevy::plugins::padded_frame_bytes;
        use crate::config::{RENDER_HEIGHT, RENDER_WIDTH};

        let frame = vec![0u8; padded_frame_bytes(RENDER_WIDTH, RENDER_HEIGHT) as usize];
        let rgba = remove_row_padding(&frame, RENDER_WIDTH, RENDER_HEIGHT)
            .expect("default-extent frame is publishable");
        assert_eq!(rgba.len(), RENDER_WIDTH as usize * RENDER_HEIGHT as usize * 4);
    }

    #[test]
    fn stale_sized_frames_are_rejected() {
        let aligned = RenderDevice::align_copy_bytes_per_row(800 * 4);
        let old_frame = vec![0u8; aligned * 600];
        // Target has since been resized; the old buffer no longer matches
        assert!(remove_row_padding(&old_frame, 1024, 768).is_none());
    }
}
