//! Viewport resize system
//!
//! The frontend reports window resizes through the bridge; the request is
//! applied here, before the tick's animation and draw. Applying a resize
//! means allocating a fresh render target at the new extent, pointing the
//! camera at it, and replacing the GPU copy buffer (its size is fixed at
//! creation). Bevy recomputes the camera's projection aspect from the new
//! target on its own, so a 75° fov at any aspect falls out for free.
//!
//! Idempotent with respect to dimensions: replaying the same request
//! produces a target of the same extent.

use bevy::{camera::RenderTarget, image::Image, prelude::*, render::renderer::RenderDevice};

use crate::bevy::components::OffscreenCamera;
use crate::bevy::plugins::FrameCopier;
use crate::bevy::resources::{RenderTargetHandle, ResizeInbox};
use crate::bevy::systems::scene::allocate_render_target;

pub fn apply_viewport_resize(
    mut commands: Commands,
    inbox: Option<Res<ResizeInbox>>,
    old_target: Option<Res<RenderTargetHandle>>,
    mut images: ResMut<Assets<Image>>,
    render_device: Res<RenderDevice>,
    mut cameras: Query<&mut Camera, With<OffscreenCamera>>,
    copiers: Query<Entity, With<FrameCopier>>,
) {
    let Some(inbox) = inbox else { return };
    let Some(viewport) = inbox.0.take() else {
        return;
    };

    println!(
        "[Bevy] Resizing render target to {}x{}",
        viewport.width, viewport.height
    );

    // The old copier's buffer no longer matches the target extent
    for entity in copiers.iter() {
        commands.entity(entity).despawn();
    }
    if let Some(old) = old_target {
        images.remove(&old.0);
    }

    let handle = allocate_render_target(
        &mut commands,
        &mut images,
        &render_device,
        viewport.width,
        viewport.height,
    );

    for mut camera in cameras.iter_mut() {
        camera.target = RenderTarget::Image(handle.clone().into());
    }
}
