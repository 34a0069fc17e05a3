//! GPU-to-CPU frame copy plugin
//!
//! Render-world plumbing that moves the offscreen render target's pixels to
//! the main world every frame, following the upstream Bevy headless-renderer
//! pattern:
//!
//! 1. A `FrameCopyNode` in the `RenderGraph` copies the target texture into
//!    a mappable buffer after the cameras have drawn.
//! 2. After `RenderSystems::Render`, the buffer is mapped and its contents
//!    sent over a crossbeam channel.
//! 3. The main world drains the channel in `Last` (see `frame_extraction`).

use bevy::{
    prelude::*,
    render::{
        render_asset::RenderAssets,
        render_graph::{self, NodeRunError, RenderGraph, RenderGraphContext, RenderLabel},
        render_resource::{
            Buffer, BufferDescriptor, BufferUsages, CommandEncoderDescriptor, Extent3d, MapMode,
            PollType, TexelCopyBufferInfo, TexelCopyBufferLayout,
        },
        renderer::{RenderContext, RenderDevice, RenderQueue},
        Extract, Render, RenderApp, RenderSystems,
    },
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::bevy::resources::{MainWorldReceiver, RenderWorldSender};

pub struct FrameCopyPlugin;

impl Plugin for FrameCopyPlugin {
    fn build(&self, app: &mut App) {
        let (s, r) = crossbeam_channel::unbounded();

        let render_app = app
            .insert_resource(MainWorldReceiver(r))
            .sub_app_mut(RenderApp);

        let mut graph = render_app.world_mut().resource_mut::<RenderGraph>();
        graph.add_node(FrameCopyLabel, FrameCopyNode);
        graph.add_node_edge(bevy::render::graph::CameraDriverLabel, FrameCopyLabel);

        render_app
            .insert_resource(RenderWorldSender(s))
            .add_systems(ExtractSchedule, frame_copy_extract)
            .add_systems(
                Render,
                receive_frame_from_buffer.after(RenderSystems::Render),
            );
    }
}

/// Copies one source image into a CPU-mappable buffer each frame.
///
/// Replaced wholesale when the render target is resized; the buffer size is
/// fixed at construction.
#[derive(Clone, Component)]
pub struct FrameCopier {
    buffer: Buffer,
    enabled: Arc<AtomicBool>,
    src_image: Handle<Image>,
}

impl FrameCopier {
    pub fn new(src_image: Handle<Image>, size: Extent3d, render_device: &RenderDevice) -> Self {
        let cpu_buffer = render_device.create_buffer(&BufferDescriptor {
            label: None,
            size: padded_frame_bytes(size.width, size.height),
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        FrameCopier {
            buffer: cpu_buffer,
            src_image,
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

/// Byte size of the mappable buffer for a `width`x`height` RGBA target.
/// Rows are padded to wgpu's copy alignment; the copy node writes at the
/// same stride, and `remove_row_padding` on the main-world side expects
/// exactly this length.
pub fn padded_frame_bytes(width: u32, height: u32) -> u64 {
    RenderDevice::align_copy_bytes_per_row(width as usize * 4) as u64 * height as u64
}

/// Render-world mirror of the main world's copier entities
#[derive(Clone, Default, Resource, Deref, DerefMut)]
struct FrameCopiers(Vec<FrameCopier>);

fn frame_copy_extract(mut commands: Commands, copiers: Extract<Query<&FrameCopier>>) {
    commands.insert_resource(FrameCopiers(copiers.iter().cloned().collect()));
}

#[derive(Debug, PartialEq, Eq, Clone, Hash, RenderLabel)]
struct FrameCopyLabel;

#[derive(Default)]
struct FrameCopyNode;

impl render_graph::Node for FrameCopyNode {
    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let copiers = world.get_resource::<FrameCopiers>().unwrap();
        let gpu_images = world
            .get_resource::<RenderAssets<bevy::render::texture::GpuImage>>()
            .unwrap();

        for copier in copiers.iter() {
            if !copier.enabled() {
                continue;
            }

            // The source may lag one frame behind a resize; skip until the
            // new GPU image exists.
            let Some(src_image) = gpu_images.get(&copier.src_image) else {
                continue;
            };

            let mut encoder = render_context
                .render_device()
                .create_command_encoder(&CommandEncoderDescriptor::default());

            let block_dimensions = src_image.texture_format.block_dimensions();
            let block_size = src_image.texture_format.block_copy_size(None).unwrap();

            let padded_bytes_per_row = RenderDevice::align_copy_bytes_per_row(
                (src_image.size.width as usize / block_dimensions.0 as usize) * block_size as usize,
            );

            encoder.copy_texture_to_buffer(
                src_image.texture.as_image_copy(),
                TexelCopyBufferInfo {
                    buffer: &copier.buffer,
                    layout: TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(
                            std::num::NonZero::<u32>::new(padded_bytes_per_row as u32)
                                .unwrap()
                                .into(),
                        ),
                        rows_per_image: None,
                    },
                },
                src_image.size,
            );

            let render_queue = world.get_resource::<RenderQueue>().unwrap();
            render_queue.submit(std::iter::once(encoder.finish()));
        }

        Ok(())
    }
}

fn receive_frame_from_buffer(
    copiers: Res<FrameCopiers>,
    render_device: Res<RenderDevice>,
    sender: Res<RenderWorldSender>,
) {
    for copier in copiers.0.iter() {
        if !copier.enabled() {
            continue;
        }

        let buffer_slice = copier.buffer.slice(..);

        let (s, r) = crossbeam_channel::bounded(1);

        buffer_slice.map_async(MapMode::Read, move |res| match res {
            Ok(res) => s.send(res).expect("Failed to send map update"),
            Err(err) => panic!("Failed to map buffer {err}"),
        });

        render_device
            .poll(PollType::wait())
            .expect("Failed to poll device for map async");

        r.recv().expect("Failed to receive the map_async message");

        let _ = sender.send(buffer_slice.get_mapped_range().to_vec());

        copier.buffer.unmap();
    }
}
