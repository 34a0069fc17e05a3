//! Scene setup system
//!
//! Builds the whole backdrop once at startup: offscreen render target,
//! camera, lights, the particle field, the cube swarm, and the robot rig.
//! Nothing here is spawned or despawned afterwards; the animation systems
//! only mutate transforms.

use bevy::{
    asset::RenderAssetUsages,
    camera::RenderTarget,
    core_pipeline::tonemapping::Tonemapping,
    image::Image,
    mesh::{Indices, PrimitiveTopology},
    pbr::{MeshMaterial3d, StandardMaterial},
    prelude::*,
    render::{
        render_resource::{Extent3d, TextureFormat, TextureUsages},
        renderer::RenderDevice,
    },
};
use rand::Rng;

use crate::bevy::components::{
    CubeSwarm, Drifter, MouthPulse, OffscreenCamera, ParticleField, RobotRig, SwarmSpin,
};
use crate::bevy::plugins::FrameCopier;
use crate::bevy::resources::{RenderTargetHandle, TargetExtent};
use crate::config::{camera, cubes, particles, robot, RENDER_HEIGHT, RENDER_WIDTH};

/// #ccff00
const LIME: Color = Color::srgb(0.8, 1.0, 0.0);
/// #ff5e00
const ORANGE: Color = Color::srgb(1.0, 0.369, 0.0);

/// Setup the 3D scene with camera, objects, and lights
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    render_device: Res<RenderDevice>,
) {
    println!("[Bevy] Setting up scene...");

    let target_handle = allocate_render_target(
        &mut commands,
        &mut images,
        &render_device,
        RENDER_WIDTH,
        RENDER_HEIGHT,
    );

    // Camera at z=7 looking down -Z, matching the composition the constants
    // were tuned for
    commands.spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Image(target_handle.into()),
            clear_color: ClearColorConfig::Custom(Color::srgb(0.02, 0.02, 0.03)),
            ..default()
        },
        Tonemapping::None,
        Projection::Perspective(PerspectiveProjection {
            fov: camera::FOV_DEGREES.to_radians(),
            near: camera::NEAR,
            far: camera::FAR,
            ..default()
        }),
        Transform::from_xyz(0.0, 0.0, camera::DISTANCE),
        OffscreenCamera,
    ));

    spawn_lights(&mut commands);
    spawn_particle_field(&mut commands, &mut meshes, &mut materials);
    spawn_cube_swarm(&mut commands, &mut meshes, &mut materials);
    spawn_robot(&mut commands, &mut meshes, &mut materials);

    println!("[Bevy] Scene setup complete!");
}

/// Create an offscreen render target of the given extent, along with the
/// copier that moves its pixels to the CPU. Also used when the viewport
/// resizes.
pub fn allocate_render_target(
    commands: &mut Commands,
    images: &mut Assets<Image>,
    render_device: &RenderDevice,
    width: u32,
    height: u32,
) -> Handle<Image> {
    let size = Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let mut target = Image::new_target_texture(size.width, size.height, TextureFormat::bevy_default());
    target.texture_descriptor.usage |= TextureUsages::COPY_SRC;
    let handle = images.add(target);

    commands.spawn(FrameCopier::new(handle.clone(), size, render_device));
    commands.insert_resource(RenderTargetHandle(handle.clone()));
    commands.insert_resource(TargetExtent { width, height });

    handle
}

fn spawn_lights(commands: &mut Commands) {
    // Soft white fill
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });

    // Lime key light
    commands.spawn((
        DirectionalLight {
            color: LIME,
            illuminance: 4_000.0,
            ..default()
        },
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Orange accent near the robot
    commands.spawn((
        PointLight {
            color: ORANGE,
            intensity: 2_000_000.0,
            range: 15.0,
            ..default()
        },
        Transform::from_xyz(4.0, 2.0, 2.0),
    ));
}

fn spawn_particle_field(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let mut rng = rand::rng();
    let positions: Vec<[f32; 3]> = (0..particles::COUNT)
        .map(|_| {
            [
                rng.random_range(-0.5..0.5) * particles::SPREAD,
                rng.random_range(-0.5..0.5) * particles::SPREAD,
                rng.random_range(-0.5..0.5) * particles::SPREAD,
            ]
        })
        .collect();

    let mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions);

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: LIME.with_alpha(particles::OPACITY),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::default(),
        ParticleField,
    ));
}

fn spawn_cube_swarm(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let mut rng = rand::rng();

    commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            CubeSwarm,
            SwarmSpin::default(),
        ))
        .with_children(|swarm| {
            for _ in 0..cubes::COUNT {
                let edge = |rng: &mut rand::rngs::ThreadRng| {
                    cubes::EDGE_MIN + rng.random::<f32>() * cubes::EDGE_SPAN
                };
                let mesh = Cuboid::new(edge(&mut rng), edge(&mut rng), edge(&mut rng));

                swarm.spawn((
                    Mesh3d(meshes.add(mesh)),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: Color::srgb_u8(0x11, 0x11, 0x11),
                        emissive: LIME.to_linear() * cubes::EMISSIVE_INTENSITY,
                        metallic: 0.8,
                        perceptual_roughness: 0.3,
                        ..default()
                    })),
                    Transform::from_xyz(
                        rng.random_range(-0.5..0.5) * cubes::SPREAD,
                        rng.random_range(-0.5..0.5) * cubes::SPREAD,
                        rng.random_range(-0.5..0.5) * cubes::SPREAD,
                    ),
                    Drifter::new(
                        Vec2::new(
                            (rng.random::<f32>() - 0.5) * cubes::MAX_DRIFT,
                            (rng.random::<f32>() - 0.5) * cubes::MAX_DRIFT,
                        ),
                        Vec2::new(
                            rng.random::<f32>() * cubes::MAX_TUMBLE,
                            rng.random::<f32>() * cubes::MAX_TUMBLE,
                        ),
                    ),
                ));
            }
        });
}

fn spawn_robot(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let (bx, by, bz) = robot::BASE_OFFSET;

    let white_unlit = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });

    commands
        .spawn((
            Transform::from_xyz(bx, by, bz).with_scale(Vec3::splat(robot::SCALE)),
            Visibility::default(),
            RobotRig,
        ))
        .with_children(|rig| {
            // Head
            rig.spawn((
                Mesh3d(meshes.add(Cuboid::new(3.0, 2.6, 2.6))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgb_u8(0x08, 0x08, 0x08),
                    perceptual_roughness: 0.2,
                    metallic: 0.9,
                    ..default()
                })),
                Transform::default(),
            ));

            // Face screen, just proud of the head's front face
            rig.spawn((
                Mesh3d(meshes.add(Rectangle::new(2.7, 2.2))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgba_u8(0x11, 0x11, 0x11, 242),
                    unlit: true,
                    alpha_mode: AlphaMode::Blend,
                    ..default()
                })),
                Transform::from_xyz(0.0, 0.0, 1.31),
            ));

            // Eyes
            for x in [-0.6, 0.6] {
                rig.spawn((
                    Mesh3d(meshes.add(Rectangle::new(0.5, 0.5))),
                    MeshMaterial3d(white_unlit.clone()),
                    Transform::from_xyz(x, 0.2, 1.32),
                ));
            }

            // Smile
            rig.spawn((
                Mesh3d(meshes.add(smile_mesh(0.4, 0.04, 32, 12))),
                MeshMaterial3d(white_unlit.clone()),
                Transform::from_xyz(0.0, -0.4, 1.32),
                MouthPulse,
            ));

            // Glowing rim drawn as box edges
            rig.spawn((
                Mesh3d(meshes.add(box_edges_mesh(3.1, 2.7, 2.7))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: ORANGE.with_alpha(0.3),
                    unlit: true,
                    alpha_mode: AlphaMode::Blend,
                    ..default()
                })),
                Transform::default(),
            ));

            // Antennas
            for (x, tilt) in [(-1.0, -0.3), (1.0, 0.3)] {
                rig.spawn((
                    Mesh3d(meshes.add(Cylinder::new(0.1, 0.4))),
                    MeshMaterial3d(white_unlit.clone()),
                    Transform::from_xyz(x, 1.4, 0.0).with_rotation(Quat::from_rotation_z(tilt)),
                ));
            }
        });
}

/// Half-torus lying in the XY plane, sweeping the lower semicircle so the
/// arc opens upward (a smile). `arc_segments` rings along the sweep,
/// `tube_segments` vertices around the tube.
fn smile_mesh(major_radius: f32, tube_radius: f32, arc_segments: u32, tube_segments: u32) -> Mesh {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();

    for i in 0..=arc_segments {
        let u = i as f32 / arc_segments as f32;
        let theta = std::f32::consts::PI * (1.0 + u);
        let (sin_t, cos_t) = theta.sin_cos();

        for j in 0..=tube_segments {
            let v = j as f32 / tube_segments as f32;
            let phi = v * std::f32::consts::TAU;
            let (sin_p, cos_p) = phi.sin_cos();

            let ring = major_radius + tube_radius * cos_p;
            positions.push([ring * cos_t, ring * sin_t, tube_radius * sin_p]);
            normals.push([cos_p * cos_t, cos_p * sin_t, sin_p]);
            uvs.push([u, v]);
        }
    }

    let stride = tube_segments + 1;
    for i in 0..arc_segments {
        for j in 0..tube_segments {
            let a = i * stride + j;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

/// The 12 edges of an axis-aligned box as a line list, for the wireframe rim
fn box_edges_mesh(x: f32, y: f32, z: f32) -> Mesh {
    let (hx, hy, hz) = (x / 2.0, y / 2.0, z / 2.0);
    let corners: Vec<[f32; 3]> = (0..8)
        .map(|i| {
            [
                if i & 1 == 0 { -hx } else { hx },
                if i & 2 == 0 { -hy } else { hy },
                if i & 4 == 0 { -hz } else { hz },
            ]
        })
        .collect();

    // Pairs of corner indices differing in exactly one bit
    let edges: [u32; 24] = [
        0, 1, 2, 3, 4, 5, 6, 7, // along x
        0, 2, 1, 3, 4, 6, 5, 7, // along y
        0, 4, 1, 5, 2, 6, 3, 7, // along z
    ];

    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, corners)
        .with_inserted_indices(Indices::U32(edges.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smile_arc_stays_in_lower_half() {
        let mesh = smile_mesh(0.4, 0.04, 32, 12);
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|a| a.as_float3())
            .expect("positions");

        assert_eq!(positions.len(), 33 * 13);
        for p in positions {
            // Every vertex sits within the tube radius of the lower
            // semicircle, so y never rises above +tube_radius.
            assert!(p[1] <= 0.04 + 1e-6, "vertex above smile arc: {p:?}");
            let planar = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!((planar - 0.4).abs() <= 0.04 + 1e-6);
            assert!(p[2].abs() <= 0.04 + 1e-6);
        }
    }

    #[test]
    fn box_edges_cover_all_corners() {
        let mesh = box_edges_mesh(3.1, 2.7, 2.7);
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|a| a.as_float3())
            .expect("positions");
        assert_eq!(positions.len(), 8);

        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        assert_eq!(indices.len(), 24, "12 edges, 2 endpoints each");

        // Every edge connects corners differing on exactly one axis
        for pair in indices.chunks(2) {
            let a = positions[pair[0] as usize];
            let b = positions[pair[1] as usize];
            let differing = a.iter().zip(b.iter()).filter(|(p, q)| p != q).count();
            assert_eq!(differing, 1);
        }
    }
}
