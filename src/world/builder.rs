//! Arena construction from [`ArenaConfig`].

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::materials::ArenaMaterials;
use crate::core::config::ArenaConfig;
use crate::rendering::VisualConfig;

const FLOOR_DEPTH: f32 = 1.0;
const WALL_THICKNESS: f32 = 1.0;

/// Marker for all arena geometry that should be cleaned up.
#[derive(Component)]
pub struct ArenaGeometry;

/// Spawn floor, boundary walls, pillars and lights.
pub fn build_arena(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    arena: &ArenaConfig,
    visual_config: &VisualConfig,
) {
    let arena_materials = ArenaMaterials::new(materials, visual_config);
    let extent = arena.floor_half_extent;
    let side = extent * 2.0;

    setup_environment(commands, visual_config);

    // Top surface at y = 0
    spawn_block(
        commands,
        meshes,
        arena_materials.floor.clone(),
        Vec3::new(0.0, -FLOOR_DEPTH / 2.0, 0.0),
        Vec3::new(side, FLOOR_DEPTH, side),
    );

    let height = arena.wall_height;
    let offset = extent + WALL_THICKNESS / 2.0;
    let span = side + WALL_THICKNESS * 2.0;
    let walls = [
        (Vec3::new(0.0, height / 2.0, -offset), Vec3::new(span, height, WALL_THICKNESS)),
        (Vec3::new(0.0, height / 2.0, offset), Vec3::new(span, height, WALL_THICKNESS)),
        (Vec3::new(-offset, height / 2.0, 0.0), Vec3::new(WALL_THICKNESS, height, side)),
        (Vec3::new(offset, height / 2.0, 0.0), Vec3::new(WALL_THICKNESS, height, side)),
    ];
    for (position, size) in walls {
        spawn_block(commands, meshes, arena_materials.wall.clone(), position, size);
    }

    for pillar in &arena.pillars {
        let (x, z) = pillar.position;
        spawn_block(
            commands,
            meshes,
            arena_materials.pillar.clone(),
            Vec3::new(x, pillar.height / 2.0, z),
            Vec3::new(pillar.size, pillar.height, pillar.size),
        );
    }

    // Corner lamps
    let lamp = extent * 0.6;
    for (x, z) in [(lamp, lamp), (-lamp, lamp), (lamp, -lamp), (-lamp, -lamp)] {
        commands.spawn((
            PointLight {
                color: Color::srgb(1.0, 0.85, 0.7),
                intensity: 2_000_000.0,
                range: extent * 1.5,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_xyz(x, height, z),
            ArenaGeometry,
        ));
    }

    info!("Arena built: {}x{} with {} pillars", side, side, arena.pillars.len());
}

fn setup_environment(commands: &mut Commands, visual_config: &VisualConfig) {
    commands.insert_resource(AmbientLight {
        color: visual_config.fog_color(),
        brightness: visual_config.ambient_brightness,
    });

    commands.spawn((
        DirectionalLight {
            color: Color::srgb(0.7, 0.7, 0.75),
            illuminance: 2000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_3,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
        ArenaGeometry,
    ));
}

/// Solid box with a matching collider.
fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    position: Vec3,
    size: Vec3,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
        ArenaGeometry,
    ));
}
