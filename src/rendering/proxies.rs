//! Scene mirror: one entity per live simulated object.
//!
//! Every frame the world's visual proxies are diffed against the entities
//! spawned so far. New keys spawn, known keys move, vanished keys despawn.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::enemies::Archetype;
use crate::simulation::{ProxyKey, Simulation, VisualProxy};
use crate::stage::PickupKind;

/// Entity mirroring each live proxy key.
#[derive(Resource, Default)]
pub struct ProxyIndex {
    entities: HashMap<ProxyKey, Entity>,
}

impl ProxyIndex {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Links a scene entity to the object it mirrors.
#[derive(Component)]
pub struct SimProxy {
    pub key: ProxyKey,
    color: (f32, f32, f32),
}

/// Shared meshes for every proxy kind.
#[derive(Resource)]
pub struct ProxyMeshes {
    grunt: Handle<Mesh>,
    ranged: Handle<Mesh>,
    boss: Handle<Mesh>,
    tracer: Handle<Mesh>,
    orb: Handle<Mesh>,
    grenade: Handle<Mesh>,
    shockwave: Handle<Mesh>,
    crate_box: Handle<Mesh>,
    weapon: Handle<Mesh>,
}

impl ProxyMeshes {
    fn mesh_for(&self, key: ProxyKey) -> Handle<Mesh> {
        match key {
            ProxyKey::Enemy(_, Archetype::Grunt) => self.grunt.clone(),
            ProxyKey::Enemy(_, Archetype::Ranged) => self.ranged.clone(),
            ProxyKey::Enemy(_, Archetype::Boss) => self.boss.clone(),
            ProxyKey::Tracer(_) => self.tracer.clone(),
            ProxyKey::Orb(_) => self.orb.clone(),
            ProxyKey::Grenade(_) => self.grenade.clone(),
            ProxyKey::Shockwave(_) => self.shockwave.clone(),
            ProxyKey::Pickup(_, PickupKind::Weapon(_)) => self.weapon.clone(),
            ProxyKey::Pickup(..) => self.crate_box.clone(),
        }
    }
}

pub fn setup_proxy_meshes(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(ProxyMeshes {
        grunt: meshes.add(Capsule3d::new(0.4, 1.0)),
        ranged: meshes.add(Cylinder::new(0.35, 1.8)),
        boss: meshes.add(Cuboid::new(1.0, 1.8, 1.0)),
        tracer: meshes.add(Cuboid::new(0.04, 0.04, 0.6)),
        orb: meshes.add(Sphere::new(0.5)),
        grenade: meshes.add(Sphere::new(0.5)),
        // Unit diameter so the proxy scale is the ring diameter
        shockwave: meshes.add(Torus::new(0.45, 0.5)),
        crate_box: meshes.add(Cuboid::new(0.6, 0.6, 0.6)),
        weapon: meshes.add(Cuboid::new(0.3, 0.3, 1.2)),
    });
}

/// Transform for a proxy. Rings only grow in the horizontal plane.
fn proxy_transform(proxy: &VisualProxy) -> Transform {
    let scale = match proxy.key {
        ProxyKey::Shockwave(_) => Vec3::new(proxy.scale, 1.0, proxy.scale),
        _ => Vec3::splat(proxy.scale),
    };
    Transform::from_translation(proxy.position)
        .with_rotation(Quat::from_rotation_y(proxy.yaw))
        .with_scale(scale)
}

fn proxy_material(proxy: &VisualProxy) -> StandardMaterial {
    let (r, g, b) = proxy.color;
    let glows = matches!(
        proxy.key,
        ProxyKey::Tracer(_) | ProxyKey::Orb(_) | ProxyKey::Shockwave(_)
    );
    StandardMaterial {
        base_color: Color::srgb(r, g, b),
        emissive: if glows {
            LinearRgba::rgb(r * 4.0, g * 4.0, b * 4.0)
        } else {
            LinearRgba::BLACK
        },
        perceptual_roughness: 0.8,
        ..default()
    }
}

/// Bring the scene in line with the world's proxy list.
pub fn mirror_proxies(
    mut commands: Commands,
    simulation: Res<Simulation>,
    meshes: Res<ProxyMeshes>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut index: ResMut<ProxyIndex>,
    mut proxy_query: Query<(&mut Transform, &mut SimProxy, &MeshMaterial3d<StandardMaterial>)>,
) {
    let visuals = simulation.0.visuals();
    let mut seen = HashSet::with_capacity(visuals.len());

    for proxy in &visuals {
        seen.insert(proxy.key);

        let existing = index
            .entities
            .get(&proxy.key)
            .and_then(|&entity| proxy_query.get_mut(entity).ok());

        if let Some((mut transform, mut mirror, material)) = existing {
            *transform = proxy_transform(proxy);
            if mirror.color != proxy.color {
                mirror.color = proxy.color;
                if let Some(material) = materials.get_mut(&material.0) {
                    *material = proxy_material(proxy);
                }
            }
            continue;
        }

        let entity = commands
            .spawn((
                SimProxy {
                    key: proxy.key,
                    color: proxy.color,
                },
                Mesh3d(meshes.mesh_for(proxy.key)),
                MeshMaterial3d(materials.add(proxy_material(proxy))),
                proxy_transform(proxy),
            ))
            .id();
        index.entities.insert(proxy.key, entity);
    }

    index.entities.retain(|key, entity| {
        let keep = seen.contains(key);
        if !keep {
            commands.entity(*entity).despawn_recursive();
        }
        keep
    });
}

/// Drop every mirrored entity, e.g. when a run ends.
pub fn clear_proxies(mut commands: Commands, mut index: ResMut<ProxyIndex>) {
    for (_, entity) in index.entities.drain() {
        commands.entity(entity).despawn_recursive();
    }
}
