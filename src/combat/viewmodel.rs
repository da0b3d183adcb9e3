//! Weapon viewmodel - first-person weapon display.
//!
//! The viewmodel is spawned as a child of the player's camera and rebuilt
//! whenever the equipped weapon changes. It drops out of view while
//! reloading and kicks back on every shot.

use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use bevy::scene::SceneRoot;

use super::weapons::{WeaponDefinition, WeaponKind};
use crate::core::SimEvent;
use crate::player::PlayerCamera;
use crate::simulation::{Simulation, SimulationSet};

/// How fast recoil returns to rest, per second.
const RECOIL_RETURN: f32 = 12.0;

/// The weapon viewmodel entity.
#[derive(Component)]
pub struct WeaponViewmodel {
    pub kind: WeaponKind,
}

/// Current recoil offset along the camera's back axis.
#[derive(Resource, Default)]
pub struct ViewmodelKick {
    pub offset: f32,
}

impl ViewmodelKick {
    pub fn kick(&mut self, recoil: f32) {
        self.offset = self.offset.max(recoil);
    }

    pub fn settle(&mut self, dt: f32) {
        self.offset *= (-RECOIL_RETURN * dt).exp();
    }
}

/// Setup weapon viewmodel systems.
pub fn setup_viewmodel_systems(app: &mut App) {
    app.init_resource::<ViewmodelKick>().add_systems(
        Update,
        (
            spawn_viewmodel,
            propagate_viewmodel_render_layers,
            track_recoil,
            update_viewmodel_position,
        )
            .chain()
            .in_set(SimulationSet::Present),
    );
}

/// Spawn the viewmodel for the equipped weapon, replacing a stale one.
fn spawn_viewmodel(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    simulation: Res<Simulation>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    camera_query: Query<Entity, With<PlayerCamera>>,
    viewmodel_query: Query<(Entity, &WeaponViewmodel)>,
) {
    let current = simulation.0.weapons().current();

    let mut up_to_date = false;
    for (entity, viewmodel) in &viewmodel_query {
        if viewmodel.kind == current {
            up_to_date = true;
        } else {
            commands.entity(entity).despawn_recursive();
        }
    }
    if up_to_date {
        return;
    }

    let Ok(camera_entity) = camera_query.get_single() else {
        return;
    };

    let definition = simulation.0.config().weapons.get(current);

    // Layer 1 so the weapon renders on the weapon camera only
    commands.entity(camera_entity).with_children(|parent| {
        parent
            .spawn((
                WeaponViewmodel { kind: current },
                Transform::from_translation(definition.mount()),
                Visibility::default(),
                RenderLayers::layer(1),
            ))
            .with_children(|weapon_parent| {
                if definition.model_path.is_empty() {
                    spawn_placeholder_model(weapon_parent, definition, &mut meshes, &mut materials);
                } else {
                    weapon_parent.spawn((
                        SceneRoot(asset_server.load(&definition.model_path)),
                        Transform::from_scale(Vec3::splat(0.15)),
                        RenderLayers::layer(1),
                    ));
                }
            });
    });
}

/// One box per barrel, for weapons without a model.
fn spawn_placeholder_model(
    parent: &mut ChildBuilder,
    definition: &WeaponDefinition,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let length = if definition.explosive.is_some() { 0.6 } else { 0.4 };
    let mesh = meshes.add(Cuboid::new(0.08, 0.12, length));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.15, 0.17),
        metallic: 0.7,
        perceptual_roughness: 0.4,
        ..default()
    });

    let mount = definition.mount();
    for barrel in 0..definition.barrels() as usize {
        // Barrels sit side by side, relative to the mount
        let x = if definition.is_twin() {
            definition.muzzle(barrel).x - mount.x
        } else {
            0.0
        };
        parent.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(x, 0.0, 0.0),
            RenderLayers::layer(1),
        ));
    }
}

/// Propagate RenderLayers to all descendants of the viewmodel.
///
/// When a glTF scene loads, it creates child entities (meshes, etc.) that don't
/// inherit RenderLayers. This system adds layer 1 to all descendants so they
/// render on the weapon camera.
fn propagate_viewmodel_render_layers(
    mut commands: Commands,
    viewmodel_query: Query<Entity, With<WeaponViewmodel>>,
    children_query: Query<&Children>,
    render_layers_query: Query<&RenderLayers>,
) {
    let Ok(viewmodel_entity) = viewmodel_query.get_single() else {
        return;
    };

    let mut to_process = vec![viewmodel_entity];
    while let Some(entity) = to_process.pop() {
        if render_layers_query.get(entity).is_err() {
            commands.entity(entity).insert(RenderLayers::layer(1));
        }
        if let Ok(children) = children_query.get(entity) {
            to_process.extend(children.iter());
        }
    }
}

fn track_recoil(
    time: Res<Time>,
    simulation: Res<Simulation>,
    mut events: EventReader<SimEvent>,
    mut kick: ResMut<ViewmodelKick>,
) {
    kick.settle(time.delta_secs());

    let current = simulation.0.weapons().current();
    for event in events.read() {
        if let SimEvent::ShotFired { weapon, .. } = event {
            if *weapon == current {
                kick.kick(simulation.0.weapons().recoil());
            }
        }
    }
}

/// Mount offset, lowered by the reload timeline and pushed back by recoil,
/// plus a small idle bob.
fn update_viewmodel_position(
    time: Res<Time>,
    simulation: Res<Simulation>,
    kick: Res<ViewmodelKick>,
    mut viewmodel_query: Query<(&mut Transform, &WeaponViewmodel)>,
) {
    let Ok((mut transform, viewmodel)) = viewmodel_query.get_single_mut() else {
        return;
    };
    let world = &simulation.0;
    let definition = world.config().weapons.get(viewmodel.kind);
    let drop = world
        .weapons()
        .viewmodel_drop(world.now(), &world.config().weapons.timing);

    let bob = (time.elapsed_secs() * 2.0).sin() * 0.005;
    transform.translation = definition.mount() + Vec3::new(0.0, bob - drop, kick.offset);
    transform.rotation = Quat::from_rotation_x(kick.offset * 0.5);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoil_kicks_then_settles() {
        let mut kick = ViewmodelKick::default();
        kick.kick(0.2);
        kick.kick(0.1);
        assert_eq!(kick.offset, 0.2);

        for _ in 0..60 {
            kick.settle(1.0 / 60.0);
        }
        assert!(kick.offset < 0.2 * 0.01);
    }
}
