//! Short-lived visual effects spawned from simulation feedback.

use bevy::prelude::*;

use crate::combat::BlastSource;
use crate::core::SimEvent;

const BLOOD_LIFETIME: f32 = 0.6;
const EXPLOSION_LIFETIME: f32 = 0.35;
const MUZZLE_FLASH_LIFETIME: f32 = 0.05;

/// Effect entity that grows or shrinks, fades and then despawns.
#[derive(Component)]
pub struct TransientEffect {
    timer: Timer,
    start_scale: f32,
    end_scale: f32,
}

impl TransientEffect {
    pub fn new(lifetime: f32, start_scale: f32, end_scale: f32) -> Self {
        Self {
            timer: Timer::from_seconds(lifetime, TimerMode::Once),
            start_scale,
            end_scale,
        }
    }

    /// 0 at spawn, 1 when finished.
    pub fn progress(&self) -> f32 {
        self.timer.fraction()
    }

    pub fn scale(&self) -> f32 {
        self.start_scale + (self.end_scale - self.start_scale) * self.progress()
    }
}

#[derive(Resource)]
pub struct EffectMeshes {
    sphere: Handle<Mesh>,
}

pub fn setup_effect_meshes(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(EffectMeshes {
        sphere: meshes.add(Sphere::new(1.0)),
    });
}

fn fading_material(color: Color, emissive: LinearRgba) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        emissive,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    }
}

/// Blood splashes, explosion fireballs and muzzle flashes.
pub fn spawn_effects(
    mut commands: Commands,
    mut events: EventReader<SimEvent>,
    meshes: Res<EffectMeshes>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    effect_query: Query<Entity, With<TransientEffect>>,
) {
    for event in events.read() {
        match event {
            SimEvent::Blood { position, scale } => {
                commands.spawn((
                    TransientEffect::new(BLOOD_LIFETIME, 0.25 * scale, 0.05 * scale),
                    Mesh3d(meshes.sphere.clone()),
                    MeshMaterial3d(materials.add(fading_material(
                        Color::srgba(0.6, 0.0, 0.0, 0.9),
                        LinearRgba::BLACK,
                    ))),
                    Transform::from_translation(*position).with_scale(Vec3::splat(0.25 * scale)),
                ));
            }
            SimEvent::Explosion {
                position,
                radius,
                source,
            } => {
                let (color, glow) = match source {
                    BlastSource::Ordnance => (Color::srgba(1.0, 0.5, 0.1, 0.8), LinearRgba::rgb(8.0, 3.0, 0.5)),
                    BlastSource::Hostile => (Color::srgba(0.6, 0.1, 1.0, 0.8), LinearRgba::rgb(3.0, 0.5, 6.0)),
                };
                commands.spawn((
                    TransientEffect::new(EXPLOSION_LIFETIME, 0.2, *radius),
                    Mesh3d(meshes.sphere.clone()),
                    MeshMaterial3d(materials.add(fading_material(color, glow))),
                    Transform::from_translation(*position).with_scale(Vec3::splat(0.2)),
                ));
                commands.spawn((
                    TransientEffect::new(EXPLOSION_LIFETIME, 1.0, 1.0),
                    PointLight {
                        color: color.with_alpha(1.0),
                        intensity: 400_000.0,
                        range: radius * 3.0,
                        ..default()
                    },
                    Transform::from_translation(*position),
                ));
            }
            SimEvent::ShotFired { muzzle, .. } => {
                commands.spawn((
                    TransientEffect::new(MUZZLE_FLASH_LIFETIME, 1.0, 1.0),
                    PointLight {
                        color: Color::srgb(1.0, 0.8, 0.4),
                        intensity: 60_000.0,
                        range: 6.0,
                        ..default()
                    },
                    Transform::from_translation(*muzzle),
                ));
            }
            SimEvent::CleanupEffects => {
                for entity in &effect_query {
                    commands.entity(entity).despawn_recursive();
                }
            }
            _ => {}
        }
    }
}

/// Advance every effect and remove finished ones.
pub fn tick_effects(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut effect_query: Query<(
        Entity,
        &mut TransientEffect,
        &mut Transform,
        Option<&MeshMaterial3d<StandardMaterial>>,
    )>,
) {
    for (entity, mut effect, mut transform, material) in &mut effect_query {
        effect.timer.tick(time.delta());
        if effect.timer.finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        transform.scale = Vec3::splat(effect.scale());
        if let Some(material) = material.and_then(|handle| materials.get_mut(&handle.0)) {
            let alpha = material.base_color.alpha();
            material.base_color.set_alpha(alpha.min(1.0 - effect.progress()));
        }
    }
}

pub fn clear_effects(mut commands: Commands, effect_query: Query<Entity, With<TransientEffect>>) {
    for entity in &effect_query {
        commands.entity(entity).despawn_recursive();
    }
}
