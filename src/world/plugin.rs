//! World plugin - arena setup and teardown.

use bevy::prelude::*;

use super::builder::{build_arena, ArenaGeometry};
use crate::core::{GameState, SimulationConfig};
use crate::player::{spawn_player, Player, CAPSULE_FOOT};
use crate::rendering::VisualConfig;

/// World plugin - builds the arena on the first entry into a run.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::InGame), setup_arena)
            .add_systems(OnEnter(GameState::MainMenu), cleanup_arena);
    }
}

/// Build the arena and player unless they survive from a pause or game over.
fn setup_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<SimulationConfig>,
    visual_config: Res<VisualConfig>,
    existing: Query<(), With<ArenaGeometry>>,
) {
    if !existing.is_empty() {
        return;
    }

    let arena = &config.arena;
    build_arena(&mut commands, &mut meshes, &mut materials, arena, &visual_config);

    let (x, y, z) = arena.player.start_position;
    let center = Vec3::new(x, y + CAPSULE_FOOT, z);
    spawn_player(&mut commands, center, arena.player.eye_height, &visual_config);
}

fn cleanup_arena(
    mut commands: Commands,
    arena_query: Query<Entity, With<ArenaGeometry>>,
    player_query: Query<Entity, With<Player>>,
) {
    for entity in arena_query.iter().chain(player_query.iter()) {
        commands.entity(entity).despawn_recursive();
    }
}
