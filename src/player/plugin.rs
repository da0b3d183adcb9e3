//! Player plugin - movement, camera, and player-related systems.

use bevy::prelude::*;

use super::components::*;
use super::movement;

/// Player plugin - handles player movement and camera.
///
/// The player entity itself is spawned with the arena.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>();

        movement::setup_movement_systems(app);
    }
}
