//! Stage Shooter - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Look around
//! - Left mouse: Fire
//! - R: Reload
//! - 1-4: Select weapon
//! - Shift: Sprint
//! - Space: Jump
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Stage Shooter".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        .add_plugins(stage_shooter::ShooterPlugin)

        .run();
}
