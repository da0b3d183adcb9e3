//! Stage Shooter - a wave-based first-person arena shooter in Bevy.
//!
//! Waves of enemies grow with every stage. The player fights them with four
//! weapons that unlock as the run goes on, picking up health and ammo along
//! the way.
//!
//! # Architecture
//!
//! All gameplay runs inside [`simulation::SimulationWorld`], a plain struct
//! with no entities, stepped once per frame. The plugins around it handle
//! everything the engine is needed for:
//!
//! - **Core**: Game states, feedback events, scheduling, data loading
//! - **Simulation**: Input, pose sync and stepping of the world
//! - **Player**: First-person movement and camera
//! - **Combat**: Weapon definitions, ammo, damage, viewmodel and shake
//! - **Enemies**: Archetypes, the roster, AI and boss attacks
//! - **Projectiles**: Tracers, homing orbs and grenades
//! - **Stage**: Stage flow, banners, placement and pickups
//! - **World**: The arena geometry
//! - **Rendering**: Scene mirror, effects, fog and post-processing
//! - **Audio**: Sound cues
//! - **UI**: Menus and HUD

pub mod audio;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod player;
pub mod projectiles;
pub mod rendering;
pub mod simulation;
pub mod stage;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct ShooterPlugin;

impl Plugin for ShooterPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Drives the simulation; other plugins order against its sets
            .add_plugins(simulation::SimulationPlugin)

            .add_plugins(player::PlayerPlugin)
            .add_plugins(combat::CombatPlugin)
            .add_plugins(world::WorldPlugin)
            .add_plugins(rendering::RenderingPlugin)
            .add_plugins(audio::GameAudioPlugin)
            .add_plugins(ui::UiPlugin);
    }
}
