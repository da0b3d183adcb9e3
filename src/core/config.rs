//! Simulation tuning loaded from RON files under `assets/data/`.
//!
//! Every file is optional. A missing or malformed file logs a warning and the
//! built-in values are used instead, so the game always starts.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::error::DataLoadError;
use crate::combat::WeaponTable;
use crate::enemies::ArchetypeRegistry;
use crate::stage::PlacementRule;

/// Root directory for data files.
pub const DATA_DIR: &str = "assets/data";

/// Read and parse a single RON file.
pub fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;
    ron::from_str(&contents).map_err(|e| DataLoadError::ParseError {
        path: display,
        details: e.to_string(),
    })
}

/// Read a RON file, falling back to `T::default()` on any failure.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_ron(path) {
        Ok(value) => {
            info!("Loaded {}", path.display());
            value
        }
        Err(DataLoadError::FileNotFound(p)) => {
            warn!("{} not found. Using defaults.", p);
            T::default()
        }
        Err(e) => {
            error!("{}. Using defaults.", e);
            T::default()
        }
    }
}

/// Player body and damage response.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: f32,
    pub eye_height: f32,
    /// Height above the feet that homing orbs aim for.
    pub torso_height: f32,
    /// Impulse applied at the centre of a blast, scaled by falloff.
    pub knockback: f32,
    pub start_position: (f32, f32, f32),
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            eye_height: 1.6,
            torso_height: 1.8,
            knockback: 4.0,
            start_position: (0.0, 0.0, 0.0),
        }
    }
}

/// Health kits, ammo boxes and weapon drops.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PickupTuning {
    pub health_radius: f32,
    pub heal_amount: f32,
    pub ammo_radius: f32,
    pub ammo_cooldown: f32,
    pub ammo_respawn_delay: f32,
    pub ammo_retry_delay: f32,
    pub weapon_radius: f32,
    pub health_kits_per_drop: u32,
    pub ammo_boxes_per_drop: u32,
    pub weapon_drop_delay: f32,
    pub mission_text_duration: f32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            health_radius: 2.0,
            heal_amount: 30.0,
            ammo_radius: 2.0,
            ammo_cooldown: 0.5,
            ammo_respawn_delay: 45.0,
            ammo_retry_delay: 10.0,
            weapon_radius: 3.0,
            health_kits_per_drop: 2,
            ammo_boxes_per_drop: 4,
            weapon_drop_delay: 2.0,
            mission_text_duration: 10.0,
        }
    }
}

/// Stage announcement timing and supply cadence.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StageTuning {
    pub intro_duration: f32,
    pub transition_duration: f32,
    /// Every n-th stage drops health kits and ammo boxes.
    pub supply_interval: u32,
}

impl Default for StageTuning {
    fn default() -> Self {
        Self {
            intro_duration: 6.0,
            transition_duration: 3.0,
            supply_interval: 5,
        }
    }
}

/// A square column standing in the arena.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Pillar {
    /// Centre on the floor plane, `(x, z)`.
    pub position: (f32, f32),
    pub size: f32,
    pub height: f32,
}

/// Arena layout, loaded from `assets/data/arena.ron`.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ArenaConfig {
    /// Half the side length of the walkable floor.
    pub floor_half_extent: f32,
    pub wall_height: f32,
    pub pillars: Vec<Pillar>,
    pub enemy_spawn: PlacementRule,
    pub pickup_spawn: PlacementRule,
    pub weapon_drop: PlacementRule,
    pub weapon_drop_fallback: (f32, f32, f32),
    pub player: PlayerTuning,
    pub pickups: PickupTuning,
    pub stages: StageTuning,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            floor_half_extent: 30.0,
            wall_height: 6.0,
            pillars: Vec::new(),
            enemy_spawn: PlacementRule {
                half_extent: 20.0,
                height: 1.0,
                min_player_distance: 8.0,
                attempts: 30,
            },
            pickup_spawn: PlacementRule {
                half_extent: 25.0,
                height: 0.5,
                min_player_distance: 5.0,
                attempts: 20,
            },
            weapon_drop: PlacementRule {
                half_extent: 25.0,
                height: 1.0,
                min_player_distance: 15.0,
                attempts: 20,
            },
            weapon_drop_fallback: (-20.0, 1.0, -20.0),
            player: PlayerTuning::default(),
            pickups: PickupTuning::default(),
            stages: StageTuning::default(),
        }
    }
}

/// Everything the simulation reads but never writes.
#[derive(Resource, Clone, Debug, Default)]
pub struct SimulationConfig {
    pub weapons: WeaponTable,
    pub archetypes: ArchetypeRegistry,
    pub arena: ArenaConfig,
}

impl SimulationConfig {
    /// Load every data file below `root`.
    pub fn load(root: &Path) -> Self {
        Self {
            weapons: WeaponTable::load(&root.join("weapons.ron")),
            archetypes: ArchetypeRegistry::load(&root.join("enemies")),
            arena: load_or_default(&root.join("arena.ron")),
        }
    }
}

/// System to load simulation data at startup.
pub fn load_simulation_config(mut commands: Commands) {
    let config = SimulationConfig::load(Path::new(DATA_DIR));
    commands.insert_resource(config);
}
