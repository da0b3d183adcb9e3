//! Archetype data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::components::Archetype;
use crate::core::config::read_ron;
use crate::core::DataLoadError;

/// Homing orb fired by ranged archetypes.
#[derive(Deserialize, Clone, Debug)]
pub struct OrbStats {
    /// Launch speed is drawn uniformly from this range.
    pub speed_range: (f32, f32),
    pub damage: f32,
    pub turn_speed: f32,
    pub lifetime: f32,
    /// Detonates when this close to the player's torso.
    pub detection_radius: f32,
    pub blast_radius: f32,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RangedStats {
    pub range: f32,
    /// Ranged cooldown is `attack_cooldown * cooldown_factor`.
    pub cooldown_factor: f32,
    /// Spawn offsets relative to the body, rotated by yaw. Volleys cycle through them.
    pub muzzles: Vec<(f32, f32, f32)>,
    /// One orb per entry, fired this many seconds after the attack starts.
    pub volley_delays: Vec<f32>,
    pub orb: OrbStats,
}

/// Expanding ring attack.
#[derive(Deserialize, Clone, Debug)]
pub struct ShockwaveStats {
    pub duration: f32,
    pub base_scale: f32,
    /// Growth of the ring's diameter over the whole duration.
    pub max_radius: f32,
    pub thickness: f32,
    /// The ring only hurts while its progress is inside this window.
    pub active_window: (f32, f32),
    /// Jumping above this height clears the ring.
    pub max_height: f32,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BossStats {
    pub wave_range: f32,
    pub wave_cooldown: f32,
    pub shockwave: ShockwaveStats,
    pub charge_cooldown: f32,
    pub charge_windup: f32,
    pub charge_distance: f32,
    /// Charge connects within `attack_range * charge_reach_factor`.
    pub charge_reach_factor: f32,
    pub charge_damage_factor: f32,
}

/// Archetype definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct ArchetypeStats {
    pub name: String,
    pub max_health: i32,
    pub damage: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    /// Chase speed is rolled once per enemy from this range.
    pub speed_range: (f32, f32),
    pub detection_range: f32,
    /// Tracers within this distance of the body register a hit.
    pub hit_radius: f32,
    /// Enemies steer toward the player's feet raised by this much.
    pub body_height: f32,
    pub blood_scale: f32,
    pub idle_color: (f32, f32, f32),
    pub chase_color: (f32, f32, f32),
    pub scale: f32,
    #[serde(default)]
    pub ranged: Option<RangedStats>,
    #[serde(default)]
    pub boss: Option<BossStats>,
}

impl ArchetypeStats {
    pub fn color(&self, is_chasing: bool) -> (f32, f32, f32) {
        if is_chasing {
            self.chase_color
        } else {
            self.idle_color
        }
    }
}

/// Stats for all three archetypes.
#[derive(Clone, Debug)]
pub struct ArchetypeRegistry {
    stats: [ArchetypeStats; 3],
}

impl Default for ArchetypeRegistry {
    fn default() -> Self {
        Self {
            stats: Archetype::ALL.map(builtin_stats),
        }
    }
}

impl ArchetypeRegistry {
    pub fn get(&self, archetype: Archetype) -> &ArchetypeStats {
        &self.stats[archetype.index()]
    }

    /// Load `<archetype>.ron` files from `dir`. Missing files keep built-in stats.
    pub fn load(dir: &Path) -> Self {
        let mut registry = Self::default();

        if !dir.exists() {
            warn!("Archetype directory not found: {:?}. Using built-in stats.", dir);
            return registry;
        }

        let Ok(entries) = fs::read_dir(dir) else {
            warn!("Failed to read archetype directory {:?}", dir);
            return registry;
        };

        let mut loaded = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            match registry.load_file(&path) {
                Ok(archetype) => {
                    info!("Loaded archetype {:?} from {:?}", archetype, path);
                    loaded += 1;
                }
                Err(e) => error!("{}", e),
            }
        }

        info!("Loaded {} archetype definitions", loaded);
        registry
    }

    fn load_file(&mut self, path: &Path) -> Result<Archetype, DataLoadError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let archetype = Archetype::from_name(stem).ok_or_else(|| DataLoadError::UnknownDefinition {
            name: stem.to_string(),
            path: path.display().to_string(),
        })?;
        self.stats[archetype.index()] = read_ron(path)?;
        Ok(archetype)
    }
}

fn builtin_stats(archetype: Archetype) -> ArchetypeStats {
    match archetype {
        Archetype::Grunt => ArchetypeStats {
            name: "Grunt".to_string(),
            max_health: 1,
            damage: 10.0,
            attack_range: 3.0,
            attack_cooldown: 1.5,
            speed_range: (6.0, 9.0),
            detection_range: 1000.0,
            hit_radius: 1.0,
            body_height: 1.0,
            blood_scale: 1.0,
            idle_color: (0.0, 0.0, 1.0),
            chase_color: (1.0, 0.0, 0.0),
            scale: 1.0,
            ranged: None,
            boss: None,
        },
        Archetype::Ranged => ArchetypeStats {
            name: "Ranged".to_string(),
            max_health: 2,
            damage: 15.0,
            attack_range: 3.0,
            attack_cooldown: 2.0,
            speed_range: (6.0, 10.8),
            detection_range: 1000.0,
            hit_radius: 2.0,
            body_height: 1.5,
            blood_scale: 1.5,
            idle_color: (1.0, 0.65, 0.0),
            chase_color: (1.0, 0.45, 0.0),
            scale: 1.5,
            ranged: Some(RangedStats {
                range: 50.0,
                cooldown_factor: 1.5,
                muzzles: vec![(0.0, 2.0, 0.0)],
                volley_delays: vec![0.0],
                orb: OrbStats {
                    speed_range: (12.0, 14.0),
                    damage: 5.0,
                    turn_speed: 2.0,
                    lifetime: 4.0,
                    detection_radius: 3.0,
                    blast_radius: 5.0,
                },
            }),
            boss: None,
        },
        Archetype::Boss => ArchetypeStats {
            name: "Boss".to_string(),
            max_health: 5,
            damage: 25.0,
            attack_range: 4.0,
            attack_cooldown: 3.0,
            speed_range: (6.4, 9.6),
            detection_range: 1000.0,
            hit_radius: 4.0,
            body_height: 2.0,
            blood_scale: 2.0,
            idle_color: (0.5, 0.0, 0.0),
            chase_color: (1.0, 0.0, 0.0),
            scale: 2.5,
            ranged: Some(RangedStats {
                range: 50.0,
                cooldown_factor: 1.2,
                muzzles: vec![(-1.0, 3.0, 0.0), (1.0, 3.0, 0.0)],
                volley_delays: vec![0.0, 0.35, 0.7],
                orb: OrbStats {
                    speed_range: (12.0, 16.0),
                    damage: 10.0,
                    turn_speed: 2.0,
                    lifetime: 4.0,
                    detection_radius: 3.0,
                    blast_radius: 5.0,
                },
            }),
            boss: Some(BossStats {
                wave_range: 30.0,
                wave_cooldown: 3.0,
                shockwave: ShockwaveStats {
                    duration: 10.0,
                    base_scale: 2.0,
                    max_radius: 40.0,
                    thickness: 0.8,
                    active_window: (0.2, 0.9),
                    max_height: 2.0,
                },
                charge_cooldown: 8.0,
                charge_windup: 1.0,
                charge_distance: 5.0,
                charge_reach_factor: 2.0,
                charge_damage_factor: 2.0,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_archetypes_escalate() {
        let registry = ArchetypeRegistry::default();
        let grunt = registry.get(Archetype::Grunt);
        let ranged = registry.get(Archetype::Ranged);
        let boss = registry.get(Archetype::Boss);

        assert_eq!((grunt.max_health, ranged.max_health, boss.max_health), (1, 2, 5));
        assert_eq!((grunt.hit_radius, ranged.hit_radius, boss.hit_radius), (1.0, 2.0, 4.0));
        assert!(grunt.ranged.is_none() && grunt.boss.is_none());
        assert!(ranged.ranged.is_some() && ranged.boss.is_none());
        assert_eq!(boss.ranged.as_ref().map(|r| r.volley_delays.len()), Some(3));
    }

    #[test]
    fn colour_depends_only_on_chasing() {
        let registry = ArchetypeRegistry::default();
        let grunt = registry.get(Archetype::Grunt);
        assert_eq!(grunt.color(false), (0.0, 0.0, 1.0));
        assert_eq!(grunt.color(true), (1.0, 0.0, 0.0));
    }

    #[test]
    fn unknown_file_stem_is_rejected() {
        let mut registry = ArchetypeRegistry::default();
        let result = registry.load_file(Path::new("assets/data/enemies/dragon.ron"));
        assert!(matches!(result, Err(DataLoadError::UnknownDefinition { .. })));
    }

    #[test]
    fn shipped_archetype_files_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/data/enemies");
        let mut registry = ArchetypeRegistry::default();
        for archetype in Archetype::ALL {
            let path = dir.join(format!("{}.ron", archetype.file_stem()));
            assert_eq!(registry.load_file(&path).ok(), Some(archetype));
        }
        assert_eq!(registry.get(Archetype::Boss).max_health, 5);
    }
}
