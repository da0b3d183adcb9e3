//! Static weapon definitions.
//!
//! Loaded once from `assets/data/weapons.ron` and read-only afterwards.
//! Kinds missing from the file keep their built-in definition.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::core::config::read_ron;
use crate::core::DataLoadError;

/// The four player weapons. Each one also names its own ammo type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum WeaponKind {
    AssaultRifle,
    Pistol,
    DualUzi,
    GrenadeLauncher,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::AssaultRifle,
        WeaponKind::Pistol,
        WeaponKind::DualUzi,
        WeaponKind::GrenadeLauncher,
    ];

    pub fn index(self) -> usize {
        match self {
            WeaponKind::AssaultRifle => 0,
            WeaponKind::Pistol => 1,
            WeaponKind::DualUzi => 2,
            WeaponKind::GrenadeLauncher => 3,
        }
    }

    /// Number-row slot: 1 rifle, 2 pistol, 3 uzi, 4 launcher.
    pub fn slot(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_slot(slot: u8) -> Option<Self> {
        Self::ALL.get(usize::from(slot).checked_sub(1)?).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            WeaponKind::AssaultRifle => "Assault Rifle",
            WeaponKind::Pistol => "Pistol",
            WeaponKind::DualUzi => "Dual Uzi",
            WeaponKind::GrenadeLauncher => "Grenade Launcher",
        }
    }
}

/// Area damage carried by explosive rounds.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Explosive {
    pub radius: f32,
    pub damage: f32,
}

/// Per-weapon configuration.
///
/// Offsets are tuples in the look frame: `(right, up, forward)` for muzzles,
/// camera-local `(x, y, z)` for the viewmodel mount.
#[derive(Deserialize, Clone, Debug)]
pub struct WeaponDefinition {
    pub name: String,
    /// Path to the viewmodel scene, empty for none
    #[serde(default)]
    pub model_path: String,
    pub mount_offset: (f32, f32, f32),
    /// Seconds between shots
    pub fire_rate: f32,
    pub auto_fire: bool,
    /// How far the viewmodel kicks back per shot
    pub recoil: f32,
    pub camera_shake: f32,
    /// One muzzle per barrel. Two muzzles make a twin weapon.
    pub muzzles: Vec<(f32, f32, f32)>,
    pub projectile_speed: f32,
    pub sound: String,
    pub pitch_range: (f32, f32),
    pub magazine: u32,
    pub reserve: u32,
    /// Rounds added to reserve by one ammo box
    pub pickup_amount: u32,
    #[serde(default)]
    pub explosive: Option<Explosive>,
}

impl WeaponDefinition {
    pub fn is_twin(&self) -> bool {
        self.muzzles.len() > 1
    }

    pub fn barrels(&self) -> u32 {
        self.muzzles.len().max(1) as u32
    }

    /// Muzzle offset for `barrel`, or the origin if the weapon has none.
    pub fn muzzle(&self, barrel: usize) -> Vec3 {
        self.muzzles
            .get(barrel)
            .map(|&(x, y, z)| Vec3::new(x, y, z))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn mount(&self) -> Vec3 {
        let (x, y, z) = self.mount_offset;
        Vec3::new(x, y, z)
    }
}

/// Fixed timings shared by every weapon.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct WeaponTiming {
    /// Length of the single-shot animation
    pub shot_animation: f32,
    /// Each of lower / hold / raise lasts this long
    pub reload_phase: f32,
    /// How far the viewmodel drops while reloading
    pub reload_drop: f32,
    /// Delay between the barrels of a twin weapon
    pub twin_delay: f32,
    pub tracer_lifetime: f32,
    pub grenade_lifetime: f32,
    pub gravity: f32,
    /// Grenades detonate at or below this height
    pub grenade_floor: f32,
}

impl Default for WeaponTiming {
    fn default() -> Self {
        Self {
            shot_animation: 0.1,
            reload_phase: 0.6,
            reload_drop: 2.4,
            twin_delay: 0.02,
            tracer_lifetime: 1.0,
            grenade_lifetime: 5.0,
            gravity: -9.8,
            grenade_floor: 0.5,
        }
    }
}

impl WeaponTiming {
    pub fn reload_duration(&self) -> f32 {
        self.reload_phase * 3.0
    }
}

#[derive(Deserialize)]
struct WeaponFile {
    #[serde(default)]
    timing: WeaponTiming,
    weapons: HashMap<WeaponKind, WeaponDefinition>,
}

/// All weapon definitions, indexed by [`WeaponKind`].
#[derive(Clone, Debug)]
pub struct WeaponTable {
    pub timing: WeaponTiming,
    definitions: [WeaponDefinition; 4],
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self {
            timing: WeaponTiming::default(),
            definitions: WeaponKind::ALL.map(builtin_definition),
        }
    }
}

impl WeaponTable {
    pub fn get(&self, kind: WeaponKind) -> &WeaponDefinition {
        &self.definitions[kind.index()]
    }

    /// Load from a RON file, keeping built-ins for anything it leaves out.
    pub fn load(path: &Path) -> Self {
        match read_ron::<WeaponFile>(path) {
            Ok(file) => {
                let table = Self::from_parts(file.timing, file.weapons);
                info!("Loaded weapon definitions from {}", path.display());
                table
            }
            Err(DataLoadError::FileNotFound(p)) => {
                warn!("{} not found. Using built-in weapons.", p);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using built-in weapons.", e);
                Self::default()
            }
        }
    }

    fn from_parts(timing: WeaponTiming, mut loaded: HashMap<WeaponKind, WeaponDefinition>) -> Self {
        let definitions = WeaponKind::ALL.map(|kind| {
            loaded.remove(&kind).unwrap_or_else(|| {
                warn!("No definition for {:?}, using built-in", kind);
                builtin_definition(kind)
            })
        });
        Self { timing, definitions }
    }
}

fn builtin_definition(kind: WeaponKind) -> WeaponDefinition {
    match kind {
        WeaponKind::AssaultRifle => WeaponDefinition {
            name: kind.label().to_string(),
            model_path: "models/weapons/rifle.glb#Scene0".to_string(),
            mount_offset: (0.3, -0.25, -0.6),
            fire_rate: 0.1,
            auto_fire: true,
            recoil: 0.2,
            camera_shake: 0.08,
            muzzles: vec![(0.3, -0.2, 1.4)],
            projectile_speed: 70.0,
            sound: "sounds/shoot.ogg".to_string(),
            pitch_range: (0.9, 1.1),
            magazine: 30,
            reserve: 90,
            pickup_amount: 60,
            explosive: None,
        },
        WeaponKind::Pistol => WeaponDefinition {
            name: kind.label().to_string(),
            model_path: "models/weapons/pistol.glb#Scene0".to_string(),
            mount_offset: (0.3, -0.2, -0.5),
            fire_rate: 0.4,
            auto_fire: false,
            recoil: 0.15,
            camera_shake: 0.05,
            muzzles: vec![(0.3, -0.15, 1.0)],
            projectile_speed: 60.0,
            sound: "sounds/shoot2.ogg".to_string(),
            pitch_range: (1.0, 1.2),
            magazine: 20,
            reserve: 60,
            pickup_amount: 40,
            explosive: None,
        },
        WeaponKind::DualUzi => WeaponDefinition {
            name: kind.label().to_string(),
            model_path: "models/weapons/uzi.glb#Scene0".to_string(),
            mount_offset: (0.0, -0.25, -0.5),
            fire_rate: 0.08,
            auto_fire: true,
            recoil: 0.25,
            camera_shake: 0.12,
            muzzles: vec![(-0.3, -0.2, 0.9), (0.3, -0.2, 0.9)],
            projectile_speed: 65.0,
            sound: "sounds/uzi_shoot.ogg".to_string(),
            pitch_range: (0.95, 1.15),
            magazine: 60,
            reserve: 180,
            pickup_amount: 90,
            explosive: None,
        },
        WeaponKind::GrenadeLauncher => WeaponDefinition {
            name: kind.label().to_string(),
            model_path: "models/weapons/grenade_launcher.glb#Scene0".to_string(),
            mount_offset: (0.3, -0.3, -0.6),
            fire_rate: 1.5,
            auto_fire: false,
            recoil: 0.4,
            camera_shake: 0.7,
            muzzles: vec![(0.3, -0.1, 1.5)],
            projectile_speed: 25.0,
            sound: "sounds/grenade.ogg".to_string(),
            pitch_range: (0.9, 1.0),
            magazine: 8,
            reserve: 16,
            pickup_amount: 4,
            explosive: Some(Explosive {
                radius: 8.0,
                damage: 100.0,
            }),
        },
    }
}
