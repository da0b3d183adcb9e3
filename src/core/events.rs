//! Feedback events emitted by the simulation.
//!
//! The simulation never touches audio, meshes or UI directly. Instead each
//! tick it records what happened as [`SimEvent`]s, and the engine layer
//! drains them into Bevy's event queue where the audio, effect and HUD
//! systems pick them up.

use bevy::prelude::*;

use crate::combat::{BlastSource, WeaponKind};
use crate::enemies::{Archetype, EnemyId};
use crate::stage::PickupKind;

/// Something observable happened inside the simulation.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A barrel fired. `muzzle` is in world space.
    ShotFired {
        weapon: WeaponKind,
        muzzle: Vec3,
        direction: Vec3,
    },
    /// Trigger pulled on an empty magazine.
    DryFire { weapon: WeaponKind },
    ReloadStarted { weapon: WeaponKind },
    ReloadFinished { weapon: WeaponKind, transferred: u32 },
    WeaponSwitched { from: WeaponKind, to: WeaponKind },
    WeaponUnlocked { weapon: WeaponKind },

    EnemySpawned {
        id: EnemyId,
        archetype: Archetype,
        position: Vec3,
    },
    EnemyHit {
        id: EnemyId,
        remaining: i32,
        position: Vec3,
    },
    EnemyKilled {
        id: EnemyId,
        archetype: Archetype,
        position: Vec3,
    },
    /// Damage feedback splash; `scale` grows with the size of whoever bled.
    Blood { position: Vec3, scale: f32 },
    Explosion {
        position: Vec3,
        radius: f32,
        source: BlastSource,
    },
    ShockwaveStarted { boss: EnemyId, center: Vec3 },
    /// A boss has started its charge windup.
    ChargeTelegraph { boss: EnemyId },
    ChargeStrike { boss: EnemyId, position: Vec3 },

    PlayerDamaged { amount: f32, remaining: f32 },
    PlayerHealed { amount: f32 },
    PlayerDied,

    StageAnnounced { stage: u32, intro: bool },
    StageStarted { stage: u32, required: u32 },
    StageCleared { stage: u32 },
    ShaderIntensity(f32),
    /// Objective text shown under the crosshair; `None` hides it.
    MissionText(Option<String>),

    PickupSpawned {
        id: u64,
        kind: PickupKind,
        position: Vec3,
    },
    PickupCollected { kind: PickupKind },
    /// Transient effect objects may be cleared.
    CleanupEffects,
    CameraShake { intensity: f32, duration: f32 },
}
