//! Read-only views of the world for the HUD and the scene mirror.

use bevy::prelude::*;

use crate::combat::WeaponKind;
use crate::enemies::{Archetype, EnemyId};
use crate::stage::PickupKind;

/// Stage banner as it should be drawn this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerView {
    pub text: String,
    pub text_opacity: f32,
    pub backdrop_opacity: f32,
}

/// Everything the HUD draws.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub weapon: WeaponKind,
    pub magazine: u32,
    pub reserve: u32,
    pub reloading: bool,
    pub unlocked: Vec<WeaponKind>,
    pub stage: u32,
    pub killed: u32,
    pub required: u32,
    pub live: u32,
    pub banner: Option<BannerView>,
    pub mission_text: Option<String>,
    pub shader_intensity: f32,
    /// Downward offset of the viewmodel from the reload timeline.
    pub viewmodel_drop: f32,
    pub player_dead: bool,
}

/// Identity of a mirrored object. Stable for the object's whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyKey {
    Enemy(EnemyId, Archetype),
    Tracer(u64),
    Orb(u64),
    Grenade(u64),
    Shockwave(u64),
    Pickup(u64, PickupKind),
}

/// Where and how to draw one simulated object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualProxy {
    pub key: ProxyKey,
    pub position: Vec3,
    pub yaw: f32,
    pub scale: f32,
    pub color: (f32, f32, f32),
}
