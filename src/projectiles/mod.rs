//! Projectiles - player tracers, enemy homing orbs and player grenades.
//!
//! Each kind lives in its own collection inside [`ProjectileSet`], so no
//! projectile is ever owned by two lists and no code has to ask a projectile
//! what it is.

mod ballistics;

pub use ballistics::{advance_grenades, advance_orbs, advance_tracers, TracerHit};

use bevy::prelude::*;

use crate::combat::WeaponKind;
use crate::enemies::data::OrbStats;
use crate::enemies::EnemyId;

/// Player hitscan round. Moves only so it can be drawn; hits are a
/// proximity test against each enemy every tick.
#[derive(Debug, Clone)]
pub struct Tracer {
    pub id: u64,
    pub weapon: WeaponKind,
    pub position: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    pub spawned_at: f64,
    pub lifetime: f32,
}

/// Enemy-fired orb that lazily steers toward the player.
#[derive(Debug, Clone)]
pub struct HomingOrb {
    pub id: u64,
    pub source: EnemyId,
    pub position: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub turn_speed: f32,
    pub detection_radius: f32,
    pub blast_radius: f32,
    pub spawned_at: f64,
    pub lifetime: f32,
}

/// Player explosive on a ballistic arc.
#[derive(Debug, Clone)]
pub struct Grenade {
    pub id: u64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub damage: f32,
    pub spawned_at: f64,
    pub lifetime: f32,
}

fn expired(spawned_at: f64, lifetime: f32, now: f64) -> bool {
    now - spawned_at >= f64::from(lifetime)
}

impl Tracer {
    pub fn is_expired(&self, now: f64) -> bool {
        expired(self.spawned_at, self.lifetime, now)
    }
}

impl HomingOrb {
    pub fn is_expired(&self, now: f64) -> bool {
        expired(self.spawned_at, self.lifetime, now)
    }

    pub fn age(&self, now: f64) -> f32 {
        (now - self.spawned_at) as f32
    }
}

impl Grenade {
    pub fn is_expired(&self, now: f64) -> bool {
        expired(self.spawned_at, self.lifetime, now)
    }
}

/// The three disjoint projectile collections.
#[derive(Debug, Default)]
pub struct ProjectileSet {
    pub tracers: Vec<Tracer>,
    pub hostile: Vec<HomingOrb>,
    pub ordnance: Vec<Grenade>,
    next_id: u64,
}

impl ProjectileSet {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_tracer(
        &mut self,
        weapon: WeaponKind,
        muzzle: Vec3,
        direction: Vec3,
        speed: f32,
        now: f64,
        lifetime: f32,
    ) -> u64 {
        let id = self.allocate_id();
        self.tracers.push(Tracer {
            id,
            weapon,
            position: muzzle,
            direction: direction.normalize_or_zero(),
            speed,
            spawned_at: now,
            lifetime,
        });
        id
    }

    /// Fire an orb from `origin` aimed straight at `target`.
    pub fn spawn_orb(
        &mut self,
        source: EnemyId,
        origin: Vec3,
        target: Vec3,
        speed: f32,
        stats: &OrbStats,
        now: f64,
    ) -> u64 {
        let id = self.allocate_id();
        let direction = (target - origin).normalize_or_zero();
        self.hostile.push(HomingOrb {
            id,
            source,
            position: origin,
            direction: if direction == Vec3::ZERO { Vec3::NEG_Y } else { direction },
            speed,
            damage: stats.damage,
            turn_speed: stats.turn_speed,
            detection_radius: stats.detection_radius,
            blast_radius: stats.blast_radius,
            spawned_at: now,
            lifetime: stats.lifetime,
        });
        id
    }

    pub fn spawn_grenade(
        &mut self,
        muzzle: Vec3,
        velocity: Vec3,
        radius: f32,
        damage: f32,
        now: f64,
        lifetime: f32,
    ) -> u64 {
        let id = self.allocate_id();
        self.ordnance.push(Grenade {
            id,
            position: muzzle,
            velocity,
            radius,
            damage,
            spawned_at: now,
            lifetime,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.tracers.len() + self.hostile.len() + self.ordnance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
