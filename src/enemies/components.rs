//! Enemy records and the roster that owns them.

use bevy::prelude::*;
use rand::Rng;

use super::data::{ArchetypeRegistry, ArchetypeStats};

/// Stable handle to an enemy. Never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u64);

/// Enemy behaviour class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    /// Melee only.
    Grunt,
    /// Melee plus a homing orb at range.
    Ranged,
    /// Melee, orb volleys, shockwave and charge.
    Boss,
}

impl Archetype {
    pub const ALL: [Archetype; 3] = [Archetype::Grunt, Archetype::Ranged, Archetype::Boss];

    pub fn index(self) -> usize {
        match self {
            Archetype::Grunt => 0,
            Archetype::Ranged => 1,
            Archetype::Boss => 2,
        }
    }

    /// Name of the data file under `assets/data/enemies/`.
    pub fn file_stem(self) -> &'static str {
        match self {
            Archetype::Grunt => "grunt",
            Archetype::Ranged => "ranged",
            Archetype::Boss => "boss",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.file_stem() == name)
    }
}

/// What removing the enemy should trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyHook {
    /// Count the kill toward the current stage tally.
    StageTally,
}

/// Anti-stuck bookkeeping.
///
/// Displacement is measured from an anchor that only moves when the enemy
/// travels at least `min_move` from it, so slow creeping still counts as stuck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StuckTracker {
    anchor: Vec3,
    timer: f32,
}

impl StuckTracker {
    pub fn new(position: Vec3) -> Self {
        Self {
            anchor: position,
            timer: 0.0,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn reset(&mut self, position: Vec3) {
        self.anchor = position;
        self.timer = 0.0;
    }

    /// Record one chasing tick. Returns true when a nudge is due; the timer is reset.
    pub fn observe(&mut self, position: Vec3, dt: f32, min_move: f32, threshold: f32) -> bool {
        if position.distance(self.anchor) >= min_move {
            self.reset(position);
            return false;
        }
        self.timer += dt;
        if self.timer >= threshold {
            self.timer = 0.0;
            return true;
        }
        false
    }
}

/// Boss charge between the telegraph and the strike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeWindup {
    /// Player position captured when the telegraph started.
    pub target: Vec3,
    pub strike_at: f64,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub archetype: Archetype,
    pub health: i32,
    pub max_health: i32,
    /// Body centre.
    pub position: Vec3,
    /// Heading on the horizontal plane, radians.
    pub yaw: f32,
    pub chase_speed: f32,
    pub is_chasing: bool,
    pub last_attack_at: Option<f64>,
    pub last_ranged_at: Option<f64>,
    pub last_wave_at: Option<f64>,
    pub last_charge_at: Option<f64>,
    pub stuck: StuckTracker,
    pub charge: Option<ChargeWindup>,
    pub on_destroyed: Option<DestroyHook>,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Subtract `amount` hit points and return what is left. Health never goes up.
    pub fn take_hit(&mut self, amount: i32) -> i32 {
        self.health -= amount.max(0);
        self.health
    }

    /// Drop straight to zero.
    pub fn kill(&mut self) {
        self.health = self.health.min(0);
    }

    /// Display colour. A pending charge flashes white.
    pub fn color(&self, stats: &ArchetypeStats) -> (f32, f32, f32) {
        if self.charge.is_some() {
            (1.0, 1.0, 1.0)
        } else {
            stats.color(self.is_chasing)
        }
    }
}

/// True if `cooldown` seconds have passed since `last`, or it never happened.
pub fn cooldown_ready(last: Option<f64>, now: f64, cooldown: f32) -> bool {
    last.map_or(true, |at| now - at >= f64::from(cooldown))
}

/// Every live enemy, in spawn order.
#[derive(Debug, Default)]
pub struct EnemyRoster {
    enemies: Vec<Enemy>,
    next_id: u64,
}

impl EnemyRoster {
    pub fn spawn(
        &mut self,
        archetype: Archetype,
        position: Vec3,
        archetypes: &ArchetypeRegistry,
        rng: &mut impl Rng,
        on_destroyed: Option<DestroyHook>,
    ) -> EnemyId {
        let stats = archetypes.get(archetype);
        let (low, high) = stats.speed_range;
        let chase_speed = if high > low { rng.gen_range(low..=high) } else { low };

        let id = EnemyId(self.next_id);
        self.next_id += 1;
        self.enemies.push(Enemy {
            id,
            archetype,
            health: stats.max_health,
            max_health: stats.max_health,
            position,
            yaw: 0.0,
            chase_speed,
            is_chasing: false,
            last_attack_at: None,
            last_ranged_at: None,
            last_wave_at: None,
            last_charge_at: None,
            stuck: StuckTracker::new(position),
            charge: None,
            on_destroyed,
        });
        id
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Like [`Self::get`] but skips enemies already at zero health.
    pub fn get_alive(&self, id: EnemyId) -> Option<&Enemy> {
        self.get(id).filter(|e| e.is_alive())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    /// Ids of enemies whose health has run out but are still registered.
    pub fn dead_ids(&self) -> Vec<EnemyId> {
        self.enemies.iter().filter(|e| !e.is_alive()).map(|e| e.id).collect()
    }

    pub fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(index))
    }

    pub fn count(&self, archetype: Archetype) -> u32 {
        self.enemies
            .iter()
            .filter(|e| e.archetype == archetype && e.is_alive())
            .count() as u32
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}
