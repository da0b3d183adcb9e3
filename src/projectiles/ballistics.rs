//! Per-tick movement, hit detection and detonation for each projectile kind.
//!
//! All three sweeps walk their collection backwards and `swap_remove` spent
//! entries, so a removal never skips an unvisited projectile.

use bevy::prelude::*;

use super::{Grenade, HomingOrb, Tracer};
use crate::combat::{Blast, BlastSource, WeaponTiming};
use crate::enemies::{ArchetypeRegistry, EnemyId, EnemyRoster};
use crate::simulation::CollisionQuery;

/// Orbs farther than this from the torso keep homing regardless of age.
pub const HOMING_DISTANCE: f32 = 10.0;
/// Orbs younger than this keep homing regardless of distance.
pub const HOMING_WINDOW: f32 = 2.0;
/// Fraction of `turn_speed * dt` blended into the heading per tick.
pub const HOMING_STRENGTH: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracerHit {
    pub enemy: EnemyId,
    pub position: Vec3,
    /// Hit points left after the hit, zero or less when it killed.
    pub remaining: i32,
}

/// Move tracers and apply one hit per tracer that lands inside an enemy's
/// hit radius. Dead enemies are ignored.
pub fn advance_tracers(
    tracers: &mut Vec<Tracer>,
    roster: &mut EnemyRoster,
    archetypes: &ArchetypeRegistry,
    now: f64,
    dt: f32,
) -> Vec<TracerHit> {
    let mut hits = Vec::new();

    for i in (0..tracers.len()).rev() {
        let tracer = &mut tracers[i];
        tracer.position += tracer.direction * tracer.speed * dt;

        if tracer.is_expired(now) {
            tracers.swap_remove(i);
            continue;
        }

        let position = tracer.position;
        let target = roster.iter_mut().find(|enemy| {
            enemy.is_alive() && enemy.position.distance(position) <= archetypes.get(enemy.archetype).hit_radius
        });

        if let Some(enemy) = target {
            let remaining = enemy.take_hit(1);
            hits.push(TracerHit {
                enemy: enemy.id,
                position: enemy.position,
                remaining,
            });
            tracers.swap_remove(i);
        }
    }

    hits
}

/// Steer `orb` toward `torso` when it is still allowed to home.
fn steer(orb: &mut HomingOrb, torso: Vec3, now: f64, dt: f32) {
    let to_target = torso - orb.position;
    if to_target.length() <= HOMING_DISTANCE && orb.age(now) >= HOMING_WINDOW {
        return;
    }
    let blend = (HOMING_STRENGTH * orb.turn_speed * dt).min(1.0);
    let desired = to_target.normalize_or_zero();
    let steered = orb.direction.lerp(desired, blend).normalize_or_zero();
    if steered != Vec3::ZERO {
        orb.direction = steered;
    }
}

/// Move enemy orbs and return a hostile blast for each one that detonates.
pub fn advance_orbs(
    orbs: &mut Vec<HomingOrb>,
    torso: Vec3,
    now: f64,
    dt: f32,
    collision: &dyn CollisionQuery,
) -> Vec<Blast> {
    let mut blasts = Vec::new();

    for i in (0..orbs.len()).rev() {
        let orb = &mut orbs[i];
        steer(orb, torso, now, dt);

        let travel = orb.speed * dt;
        let contact = (travel > 0.0)
            .then(|| collision.cast_ray(orb.position, orb.direction, travel))
            .flatten();

        let detonation = match contact {
            Some(distance) => Some(orb.position + orb.direction * distance),
            None => {
                orb.position += orb.direction * travel;
                let spent = orb.position.y <= 0.0
                    || orb.position.distance(torso) <= orb.detection_radius
                    || orb.is_expired(now);
                spent.then_some(orb.position)
            }
        };

        if let Some(center) = detonation {
            blasts.push(Blast {
                center,
                radius: orb.blast_radius,
                max_damage: orb.damage,
                source: BlastSource::Hostile,
            });
            orbs.swap_remove(i);
        }
    }

    blasts
}

/// Integrate grenade arcs and return an ordnance blast for each one that lands.
pub fn advance_grenades(
    grenades: &mut Vec<Grenade>,
    now: f64,
    dt: f32,
    timing: &WeaponTiming,
    collision: &dyn CollisionQuery,
) -> Vec<Blast> {
    let mut blasts = Vec::new();

    for i in (0..grenades.len()).rev() {
        let grenade = &mut grenades[i];
        grenade.velocity.y += timing.gravity * dt;

        let step = grenade.velocity * dt;
        let length = step.length();
        let contact = (length > 0.0)
            .then(|| collision.cast_ray(grenade.position, step / length, length))
            .flatten();

        let detonation = match contact {
            Some(distance) if grenade.position.y + step.y * distance / length > timing.grenade_floor => {
                Some(grenade.position + step / length * distance)
            }
            _ => {
                grenade.position += step;
                let spent = grenade.position.y <= timing.grenade_floor || grenade.is_expired(now);
                spent.then_some(grenade.position)
            }
        };

        if let Some(center) = detonation {
            blasts.push(Blast {
                center,
                radius: grenade.radius,
                max_damage: grenade.damage,
                source: BlastSource::Ordnance,
            });
            grenades.swap_remove(i);
        }
    }

    blasts
}
