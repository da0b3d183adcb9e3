//! Radius damage shared by grenades and enemy orbs.

use bevy::prelude::*;

use crate::enemies::{EnemyId, EnemyRoster};

/// Who set the blast off. Only player ordnance harms enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlastSource {
    Ordnance,
    Hostile,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blast {
    pub center: Vec3,
    pub radius: f32,
    pub max_damage: f32,
    pub source: BlastSource,
}

/// What a blast does, computed before anything is applied.
#[derive(Debug, Default, PartialEq)]
pub struct BlastOutcome {
    /// Enemies caught in an ordnance blast. They die outright.
    pub killed: Vec<EnemyId>,
    pub player_damage: f32,
    pub player_impulse: Vec3,
}

/// `1 - distance / radius`, clamped to `[0, 1]`.
pub fn falloff(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / radius).clamp(0.0, 1.0)
}

pub fn falloff_damage(distance: f32, radius: f32, max_damage: f32) -> f32 {
    max_damage * falloff(distance, radius)
}

/// Resolve `blast` against the live roster and a player standing at `player_position`.
///
/// `knockback` is the impulse magnitude at the centre of the blast.
pub fn resolve_blast(blast: &Blast, roster: &EnemyRoster, player_position: Vec3, knockback: f32) -> BlastOutcome {
    let mut outcome = BlastOutcome::default();

    if blast.source == BlastSource::Ordnance {
        outcome.killed = roster
            .iter()
            .filter(|enemy| enemy.is_alive() && enemy.position.distance(blast.center) <= blast.radius)
            .map(|enemy| enemy.id)
            .collect();
    }

    let offset = player_position - blast.center;
    let scale = falloff(offset.length(), blast.radius);
    if scale > 0.0 {
        outcome.player_damage = blast.max_damage * scale;
        outcome.player_impulse = offset.normalize_or_zero() * knockback * scale;
    }

    outcome
}
