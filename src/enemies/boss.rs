//! Boss-only attacks: the expanding shockwave ring and the telegraphed charge.

use bevy::prelude::*;

use super::components::{Enemy, EnemyId};
use super::data::{ArchetypeStats, ShockwaveStats};

/// A hollow ring expanding from where the boss stood.
///
/// The ring hurts a grounded player standing between its inner and outer
/// radius while its progress is inside the active window. Each ring lands
/// at most one hit.
#[derive(Debug, Clone)]
pub struct Shockwave {
    pub id: u64,
    pub source: EnemyId,
    pub center: Vec3,
    pub started_at: f64,
    pub damage: f32,
    pub has_hit: bool,
    stats: ShockwaveStats,
}

impl Shockwave {
    pub fn new(id: u64, source: EnemyId, center: Vec3, now: f64, damage: f32, stats: ShockwaveStats) -> Self {
        Self {
            id,
            source,
            center,
            started_at: now,
            damage,
            has_hit: false,
            stats,
        }
    }

    pub fn progress(&self, now: f64) -> f32 {
        if self.stats.duration <= 0.0 {
            return 1.0;
        }
        (((now - self.started_at) as f32) / self.stats.duration).clamp(0.0, 1.0)
    }

    /// Diameter of the ring's outer edge.
    pub fn scale(&self, now: f64) -> f32 {
        self.stats.base_scale + self.stats.max_radius * self.progress(now)
    }

    /// `(inner, outer)` radii.
    pub fn radii(&self, now: f64) -> (f32, f32) {
        let scale = self.scale(now);
        ((scale - self.stats.thickness) / 2.0, scale / 2.0)
    }

    pub fn is_active(&self, now: f64) -> bool {
        let (start, end) = self.stats.active_window;
        let progress = self.progress(now);
        progress >= start && progress <= end
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now - self.started_at >= f64::from(self.stats.duration)
    }

    /// Would the ring hit a player whose feet are at `player_feet` right now?
    pub fn hits(&self, now: f64, player_feet: Vec3) -> bool {
        if self.has_hit || !self.is_active(now) || player_feet.y >= self.stats.max_height {
            return false;
        }
        let offset = player_feet - self.center;
        let distance = Vec2::new(offset.x, offset.z).length();
        let (inner, outer) = self.radii(now);
        distance >= inner && distance <= outer
    }
}

/// Resolve a pending charge: lunge toward the captured target and report the
/// damage dealt to a player at `player_feet`, if the lunge connects.
pub fn charge_strike(enemy: &mut Enemy, stats: &ArchetypeStats, player_feet: Vec3) -> Option<f32> {
    let windup = enemy.charge.take()?;
    let boss = stats.boss.as_ref()?;

    let toward = Vec3::new(
        windup.target.x - enemy.position.x,
        0.0,
        windup.target.z - enemy.position.z,
    )
    .normalize_or_zero();
    enemy.position += toward * boss.charge_distance;

    let offset = player_feet - enemy.position;
    let distance = Vec2::new(offset.x, offset.z).length();
    (distance <= stats.attack_range * boss.charge_reach_factor)
        .then_some(stats.damage * boss.charge_damage_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::components::ChargeWindup;
    use crate::enemies::{Archetype, ArchetypeRegistry, EnemyRoster};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn wave() -> Shockwave {
        let registry = ArchetypeRegistry::default();
        let stats = registry.get(Archetype::Boss).boss.clone().unwrap().shockwave;
        Shockwave::new(0, EnemyId(0), Vec3::ZERO, 0.0, 25.0, stats)
    }

    #[test]
    fn ring_expands_linearly() {
        let wave = wave();
        assert_eq!(wave.scale(0.0), 2.0);
        assert_eq!(wave.scale(5.0), 22.0);
        assert_eq!(wave.scale(10.0), 42.0);
        let (inner, outer) = wave.radii(5.0);
        assert!((outer - 11.0).abs() < 1e-5);
        assert!((inner - 10.6).abs() < 1e-5);
    }

    #[test]
    fn ring_only_hurts_inside_window() {
        let wave = wave();
        // At t=1 (progress 0.1) the ring is not yet active.
        let (_, outer) = wave.radii(1.0);
        assert!(!wave.hits(1.0, Vec3::new(outer - 0.1, 0.0, 0.0)));
        // At t=5 a player on the band is hit, one inside the safe zone is not.
        assert!(wave.hits(5.0, Vec3::new(10.8, 0.0, 0.0)));
        assert!(!wave.hits(5.0, Vec3::new(5.0, 0.0, 0.0)));
        assert!(!wave.hits(5.0, Vec3::new(15.0, 0.0, 0.0)));
        // After progress 0.9 it is spent.
        assert!(!wave.hits(9.5, Vec3::new(20.0, 0.0, 0.0)));
        assert!(wave.is_finished(10.0));
    }

    #[test]
    fn jumping_clears_the_ring() {
        let wave = wave();
        assert!(!wave.hits(5.0, Vec3::new(10.8, 2.5, 0.0)));
    }

    #[test]
    fn ring_hits_at_most_once() {
        let mut wave = wave();
        assert!(wave.hits(5.0, Vec3::new(0.0, 0.0, 10.8)));
        wave.has_hit = true;
        assert!(!wave.hits(5.0, Vec3::new(0.0, 0.0, 10.8)));
    }

    #[test]
    fn charge_lunges_toward_captured_target() {
        let registry = ArchetypeRegistry::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut roster = EnemyRoster::default();
        let id = roster.spawn(Archetype::Boss, Vec3::new(0.0, 1.0, 0.0), &registry, &mut rng, None);
        let boss = roster.get_mut(id).unwrap();
        boss.charge = Some(ChargeWindup {
            target: Vec3::new(10.0, 0.0, 0.0),
            strike_at: 1.0,
        });

        // Player stayed near the captured point: within 2 * attack_range of the landing spot.
        let damage = charge_strike(boss, registry.get(Archetype::Boss), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(damage, Some(50.0));
        assert!((boss.position - Vec3::new(5.0, 1.0, 0.0)).length() < 1e-5);
        assert!(boss.charge.is_none());

        // No pending windup: nothing happens.
        assert_eq!(charge_strike(boss, registry.get(Archetype::Boss), Vec3::ZERO), None);
    }

    #[test]
    fn charge_misses_a_player_who_moved_away() {
        let registry = ArchetypeRegistry::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut roster = EnemyRoster::default();
        let id = roster.spawn(Archetype::Boss, Vec3::ZERO, &registry, &mut rng, None);
        let boss = roster.get_mut(id).unwrap();
        boss.charge = Some(ChargeWindup {
            target: Vec3::new(0.0, 0.0, 10.0),
            strike_at: 1.0,
        });

        let damage = charge_strike(boss, registry.get(Archetype::Boss), Vec3::new(0.0, 0.0, -20.0));
        assert_eq!(damage, None);
    }
}
