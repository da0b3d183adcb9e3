//! Per-enemy decision making.
//!
//! [`think`] moves one enemy and reports the attacks it wants to make. It
//! does not touch the player or spawn anything itself; the world applies
//! the returned [`EnemyAction`]s after the roster borrow ends.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use super::components::{cooldown_ready, ChargeWindup, Enemy};
use super::data::ArchetypeStats;
use crate::simulation::CollisionQuery;

/// Net displacement below this counts as not moving.
pub const STUCK_MIN_MOVE: f32 = 0.1;
/// Seconds of not moving before a nudge.
pub const STUCK_THRESHOLD: f32 = 2.0;
pub const NUDGE_DISTANCE: f32 = 1.0;

/// What the world needs to know to evaluate one enemy.
pub struct AiContext<'a> {
    pub now: f64,
    pub dt: f32,
    pub player_feet: Vec3,
    pub stats: &'a ArchetypeStats,
    pub collision: &'a dyn CollisionQuery,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyAction {
    Melee { damage: f32 },
    /// Start an orb volley; the world schedules one orb per volley delay.
    RangedVolley,
    Shockwave,
    /// Charge telegraph started; strike after `windup` seconds.
    ChargeWindup { windup: f32 },
    /// Anti-stuck displacement that was applied.
    Nudged(Vec3),
}

fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Evaluate one enemy for one tick.
pub fn think(enemy: &mut Enemy, ctx: &AiContext, rng: &mut impl Rng) -> Vec<EnemyAction> {
    let mut actions = Vec::new();
    let stats = ctx.stats;

    // Decisions use horizontal distance so jumping does not break melee range.
    let to_player = horizontal(ctx.player_feet - enemy.position);
    let distance = to_player.length();

    if distance > stats.detection_range {
        enemy.is_chasing = false;
        enemy.stuck.reset(enemy.position);
        return actions;
    }

    enemy.is_chasing = true;
    if distance > f32::EPSILON {
        enemy.yaw = to_player.x.atan2(to_player.z);
    }

    if distance > stats.attack_range {
        pursue(enemy, ctx);
        if enemy
            .stuck
            .observe(enemy.position, ctx.dt, STUCK_MIN_MOVE, STUCK_THRESHOLD)
        {
            let angle = rng.gen_range(0.0..TAU);
            let nudge = Vec3::new(angle.cos(), 0.0, angle.sin()) * NUDGE_DISTANCE;
            enemy.position += nudge;
            enemy.stuck.reset(enemy.position);
            actions.push(EnemyAction::Nudged(nudge));
        }
    } else {
        enemy.stuck.reset(enemy.position);
        if cooldown_ready(enemy.last_attack_at, ctx.now, stats.attack_cooldown) {
            enemy.last_attack_at = Some(ctx.now);
            actions.push(EnemyAction::Melee {
                damage: stats.damage,
            });
        }
    }

    if let Some(ranged) = &stats.ranged {
        let cooldown = stats.attack_cooldown * ranged.cooldown_factor;
        // Plain shooters hold fire inside melee range, bosses layer both.
        let clear_of_melee = stats.boss.is_some() || distance > stats.attack_range;
        if clear_of_melee
            && distance <= ranged.range
            && cooldown_ready(enemy.last_ranged_at, ctx.now, cooldown)
        {
            enemy.last_ranged_at = Some(ctx.now);
            actions.push(EnemyAction::RangedVolley);
        }
    }

    if let Some(boss) = &stats.boss {
        if distance <= boss.wave_range && cooldown_ready(enemy.last_wave_at, ctx.now, boss.wave_cooldown) {
            enemy.last_wave_at = Some(ctx.now);
            actions.push(EnemyAction::Shockwave);
        }

        if enemy.charge.is_none() && cooldown_ready(enemy.last_charge_at, ctx.now, boss.charge_cooldown) {
            enemy.last_charge_at = Some(ctx.now);
            enemy.charge = Some(ChargeWindup {
                target: ctx.player_feet,
                strike_at: ctx.now + f64::from(boss.charge_windup),
            });
            actions.push(EnemyAction::ChargeWindup {
                windup: boss.charge_windup,
            });
        }
    }

    actions
}

/// Step toward a point above the player's feet. Blocked steps are skipped,
/// which is what eventually trips the stuck tracker.
fn pursue(enemy: &mut Enemy, ctx: &AiContext) {
    let target = ctx.player_feet + Vec3::Y * ctx.stats.body_height;
    let offset = target - enemy.position;
    let length = offset.length();
    if length <= f32::EPSILON {
        return;
    }

    let step = (enemy.chase_speed * ctx.dt).min(length);
    let next = enemy.position + offset / length * step;
    if ctx.collision.is_blocked(next, ctx.stats.scale * 0.5) {
        return;
    }
    enemy.position = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::{Archetype, ArchetypeRegistry, EnemyId, EnemyRoster};
    use crate::simulation::OpenField;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Every step is blocked, like an enemy wedged against a wall.
    struct Walled;

    impl CollisionQuery for Walled {
        fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _max: f32) -> Option<f32> {
            None
        }

        fn is_blocked(&self, _center: Vec3, _radius: f32) -> bool {
            true
        }
    }

    fn spawn(archetype: Archetype, position: Vec3) -> (EnemyRoster, EnemyId, ArchetypeRegistry, StdRng) {
        let registry = ArchetypeRegistry::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut roster = EnemyRoster::default();
        let id = roster.spawn(archetype, position, &registry, &mut rng, None);
        (roster, id, registry, rng)
    }

    #[test]
    fn grunt_closes_distance_and_faces_player() {
        let (mut roster, id, registry, mut rng) = spawn(Archetype::Grunt, Vec3::new(0.0, 1.0, 20.0));
        let enemy = roster.get_mut(id).unwrap();
        let ctx = AiContext {
            now: 0.0,
            dt: 0.1,
            player_feet: Vec3::ZERO,
            stats: registry.get(Archetype::Grunt),
            collision: &OpenField,
        };

        let actions = think(enemy, &ctx, &mut rng);
        assert!(actions.is_empty());
        assert!(enemy.is_chasing);
        assert!(enemy.position.z < 20.0);
        assert!((enemy.position.z - (20.0 - enemy.chase_speed * 0.1)).abs() < 1e-3);
        // Facing -Z toward the player.
        assert!((enemy.yaw.abs() - std::f32::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn melee_respects_cooldown() {
        let (mut roster, id, registry, mut rng) = spawn(Archetype::Grunt, Vec3::new(2.0, 1.0, 0.0));
        let enemy = roster.get_mut(id).unwrap();
        let stats = registry.get(Archetype::Grunt);

        let mut hits = 0;
        for tick in 0..=35 {
            let ctx = AiContext {
                now: tick as f64 * 0.1,
                dt: 0.1,
                player_feet: Vec3::ZERO,
                stats,
                collision: &OpenField,
            };
            hits += think(enemy, &ctx, &mut rng)
                .iter()
                .filter(|a| matches!(a, EnemyAction::Melee { damage } if *damage == 10.0))
                .count();
        }
        // t = 0.0, 1.5, 3.0 within 3.5 seconds
        assert_eq!(hits, 3);
    }

    #[test]
    fn ranged_fires_only_between_melee_and_ranged_range() {
        let registry = ArchetypeRegistry::default();
        let stats = registry.get(Archetype::Ranged);
        let mut rng = StdRng::seed_from_u64(5);
        let mut roster = EnemyRoster::default();
        let close = roster.spawn(Archetype::Ranged, Vec3::new(2.0, 1.0, 0.0), &registry, &mut rng, None);
        let mid = roster.spawn(Archetype::Ranged, Vec3::new(20.0, 1.0, 0.0), &registry, &mut rng, None);
        let far = roster.spawn(Archetype::Ranged, Vec3::new(60.0, 1.0, 0.0), &registry, &mut rng, None);
        let ctx = AiContext {
            now: 0.0,
            dt: 0.016,
            player_feet: Vec3::ZERO,
            stats,
            collision: &OpenField,
        };

        let volleys = |actions: Vec<EnemyAction>| actions.contains(&EnemyAction::RangedVolley);
        assert!(!volleys(think(roster.get_mut(close).unwrap(), &ctx, &mut rng)));
        assert!(volleys(think(roster.get_mut(mid).unwrap(), &ctx, &mut rng)));
        assert!(!volleys(think(roster.get_mut(far).unwrap(), &ctx, &mut rng)));

        // Cooldown is attack_cooldown * 1.5 = 3 seconds.
        let later = AiContext { now: 2.9, ..ctx };
        assert!(!volleys(think(roster.get_mut(mid).unwrap(), &later, &mut rng)));
    }

    #[test]
    fn boss_layers_wave_and_charge() {
        let (mut roster, id, registry, mut rng) = spawn(Archetype::Boss, Vec3::new(10.0, 1.0, 0.0));
        let enemy = roster.get_mut(id).unwrap();
        let ctx = AiContext {
            now: 0.0,
            dt: 0.016,
            player_feet: Vec3::ZERO,
            stats: registry.get(Archetype::Boss),
            collision: &OpenField,
        };

        let actions = think(enemy, &ctx, &mut rng);
        assert!(actions.contains(&EnemyAction::Shockwave));
        assert!(actions.contains(&EnemyAction::RangedVolley));
        assert!(actions.contains(&EnemyAction::ChargeWindup { windup: 1.0 }));
        assert_eq!(enemy.charge.map(|c| c.target), Some(Vec3::ZERO));
        assert_eq!(enemy.color(registry.get(Archetype::Boss)), (1.0, 1.0, 1.0));

        // No second charge while one is pending, even after the cooldown.
        let later = AiContext { now: 9.0, ..ctx };
        let actions = think(enemy, &later, &mut rng);
        assert!(!actions.iter().any(|a| matches!(a, EnemyAction::ChargeWindup { .. })));
    }

    #[test]
    fn boss_volleys_inside_melee_range() {
        let (mut roster, id, registry, mut rng) = spawn(Archetype::Boss, Vec3::new(3.0, 2.0, 0.0));
        let enemy = roster.get_mut(id).unwrap();
        let ctx = AiContext {
            now: 0.0,
            dt: 0.016,
            player_feet: Vec3::ZERO,
            stats: registry.get(Archetype::Boss),
            collision: &OpenField,
        };

        let actions = think(enemy, &ctx, &mut rng);
        assert!(actions.contains(&EnemyAction::Melee { damage: 25.0 }));
        assert!(actions.contains(&EnemyAction::RangedVolley));
    }

    #[test]
    fn stuck_enemy_is_nudged_exactly_once() {
        let (mut roster, id, registry, mut rng) = spawn(Archetype::Grunt, Vec3::new(0.0, 1.0, 30.0));
        let enemy = roster.get_mut(id).unwrap();
        let start = enemy.position;

        let mut nudges = Vec::new();
        for tick in 1..=21 {
            let ctx = AiContext {
                now: tick as f64 * 0.1,
                dt: 0.1,
                player_feet: Vec3::ZERO,
                stats: registry.get(Archetype::Grunt),
                collision: &Walled,
            };
            for action in think(enemy, &ctx, &mut rng) {
                if let EnemyAction::Nudged(offset) = action {
                    nudges.push(offset);
                }
            }
        }

        assert_eq!(nudges.len(), 1);
        assert!((nudges[0].length() - NUDGE_DISTANCE).abs() < 1e-5);
        assert_eq!(nudges[0].y, 0.0);
        assert!((enemy.position - start - nudges[0]).length() < 1e-5);
        assert!(enemy.stuck.timer() < 0.15);
    }

    #[test]
    fn out_of_detection_range_stops_chasing() {
        let (mut roster, id, registry, mut rng) = spawn(Archetype::Grunt, Vec3::new(2000.0, 1.0, 0.0));
        let enemy = roster.get_mut(id).unwrap();
        enemy.is_chasing = true;
        let ctx = AiContext {
            now: 0.0,
            dt: 0.1,
            player_feet: Vec3::ZERO,
            stats: registry.get(Archetype::Grunt),
            collision: &OpenField,
        };
        assert!(think(enemy, &ctx, &mut rng).is_empty());
        assert!(!enemy.is_chasing);
        assert_eq!(enemy.position, Vec3::new(2000.0, 1.0, 0.0));
    }
}
