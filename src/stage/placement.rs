//! Random placement of enemies and pickups inside the arena.

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

use crate::simulation::CollisionQuery;

/// Clearance a placed object needs around its centre.
const PROBE_RADIUS: f32 = 0.4;

/// Where something may be dropped: a square around the origin, kept away
/// from the player and out of geometry.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PlacementRule {
    pub half_extent: f32,
    /// Height of the placed object's centre above the floor.
    pub height: f32,
    pub min_player_distance: f32,
    pub attempts: u32,
}

impl PlacementRule {
    /// Roll up to `attempts` candidates and return the first valid one.
    pub fn sample(&self, rng: &mut impl Rng, player: Vec3, collision: &dyn CollisionQuery) -> Option<Vec3> {
        let extent = self.half_extent.abs();
        for _ in 0..self.attempts {
            let candidate = Vec3::new(
                rng.gen_range(-extent..=extent),
                self.height,
                rng.gen_range(-extent..=extent),
            );
            if self.accepts(candidate, player, collision) {
                return Some(candidate);
            }
        }
        None
    }

    /// Distance is measured on the floor plane.
    pub fn accepts(&self, candidate: Vec3, player: Vec3, collision: &dyn CollisionQuery) -> bool {
        let offset = candidate - player;
        let horizontal = Vec2::new(offset.x, offset.z).length();
        horizontal >= self.min_player_distance && !collision.is_blocked(candidate, PROBE_RADIUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::OpenField;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Solid;

    impl CollisionQuery for Solid {
        fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _max: f32) -> Option<f32> {
            None
        }

        fn is_blocked(&self, _center: Vec3, _radius: f32) -> bool {
            true
        }
    }

    fn rule() -> PlacementRule {
        PlacementRule {
            half_extent: 20.0,
            height: 1.0,
            min_player_distance: 8.0,
            attempts: 30,
        }
    }

    #[test]
    fn samples_stay_in_bounds_and_away_from_player() {
        let mut rng = StdRng::seed_from_u64(99);
        let rule = rule();
        for _ in 0..200 {
            let spot = rule.sample(&mut rng, Vec3::ZERO, &OpenField).unwrap();
            assert!(spot.x.abs() <= 20.0 && spot.z.abs() <= 20.0);
            assert_eq!(spot.y, 1.0);
            assert!(Vec2::new(spot.x, spot.z).length() >= 8.0);
        }
    }

    #[test]
    fn blocked_arena_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(rule().sample(&mut rng, Vec3::ZERO, &Solid), None);
    }

    #[test]
    fn impossible_distance_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let rule = PlacementRule {
            min_player_distance: 100.0,
            ..rule()
        };
        assert_eq!(rule.sample(&mut rng, Vec3::ZERO, &OpenField), None);
    }
}
