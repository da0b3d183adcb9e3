//! Geometry queries the simulation needs from the outside world.

use bevy::prelude::*;

/// Ray and overlap queries against static geometry.
///
/// The engine layer answers these from the physics scene; [`OpenField`]
/// answers them for an empty, flat arena.
pub trait CollisionQuery {
    /// Distance along `direction` (unit length) to the first hit within `max_distance`.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32>;

    /// Would a sphere at `center` overlap geometry?
    fn is_blocked(&self, center: Vec3, radius: f32) -> bool;
}

/// Flat ground at `y = 0` and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl CollisionQuery for OpenField {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        if direction.y >= 0.0 || origin.y < 0.0 {
            return None;
        }
        let distance = -origin.y / direction.y;
        (distance <= max_distance).then_some(distance)
    }

    fn is_blocked(&self, _center: Vec3, _radius: f32) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_field_ray_hits_ground() {
        let down = Vec3::new(0.0, -1.0, 0.0);
        assert_eq!(OpenField.cast_ray(Vec3::new(0.0, 2.0, 0.0), down, 5.0), Some(2.0));
        assert_eq!(OpenField.cast_ray(Vec3::new(0.0, 2.0, 0.0), down, 1.0), None);
        assert_eq!(OpenField.cast_ray(Vec3::new(0.0, 2.0, 0.0), Vec3::X, 100.0), None);
        assert!(!OpenField.is_blocked(Vec3::ZERO, 10.0));
    }
}
