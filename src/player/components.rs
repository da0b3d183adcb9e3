//! Player-related components.

use bevy::prelude::*;

/// Distance from the capsule centre down to the player's feet.
pub const CAPSULE_FOOT: f32 = 0.8;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Tracks player movement state for physics.
#[derive(Component)]
pub struct MovementState {
    pub is_grounded: bool,
    pub vertical_velocity: f32,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            is_grounded: true,
            vertical_velocity: 0.0,
        }
    }
}

/// Blast push still being applied to the player, in units per second.
#[derive(Component, Default)]
pub struct Knockback {
    pub velocity: Vec3,
}

impl Knockback {
    /// Upward part of the push, handed to the jump physics once.
    pub fn take_hop(&mut self) -> f32 {
        let hop = self.velocity.y.max(0.0);
        self.velocity.y = 0.0;
        hop
    }

    /// Horizontal push for this frame, then bleed the rest off.
    pub fn decay(&mut self, damping: f32, dt: f32) -> Vec3 {
        let push = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        self.velocity *= (-damping * dt).exp();
        push
    }
}

/// Configuration for the first-person camera controller.
#[derive(Resource)]
pub struct PlayerConfig {
    /// Mouse sensitivity multiplier
    pub mouse_sensitivity: f32,
    /// Invert Y-axis for mouse look
    pub invert_y: bool,
    /// Base movement speed in units per second
    pub move_speed: f32,
    /// Sprint speed multiplier
    pub sprint_multiplier: f32,
    /// Jump velocity
    pub jump_force: f32,
    /// Gravity acceleration
    pub gravity: f32,
    /// How fast knockback bleeds off, per second
    pub knockback_damping: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.5,
            invert_y: false,
            move_speed: 7.0,
            sprint_multiplier: 1.5,
            jump_force: 6.0,
            gravity: 15.0,
            knockback_damping: 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knockback_hops_once_and_fades() {
        let mut knockback = Knockback {
            velocity: Vec3::new(3.0, 2.0, 0.0),
        };
        assert_eq!(knockback.take_hop(), 2.0);
        assert_eq!(knockback.take_hop(), 0.0);

        let first = knockback.decay(4.0, 0.5);
        assert_eq!(first, Vec3::new(3.0, 0.0, 0.0));
        assert!(knockback.velocity.x < 3.0 * 0.2);
    }
}
