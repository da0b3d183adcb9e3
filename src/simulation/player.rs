//! The player as the simulation sees it: a pose, a health pool and knockback.

use bevy::prelude::*;

use crate::combat::Health;
use crate::core::config::PlayerTuning;

#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Feet position, supplied by the engine every frame.
    pub feet: Vec3,
    /// Unit look direction.
    pub look: Vec3,
    pub health: Health,
    eye_height: f32,
    torso_height: f32,
    impulse: Vec3,
}

impl PlayerState {
    pub fn new(tuning: &PlayerTuning) -> Self {
        let (x, y, z) = tuning.start_position;
        Self {
            feet: Vec3::new(x, y, z),
            look: Vec3::NEG_Z,
            health: Health::new(tuning.max_health),
            eye_height: tuning.eye_height,
            torso_height: tuning.torso_height,
            impulse: Vec3::ZERO,
        }
    }

    /// Zero-length looks are ignored.
    pub fn set_pose(&mut self, feet: Vec3, look: Vec3) {
        self.feet = feet;
        let look = look.normalize_or_zero();
        if look != Vec3::ZERO {
            self.look = look;
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.feet + Vec3::Y * self.eye_height
    }

    /// Aim point for enemy orbs.
    pub fn torso(&self) -> Vec3 {
        self.feet + Vec3::Y * self.torso_height
    }

    /// Reference point for blast falloff.
    pub fn center(&self) -> Vec3 {
        self.feet + Vec3::Y * (self.eye_height * 0.5)
    }

    /// Right, up and forward axes of the view.
    pub fn view_basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.look;
        let mut right = forward.cross(Vec3::Y).normalize_or_zero();
        if right == Vec3::ZERO {
            right = Vec3::X;
        }
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// A view-space offset (x right, y up, z forward) placed in the world.
    pub fn to_world(&self, offset: Vec3) -> Vec3 {
        let (right, up, forward) = self.view_basis();
        self.eye() + right * offset.x + up * offset.y + forward * offset.z
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn push(&mut self, impulse: Vec3) {
        self.impulse += impulse;
    }

    /// Knockback accumulated since the last call.
    pub fn take_impulse(&mut self) -> Vec3 {
        std::mem::take(&mut self.impulse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muzzle_offsets_follow_the_view() {
        let mut player = PlayerState::new(&PlayerTuning::default());
        player.set_pose(Vec3::ZERO, Vec3::X);
        let muzzle = player.to_world(Vec3::new(0.5, -0.2, 1.0));
        // Forward is +X, right is +Z.
        assert!((muzzle - Vec3::new(1.0, 1.4, 0.5)).length() < 1e-5);
    }

    #[test]
    fn zero_look_keeps_previous_direction() {
        let mut player = PlayerState::new(&PlayerTuning::default());
        player.set_pose(Vec3::ONE, Vec3::ZERO);
        assert_eq!(player.look, Vec3::NEG_Z);
        assert_eq!(player.feet, Vec3::ONE);
    }

    #[test]
    fn impulse_drains() {
        let mut player = PlayerState::new(&PlayerTuning::default());
        player.push(Vec3::X);
        player.push(Vec3::Z);
        assert_eq!(player.take_impulse(), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(player.take_impulse(), Vec3::ZERO);
    }
}
