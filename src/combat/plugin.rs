//! Combat plugin - viewmodel and camera feedback for the simulated weapons.

use bevy::prelude::*;

use super::feedback;
use super::viewmodel;

/// Combat plugin - presents weapon state to the player.
///
/// Firing, reloading and damage all happen inside the simulation; this
/// plugin only shows their effects.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        feedback::setup_feedback_systems(app);

        viewmodel::setup_viewmodel_systems(app);
    }
}
