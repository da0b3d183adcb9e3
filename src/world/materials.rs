//! Materials for arena geometry.

use bevy::prelude::*;

use crate::rendering::VisualConfig;

/// Material handles shared by every piece of the arena.
pub struct ArenaMaterials {
    pub floor: Handle<StandardMaterial>,
    pub wall: Handle<StandardMaterial>,
    pub pillar: Handle<StandardMaterial>,
}

impl ArenaMaterials {
    pub fn new(materials: &mut Assets<StandardMaterial>, config: &VisualConfig) -> Self {
        let (r, g, b) = config.floor_color;
        let floor = materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            perceptual_roughness: 0.9,
            ..default()
        });

        let (r, g, b) = config.wall_color;
        let wall = materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            perceptual_roughness: 0.8,
            ..default()
        });

        // Slightly darker than the walls
        let pillar = materials.add(StandardMaterial {
            base_color: Color::srgb(r * 0.8, g * 0.8, b * 0.8),
            perceptual_roughness: 0.85,
            ..default()
        });

        Self { floor, wall, pillar }
    }
}
