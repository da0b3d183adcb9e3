//! Visual configuration loaded from external RON file.
//!
//! Allows tweaking all visual parameters without recompilation.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use crate::core::config::{load_or_default, DATA_DIR};

/// Visual configuration loaded from `assets/data/rendering/visual_config.ron`.
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    // Post-processing
    pub grain_intensity: f32,
    pub grain_speed: f32,
    pub grain_coarseness: f32,
    pub vignette_intensity: f32,
    pub vignette_radius: f32,
    /// Seconds for the stage distortion to settle on a new intensity
    pub distortion_blend: f32,
    // Atmosphere
    pub fog_enabled: bool,
    pub fog_density: f32,
    /// Extra fog density per unit of stage distortion
    pub fog_per_intensity: f32,
    pub fog_color: (f32, f32, f32),
    pub clear_color: (f32, f32, f32),
    // Arena
    pub floor_color: (f32, f32, f32),
    pub wall_color: (f32, f32, f32),
    pub ambient_brightness: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            grain_intensity: 0.006,
            grain_speed: 0.8,
            grain_coarseness: 180.0,
            vignette_intensity: 0.20,
            vignette_radius: 0.60,
            distortion_blend: 2.0,
            fog_enabled: true,
            fog_density: 0.02,
            fog_per_intensity: 0.02,
            fog_color: (0.15, 0.14, 0.13),
            clear_color: (0.08, 0.07, 0.06),
            floor_color: (0.28, 0.27, 0.26),
            wall_color: (0.32, 0.30, 0.28),
            ambient_brightness: 300.0,
        }
    }
}

impl VisualConfig {
    pub fn load() -> Self {
        load_or_default(&Path::new(DATA_DIR).join("rendering/visual_config.ron"))
    }

    pub fn clear_color(&self) -> Color {
        let (r, g, b) = self.clear_color;
        Color::srgb(r, g, b)
    }

    pub fn fog_color(&self) -> Color {
        let (r, g, b) = self.fog_color;
        Color::srgb(r, g, b)
    }

    /// Fog density for the given stage distortion.
    pub fn fog_density_at(&self, intensity: f32) -> f32 {
        if !self.fog_enabled {
            return 0.0;
        }
        self.fog_density + intensity.max(0.0) * self.fog_per_intensity
    }
}

/// System to load visual config at startup.
pub fn load_visual_config(mut commands: Commands) {
    commands.insert_resource(VisualConfig::load());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fog_thickens_with_distortion() {
        let config = VisualConfig::default();
        assert_eq!(config.fog_density_at(0.0), config.fog_density);
        assert!(config.fog_density_at(1.5) > config.fog_density_at(0.7));

        let clear = VisualConfig {
            fog_enabled: false,
            ..default()
        };
        assert_eq!(clear.fog_density_at(1.5), 0.0);
    }
}
