//! Rendering plugin - scene mirror, effects, fog and the stage distortion.

use bevy::prelude::*;

use super::effects::{clear_effects, setup_effect_meshes, spawn_effects, tick_effects};
use super::post_process::{PostProcessSettings, StagePostProcessPlugin};
use super::proxies::{clear_proxies, mirror_proxies, setup_proxy_meshes, ProxyIndex};
use super::visual_config::{load_visual_config, VisualConfig};
use crate::core::{GameState, SimEvent};
use crate::simulation::{Simulation, SimulationSet};

/// Rendering plugin - draws the simulated world.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(StagePostProcessPlugin)
            .init_resource::<ProxyIndex>()
            .init_resource::<StageDistortion>()
            .add_systems(
                Startup,
                (load_visual_config, setup_proxy_meshes, setup_effect_meshes),
            )
            .add_systems(
                Update,
                (mirror_proxies, spawn_effects, update_stage_distortion).in_set(SimulationSet::Present),
            )
            .add_systems(Update, tick_effects.run_if(in_state(GameState::InGame)))
            .add_systems(
                OnEnter(GameState::MainMenu),
                (clear_proxies, clear_effects, reset_stage_distortion),
            );
    }
}

/// Distortion currently shown, easing toward the stage's value.
#[derive(Resource, Default)]
pub struct StageDistortion {
    pub current: f32,
}

/// Exponential approach of `current` to `target`; `blend` is the time constant.
pub fn approach(current: f32, target: f32, dt: f32, blend: f32) -> f32 {
    if blend <= 0.0 {
        return target;
    }
    current + (target - current) * (1.0 - (-dt / blend).exp())
}

fn update_stage_distortion(
    time: Res<Time>,
    config: Res<VisualConfig>,
    simulation: Res<Simulation>,
    mut events: EventReader<SimEvent>,
    mut distortion: ResMut<StageDistortion>,
    mut camera_query: Query<(&mut PostProcessSettings, &mut DistanceFog)>,
) {
    for event in events.read() {
        if let SimEvent::ShaderIntensity(intensity) = event {
            info!("Stage distortion rising to {:.2}", intensity);
        }
    }

    let target = simulation.0.shader_intensity();
    distortion.current = approach(distortion.current, target, time.delta_secs(), config.distortion_blend);

    for (mut settings, mut fog) in &mut camera_query {
        settings.distortion = distortion.current;
        fog.falloff = FogFalloff::ExponentialSquared {
            density: config.fog_density_at(distortion.current),
        };
    }
}

fn reset_stage_distortion(mut distortion: ResMut<StageDistortion>) {
    distortion.current = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distortion_eases_toward_target() {
        let mut current = 0.0;
        for _ in 0..10 {
            let next = approach(current, 1.5, 0.1, 2.0);
            assert!(next > current && next < 1.5);
            current = next;
        }
        assert_eq!(approach(0.3, 0.7, 0.1, 0.0), 0.7);
    }
}
