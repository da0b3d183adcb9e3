//! Camera shake driven by shots and explosions.

use bevy::prelude::*;
use rand::Rng;

use crate::core::{GameState, SimEvent};
use crate::player::PlayerCamera;
use crate::simulation::SimulationSet;

/// Active camera shake. A stronger shake replaces a weaker one.
#[derive(Resource, Default)]
pub struct ScreenShake {
    pub intensity: f32,
    pub remaining: f32,
}

impl ScreenShake {
    pub fn trigger(&mut self, intensity: f32, duration: f32) {
        if intensity >= self.current() {
            self.intensity = intensity;
            self.remaining = duration;
        }
    }

    /// Strength right now; zero once the shake has run out.
    pub fn current(&self) -> f32 {
        if self.remaining > 0.0 {
            self.intensity
        } else {
            0.0
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }
}

pub fn setup_feedback_systems(app: &mut App) {
    app.init_resource::<ScreenShake>()
        .add_systems(
            Update,
            (read_shake_events, apply_screen_shake)
                .chain()
                .in_set(SimulationSet::Present),
        )
        .add_systems(OnExit(GameState::InGame), settle_camera);
}

fn read_shake_events(mut events: EventReader<SimEvent>, mut shake: ResMut<ScreenShake>) {
    for event in events.read() {
        if let SimEvent::CameraShake { intensity, duration } = event {
            shake.trigger(*intensity, *duration);
        }
    }
}

/// Jitter the camera around its eye position.
fn apply_screen_shake(
    time: Res<Time>,
    mut shake: ResMut<ScreenShake>,
    mut camera_query: Query<(&mut Transform, &PlayerCamera)>,
) {
    let strength = shake.current();
    shake.tick(time.delta_secs());

    let Ok((mut transform, camera)) = camera_query.get_single_mut() else {
        return;
    };

    let mut rng = rand::thread_rng();
    let jitter = if strength > 0.0 {
        Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            0.0,
        ) * strength
            * 0.1
    } else {
        Vec3::ZERO
    };

    transform.translation = Vec3::Y * camera.eye_offset + jitter;
}

/// Leave the camera at rest while paused or dead.
fn settle_camera(mut shake: ResMut<ScreenShake>, mut camera_query: Query<(&mut Transform, &PlayerCamera)>) {
    *shake = ScreenShake::default();
    for (mut transform, camera) in &mut camera_query {
        transform.translation = Vec3::Y * camera.eye_offset;
    }
}
