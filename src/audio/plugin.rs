//! Audio plugin - plays cues for the events the simulation emits.

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl, AudioPlugin, AudioSource};
use rand::Rng;
use std::collections::HashMap;

use super::cues::{cue_for, Cue};
use crate::core::SimEvent;
use crate::simulation::{Simulation, SimulationSet};

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AudioPlugin)
            .init_resource::<AudioLibrary>()
            .add_systems(Update, play_feedback_audio.in_set(SimulationSet::Present));
    }
}

/// Sound handles, loaded on first use and kept for the session.
#[derive(Resource, Default)]
pub struct AudioLibrary {
    handles: HashMap<String, Handle<AudioSource>>,
}

impl AudioLibrary {
    fn get(&mut self, path: &str, asset_server: &AssetServer) -> Handle<AudioSource> {
        self.handles
            .entry(path.to_string())
            .or_insert_with(|| asset_server.load(path.to_string()))
            .clone()
    }
}

fn play_feedback_audio(
    audio: Res<Audio>,
    asset_server: Res<AssetServer>,
    simulation: Res<Simulation>,
    mut library: ResMut<AudioLibrary>,
    mut events: EventReader<SimEvent>,
) {
    let mut rng = rand::thread_rng();

    for event in events.read() {
        let Some(cue) = cue_for(event) else {
            continue;
        };

        match cue {
            Cue::Shot(weapon) => {
                let definition = simulation.0.config().weapons.get(weapon);
                if definition.sound.is_empty() {
                    continue;
                }
                let (low, high) = definition.pitch_range;
                let rate = if high > low { rng.gen_range(low..=high) } else { low };
                let handle = library.get(&definition.sound, &asset_server);
                audio.play(handle).with_playback_rate(f64::from(rate));
            }
            Cue::Fixed { path, rate, volume } => {
                let handle = library.get(path, &asset_server);
                audio
                    .play(handle)
                    .with_playback_rate(rate)
                    .with_volume(volume);
            }
        }
    }
}
