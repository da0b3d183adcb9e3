//! Core plugin that sets up game states, the feedback event queue and data loading.

use bevy::prelude::*;

use super::config::load_simulation_config;
use super::events::SimEvent;
use super::states::GameState;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, MainMenu, InGame, ...)
/// - The `SimEvent` queue the simulation drains into
/// - Loading of `SimulationConfig` from RON data
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<GameState>()
            .add_event::<SimEvent>()

            // Data files are read synchronously, so Loading completes in one frame
            .add_systems(
                OnEnter(GameState::Loading),
                (load_simulation_config, transition_to_main_menu).chain(),
            )

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused)))
            );
    }
}

fn transition_to_main_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}
