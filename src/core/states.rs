//! Game state definitions that control the overall flow of the game.
//!
//! The simulation only advances in `InGame`. Pausing leaves the arena
//! visible but freezes the clock, since nothing calls `simulate` while
//! paused.

use bevy::prelude::*;

/// Main game states.
///
/// - Start in `Loading` while data files are read
/// - `MainMenu` once loading completes
/// - `InGame` while a run is active
/// - `Paused` freezes the run but keeps the world visible
/// - `GameOver` when the player dies
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Title screen
    MainMenu,
    /// Active run
    InGame,
    /// Run is paused (overlay on gameplay)
    Paused,
    /// Player has died
    GameOver,
}
