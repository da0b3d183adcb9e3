//! Audio module - sound cues for simulation feedback.

mod cues;
mod plugin;

pub use cues::{cue_for, Cue};
pub use plugin::{AudioLibrary, GameAudioPlugin};
