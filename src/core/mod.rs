//! Core module - states, feedback events, scheduling, errors and data loading.
//!
//! Everything else in the crate builds on these pieces.

pub mod config;
mod error;
mod events;
mod plugin;
mod scheduler;
mod states;

pub use config::SimulationConfig;
pub use error::{CommandRejected, DataLoadError};
pub use events::SimEvent;
pub use plugin::CorePlugin;
pub use scheduler::Scheduler;
pub use states::GameState;
