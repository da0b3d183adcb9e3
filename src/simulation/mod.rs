//! Simulation module - the headless combat world and the glue that drives it.
//!
//! [`SimulationWorld`] owns every gameplay registry and knows nothing about
//! Bevy entities. [`SimulationPlugin`] feeds it input and the player pose each
//! frame, steps it, and forwards its feedback events into the ECS.

mod clock;
mod collision;
mod hud;
mod input;
mod player;
mod plugin;
mod world;

#[cfg(test)]
mod tests;

pub use clock::SimClock;
pub use collision::{CollisionQuery, OpenField};
pub use hud::{BannerView, HudSnapshot, ProxyKey, VisualProxy};
pub use input::InputEvent;
pub use player::PlayerState;
pub use plugin::{RapierCollision, Simulation, SimulationPlugin, SimulationSet};
pub use world::SimulationWorld;
