//! Enemies module - archetype data, the live roster, AI and boss attacks.

pub mod ai;
pub mod boss;
mod components;
pub mod data;

pub use boss::Shockwave;
pub use components::*;
pub use data::{ArchetypeRegistry, ArchetypeStats};
