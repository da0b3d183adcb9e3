//! World module - the arena the fight takes place in.

mod builder;
mod materials;
mod plugin;

pub use builder::{build_arena, ArenaGeometry};
pub use plugin::WorldPlugin;
