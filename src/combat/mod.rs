//! Combat module - weapons, ammo, damage, and first-person feedback.

mod ammo;
mod damage;
mod feedback;
mod health;
mod plugin;
mod viewmodel;
mod weapon_state;
mod weapons;

pub use ammo::{AmmoLedger, AmmoRecord};
pub use damage::*;
pub use feedback::ScreenShake;
pub use health::Health;
pub use plugin::CombatPlugin;
pub use viewmodel::{ViewmodelKick, WeaponViewmodel};
pub use weapon_state::*;
pub use weapons::*;
