//! UI module - menus and the in-game HUD.

mod hud;
mod plugin;

pub use hud::HudState;
pub use plugin::UiPlugin;
