//! Rendering module - mirrors the simulation into the scene.

mod effects;
mod plugin;
mod post_process;
mod proxies;
pub mod visual_config;

pub use effects::TransientEffect;
pub use plugin::{RenderingPlugin, StageDistortion};
pub use post_process::{PostProcessSettings, StagePostProcessPlugin};
pub use proxies::{ProxyIndex, SimProxy};
pub use visual_config::VisualConfig;
