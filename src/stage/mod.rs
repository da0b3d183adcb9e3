//! Stage progression and everything placed into the arena between fights.

mod announcement;
mod director;
mod pickups;
mod placement;

pub use announcement::{Announcement, AnnouncementKind};
pub use director::{shader_intensity, weapon_drop_for, Composition, StageDirector, StagePhase};
pub use pickups::{Pickup, PickupField, PickupKind};
pub use placement::PlacementRule;
