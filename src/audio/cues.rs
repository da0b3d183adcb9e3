//! Which sound plays for which feedback event.

use crate::combat::{BlastSource, WeaponKind};
use crate::core::SimEvent;
use crate::stage::PickupKind;

/// A sound to play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    /// The weapon's own firing sound at a random pitch from its range.
    Shot(WeaponKind),
    /// A fixed sound file at the given playback rate.
    Fixed { path: &'static str, rate: f64, volume: f64 },
}

const fn fixed(path: &'static str, rate: f64, volume: f64) -> Cue {
    Cue::Fixed { path, rate, volume }
}

pub fn cue_for(event: &SimEvent) -> Option<Cue> {
    let cue = match event {
        SimEvent::ShotFired { weapon, .. } => Cue::Shot(*weapon),
        SimEvent::DryFire { .. } => fixed("sounds/dry_fire.ogg", 1.0, 0.6),
        SimEvent::ReloadStarted { .. } => fixed("sounds/reload.ogg", 1.0, 0.8),
        SimEvent::WeaponSwitched { .. } => fixed("sounds/switch.ogg", 1.0, 0.6),
        SimEvent::WeaponUnlocked { .. } => fixed("sounds/pickup_weapon.ogg", 1.0, 1.0),
        SimEvent::EnemyHit { .. } => fixed("sounds/hit.ogg", 1.0, 0.5),
        SimEvent::EnemyKilled { .. } => fixed("sounds/enemy_death.ogg", 1.0, 0.7),
        SimEvent::Explosion { source, .. } => match source {
            BlastSource::Ordnance => fixed("sounds/explosion.ogg", 1.0, 1.0),
            BlastSource::Hostile => fixed("sounds/explosion.ogg", 1.4, 0.6),
        },
        SimEvent::ShockwaveStarted { .. } => fixed("sounds/shockwave.ogg", 1.0, 1.0),
        SimEvent::ChargeTelegraph { .. } => fixed("sounds/boss_roar.ogg", 1.0, 1.0),
        SimEvent::ChargeStrike { .. } => fixed("sounds/boss_roar.ogg", 0.8, 0.8),
        SimEvent::PlayerDamaged { .. } => fixed("sounds/hurt.ogg", 1.0, 0.8),
        SimEvent::PlayerHealed { .. } => fixed("sounds/heal.ogg", 1.0, 0.8),
        SimEvent::PlayerDied => fixed("sounds/death.ogg", 1.0, 1.0),
        SimEvent::StageAnnounced { intro: true, .. } => fixed("sounds/stage_intro.ogg", 1.0, 1.0),
        SimEvent::StageAnnounced { intro: false, .. } => fixed("sounds/stage_next.ogg", 1.0, 1.0),
        SimEvent::PickupCollected { kind } => match kind {
            PickupKind::Health => fixed("sounds/heal.ogg", 1.2, 0.7),
            PickupKind::Ammo => fixed("sounds/pickup_ammo.ogg", 1.0, 0.7),
            // Unlock already has its own cue
            PickupKind::Weapon(_) => return None,
        },
        _ => return None,
    };
    Some(cue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::*;

    #[test]
    fn shots_use_the_weapon_sound() {
        let event = SimEvent::ShotFired {
            weapon: WeaponKind::DualUzi,
            muzzle: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        };
        assert_eq!(cue_for(&event), Some(Cue::Shot(WeaponKind::DualUzi)));
    }

    #[test]
    fn silent_events_have_no_cue() {
        assert_eq!(cue_for(&SimEvent::CleanupEffects), None);
        assert_eq!(cue_for(&SimEvent::ShaderIntensity(0.3)), None);
        let weapon_pickup = SimEvent::PickupCollected {
            kind: PickupKind::Weapon(WeaponKind::AssaultRifle),
        };
        assert_eq!(cue_for(&weapon_pickup), None);
    }

    #[test]
    fn hostile_blasts_sound_smaller() {
        let blast = |source| SimEvent::Explosion {
            position: Vec3::ZERO,
            radius: 5.0,
            source,
        };
        let Some(Cue::Fixed { rate, volume, .. }) = cue_for(&blast(BlastSource::Hostile)) else {
            panic!("hostile blast should have a cue");
        };
        assert!(rate > 1.0 && volume < 1.0);
        assert!(matches!(cue_for(&blast(BlastSource::Ordnance)), Some(Cue::Fixed { .. })));
    }
}
