//! Health kits, ammo boxes and weapon drops lying in the arena.

use bevy::prelude::*;

use crate::combat::WeaponKind;
use crate::core::config::PickupTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Health,
    Ammo,
    Weapon(WeaponKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub id: u64,
    pub kind: PickupKind,
    pub position: Vec3,
    pub spawned_at: f64,
}

#[derive(Debug, Default)]
pub struct PickupField {
    pickups: Vec<Pickup>,
    next_id: u64,
    last_ammo_at: Option<f64>,
}

impl PickupField {
    pub fn spawn(&mut self, kind: PickupKind, position: Vec3, now: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.pickups.push(Pickup {
            id,
            kind,
            position,
            spawned_at: now,
        });
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pickup> {
        self.pickups.iter()
    }

    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    pub fn count(&self, kind: PickupKind) -> usize {
        self.pickups.iter().filter(|p| p.kind == kind).count()
    }

    /// Remove and return everything the player picks up standing at `player_feet`.
    ///
    /// Health kits are left alone while health is full, and at most one is
    /// taken per call. At most one ammo box is taken per `ammo_cooldown`.
    pub fn collect(&mut self, player_feet: Vec3, health_full: bool, now: f64, tuning: &PickupTuning) -> Vec<Pickup> {
        let mut collected = Vec::new();
        let mut kit_taken = false;

        for i in (0..self.pickups.len()).rev() {
            let pickup = &self.pickups[i];
            let offset = pickup.position - player_feet;
            let distance = Vec2::new(offset.x, offset.z).length();

            let taken = match pickup.kind {
                PickupKind::Health => !health_full && !kit_taken && distance <= tuning.health_radius,
                PickupKind::Ammo => {
                    let ready = self
                        .last_ammo_at
                        .map_or(true, |at| now - at >= f64::from(tuning.ammo_cooldown));
                    ready && distance <= tuning.ammo_radius
                }
                PickupKind::Weapon(_) => distance <= tuning.weapon_radius,
            };

            if taken {
                match pickup.kind {
                    PickupKind::Ammo => self.last_ammo_at = Some(now),
                    PickupKind::Health => kit_taken = true,
                    PickupKind::Weapon(_) => {}
                }
                collected.push(self.pickups.swap_remove(i));
            }
        }

        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_kit_waits_until_player_is_hurt() {
        let tuning = PickupTuning::default();
        let mut field = PickupField::default();
        field.spawn(PickupKind::Health, Vec3::new(1.0, 0.5, 0.0), 0.0);

        assert!(field.collect(Vec3::ZERO, true, 1.0, &tuning).is_empty());
        let taken = field.collect(Vec3::ZERO, false, 2.0, &tuning);
        assert_eq!(taken.len(), 1);
        assert!(field.is_empty());
    }

    #[test]
    fn one_health_kit_per_tick() {
        let tuning = PickupTuning::default();
        let mut field = PickupField::default();
        field.spawn(PickupKind::Health, Vec3::new(1.0, 0.5, 0.0), 0.0);
        field.spawn(PickupKind::Health, Vec3::new(-1.0, 0.5, 0.0), 0.0);

        assert_eq!(field.collect(Vec3::ZERO, false, 1.0, &tuning).len(), 1);
        assert_eq!(field.count(PickupKind::Health), 1);

        // Healed to full by the first kit, the second stays put.
        assert!(field.collect(Vec3::ZERO, true, 1.1, &tuning).is_empty());
        assert_eq!(field.count(PickupKind::Health), 1);
    }

    #[test]
    fn ammo_boxes_respect_collection_cooldown() {
        let tuning = PickupTuning::default();
        let mut field = PickupField::default();
        field.spawn(PickupKind::Ammo, Vec3::new(0.5, 0.5, 0.0), 0.0);
        field.spawn(PickupKind::Ammo, Vec3::new(-0.5, 0.5, 0.0), 0.0);

        assert_eq!(field.collect(Vec3::ZERO, false, 1.0, &tuning).len(), 1);
        assert!(field.collect(Vec3::ZERO, false, 1.2, &tuning).is_empty());
        assert_eq!(field.collect(Vec3::ZERO, false, 1.6, &tuning).len(), 1);
    }

    #[test]
    fn weapon_drop_has_wider_reach() {
        let tuning = PickupTuning::default();
        let mut field = PickupField::default();
        field.spawn(PickupKind::Weapon(WeaponKind::DualUzi), Vec3::new(2.5, 1.0, 0.0), 0.0);
        field.spawn(PickupKind::Health, Vec3::new(2.5, 0.5, 0.0), 0.0);

        let taken = field.collect(Vec3::ZERO, false, 0.0, &tuning);
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].kind, PickupKind::Weapon(WeaponKind::DualUzi));
        assert_eq!(field.count(PickupKind::Health), 1);
    }
}
