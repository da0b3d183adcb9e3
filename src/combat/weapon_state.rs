//! Weapon state machine: equip, fire-rate gating, auto fire and reload timeline.

use bevy::prelude::*;
use std::collections::HashSet;

use super::ammo::AmmoLedger;
use super::weapons::{WeaponKind, WeaponTable, WeaponTiming};
use crate::core::CommandRejected;

/// What the equipped weapon is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponPhase {
    Idle,
    /// Semi-auto shot animation, returns to Idle at `until`.
    FiringSingle { until: f64 },
    /// Trigger held on an automatic weapon.
    FiringAuto,
    Reloading { started_at: f64 },
}

/// Sub-step of the reload timeline. The ammo transfer happens when `Raising` ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadStage {
    Lowering,
    Holding,
    Raising,
}

/// One barrel discharge the world should perform, `delay` seconds from now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub weapon: WeaponKind,
    pub barrel: usize,
    pub delay: f32,
}

/// Result of advancing the machine by one tick.
#[derive(Debug, Default, PartialEq)]
pub struct WeaponTick {
    pub shots: Vec<Shot>,
    /// Auto fire stopped because the magazine ran dry.
    pub ran_dry: bool,
    /// Rounds moved into the magazine by a reload that just completed.
    pub reloaded: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct WeaponStateMachine {
    current: WeaponKind,
    unlocked: HashSet<WeaponKind>,
    phase: WeaponPhase,
    trigger_held: bool,
    last_fire_at: Option<f64>,
    // Derived from the equipped definition on every switch.
    fire_rate: f32,
    auto_fire: bool,
    recoil: f32,
}

impl WeaponStateMachine {
    /// Start with `start` equipped and unlocked.
    pub fn new(start: WeaponKind, table: &WeaponTable) -> Self {
        let mut machine = Self {
            current: start,
            unlocked: HashSet::from([start]),
            phase: WeaponPhase::Idle,
            trigger_held: false,
            last_fire_at: None,
            fire_rate: 0.0,
            auto_fire: false,
            recoil: 0.0,
        };
        machine.derive_stats(table);
        machine
    }

    pub fn current(&self) -> WeaponKind {
        self.current
    }

    pub fn phase(&self) -> WeaponPhase {
        self.phase
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.phase, WeaponPhase::Reloading { .. })
    }

    pub fn is_unlocked(&self, kind: WeaponKind) -> bool {
        self.unlocked.contains(&kind)
    }

    /// Unlocked weapons in slot order.
    pub fn unlocked(&self) -> Vec<WeaponKind> {
        WeaponKind::ALL
            .into_iter()
            .filter(|kind| self.unlocked.contains(kind))
            .collect()
    }

    /// Returns true if the weapon was newly unlocked.
    pub fn unlock(&mut self, kind: WeaponKind) -> bool {
        self.unlocked.insert(kind)
    }

    pub fn recoil(&self) -> f32 {
        self.recoil
    }

    fn derive_stats(&mut self, table: &WeaponTable) {
        let def = table.get(self.current);
        self.fire_rate = def.fire_rate;
        self.auto_fire = def.auto_fire;
        self.recoil = def.recoil;
    }

    /// Equip `kind`. Returns the weapon that was put away.
    pub fn switch_to(&mut self, kind: WeaponKind, table: &WeaponTable) -> Result<WeaponKind, CommandRejected> {
        if self.is_reloading() {
            return Err(CommandRejected::Reloading);
        }
        if !self.is_unlocked(kind) {
            return Err(CommandRejected::WeaponLocked);
        }
        if kind == self.current {
            return Err(CommandRejected::AlreadyEquipped);
        }

        let previous = self.current;
        self.current = kind;
        self.phase = WeaponPhase::Idle;
        self.trigger_held = false;
        self.derive_stats(table);
        info!("Switched weapon {:?} -> {:?}", previous, kind);
        Ok(previous)
    }

    fn ready_to_fire(&self, now: f64) -> bool {
        self.last_fire_at
            .map_or(true, |last| now - last >= f64::from(self.fire_rate))
    }

    /// Consume ammo for one trigger pull and lay out its barrels.
    fn discharge(&mut self, now: f64, table: &WeaponTable, ammo: &mut AmmoLedger) -> Option<Vec<Shot>> {
        let def = table.get(self.current);
        let consumed = if def.is_twin() {
            ammo.try_consume_staggered(self.current, def.barrels())
        } else {
            ammo.try_consume(self.current, 1)
        };
        if !consumed {
            return None;
        }

        self.last_fire_at = Some(now);
        let shots = (0..def.barrels() as usize)
            .map(|barrel| Shot {
                weapon: self.current,
                barrel,
                delay: table.timing.twin_delay * barrel as f32,
            })
            .collect();
        Some(shots)
    }

    /// Trigger pressed. Semi-auto weapons fire here; automatic ones start firing.
    pub fn trigger_pressed(
        &mut self,
        now: f64,
        table: &WeaponTable,
        ammo: &mut AmmoLedger,
    ) -> Result<Vec<Shot>, CommandRejected> {
        match self.phase {
            WeaponPhase::Reloading { .. } => return Err(CommandRejected::Reloading),
            WeaponPhase::FiringAuto => return Err(CommandRejected::AlreadyFiring),
            _ => {}
        }

        if ammo.record(self.current).available() == 0 {
            return Err(CommandRejected::EmptyMagazine);
        }

        if self.auto_fire {
            self.trigger_held = true;
            self.phase = WeaponPhase::FiringAuto;
            if !self.ready_to_fire(now) {
                // The next tick fires once the fire-rate window has passed.
                return Ok(Vec::new());
            }
            return self
                .discharge(now, table, ammo)
                .ok_or(CommandRejected::EmptyMagazine);
        }

        if !self.ready_to_fire(now) {
            return Err(CommandRejected::FireRateLimited);
        }
        let shots = self
            .discharge(now, table, ammo)
            .ok_or(CommandRejected::EmptyMagazine)?;
        self.phase = WeaponPhase::FiringSingle {
            until: now + f64::from(table.timing.shot_animation),
        };
        Ok(shots)
    }

    pub fn trigger_released(&mut self) {
        self.trigger_held = false;
        if self.phase == WeaponPhase::FiringAuto {
            self.phase = WeaponPhase::Idle;
        }
    }

    /// Begin the reload timeline for the equipped weapon.
    pub fn start_reload(&mut self, now: f64, ammo: &AmmoLedger) -> Result<(), CommandRejected> {
        if self.is_reloading() {
            return Err(CommandRejected::Reloading);
        }
        ammo.can_reload(self.current)?;

        self.trigger_held = false;
        self.phase = WeaponPhase::Reloading { started_at: now };
        Ok(())
    }

    /// Advance timers: finish shot animations, emit auto fire, complete reloads.
    pub fn update(&mut self, now: f64, table: &WeaponTable, ammo: &mut AmmoLedger) -> WeaponTick {
        let mut tick = WeaponTick::default();

        match self.phase {
            WeaponPhase::Idle => {}
            WeaponPhase::FiringSingle { until } => {
                if now >= until {
                    self.phase = WeaponPhase::Idle;
                }
            }
            WeaponPhase::FiringAuto => {
                if !self.trigger_held {
                    self.phase = WeaponPhase::Idle;
                } else if self.ready_to_fire(now) {
                    match self.discharge(now, table, ammo) {
                        Some(shots) => tick.shots = shots,
                        None => {
                            self.phase = WeaponPhase::Idle;
                            self.trigger_held = false;
                            tick.ran_dry = true;
                        }
                    }
                }
            }
            WeaponPhase::Reloading { started_at } => {
                if now - started_at >= f64::from(table.timing.reload_duration()) {
                    self.phase = WeaponPhase::Idle;
                    // The checks in start_reload still hold unless a pickup or
                    // a settled twin round changed the record meanwhile.
                    tick.reloaded = Some(ammo.reload(self.current).unwrap_or(0));
                }
            }
        }

        tick
    }

    pub fn reload_stage(&self, now: f64, timing: &WeaponTiming) -> Option<ReloadStage> {
        let WeaponPhase::Reloading { started_at } = self.phase else {
            return None;
        };
        let elapsed = (now - started_at) as f32;
        Some(if elapsed < timing.reload_phase {
            ReloadStage::Lowering
        } else if elapsed < timing.reload_phase * 2.0 {
            ReloadStage::Holding
        } else {
            ReloadStage::Raising
        })
    }

    /// How far the viewmodel sits below its mount, a pure function of the reload timeline.
    pub fn viewmodel_drop(&self, now: f64, timing: &WeaponTiming) -> f32 {
        let WeaponPhase::Reloading { started_at } = self.phase else {
            return 0.0;
        };
        if timing.reload_phase <= 0.0 {
            return 0.0;
        }
        let elapsed = (now - started_at) as f32;
        let phase = timing.reload_phase;
        let depth = match self.reload_stage(now, timing) {
            Some(ReloadStage::Lowering) => elapsed / phase,
            Some(ReloadStage::Holding) => 1.0,
            Some(ReloadStage::Raising) => 1.0 - (elapsed - phase * 2.0) / phase,
            None => 0.0,
        };
        timing.reload_drop * depth.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(start: WeaponKind) -> (WeaponStateMachine, WeaponTable, AmmoLedger) {
        let table = WeaponTable::default();
        let ammo = AmmoLedger::from_table(&table);
        let mut machine = WeaponStateMachine::new(WeaponKind::Pistol, &table);
        machine.unlock(start);
        if start != WeaponKind::Pistol {
            machine.switch_to(start, &table).unwrap();
        }
        (machine, table, ammo)
    }

    #[test]
    fn semi_auto_fires_once_then_returns_to_idle() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::Pistol);

        let shots = machine.trigger_pressed(0.0, &table, &mut ammo).unwrap();
        assert_eq!(shots.len(), 1);
        assert_eq!(ammo.record(WeaponKind::Pistol).current, 19);
        assert!(matches!(machine.phase(), WeaponPhase::FiringSingle { .. }));

        machine.update(0.05, &table, &mut ammo);
        assert!(matches!(machine.phase(), WeaponPhase::FiringSingle { .. }));
        machine.update(0.11, &table, &mut ammo);
        assert_eq!(machine.phase(), WeaponPhase::Idle);
    }

    #[test]
    fn semi_auto_respects_fire_rate() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::Pistol);
        machine.trigger_pressed(0.0, &table, &mut ammo).unwrap();
        machine.update(0.2, &table, &mut ammo);

        assert_eq!(
            machine.trigger_pressed(0.2, &table, &mut ammo),
            Err(CommandRejected::FireRateLimited)
        );
        assert_eq!(machine.trigger_pressed(0.41, &table, &mut ammo).map(|s| s.len()), Ok(1));
    }

    #[test]
    fn empty_magazine_rejects_trigger() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::Pistol);
        ammo.set(WeaponKind::Pistol, 0, 60);
        assert_eq!(
            machine.trigger_pressed(0.0, &table, &mut ammo),
            Err(CommandRejected::EmptyMagazine)
        );
        assert_eq!(machine.phase(), WeaponPhase::Idle);
    }

    #[test]
    fn auto_fire_emits_at_fire_rate_until_released() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::AssaultRifle);

        assert_eq!(machine.trigger_pressed(0.0, &table, &mut ammo).unwrap().len(), 1);
        assert_eq!(machine.phase(), WeaponPhase::FiringAuto);

        let mut fired = 1;
        let mut now = 0.0;
        while now < 0.5 {
            now += 0.01;
            fired += machine.update(now, &table, &mut ammo).shots.len();
        }
        // Shots at 0.0, 0.1, 0.2, 0.3, 0.4 (float accumulation may land the last just past 0.5).
        assert!((5..=6).contains(&fired), "fired {fired}");
        assert_eq!(ammo.record(WeaponKind::AssaultRifle).current, 30 - fired as u32);

        machine.trigger_released();
        assert_eq!(machine.phase(), WeaponPhase::Idle);
        assert!(machine.update(2.0, &table, &mut ammo).shots.is_empty());
    }

    #[test]
    fn auto_fire_stops_when_dry() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::AssaultRifle);
        ammo.set(WeaponKind::AssaultRifle, 1, 90);

        assert_eq!(machine.trigger_pressed(0.0, &table, &mut ammo).unwrap().len(), 1);
        let tick = machine.update(0.2, &table, &mut ammo);
        assert!(tick.ran_dry);
        assert!(tick.shots.is_empty());
        assert_eq!(machine.phase(), WeaponPhase::Idle);
    }

    #[test]
    fn twin_weapon_staggers_second_barrel() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::DualUzi);

        let shots = machine.trigger_pressed(0.0, &table, &mut ammo).unwrap();
        assert_eq!(shots.len(), 2);
        assert_eq!(shots[0].delay, 0.0);
        assert!((shots[1].delay - 0.02).abs() < 1e-6);
        let record = ammo.record(WeaponKind::DualUzi);
        assert_eq!((record.current, record.reserved()), (59, 1));
    }

    #[test]
    fn twin_weapon_needs_both_rounds() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::DualUzi);
        ammo.set(WeaponKind::DualUzi, 1, 0);
        assert_eq!(
            machine.trigger_pressed(0.0, &table, &mut ammo),
            Err(CommandRejected::EmptyMagazine)
        );
        assert_eq!(ammo.record(WeaponKind::DualUzi).current, 1);
    }

    #[test]
    fn reload_timeline_applies_transfer_at_the_end() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::Pistol);
        ammo.set(WeaponKind::Pistol, 5, 60);

        machine.start_reload(0.0, &ammo).unwrap();
        assert_eq!(machine.reload_stage(0.3, &table.timing), Some(ReloadStage::Lowering));
        assert_eq!(machine.reload_stage(0.9, &table.timing), Some(ReloadStage::Holding));
        assert_eq!(machine.reload_stage(1.5, &table.timing), Some(ReloadStage::Raising));

        assert_eq!(machine.update(1.7, &table, &mut ammo).reloaded, None);
        assert_eq!(ammo.record(WeaponKind::Pistol).current, 5);

        assert_eq!(machine.update(1.81, &table, &mut ammo).reloaded, Some(15));
        assert_eq!(ammo.record(WeaponKind::Pistol).current, 20);
        assert_eq!(ammo.record(WeaponKind::Pistol).reserve, 45);
        assert_eq!(machine.phase(), WeaponPhase::Idle);
    }

    #[test]
    fn reload_blocks_fire_and_switch() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::Pistol);
        machine.unlock(WeaponKind::AssaultRifle);
        ammo.set(WeaponKind::Pistol, 5, 60);
        machine.start_reload(0.0, &ammo).unwrap();

        assert_eq!(machine.trigger_pressed(0.5, &table, &mut ammo), Err(CommandRejected::Reloading));
        assert_eq!(
            machine.switch_to(WeaponKind::AssaultRifle, &table),
            Err(CommandRejected::Reloading)
        );
        assert_eq!(machine.start_reload(0.5, &ammo), Err(CommandRejected::Reloading));
        assert_eq!(machine.current(), WeaponKind::Pistol);
    }

    #[test]
    fn reload_rejected_when_not_needed() {
        let (mut machine, _table, mut ammo) = setup(WeaponKind::Pistol);
        assert_eq!(machine.start_reload(0.0, &ammo), Err(CommandRejected::MagazineFull));

        ammo.set(WeaponKind::Pistol, 3, 0);
        assert_eq!(machine.start_reload(0.0, &ammo), Err(CommandRejected::ReserveEmpty));
        assert_eq!(machine.phase(), WeaponPhase::Idle);
    }

    #[test]
    fn viewmodel_drop_follows_timeline() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::Pistol);
        ammo.set(WeaponKind::Pistol, 0, 60);
        machine.start_reload(0.0, &ammo).unwrap();
        let timing = &table.timing;

        assert_eq!(machine.viewmodel_drop(0.0, timing), 0.0);
        assert!((machine.viewmodel_drop(0.3, timing) - 1.2).abs() < 1e-4);
        assert!((machine.viewmodel_drop(0.9, timing) - 2.4).abs() < 1e-4);
        assert!((machine.viewmodel_drop(1.5, timing) - 1.2).abs() < 1e-4);
    }

    #[test]
    fn switching_to_locked_weapon_changes_nothing() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::Pistol);
        machine.trigger_pressed(0.0, &table, &mut ammo).unwrap();
        let phase = machine.phase();

        assert_eq!(
            machine.switch_to(WeaponKind::GrenadeLauncher, &table),
            Err(CommandRejected::WeaponLocked)
        );
        assert_eq!(machine.current(), WeaponKind::Pistol);
        assert_eq!(machine.phase(), phase);
        assert_eq!(machine.recoil(), 0.15);
    }

    #[test]
    fn switching_cancels_auto_fire_and_rederives_stats() {
        let (mut machine, table, mut ammo) = setup(WeaponKind::AssaultRifle);
        machine.unlock(WeaponKind::GrenadeLauncher);
        machine.trigger_pressed(0.0, &table, &mut ammo).unwrap();

        assert_eq!(machine.switch_to(WeaponKind::GrenadeLauncher, &table), Ok(WeaponKind::AssaultRifle));
        assert_eq!(machine.phase(), WeaponPhase::Idle);
        assert_eq!(machine.recoil(), 0.4);
        assert!(machine.update(0.5, &table, &mut ammo).shots.is_empty());
    }
}
