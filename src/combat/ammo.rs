//! Magazine and reserve counters, one record per ammo type.

use super::weapons::{WeaponKind, WeaponTable};
use crate::core::CommandRejected;

/// Counters for one ammo type.
///
/// `reserved` rounds are already committed to a staggered twin shot and are
/// still in the magazine until [`AmmoLedger::settle_reserved`] removes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoRecord {
    pub current: u32,
    pub max: u32,
    pub reserve: u32,
    reserved: u32,
}

impl AmmoRecord {
    /// A full magazine plus `reserve` spare rounds.
    pub fn new(max: u32, reserve: u32) -> Self {
        Self {
            current: max,
            max,
            reserve,
            reserved: 0,
        }
    }

    /// Rounds that can still be committed to a new shot.
    pub fn available(&self) -> u32 {
        self.current - self.reserved
    }

    pub fn reserved(&self) -> u32 {
        self.reserved
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn total(&self) -> u32 {
        self.current + self.reserve
    }
}

/// Ammo for every weapon kind.
#[derive(Debug, Clone)]
pub struct AmmoLedger {
    records: [AmmoRecord; 4],
}

impl AmmoLedger {
    pub fn from_table(table: &WeaponTable) -> Self {
        Self {
            records: WeaponKind::ALL.map(|kind| {
                let def = table.get(kind);
                AmmoRecord::new(def.magazine, def.reserve)
            }),
        }
    }

    pub fn record(&self, kind: WeaponKind) -> &AmmoRecord {
        &self.records[kind.index()]
    }

    /// Test and scenario setup: overwrite magazine and reserve.
    pub fn set(&mut self, kind: WeaponKind, current: u32, reserve: u32) {
        let record = &mut self.records[kind.index()];
        record.current = current.min(record.max);
        record.reserve = reserve;
        record.reserved = 0;
    }

    /// Take `count` rounds at once. Fails without side effects when fewer are available.
    pub fn try_consume(&mut self, kind: WeaponKind, count: u32) -> bool {
        let record = &mut self.records[kind.index()];
        if record.available() < count {
            return false;
        }
        record.current -= count;
        true
    }

    /// Twin-barrel consumption: checks all `count` rounds are available,
    /// takes one now and reserves the rest for [`Self::settle_reserved`].
    pub fn try_consume_staggered(&mut self, kind: WeaponKind, count: u32) -> bool {
        let record = &mut self.records[kind.index()];
        if count == 0 || record.available() < count {
            return false;
        }
        record.current -= 1;
        record.reserved += count - 1;
        true
    }

    /// Take one previously reserved round. Returns false if none was reserved.
    pub fn settle_reserved(&mut self, kind: WeaponKind) -> bool {
        let record = &mut self.records[kind.index()];
        if record.reserved == 0 {
            return false;
        }
        record.reserved -= 1;
        record.current -= 1;
        true
    }

    /// Move `min(max - current, reserve)` rounds into the magazine.
    pub fn reload(&mut self, kind: WeaponKind) -> Result<u32, CommandRejected> {
        let record = &mut self.records[kind.index()];
        if record.is_full() {
            return Err(CommandRejected::MagazineFull);
        }
        if record.reserve == 0 {
            return Err(CommandRejected::ReserveEmpty);
        }
        let transferred = (record.max - record.current).min(record.reserve);
        record.current += transferred;
        record.reserve -= transferred;
        Ok(transferred)
    }

    /// Check a reload would do something, without changing anything.
    pub fn can_reload(&self, kind: WeaponKind) -> Result<(), CommandRejected> {
        let record = self.record(kind);
        if record.is_full() {
            Err(CommandRejected::MagazineFull)
        } else if record.reserve == 0 {
            Err(CommandRejected::ReserveEmpty)
        } else {
            Ok(())
        }
    }

    /// Pickup effect. Reserve has no cap.
    pub fn add_reserve(&mut self, kind: WeaponKind, amount: u32) {
        let record = &mut self.records[kind.index()];
        record.reserve = record.reserve.saturating_add(amount);
    }
}
