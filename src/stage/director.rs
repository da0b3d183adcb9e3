//! Stage progression: announcement, wave composition, kill tally and completion.

use bevy::prelude::*;

use super::announcement::{Announcement, AnnouncementKind};
use crate::combat::WeaponKind;
use crate::core::config::StageTuning;
use crate::enemies::{Archetype, EnemyRoster};

/// How many of each archetype a stage wants alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composition {
    pub grunts: u32,
    pub ranged: u32,
    pub bosses: u32,
}

impl Composition {
    pub fn for_stage(stage: u32) -> Self {
        let stage = stage.max(1);
        Self {
            grunts: 3 + (stage - 1) * 3,
            ranged: stage / 5,
            bosses: stage / 10,
        }
    }

    pub fn count(&self, archetype: Archetype) -> u32 {
        match archetype {
            Archetype::Grunt => self.grunts,
            Archetype::Ranged => self.ranged,
            Archetype::Boss => self.bosses,
        }
    }

    pub fn total(&self) -> u32 {
        self.grunts + self.ranged + self.bosses
    }

    /// Enemies still missing once the live roster is taken into account.
    pub fn delta(&self, roster: &EnemyRoster) -> Vec<(Archetype, u32)> {
        Archetype::ALL
            .into_iter()
            .map(|archetype| (archetype, self.count(archetype).saturating_sub(roster.count(archetype))))
            .filter(|(_, missing)| *missing > 0)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePhase {
    /// Banner showing, nothing spawned yet.
    Intermission,
    /// Banner done; the world should spawn the wave this tick.
    Spawning,
    InProgress,
}

/// Post-process strength for a stage. Zero until stage 10, then ramps to 1.5 at 20.
pub fn shader_intensity(stage: u32) -> f32 {
    match stage {
        0..=9 => 0.0,
        10..=15 => 0.3 + (stage - 10) as f32 * 0.08,
        16..=20 => 0.7 + (stage - 15) as f32 * 0.16,
        _ => 1.5,
    }
}

/// Weapon handed out when `stage` starts, if any.
pub fn weapon_drop_for(stage: u32) -> Option<WeaponKind> {
    match stage {
        10 => Some(WeaponKind::AssaultRifle),
        15 => Some(WeaponKind::DualUzi),
        20 => Some(WeaponKind::GrenadeLauncher),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct StageDirector {
    stage: u32,
    phase: StagePhase,
    required: u32,
    killed: u32,
    live: u32,
    announcement: Option<Announcement>,
    claimed_drops: Vec<WeaponKind>,
    tuning: StageTuning,
}

impl StageDirector {
    pub fn new(tuning: StageTuning) -> Self {
        Self {
            stage: 1,
            phase: StagePhase::Intermission,
            required: 0,
            killed: 0,
            live: 0,
            announcement: None,
            claimed_drops: Vec::new(),
            tuning,
        }
    }

    /// Start the run at a later stage instead of stage 1.
    pub fn with_stage(mut self, stage: u32) -> Self {
        self.stage = stage.max(1);
        self
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn killed(&self) -> u32 {
        self.killed
    }

    pub fn live(&self) -> u32 {
        self.live
    }

    pub fn announcement(&self) -> Option<&Announcement> {
        self.announcement.as_ref()
    }

    pub fn composition(&self) -> Composition {
        Composition::for_stage(self.stage)
    }

    /// Show the intro banner for the current stage.
    pub fn begin(&mut self, now: f64) -> Announcement {
        let announcement = Announcement::new(AnnouncementKind::Intro, self.stage, now, self.tuning.intro_duration);
        self.phase = StagePhase::Intermission;
        self.announcement = Some(announcement);
        announcement
    }

    /// Advance the banner. Returns true on the tick the wave should spawn.
    pub fn update(&mut self, now: f64) -> bool {
        if self.phase != StagePhase::Intermission {
            return false;
        }
        match self.announcement {
            Some(announcement) if announcement.is_finished(now) => {
                self.announcement = None;
                self.phase = StagePhase::Spawning;
                true
            }
            _ => false,
        }
    }

    /// The wave is on the field with `live` enemies alive in total.
    pub fn wave_spawned(&mut self, live: u32) {
        self.killed = 0;
        self.required = live;
        self.live = live;
        self.phase = StagePhase::InProgress;
        info!("Stage {} started with {} enemies", self.stage, live);
    }

    /// Tally hook for a destroyed enemy.
    pub fn record_kill(&mut self) {
        self.live = self.live.saturating_sub(1);
        self.killed += 1;
    }

    /// If the wave is cleared, advance to the next stage and start its banner.
    /// Returns the stage that was cleared.
    pub fn check_completion(&mut self, now: f64) -> Option<u32> {
        if self.phase != StagePhase::InProgress || self.killed < self.required {
            return None;
        }
        let cleared = self.stage;
        self.stage += 1;
        self.phase = StagePhase::Intermission;
        self.announcement = Some(Announcement::new(
            AnnouncementKind::Transition,
            self.stage,
            now,
            self.tuning.transition_duration,
        ));
        info!("Stage {} cleared, announcing stage {}", cleared, self.stage);
        Some(cleared)
    }

    pub fn is_supply_stage(&self) -> bool {
        self.tuning.supply_interval > 0 && self.stage % self.tuning.supply_interval == 0
    }

    /// First call for a given weapon returns true; later calls false.
    pub fn claim_drop(&mut self, weapon: WeaponKind) -> bool {
        if self.claimed_drops.contains(&weapon) {
            return false;
        }
        self.claimed_drops.push(weapon);
        true
    }

    pub fn shader_intensity(&self) -> f32 {
        shader_intensity(self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::ArchetypeRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn composition_scales_with_stage() {
        assert_eq!(
            Composition::for_stage(1),
            Composition {
                grunts: 3,
                ranged: 0,
                bosses: 0
            }
        );
        assert_eq!(
            Composition::for_stage(11),
            Composition {
                grunts: 33,
                ranged: 2,
                bosses: 1
            }
        );
    }

    #[test]
    fn delta_only_fills_missing_enemies() {
        let archetypes = ArchetypeRegistry::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut roster = EnemyRoster::default();
        let composition = Composition::for_stage(5);
        assert_eq!(composition.delta(&roster), vec![(Archetype::Grunt, 15), (Archetype::Ranged, 1)]);

        for _ in 0..10 {
            roster.spawn(Archetype::Grunt, Vec3::ZERO, &archetypes, &mut rng, None);
        }
        roster.spawn(Archetype::Ranged, Vec3::ZERO, &archetypes, &mut rng, None);
        assert_eq!(composition.delta(&roster), vec![(Archetype::Grunt, 5)]);

        for _ in 0..5 {
            roster.spawn(Archetype::Grunt, Vec3::ZERO, &archetypes, &mut rng, None);
        }
        assert!(composition.delta(&roster).is_empty());
    }

    #[test]
    fn shader_intensity_ramps() {
        assert_eq!(shader_intensity(1), 0.0);
        assert_eq!(shader_intensity(9), 0.0);
        assert!((shader_intensity(10) - 0.3).abs() < 1e-5);
        assert!((shader_intensity(15) - 0.7).abs() < 1e-5);
        assert!((shader_intensity(20) - 1.5).abs() < 1e-5);
        assert_eq!(shader_intensity(35), 1.5);
        for stage in 1..30 {
            assert!(shader_intensity(stage + 1) >= shader_intensity(stage));
        }
    }

    #[test]
    fn stage_flow_from_intro_to_next_banner() {
        let mut director = StageDirector::new(StageTuning::default());
        director.begin(0.0);
        assert!(!director.update(5.9));
        assert!(director.update(6.0));
        assert_eq!(director.phase(), StagePhase::Spawning);
        assert!(!director.update(6.1));

        director.wave_spawned(3);
        assert_eq!(director.check_completion(7.0), None);
        director.record_kill();
        director.record_kill();
        assert_eq!(director.check_completion(8.0), None);
        director.record_kill();
        assert_eq!(director.live(), 0);

        assert_eq!(director.check_completion(9.0), Some(1));
        assert_eq!(director.stage(), 2);
        let banner = director.announcement().copied().unwrap();
        assert_eq!(banner.kind, AnnouncementKind::Transition);
        assert_eq!(banner.stage, 2);
        assert!(director.update(12.0));
    }

    #[test]
    fn drops_and_supplies() {
        let mut director = StageDirector::new(StageTuning::default());
        assert_eq!(weapon_drop_for(10), Some(WeaponKind::AssaultRifle));
        assert_eq!(weapon_drop_for(15), Some(WeaponKind::DualUzi));
        assert_eq!(weapon_drop_for(20), Some(WeaponKind::GrenadeLauncher));
        assert_eq!(weapon_drop_for(11), None);

        assert!(director.claim_drop(WeaponKind::DualUzi));
        assert!(!director.claim_drop(WeaponKind::DualUzi));
        assert!(!director.is_supply_stage());
    }
}
