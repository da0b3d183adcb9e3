//! The simulation root: owns every registry and steps them in a fixed order.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::clock::SimClock;
use super::collision::CollisionQuery;
use super::hud::{BannerView, HudSnapshot, ProxyKey, VisualProxy};
use super::input::InputEvent;
use super::player::PlayerState;
use crate::combat::{resolve_blast, AmmoLedger, Blast, BlastSource, Shot, WeaponKind, WeaponStateMachine};
use crate::core::{CommandRejected, Scheduler, SimEvent, SimulationConfig};
use crate::enemies::ai::{think, AiContext, EnemyAction};
use crate::enemies::boss::charge_strike;
use crate::enemies::{DestroyHook, EnemyId, EnemyRoster, Shockwave};
use crate::projectiles::{advance_grenades, advance_orbs, advance_tracers, ProjectileSet};
use crate::stage::{weapon_drop_for, AnnouncementKind, PickupField, PickupKind, StageDirector};

/// Enemies that fall below this height are culled.
const KILL_PLANE: f32 = -20.0;
/// Duration of the shake that accompanies a shot or an explosion.
const SHAKE_DURATION: f32 = 0.1;
const EXPLOSION_SHAKE: f32 = 0.3;

/// Work scheduled for a later tick. Every variant re-validates its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Deferred {
    /// Delayed barrel of a twin weapon.
    Barrel { weapon: WeaponKind, barrel: usize },
    /// One orb of a volley, fired from muzzle `muzzle` of `enemy`.
    Orb { enemy: EnemyId, muzzle: usize },
    ChargeStrike { enemy: EnemyId },
    WeaponDrop { weapon: WeaponKind },
    /// Hide the mission text unless newer text replaced it.
    HideMission { generation: u64 },
    AmmoRespawn,
}

pub struct SimulationWorld {
    pub(crate) config: SimulationConfig,
    pub(crate) clock: SimClock,
    pub(crate) rng: StdRng,
    pub(crate) player: PlayerState,
    pub(crate) ammo: AmmoLedger,
    pub(crate) weapons: WeaponStateMachine,
    pub(crate) enemies: EnemyRoster,
    pub(crate) projectiles: ProjectileSet,
    pub(crate) shockwaves: Vec<Shockwave>,
    pub(crate) director: StageDirector,
    pub(crate) pickups: PickupField,
    pub(crate) scheduler: Scheduler<Deferred>,
    pub(crate) mission_text: Option<String>,
    mission_generation: u64,
    next_shockwave: u64,
    shader_intensity: f32,
    events: Vec<SimEvent>,
}

impl SimulationWorld {
    /// A fresh run at stage 1 with the intro banner already showing.
    pub fn new(config: SimulationConfig, seed: u64) -> Self {
        let player = PlayerState::new(&config.arena.player);
        let ammo = AmmoLedger::from_table(&config.weapons);
        let weapons = WeaponStateMachine::new(WeaponKind::Pistol, &config.weapons);
        let director = StageDirector::new(config.arena.stages.clone());

        let mut world = Self {
            config,
            clock: SimClock::default(),
            rng: StdRng::seed_from_u64(seed),
            player,
            ammo,
            weapons,
            enemies: EnemyRoster::default(),
            projectiles: ProjectileSet::default(),
            shockwaves: Vec::new(),
            director,
            pickups: PickupField::default(),
            scheduler: Scheduler::new(),
            mission_text: None,
            mission_generation: 0,
            next_shockwave: 0,
            shader_intensity: 0.0,
            events: Vec::new(),
        };

        let banner = world.director.begin(0.0);
        world.events.push(SimEvent::StageAnnounced {
            stage: banner.stage,
            intro: true,
        });
        world
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn now(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn enemies(&self) -> &EnemyRoster {
        &self.enemies
    }

    pub fn projectiles(&self) -> &ProjectileSet {
        &self.projectiles
    }

    pub fn director(&self) -> &StageDirector {
        &self.director
    }

    pub fn weapons(&self) -> &WeaponStateMachine {
        &self.weapons
    }

    pub fn ammo(&self) -> &AmmoLedger {
        &self.ammo
    }

    /// Post-process strength for the stage being played or announced.
    pub fn shader_intensity(&self) -> f32 {
        self.shader_intensity
    }

    pub fn is_player_dead(&self) -> bool {
        self.player.is_dead()
    }

    pub fn set_player_pose(&mut self, feet: Vec3, look: Vec3) {
        self.player.set_pose(feet, look);
    }

    pub fn take_player_impulse(&mut self) -> Vec3 {
        self.player.take_impulse()
    }

    /// Everything that happened since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply a player command immediately.
    pub fn on_input(&mut self, input: InputEvent) -> Result<(), CommandRejected> {
        if self.player.is_dead() {
            return Err(CommandRejected::PlayerDown);
        }
        let now = self.now();

        match input {
            InputEvent::TriggerPressed => {
                match self.weapons.trigger_pressed(now, &self.config.weapons, &mut self.ammo) {
                    Ok(shots) => {
                        for shot in shots {
                            self.discharge(shot, now);
                        }
                        Ok(())
                    }
                    Err(CommandRejected::EmptyMagazine) => {
                        self.events.push(SimEvent::DryFire {
                            weapon: self.weapons.current(),
                        });
                        Err(CommandRejected::EmptyMagazine)
                    }
                    Err(e) => Err(e),
                }
            }
            InputEvent::TriggerReleased => {
                self.weapons.trigger_released();
                Ok(())
            }
            InputEvent::Reload => {
                self.weapons.start_reload(now, &self.ammo)?;
                self.events.push(SimEvent::ReloadStarted {
                    weapon: self.weapons.current(),
                });
                Ok(())
            }
            InputEvent::SelectSlot(slot) => {
                let kind = WeaponKind::from_slot(slot).ok_or(CommandRejected::UnknownSlot(slot))?;
                self.equip(kind)
            }
        }
    }

    /// Advance the world by `dt` seconds. Does nothing once the player is dead.
    pub fn simulate(&mut self, dt: f32, collision: &dyn CollisionQuery) {
        if self.player.is_dead() {
            return;
        }
        let dt = dt.max(0.0);
        let now = self.clock.advance(dt);

        for task in self.scheduler.drain_due(now) {
            self.run_deferred(task, now, collision);
        }

        self.update_weapon(now);

        if self.director.update(now) {
            self.spawn_wave(now, collision);
        }

        self.update_enemies(now, dt, collision);

        let torso = self.player.torso();
        for blast in advance_orbs(&mut self.projectiles.hostile, torso, now, dt, collision) {
            self.apply_blast(blast);
        }

        for hit in advance_tracers(
            &mut self.projectiles.tracers,
            &mut self.enemies,
            &self.config.archetypes,
            now,
            dt,
        ) {
            let scale = self
                .enemies
                .get(hit.enemy)
                .map_or(1.0, |e| self.config.archetypes.get(e.archetype).blood_scale);
            self.events.push(SimEvent::EnemyHit {
                id: hit.enemy,
                remaining: hit.remaining,
                position: hit.position,
            });
            self.events.push(SimEvent::Blood {
                position: hit.position,
                scale,
            });
        }

        for blast in advance_grenades(
            &mut self.projectiles.ordnance,
            now,
            dt,
            &self.config.weapons.timing,
            collision,
        ) {
            self.apply_blast(blast);
        }

        self.update_shockwaves(now);
        self.update_pickups(now);
        self.sweep_dead(now);
    }

    fn equip(&mut self, kind: WeaponKind) -> Result<(), CommandRejected> {
        let from = self.weapons.switch_to(kind, &self.config.weapons)?;
        self.events.push(SimEvent::WeaponSwitched { from, to: kind });
        Ok(())
    }

    fn update_weapon(&mut self, now: f64) {
        let tick = self.weapons.update(now, &self.config.weapons, &mut self.ammo);
        for shot in tick.shots {
            self.discharge(shot, now);
        }
        if tick.ran_dry {
            self.events.push(SimEvent::DryFire {
                weapon: self.weapons.current(),
            });
        }
        if let Some(transferred) = tick.reloaded {
            self.events.push(SimEvent::ReloadFinished {
                weapon: self.weapons.current(),
                transferred,
            });
        }
    }

    fn discharge(&mut self, shot: Shot, now: f64) {
        if shot.delay > 0.0 {
            self.scheduler.schedule(
                now,
                shot.delay,
                Deferred::Barrel {
                    weapon: shot.weapon,
                    barrel: shot.barrel,
                },
            );
        } else {
            self.fire_barrel(shot.weapon, shot.barrel, now);
        }
    }

    /// Spawn the projectile for one barrel from the player's current view.
    fn fire_barrel(&mut self, weapon: WeaponKind, barrel: usize, now: f64) {
        let def = self.config.weapons.get(weapon);
        let timing = &self.config.weapons.timing;
        let muzzle = self.player.to_world(def.muzzle(barrel));
        let direction = self.player.look;

        match def.explosive {
            Some(explosive) => {
                self.projectiles.spawn_grenade(
                    muzzle,
                    direction * def.projectile_speed,
                    explosive.radius,
                    explosive.damage,
                    now,
                    timing.grenade_lifetime,
                );
            }
            None => {
                self.projectiles.spawn_tracer(
                    weapon,
                    muzzle,
                    direction,
                    def.projectile_speed,
                    now,
                    timing.tracer_lifetime,
                );
            }
        }

        self.events.push(SimEvent::ShotFired {
            weapon,
            muzzle,
            direction,
        });
        self.events.push(SimEvent::CameraShake {
            intensity: def.camera_shake,
            duration: SHAKE_DURATION,
        });
    }

    fn run_deferred(&mut self, task: Deferred, now: f64, collision: &dyn CollisionQuery) {
        match task {
            Deferred::Barrel { weapon, barrel } => {
                // The round was committed when the trigger was pulled.
                self.ammo.settle_reserved(weapon);
                if self.weapons.current() == weapon {
                    self.fire_barrel(weapon, barrel, now);
                }
            }
            Deferred::Orb { enemy, muzzle } => self.fire_orb(enemy, muzzle, now),
            Deferred::ChargeStrike { enemy } => self.resolve_charge(enemy),
            Deferred::WeaponDrop { weapon } => self.drop_weapon(weapon, now, collision),
            Deferred::HideMission { generation } => {
                if generation == self.mission_generation && self.mission_text.is_some() {
                    self.mission_text = None;
                    self.events.push(SimEvent::MissionText(None));
                }
            }
            Deferred::AmmoRespawn => {
                let rule = self.config.arena.pickup_spawn.clone();
                match rule.sample(&mut self.rng, self.player.feet, collision) {
                    Some(position) => self.spawn_pickup(PickupKind::Ammo, position, now),
                    None => {
                        let retry = self.config.arena.pickups.ammo_retry_delay;
                        self.scheduler.schedule(now, retry, Deferred::AmmoRespawn);
                    }
                }
            }
        }
    }

    fn fire_orb(&mut self, enemy: EnemyId, muzzle: usize, now: f64) {
        let Some(source) = self.enemies.get_alive(enemy) else {
            return;
        };
        let stats = self.config.archetypes.get(source.archetype);
        let Some(ranged) = &stats.ranged else {
            return;
        };

        let offset = ranged
            .muzzles
            .get(muzzle)
            .map(|&(x, y, z)| Vec3::new(x, y, z))
            .unwrap_or(Vec3::Y * 2.0);
        let origin = source.position + Quat::from_rotation_y(source.yaw) * offset;
        let (low, high) = ranged.orb.speed_range;
        let speed = if high > low { self.rng.gen_range(low..=high) } else { low };

        self.projectiles
            .spawn_orb(enemy, origin, self.player.torso(), speed, &ranged.orb, now);
    }

    fn resolve_charge(&mut self, id: EnemyId) {
        let feet = self.player.feet;
        let Some(enemy) = self.enemies.get_mut(id).filter(|e| e.is_alive()) else {
            return;
        };
        let stats = self.config.archetypes.get(enemy.archetype);
        let damage = charge_strike(enemy, stats, feet);
        let position = enemy.position;

        self.events.push(SimEvent::ChargeStrike { boss: id, position });
        if let Some(damage) = damage {
            self.damage_player(damage);
        }
    }

    fn drop_weapon(&mut self, weapon: WeaponKind, now: f64, collision: &dyn CollisionQuery) {
        if self.weapons.is_unlocked(weapon) {
            return;
        }
        let rule = self.config.arena.weapon_drop.clone();
        let position = rule
            .sample(&mut self.rng, self.player.feet, collision)
            .unwrap_or_else(|| {
                let (x, y, z) = self.config.arena.weapon_drop_fallback;
                Vec3::new(x, y, z)
            });
        self.spawn_pickup(PickupKind::Weapon(weapon), position, now);
        self.show_mission(format!("A {} has been dropped. Find it!", weapon.label()), now);
    }

    fn show_mission(&mut self, text: String, now: f64) {
        self.mission_generation += 1;
        self.mission_text = Some(text.clone());
        self.events.push(SimEvent::MissionText(Some(text)));
        let duration = self.config.arena.pickups.mission_text_duration;
        self.scheduler.schedule(
            now,
            duration,
            Deferred::HideMission {
                generation: self.mission_generation,
            },
        );
    }

    fn clear_mission(&mut self) {
        self.mission_generation += 1;
        if self.mission_text.take().is_some() {
            self.events.push(SimEvent::MissionText(None));
        }
    }

    fn spawn_pickup(&mut self, kind: PickupKind, position: Vec3, now: f64) {
        let id = self.pickups.spawn(kind, position, now);
        self.events.push(SimEvent::PickupSpawned { id, kind, position });
    }

    /// Top up the roster to the current stage's composition. Calling this
    /// twice in a row spawns nothing the second time.
    pub(crate) fn spawn_wave(&mut self, now: f64, collision: &dyn CollisionQuery) {
        let composition = self.director.composition();
        let rule = self.config.arena.enemy_spawn.clone();

        for (archetype, missing) in composition.delta(&self.enemies) {
            let height = self.config.archetypes.get(archetype).body_height;
            for _ in 0..missing {
                let Some(spot) = rule.sample(&mut self.rng, self.player.feet, collision) else {
                    warn!("No free spawn location for {:?}", archetype);
                    continue;
                };
                let position = Vec3::new(spot.x, height, spot.z);
                let id = self.enemies.spawn(
                    archetype,
                    position,
                    &self.config.archetypes,
                    &mut self.rng,
                    Some(DestroyHook::StageTally),
                );
                self.events.push(SimEvent::EnemySpawned {
                    id,
                    archetype,
                    position,
                });
            }
        }

        let live = self.enemies.iter().filter(|e| e.is_alive()).count() as u32;
        self.director.wave_spawned(live);
        let stage = self.director.stage();
        self.events.push(SimEvent::StageStarted { stage, required: live });

        if self.director.is_supply_stage() {
            self.drop_supplies(now, collision);
        }

        if let Some(weapon) = weapon_drop_for(stage) {
            if !self.weapons.is_unlocked(weapon) && self.director.claim_drop(weapon) {
                let delay = self.config.arena.pickups.weapon_drop_delay;
                self.scheduler.schedule(now, delay, Deferred::WeaponDrop { weapon });
            }
        }
    }

    fn drop_supplies(&mut self, now: f64, collision: &dyn CollisionQuery) {
        let rule = self.config.arena.pickup_spawn.clone();
        let tuning = self.config.arena.pickups.clone();
        let drops = std::iter::repeat(PickupKind::Health)
            .take(tuning.health_kits_per_drop as usize)
            .chain(std::iter::repeat(PickupKind::Ammo).take(tuning.ammo_boxes_per_drop as usize));

        for kind in drops {
            match rule.sample(&mut self.rng, self.player.feet, collision) {
                Some(position) => self.spawn_pickup(kind, position, now),
                None => warn!("No free location for {:?} pickup", kind),
            }
        }
        self.events.push(SimEvent::CleanupEffects);
    }

    fn update_enemies(&mut self, now: f64, dt: f32, collision: &dyn CollisionQuery) {
        let player_feet = self.player.feet;
        let mut actions = Vec::new();

        for enemy in self.enemies.iter_mut() {
            if !enemy.is_alive() {
                continue;
            }
            let ctx = AiContext {
                now,
                dt,
                player_feet,
                stats: self.config.archetypes.get(enemy.archetype),
                collision,
            };
            for action in think(enemy, &ctx, &mut self.rng) {
                actions.push((enemy.id, action));
            }
        }

        for (id, action) in actions {
            self.apply_enemy_action(id, action, now);
        }
    }

    fn apply_enemy_action(&mut self, id: EnemyId, action: EnemyAction, now: f64) {
        let Some(enemy) = self.enemies.get_alive(id) else {
            return;
        };
        let stats = self.config.archetypes.get(enemy.archetype);
        let position = enemy.position;

        match action {
            EnemyAction::Melee { damage } => {
                let blood_at = self.player.feet + Vec3::Y * stats.blood_scale;
                let scale = stats.blood_scale;
                self.damage_player(damage);
                self.events.push(SimEvent::Blood {
                    position: blood_at,
                    scale,
                });
            }
            EnemyAction::RangedVolley => {
                let Some(ranged) = &stats.ranged else {
                    return;
                };
                let muzzles = ranged.muzzles.len().max(1);
                let delays = ranged.volley_delays.clone();
                for (i, delay) in delays.into_iter().enumerate() {
                    let muzzle = i % muzzles;
                    if delay <= 0.0 {
                        self.fire_orb(id, muzzle, now);
                    } else {
                        self.scheduler
                            .schedule(now, delay, Deferred::Orb { enemy: id, muzzle });
                    }
                }
            }
            EnemyAction::Shockwave => {
                let Some(boss) = &stats.boss else {
                    return;
                };
                let center = Vec3::new(position.x, 0.0, position.z);
                let wave = Shockwave::new(
                    self.next_shockwave,
                    id,
                    center,
                    now,
                    stats.damage,
                    boss.shockwave.clone(),
                );
                self.next_shockwave += 1;
                self.shockwaves.push(wave);
                self.events.push(SimEvent::ShockwaveStarted { boss: id, center });
            }
            EnemyAction::ChargeWindup { windup } => {
                self.scheduler
                    .schedule(now, windup, Deferred::ChargeStrike { enemy: id });
                self.events.push(SimEvent::ChargeTelegraph { boss: id });
            }
            EnemyAction::Nudged(offset) => {
                debug!("Enemy {:?} was stuck, nudged by {:?}", id, offset);
            }
        }
    }

    fn update_shockwaves(&mut self, now: f64) {
        let feet = self.player.feet;
        let mut damage = 0.0;
        for wave in &mut self.shockwaves {
            if wave.hits(now, feet) {
                wave.has_hit = true;
                damage += wave.damage;
            }
        }
        self.shockwaves.retain(|wave| !wave.is_finished(now));

        if damage > 0.0 {
            self.damage_player(damage);
        }
    }

    fn update_pickups(&mut self, now: f64) {
        let tuning = self.config.arena.pickups.clone();
        let collected = self
            .pickups
            .collect(self.player.feet, self.player.health.is_full(), now, &tuning);

        for pickup in collected {
            match pickup.kind {
                PickupKind::Health => {
                    let amount = self.player.health.heal(tuning.heal_amount);
                    self.events.push(SimEvent::PlayerHealed { amount });
                }
                PickupKind::Ammo => {
                    let unlocked = self.weapons.unlocked();
                    if !unlocked.is_empty() {
                        let kind = unlocked[self.rng.gen_range(0..unlocked.len())];
                        let amount = self.config.weapons.get(kind).pickup_amount;
                        self.ammo.add_reserve(kind, amount);
                        info!("Picked up {} rounds for {:?}", amount, kind);
                    }
                    self.scheduler
                        .schedule(now, tuning.ammo_respawn_delay, Deferred::AmmoRespawn);
                }
                PickupKind::Weapon(weapon) => {
                    if self.weapons.unlock(weapon) {
                        self.events.push(SimEvent::WeaponUnlocked { weapon });
                    }
                    self.clear_mission();
                    if let Err(e) = self.equip(weapon) {
                        debug!("Auto-equip of {:?} skipped: {}", weapon, e);
                    }
                }
            }
            self.events.push(SimEvent::PickupCollected { kind: pickup.kind });
        }
    }

    pub(crate) fn apply_blast(&mut self, blast: Blast) {
        let outcome = resolve_blast(
            &blast,
            &self.enemies,
            self.player.center(),
            self.config.arena.player.knockback,
        );

        for id in outcome.killed {
            if let Some(enemy) = self.enemies.get_mut(id) {
                enemy.kill();
            }
        }

        self.events.push(SimEvent::Explosion {
            position: blast.center,
            radius: blast.radius,
            source: blast.source,
        });
        if blast.source == BlastSource::Ordnance {
            self.events.push(SimEvent::CameraShake {
                intensity: EXPLOSION_SHAKE,
                duration: SHAKE_DURATION * 3.0,
            });
        }

        if outcome.player_damage > 0.0 {
            self.player.push(outcome.player_impulse);
            self.damage_player(outcome.player_damage);
        }
    }

    fn damage_player(&mut self, amount: f32) {
        if self.player.is_dead() {
            return;
        }
        let taken = self.player.health.take_damage(amount);
        if taken <= 0.0 {
            return;
        }
        self.events.push(SimEvent::PlayerDamaged {
            amount: taken,
            remaining: self.player.health.current,
        });
        if self.player.is_dead() {
            info!("Player died on stage {}", self.director.stage());
            self.events.push(SimEvent::PlayerDied);
        }
    }

    /// Remove dead and culled enemies, run their destroy hooks and check
    /// whether the stage is done.
    fn sweep_dead(&mut self, now: f64) {
        for enemy in self.enemies.iter_mut() {
            if enemy.is_alive() && enemy.position.y < KILL_PLANE {
                enemy.kill();
            }
        }

        for id in self.enemies.dead_ids() {
            let Some(enemy) = self.enemies.remove(id) else {
                continue;
            };
            if enemy.on_destroyed == Some(DestroyHook::StageTally) {
                self.director.record_kill();
            }
            self.events.push(SimEvent::EnemyKilled {
                id,
                archetype: enemy.archetype,
                position: enemy.position,
            });
        }

        if let Some(cleared) = self.director.check_completion(now) {
            self.events.push(SimEvent::StageCleared { stage: cleared });

            let intensity = self.director.shader_intensity();
            if intensity != self.shader_intensity {
                self.shader_intensity = intensity;
                self.events.push(SimEvent::ShaderIntensity(intensity));
            }

            if let Some(banner) = self.director.announcement() {
                self.events.push(SimEvent::StageAnnounced {
                    stage: banner.stage,
                    intro: banner.kind == AnnouncementKind::Intro,
                });
            }
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        let now = self.now();
        let weapon = self.weapons.current();
        let record = self.ammo.record(weapon);

        let banner = self.director.announcement().map(|banner| BannerView {
            text: format!("STAGE {}", banner.stage),
            text_opacity: banner.text_opacity(now),
            backdrop_opacity: banner.backdrop_opacity(now),
        });

        HudSnapshot {
            health: self.player.health.current,
            max_health: self.player.health.maximum,
            weapon,
            magazine: record.current,
            reserve: record.reserve,
            reloading: self.weapons.is_reloading(),
            unlocked: self.weapons.unlocked(),
            stage: self.director.stage(),
            killed: self.director.killed(),
            required: self.director.required(),
            live: self.director.live(),
            banner,
            mission_text: self.mission_text.clone(),
            shader_intensity: self.shader_intensity,
            viewmodel_drop: self.weapons.viewmodel_drop(now, &self.config.weapons.timing),
            player_dead: self.player.is_dead(),
        }
    }

    /// Every simulated object that should be visible this frame.
    pub fn visuals(&self) -> Vec<VisualProxy> {
        let now = self.now();
        let mut proxies = Vec::new();

        for enemy in self.enemies.iter().filter(|e| e.is_alive()) {
            let stats = self.config.archetypes.get(enemy.archetype);
            proxies.push(VisualProxy {
                key: ProxyKey::Enemy(enemy.id, enemy.archetype),
                position: enemy.position,
                yaw: enemy.yaw,
                scale: stats.scale,
                color: enemy.color(stats),
            });
        }

        for tracer in &self.projectiles.tracers {
            proxies.push(VisualProxy {
                key: ProxyKey::Tracer(tracer.id),
                position: tracer.position,
                yaw: tracer.direction.x.atan2(tracer.direction.z),
                scale: 1.0,
                color: (1.0, 0.9, 0.4),
            });
        }

        for orb in &self.projectiles.hostile {
            proxies.push(VisualProxy {
                key: ProxyKey::Orb(orb.id),
                position: orb.position,
                yaw: 0.0,
                scale: 0.5,
                color: (0.6, 0.1, 1.0),
            });
        }

        for grenade in &self.projectiles.ordnance {
            proxies.push(VisualProxy {
                key: ProxyKey::Grenade(grenade.id),
                position: grenade.position,
                yaw: 0.0,
                scale: 0.3,
                color: (0.2, 0.3, 0.2),
            });
        }

        for wave in &self.shockwaves {
            proxies.push(VisualProxy {
                key: ProxyKey::Shockwave(wave.id),
                position: wave.center,
                yaw: 0.0,
                scale: wave.scale(now),
                color: (1.0, 0.3, 0.0),
            });
        }

        for pickup in self.pickups.iter() {
            let color = match pickup.kind {
                PickupKind::Health => (0.1, 0.9, 0.2),
                PickupKind::Ammo => (0.9, 0.8, 0.1),
                PickupKind::Weapon(_) => (0.3, 0.6, 1.0),
            };
            proxies.push(VisualProxy {
                key: ProxyKey::Pickup(pickup.id, pickup.kind),
                position: pickup.position,
                yaw: (now as f32) % std::f32::consts::TAU,
                scale: 1.0,
                color,
            });
        }

        proxies
    }
}
