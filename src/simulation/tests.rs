//! Whole-world scenarios stepped without an engine.

use bevy::prelude::*;

use super::world::Deferred;
use super::*;
use crate::combat::{Blast, BlastSource, Health, WeaponKind};
use crate::core::{CommandRejected, SimEvent, SimulationConfig};
use crate::enemies::{Archetype, DestroyHook, EnemyId};
use crate::stage::{PickupKind, StageDirector, StagePhase};

fn world() -> SimulationWorld {
    SimulationWorld::new(SimulationConfig::default(), 7)
}

/// Step `seconds` of simulation in `dt` slices and return every event.
fn run(world: &mut SimulationWorld, seconds: f32, dt: f32) -> Vec<SimEvent> {
    let steps = (seconds / dt).ceil() as u32;
    let mut events = Vec::new();
    for _ in 0..steps {
        world.simulate(dt, &OpenField);
        events.extend(world.drain_events());
    }
    events
}

fn invulnerable(world: &mut SimulationWorld) {
    world.player.health = Health::new(1.0e9);
}

#[test]
fn intro_banner_then_first_wave() {
    let mut world = world();
    let events = world.drain_events();
    assert_eq!(events, vec![SimEvent::StageAnnounced { stage: 1, intro: true }]);

    let hud = world.hud();
    let banner = hud.banner.unwrap();
    assert_eq!(banner.text, "STAGE 1");
    assert_eq!(banner.text_opacity, 1.0);
    assert_eq!(banner.backdrop_opacity, 1.0);

    let events = run(&mut world, 5.9, 0.05);
    assert!(world.enemies().is_empty());
    assert!(!events.iter().any(|e| matches!(e, SimEvent::StageStarted { .. })));

    let events = run(&mut world, 0.15, 0.05);
    assert!(events.contains(&SimEvent::StageStarted { stage: 1, required: 3 }));
    assert_eq!(world.enemies().count(Archetype::Grunt), 3);
    assert_eq!(world.director().phase(), StagePhase::InProgress);
    for enemy in world.enemies().iter() {
        let offset = enemy.position - world.player().feet;
        assert!(Vec2::new(offset.x, offset.z).length() >= 6.0);
    }
}

#[test]
fn spawning_twice_adds_nothing() {
    let mut world = world();
    world.spawn_wave(0.0, &OpenField);
    world.spawn_wave(0.0, &OpenField);
    assert_eq!(world.enemies().len(), 3);
    assert_eq!(world.director().required(), 3);
}

#[test]
fn clearing_a_stage_announces_the_next() {
    let mut world = world();
    invulnerable(&mut world);
    run(&mut world, 6.05, 0.05);
    assert_eq!(world.director().required(), 3);

    for enemy in world.enemies.iter_mut() {
        enemy.kill();
    }
    let events = run(&mut world, 0.01, 0.01);

    let kills = events
        .iter()
        .filter(|e| matches!(e, SimEvent::EnemyKilled { .. }))
        .count();
    assert_eq!(kills, 3);
    assert!(events.contains(&SimEvent::StageCleared { stage: 1 }));
    assert!(events.contains(&SimEvent::StageAnnounced { stage: 2, intro: false }));
    assert!(world.enemies().is_empty());

    let hud = world.hud();
    assert_eq!(hud.stage, 2);
    let banner = hud.banner.unwrap();
    assert_eq!(banner.text, "STAGE 2");
    assert_eq!(banner.backdrop_opacity, 0.0);

    // Stage 2 spawns 6 grunts once its 3 second banner ends.
    let events = run(&mut world, 3.05, 0.05);
    assert!(events.contains(&SimEvent::StageStarted { stage: 2, required: 6 }));
}

#[test]
fn pistol_with_one_round() {
    let mut world = world();
    world.ammo.set(WeaponKind::Pistol, 1, 0);

    assert_eq!(world.on_input(InputEvent::TriggerPressed), Ok(()));
    assert_eq!(world.ammo().record(WeaponKind::Pistol).current, 0);
    assert_eq!(world.projectiles().tracers.len(), 1);
    world.on_input(InputEvent::TriggerReleased).unwrap();
    world.drain_events();

    run(&mut world, 0.5, 0.05);
    assert_eq!(
        world.on_input(InputEvent::TriggerPressed),
        Err(CommandRejected::EmptyMagazine)
    );
    assert!(world
        .drain_events()
        .contains(&SimEvent::DryFire { weapon: WeaponKind::Pistol }));
    assert_eq!(world.on_input(InputEvent::Reload), Err(CommandRejected::ReserveEmpty));
    assert!(!world.weapons().is_reloading());
}

#[test]
fn locked_and_unknown_slots_are_rejected() {
    let mut world = world();
    assert_eq!(
        world.on_input(InputEvent::SelectSlot(1)),
        Err(CommandRejected::WeaponLocked)
    );
    assert_eq!(
        world.on_input(InputEvent::SelectSlot(9)),
        Err(CommandRejected::UnknownSlot(9))
    );
    assert_eq!(world.weapons().current(), WeaponKind::Pistol);
    assert!(world.drain_events().iter().all(|e| !matches!(e, SimEvent::WeaponSwitched { .. })));
}

#[test]
fn reload_blocks_fire_and_switch_until_done() {
    let mut world = world();
    world.weapons.unlock(WeaponKind::AssaultRifle);
    world.ammo.set(WeaponKind::Pistol, 5, 60);

    world.on_input(InputEvent::Reload).unwrap();
    assert_eq!(world.on_input(InputEvent::TriggerPressed), Err(CommandRejected::Reloading));
    assert_eq!(world.on_input(InputEvent::SelectSlot(1)), Err(CommandRejected::Reloading));
    assert!(world.hud().viewmodel_drop >= 0.0);

    let events = run(&mut world, 1.9, 0.05);
    assert!(events.contains(&SimEvent::ReloadFinished {
        weapon: WeaponKind::Pistol,
        transferred: 15
    }));
    let record = world.ammo().record(WeaponKind::Pistol);
    assert_eq!((record.current, record.reserve), (20, 45));
    assert_eq!(world.hud().viewmodel_drop, 0.0);
}

#[test]
fn twin_uzi_fires_second_barrel_later() {
    let mut world = world();
    world.weapons.unlock(WeaponKind::DualUzi);
    world.on_input(InputEvent::SelectSlot(3)).unwrap();

    world.on_input(InputEvent::TriggerPressed).unwrap();
    let record = *world.ammo().record(WeaponKind::DualUzi);
    assert_eq!((record.current, record.reserved()), (59, 1));
    assert_eq!(world.projectiles().tracers.len(), 1);

    world.simulate(0.03, &OpenField);
    world.on_input(InputEvent::TriggerReleased).unwrap();
    let record = *world.ammo().record(WeaponKind::DualUzi);
    assert_eq!((record.current, record.reserved()), (58, 0));
    assert_eq!(world.projectiles().tracers.len(), 2);
}

#[test]
fn twin_round_is_spent_even_after_switching_away() {
    let mut world = world();
    world.weapons.unlock(WeaponKind::DualUzi);
    world.on_input(InputEvent::SelectSlot(3)).unwrap();

    world.on_input(InputEvent::TriggerPressed).unwrap();
    world.on_input(InputEvent::SelectSlot(2)).unwrap();
    world.simulate(0.03, &OpenField);

    assert_eq!(world.ammo().record(WeaponKind::DualUzi).current, 58);
    assert_eq!(world.projectiles().tracers.len(), 1);
}

#[test]
fn deferred_actions_for_missing_enemies_do_nothing() {
    let mut world = world();
    let now = world.now();
    world.scheduler.schedule(now, 0.0, Deferred::Orb { enemy: EnemyId(99), muzzle: 0 });
    world.scheduler.schedule(now, 0.0, Deferred::ChargeStrike { enemy: EnemyId(99) });

    world.simulate(0.016, &OpenField);
    assert!(world.projectiles().hostile.is_empty());
    assert!(world.scheduler.is_empty());
    assert!(world.player().health.is_full());
}

#[test]
fn grenade_blast_kills_enemies_and_hurts_player() {
    let mut world = world();
    world.set_player_pose(Vec3::new(0.0, 0.0, 4.0), Vec3::NEG_Z);
    let grunt = world.enemies.spawn(
        Archetype::Grunt,
        Vec3::new(3.0, 1.0, 0.0),
        &world.config.archetypes,
        &mut world.rng,
        Some(DestroyHook::StageTally),
    );

    world.apply_blast(Blast {
        center: Vec3::new(0.0, 0.8, 0.0),
        radius: 8.0,
        max_damage: 100.0,
        source: BlastSource::Ordnance,
    });

    // Player centre is 4 units away: half damage.
    assert!((world.player().health.current - 50.0).abs() < 1e-3);
    let impulse = world.take_player_impulse();
    assert!(impulse.z > 0.0);
    assert!(!world.enemies().get(grunt).unwrap().is_alive());

    let events = run(&mut world, 0.01, 0.01);
    assert!(events.iter().any(|e| matches!(e, SimEvent::EnemyKilled { id, .. } if *id == grunt)));
    assert_eq!(world.director().killed(), 1);
}

#[test]
fn hostile_blast_spares_enemies() {
    let mut world = world();
    let grunt = world.enemies.spawn(
        Archetype::Grunt,
        Vec3::new(1.0, 1.0, 0.0),
        &world.config.archetypes,
        &mut world.rng,
        None,
    );
    world.apply_blast(Blast {
        center: Vec3::new(0.0, 0.8, 0.0),
        radius: 5.0,
        max_damage: 10.0,
        source: BlastSource::Hostile,
    });
    assert!(world.enemies().get(grunt).unwrap().is_alive());
    assert!(world.player().health.current < 100.0);
}

#[test]
fn player_death_halts_the_world() {
    let mut world = world();
    world.player.health.current = 5.0;
    world.enemies.spawn(
        Archetype::Grunt,
        Vec3::new(2.0, 1.0, 0.0),
        &world.config.archetypes,
        &mut world.rng,
        None,
    );

    world.simulate(0.016, &OpenField);
    let events = world.drain_events();
    assert!(events.contains(&SimEvent::PlayerDied));
    assert!(world.is_player_dead());
    assert_eq!(world.hud().health, 0.0);

    let frozen = world.now();
    world.simulate(1.0, &OpenField);
    assert_eq!(world.now(), frozen);
    assert_eq!(world.on_input(InputEvent::Reload), Err(CommandRejected::PlayerDown));
}

#[test]
fn culled_enemies_count_toward_the_stage() {
    let mut world = world();
    invulnerable(&mut world);
    run(&mut world, 6.05, 0.05);
    for enemy in world.enemies.iter_mut() {
        enemy.position.y = -100.0;
    }
    let events = run(&mut world, 0.01, 0.01);
    assert!(events.contains(&SimEvent::StageCleared { stage: 1 }));
}

#[test]
fn health_kit_heals_only_when_hurt() {
    let mut world = world();
    world.pickups.spawn(PickupKind::Health, Vec3::new(0.5, 0.5, 0.0), 0.0);

    run(&mut world, 0.1, 0.05);
    assert_eq!(world.pickups.len(), 1);

    world.player.health.take_damage(50.0);
    let events = run(&mut world, 0.05, 0.05);
    assert!(events.contains(&SimEvent::PlayerHealed { amount: 30.0 }));
    assert_eq!(world.player().health.current, 80.0);
    assert!(world.pickups.is_empty());
}

#[test]
fn ammo_box_refills_an_unlocked_weapon_and_respawns() {
    let mut world = world();
    invulnerable(&mut world);
    world.pickups.spawn(PickupKind::Ammo, Vec3::new(0.0, 0.5, 0.5), 0.0);

    let events = run(&mut world, 0.05, 0.05);
    assert!(events.contains(&SimEvent::PickupCollected { kind: PickupKind::Ammo }));
    // Only the pistol is unlocked.
    assert_eq!(world.ammo().record(WeaponKind::Pistol).reserve, 100);
    assert!(world.pickups.is_empty());

    let events = run(&mut world, 45.1, 0.1);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::PickupSpawned { kind: PickupKind::Ammo, .. })));
    assert_eq!(world.pickups.count(PickupKind::Ammo), 1);
}

#[test]
fn stage_ten_drops_the_rifle_once() {
    let mut world = world();
    invulnerable(&mut world);
    let tuning = world.config.arena.stages.clone();
    world.director = StageDirector::new(tuning).with_stage(10);
    world.director.begin(0.0);

    let events = run(&mut world, 6.05, 0.05);
    assert!(events.contains(&SimEvent::CleanupEffects));
    assert_eq!(world.pickups.count(PickupKind::Health), 2);
    assert_eq!(world.pickups.count(PickupKind::Ammo), 4);
    assert_eq!(world.enemies().count(Archetype::Boss), 1);

    let events = run(&mut world, 2.05, 0.05);
    let drop_at = events
        .iter()
        .find_map(|e| match e {
            SimEvent::PickupSpawned {
                kind: PickupKind::Weapon(WeaponKind::AssaultRifle),
                position,
                ..
            } => Some(*position),
            _ => None,
        })
        .unwrap();
    assert!(events.iter().any(|e| matches!(e, SimEvent::MissionText(Some(_)))));
    assert!(world.hud().mission_text.is_some());

    // Same stage spawned again: no second drop.
    world.spawn_wave(world.now(), &OpenField);
    let events = run(&mut world, 2.05, 0.05);
    assert!(!events
        .iter()
        .any(|e| matches!(e, SimEvent::PickupSpawned { kind: PickupKind::Weapon(_), .. })));

    // Mission text hides itself after 10 seconds.
    let events = run(&mut world, 8.0, 0.05);
    assert!(events.contains(&SimEvent::MissionText(None)));

    world.set_player_pose(Vec3::new(drop_at.x, 0.0, drop_at.z), Vec3::NEG_Z);
    let events = run(&mut world, 0.05, 0.05);
    assert!(events.contains(&SimEvent::WeaponUnlocked {
        weapon: WeaponKind::AssaultRifle
    }));
    assert!(events.contains(&SimEvent::WeaponSwitched {
        from: WeaponKind::Pistol,
        to: WeaponKind::AssaultRifle
    }));
    assert_eq!(world.weapons().current(), WeaponKind::AssaultRifle);
}

#[test]
fn visuals_mirror_every_live_object() {
    let mut world = world();
    world.spawn_wave(0.0, &OpenField);
    world.on_input(InputEvent::TriggerPressed).unwrap();
    world.pickups.spawn(PickupKind::Health, Vec3::new(10.0, 0.5, 10.0), 0.0);

    let proxies = world.visuals();
    let enemies = proxies
        .iter()
        .filter(|p| matches!(p.key, ProxyKey::Enemy(_, Archetype::Grunt)))
        .count();
    assert_eq!(enemies, 3);
    assert!(proxies.iter().any(|p| matches!(p.key, ProxyKey::Tracer(_))));
    assert!(proxies
        .iter()
        .any(|p| matches!(p.key, ProxyKey::Pickup(_, PickupKind::Health))));
}
