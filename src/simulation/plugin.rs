//! Simulation plugin - drives [`SimulationWorld`] from Bevy's frame loop.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::collision::{CollisionQuery, OpenField};
use super::input::InputEvent;
use super::world::SimulationWorld;
use crate::core::{GameState, SimEvent, SimulationConfig};
use crate::player::{Knockback, Player, PlayerCamera, CAPSULE_FOOT};

/// Longest step the simulation takes in one frame.
const MAX_STEP: f32 = 0.1;

/// Number-row keys and the weapon slot each selects.
const NUMBER_ROW: [(KeyCode, u8); 4] = [
    (KeyCode::Digit1, 1),
    (KeyCode::Digit2, 2),
    (KeyCode::Digit3, 3),
    (KeyCode::Digit4, 4),
];

/// The active run.
#[derive(Resource)]
pub struct Simulation(pub SimulationWorld);

/// System set ordering for one simulated frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Player pose and commands flow into the world.
    Input,
    Step,
    /// Scene, HUD and audio read the result.
    Present,
}

/// Answers simulation geometry queries from the Rapier scene.
pub struct RapierCollision<'a> {
    context: &'a RapierContext,
    exclude: Option<Entity>,
}

impl<'a> RapierCollision<'a> {
    /// `exclude` is usually the player's own collider.
    pub fn new(context: &'a RapierContext, exclude: Option<Entity>) -> Self {
        Self { context, exclude }
    }

    fn filter(&self) -> QueryFilter<'static> {
        let filter = QueryFilter::default().exclude_sensors();
        match self.exclude {
            Some(entity) => filter.exclude_collider(entity),
            None => filter,
        }
    }
}

impl CollisionQuery for RapierCollision<'_> {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        self.context
            .cast_ray(origin, direction, max_distance, true, self.filter())
            .map(|(_, distance)| distance)
    }

    fn is_blocked(&self, center: Vec3, radius: f32) -> bool {
        self.context
            .intersection_with_shape(center, Quat::IDENTITY, &Collider::ball(radius), self.filter())
            .is_some()
    }
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (SimulationSet::Input, SimulationSet::Step, SimulationSet::Present)
                .chain()
                .run_if(in_state(GameState::InGame))
                .run_if(resource_exists::<Simulation>),
        )
        .add_systems(OnEnter(GameState::InGame), start_run)
        .add_systems(OnEnter(GameState::MainMenu), end_run)
        .add_systems(
            Update,
            (sync_player_pose, forward_input)
                .chain()
                .in_set(SimulationSet::Input),
        )
        .add_systems(Update, advance_simulation.in_set(SimulationSet::Step))
        .add_systems(Update, apply_knockback.in_set(SimulationSet::Present));
    }
}

/// Create a fresh world unless we are resuming from pause.
fn start_run(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    simulation: Option<Res<Simulation>>,
    mut player_query: Query<(&mut Transform, &mut Knockback), With<Player>>,
) {
    if simulation.is_some_and(|sim| !sim.0.is_player_dead()) {
        return;
    }

    let seed = rand::random::<u64>();
    let world = SimulationWorld::new(config.clone(), seed);
    info!("New run started (seed {})", seed);

    // Retry keeps the player entity, so put it back at the start
    let start = world.player().feet + Vec3::Y * CAPSULE_FOOT;
    for (mut transform, mut knockback) in &mut player_query {
        transform.translation = start;
        knockback.velocity = Vec3::ZERO;
    }

    commands.insert_resource(Simulation(world));
}

fn end_run(mut commands: Commands) {
    commands.remove_resource::<Simulation>();
}

/// Copy the player's feet position and view direction into the world.
fn sync_player_pose(
    player_query: Query<&Transform, With<Player>>,
    camera_query: Query<&PlayerCamera>,
    mut simulation: ResMut<Simulation>,
) {
    let Ok(transform) = player_query.get_single() else {
        return;
    };
    let pitch = camera_query.get_single().map(|camera| camera.pitch).unwrap_or(0.0);
    let look = transform.rotation * Quat::from_rotation_x(pitch) * Vec3::NEG_Z;

    simulation
        .0
        .set_player_pose(transform.translation - Vec3::Y * CAPSULE_FOOT, look);
}

/// Translate mouse and keyboard into player commands.
fn forward_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut simulation: ResMut<Simulation>,
) {
    let mut inputs = Vec::new();

    if mouse.just_pressed(MouseButton::Left) {
        inputs.push(InputEvent::TriggerPressed);
    }
    if mouse.just_released(MouseButton::Left) {
        inputs.push(InputEvent::TriggerReleased);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        inputs.push(InputEvent::Reload);
    }
    for (key, slot) in NUMBER_ROW {
        if keyboard.just_pressed(key) {
            inputs.push(InputEvent::SelectSlot(slot));
        }
    }

    for input in inputs {
        if let Err(reason) = simulation.0.on_input(input) {
            debug!("{:?} ignored: {}", input, reason);
        }
    }
}

/// Step the world and publish what happened.
fn advance_simulation(
    time: Res<Time>,
    rapier_context: Query<&RapierContext>,
    player_query: Query<Entity, With<Player>>,
    mut simulation: ResMut<Simulation>,
    mut events: EventWriter<SimEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let dt = time.delta_secs().min(MAX_STEP);
    let exclude = player_query.get_single().ok();
    let world = &mut simulation.0;

    match rapier_context.get_single() {
        Ok(context) => world.simulate(dt, &RapierCollision::new(context, exclude)),
        Err(_) => world.simulate(dt, &OpenField),
    }

    events.send_batch(world.drain_events());

    if world.is_player_dead() {
        info!("Player died on stage {}", world.director().stage());
        next_state.set(GameState::GameOver);
    }
}

/// Hand blast impulses to the character controller.
fn apply_knockback(mut simulation: ResMut<Simulation>, mut player_query: Query<&mut Knockback, With<Player>>) {
    let impulse = simulation.0.take_player_impulse();
    if impulse == Vec3::ZERO {
        return;
    }
    if let Ok(mut knockback) = player_query.get_single_mut() {
        knockback.velocity += impulse;
    }
}
