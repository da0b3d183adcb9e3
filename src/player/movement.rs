//! First-person player movement and camera control.

use bevy::core_pipeline::core_3d::Camera3dDepthLoadOp;
use bevy::input::mouse::MouseMotion;
use bevy::pbr::FogFalloff;
use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use bevy::render::view::RenderLayers;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::GameState;
use crate::rendering::{PostProcessSettings, VisualConfig};
use crate::simulation::SimulationSet;

/// The player's camera.
#[derive(Component)]
pub struct PlayerCamera {
    /// Current pitch angle in radians (looking up/down)
    pub pitch: f32,
    /// Camera height above the capsule centre
    pub eye_offset: f32,
}

/// Marker for the weapon-only camera (renders viewmodel on separate layer).
#[derive(Component)]
pub struct WeaponCamera;

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), grab_cursor)
        .add_systems(OnExit(GameState::InGame), release_cursor)
        .add_systems(
            Update,
            (mouse_look, player_movement)
                .chain()
                .before(SimulationSet::Input)
                .run_if(in_state(GameState::InGame)),
        );
}

/// Grab and hide cursor when entering gameplay.
fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor when leaving gameplay.
fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Handle mouse movement for looking around.
///
/// Rotates the player entity horizontally (yaw) and the camera vertically (pitch).
/// The camera is a child of the player, so horizontal rotation affects both.
pub fn mouse_look(
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<PlayerConfig>,
    mut player_query: Query<&mut Transform, With<Player>>,
    mut camera_query: Query<(&mut Transform, &mut PlayerCamera), Without<Player>>,
) {
    let mut delta = Vec2::ZERO;
    for event in mouse_motion.read() {
        delta += event.delta;
    }

    if delta == Vec2::ZERO {
        return;
    }

    let Ok(mut player_transform) = player_query.get_single_mut() else {
        return;
    };
    let Ok((mut camera_transform, mut camera)) = camera_query.get_single_mut() else {
        return;
    };

    let sensitivity = config.mouse_sensitivity * 0.001;
    let y_invert = if config.invert_y { -1.0 } else { 1.0 };

    player_transform.rotate_y(-delta.x * sensitivity);

    // Clamped to prevent flipping
    camera.pitch -= delta.y * sensitivity * y_invert;
    camera.pitch = camera.pitch.clamp(-1.4, 1.4);

    camera_transform.rotation = Quat::from_rotation_x(camera.pitch);
}

/// Handle WASD movement, jumping and blast knockback.
///
/// Uses Rapier's KinematicCharacterController for collision detection.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    rapier_context: Query<&RapierContext>,
    mut player_query: Query<
        (
            Entity,
            &Transform,
            &mut MovementState,
            &mut Knockback,
            &mut KinematicCharacterController,
        ),
        With<Player>,
    >,
) {
    let Ok((player_entity, transform, mut movement_state, mut knockback, mut controller)) =
        player_query.get_single_mut()
    else {
        return;
    };
    let dt = time.delta_secs();

    // Ground check by raycast just below the capsule bottom
    let is_grounded = if let Ok(context) = rapier_context.get_single() {
        let ray_origin = transform.translation - Vec3::Y * (CAPSULE_FOOT - 0.05);
        context
            .cast_ray(
                ray_origin,
                Vec3::NEG_Y,
                0.15,
                true,
                QueryFilter::default().exclude_collider(player_entity),
            )
            .is_some()
    } else {
        true
    };
    movement_state.is_grounded = is_grounded;

    let hop = knockback.take_hop();
    movement_state.vertical_velocity = vertical_velocity(
        movement_state.vertical_velocity + hop,
        is_grounded,
        keyboard.just_pressed(KeyCode::Space),
        &config,
        dt,
    );

    // Only the horizontal part of the facing steers movement
    let yaw = transform.rotation.to_euler(EulerRot::YXZ).0;
    let movement = Quat::from_rotation_y(yaw) * wish_direction(&keyboard);

    let speed = if keyboard.pressed(KeyCode::ShiftLeft) {
        config.move_speed * config.sprint_multiplier
    } else {
        config.move_speed
    };

    let push = knockback.decay(config.knockback_damping, dt);
    let horizontal = (movement * speed + push) * dt;
    let vertical = Vec3::new(0.0, movement_state.vertical_velocity * dt, 0.0);

    controller.translation = Some(horizontal + vertical);
}

/// WASD as a unit vector in the player's local frame.
fn wish_direction(keyboard: &ButtonInput<KeyCode>) -> Vec3 {
    let axis = |negative: KeyCode, positive: KeyCode| {
        keyboard.pressed(positive) as i8 as f32 - keyboard.pressed(negative) as i8 as f32
    };
    Vec3::new(axis(KeyCode::KeyA, KeyCode::KeyD), 0.0, axis(KeyCode::KeyW, KeyCode::KeyS)).normalize_or_zero()
}

/// Next vertical speed. Landing zeroes it and only a grounded player can jump.
fn vertical_velocity(current: f32, grounded: bool, jump: bool, config: &PlayerConfig, dt: f32) -> f32 {
    if grounded && current <= 0.0 {
        if jump {
            config.jump_force
        } else {
            0.0
        }
    } else {
        current - config.gravity * dt
    }
}

/// Spawn the player entity with its cameras. `position` is the capsule centre.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec3,
    eye_height: f32,
    visual_config: &VisualConfig,
) -> Entity {
    let player = commands
        .spawn((
            Player,
            MovementState::default(),
            Knockback::default(),
            Transform::from_translation(position),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
        ))
        .id();

    let fog_density = if visual_config.fog_enabled {
        visual_config.fog_density
    } else {
        0.0
    };
    let eye_offset = eye_height - CAPSULE_FOOT;

    commands.entity(player).with_children(|parent| {
        parent
            .spawn((
                Camera3d::default(),
                Camera {
                    clear_color: ClearColorConfig::Custom(visual_config.clear_color()),
                    ..default()
                },
                DistanceFog {
                    color: visual_config.fog_color(),
                    falloff: FogFalloff::ExponentialSquared { density: fog_density },
                    directional_light_color: Color::NONE,
                    directional_light_exponent: 8.0,
                },
                PostProcessSettings::from_config(visual_config),
                PlayerCamera {
                    pitch: 0.0,
                    eye_offset,
                },
                Transform::from_xyz(0.0, eye_offset, 0.0),
                RenderLayers::layer(0),
            ))
            .with_children(|camera_parent| {
                // Weapon camera renders the viewmodel on layer 1
                camera_parent
                    .spawn((
                        WeaponCamera,
                        Camera3d {
                            depth_load_op: Camera3dDepthLoadOp::Clear(0.0),
                            ..default()
                        },
                        Camera {
                            order: 1,
                            clear_color: ClearColorConfig::None,
                            ..default()
                        },
                        Transform::default(),
                        RenderLayers::layer(1),
                    ))
                    .with_children(|weapon_camera| {
                        weapon_camera.spawn((
                            PointLight {
                                color: Color::srgb(1.0, 0.9, 0.8),
                                intensity: 100000.0,
                                range: 10.0,
                                shadows_enabled: false,
                                ..default()
                            },
                            Transform::from_xyz(0.0, 0.5, 0.5),
                            RenderLayers::layer(1),
                        ));
                    });
            });
    });

    player
}
