//! In-game HUD - health, ammo, weapon slots, stage progress and banners.

use bevy::prelude::*;

use crate::combat::WeaponKind;
use crate::core::GameState;
use crate::simulation::{HudSnapshot, Simulation, SimulationSet};

/// This frame's HUD snapshot, shared by the update systems below.
#[derive(Resource, Default)]
pub struct HudState(pub Option<HudSnapshot>);

/// Marker for HUD root entities.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

#[derive(Component)]
pub struct AmmoText;

#[derive(Component)]
pub struct WeaponText;

/// One number-row slot indicator.
#[derive(Component)]
pub struct WeaponSlot(pub WeaponKind);

#[derive(Component)]
pub struct StageText;

/// Full-screen dark layer behind the intro banner.
#[derive(Component)]
pub struct BannerBackdrop;

#[derive(Component)]
pub struct BannerText;

#[derive(Component)]
pub struct MissionText;

const SLOT_IDLE: Color = Color::srgba(0.1, 0.1, 0.1, 0.6);
const SLOT_EQUIPPED: Color = Color::srgba(0.8, 0.7, 0.3, 0.8);
const SLOT_LOCKED: Color = Color::srgba(0.1, 0.1, 0.1, 0.15);

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.init_resource::<HudState>()
        .add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (
                snapshot_hud,
                (
                    update_health_bar,
                    update_ammo_text,
                    update_weapon_slots,
                    update_stage_text,
                    update_banner,
                    update_mission_text,
                ),
            )
                .chain()
                .in_set(SimulationSet::Present),
        );
}

fn label(text: impl Into<String>, size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Banner backdrop goes first so everything else draws over it
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        BannerBackdrop,
        HudRoot,
    ));

    // Bottom row: health on the left, ammo on the right
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::End,
                padding: UiRect::all(Val::Px(20.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            spawn_health_bar(parent);

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::End,
                    ..default()
                })
                .with_children(|column| {
                    column
                        .spawn(Node {
                            flex_direction: FlexDirection::Row,
                            margin: UiRect::bottom(Val::Px(6.0)),
                            ..default()
                        })
                        .with_children(|row| {
                            for kind in WeaponKind::ALL {
                                row.spawn((
                                    Node {
                                        width: Val::Px(26.0),
                                        height: Val::Px(26.0),
                                        margin: UiRect::left(Val::Px(4.0)),
                                        justify_content: JustifyContent::Center,
                                        align_items: AlignItems::Center,
                                        ..default()
                                    },
                                    BackgroundColor(SLOT_LOCKED),
                                    WeaponSlot(kind),
                                ))
                                .with_children(|slot| {
                                    slot.spawn(label(kind.slot().to_string(), 14.0, Color::srgb(0.9, 0.9, 0.9)));
                                });
                            }
                        });
                    column.spawn((label("", 16.0, Color::srgb(0.8, 0.8, 0.8)), WeaponText));
                    column.spawn((label("", 32.0, Color::srgb(0.95, 0.9, 0.8)), AmmoText));
                });
        });

    // Top-left stage progress
    commands.spawn((
        label("", 20.0, Color::srgb(0.85, 0.85, 0.85)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(20.0),
            top: Val::Px(20.0),
            ..default()
        },
        StageText,
        HudRoot,
    ));

    // Centre column: banner, crosshair, mission text
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                label("", 72.0, Color::srgba(0.9, 0.2, 0.15, 0.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
                BannerText,
            ));

            // Crosshair dot
            parent.spawn((
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            ));

            parent.spawn((
                label("", 20.0, Color::srgb(0.9, 0.85, 0.4)),
                Node {
                    margin: UiRect::top(Val::Px(40.0)),
                    ..default()
                },
                MissionText,
            ));
        });
}

fn spawn_health_bar(parent: &mut ChildBuilder) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|bar_parent| {
            bar_parent.spawn((
                label("Health", 14.0, Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(200.0),
                        height: Val::Px(14.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.8, 0.2, 0.2)),
                        HealthBar,
                    ));
                });
        });
}

fn snapshot_hud(simulation: Res<Simulation>, mut state: ResMut<HudState>) {
    state.0 = Some(simulation.0.hud());
}

/// Update health bar based on player health.
fn update_health_bar(state: Res<HudState>, mut bar_query: Query<&mut Node, With<HealthBar>>) {
    let Some(hud) = &state.0 else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    let fraction = if hud.max_health > 0.0 {
        (hud.health / hud.max_health).clamp(0.0, 1.0)
    } else {
        0.0
    };
    bar.width = Val::Percent(fraction * 100.0);
}

/// Magazine and reserve, or the reload notice.
pub fn ammo_line(hud: &HudSnapshot) -> String {
    if hud.reloading {
        "RELOADING".to_string()
    } else {
        format!("{} / {}", hud.magazine, hud.reserve)
    }
}

fn update_ammo_text(
    state: Res<HudState>,
    mut ammo_query: Query<&mut Text, (With<AmmoText>, Without<WeaponText>)>,
    mut weapon_query: Query<&mut Text, (With<WeaponText>, Without<AmmoText>)>,
) {
    let Some(hud) = &state.0 else {
        return;
    };
    if let Ok(mut text) = ammo_query.get_single_mut() {
        **text = ammo_line(hud);
    }
    if let Ok(mut text) = weapon_query.get_single_mut() {
        **text = hud.weapon.label().to_string();
    }
}

fn update_weapon_slots(state: Res<HudState>, mut slot_query: Query<(&WeaponSlot, &mut BackgroundColor)>) {
    let Some(hud) = &state.0 else {
        return;
    };
    for (slot, mut background) in &mut slot_query {
        let color = if slot.0 == hud.weapon {
            SLOT_EQUIPPED
        } else if hud.unlocked.contains(&slot.0) {
            SLOT_IDLE
        } else {
            SLOT_LOCKED
        };
        *background = BackgroundColor(color);
    }
}

/// Stage number and kill tally.
pub fn stage_line(hud: &HudSnapshot) -> String {
    if hud.required == 0 {
        format!("Stage {}", hud.stage)
    } else {
        format!("Stage {}   Kills {}/{}", hud.stage, hud.killed, hud.required)
    }
}

fn update_stage_text(state: Res<HudState>, mut text_query: Query<&mut Text, With<StageText>>) {
    let Some(hud) = &state.0 else {
        return;
    };
    if let Ok(mut text) = text_query.get_single_mut() {
        **text = stage_line(hud);
    }
}

fn update_banner(
    state: Res<HudState>,
    mut text_query: Query<(&mut Text, &mut TextColor), With<BannerText>>,
    mut backdrop_query: Query<&mut BackgroundColor, With<BannerBackdrop>>,
) {
    let Some(hud) = &state.0 else {
        return;
    };
    let (text, text_alpha, backdrop_alpha) = match &hud.banner {
        Some(banner) => (banner.text.clone(), banner.text_opacity, banner.backdrop_opacity),
        None => (String::new(), 0.0, 0.0),
    };

    if let Ok((mut banner_text, mut color)) = text_query.get_single_mut() {
        **banner_text = text;
        color.0.set_alpha(text_alpha);
    }
    if let Ok(mut backdrop) = backdrop_query.get_single_mut() {
        backdrop.0.set_alpha(backdrop_alpha);
    }
}

fn update_mission_text(state: Res<HudState>, mut text_query: Query<&mut Text, With<MissionText>>) {
    let Some(hud) = &state.0 else {
        return;
    };
    if let Ok(mut text) = text_query.get_single_mut() {
        **text = hud.mission_text.clone().unwrap_or_default();
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> HudSnapshot {
        HudSnapshot {
            health: 80.0,
            max_health: 100.0,
            weapon: WeaponKind::Pistol,
            magazine: 12,
            reserve: 60,
            reloading: false,
            unlocked: vec![WeaponKind::Pistol],
            stage: 3,
            killed: 4,
            required: 9,
            live: 5,
            banner: None,
            mission_text: None,
            shader_intensity: 0.0,
            viewmodel_drop: 0.0,
            player_dead: false,
        }
    }

    #[test]
    fn ammo_line_shows_reload() {
        let mut hud = snapshot();
        assert_eq!(ammo_line(&hud), "12 / 60");
        hud.reloading = true;
        assert_eq!(ammo_line(&hud), "RELOADING");
    }

    #[test]
    fn stage_line_hides_tally_before_the_wave() {
        let mut hud = snapshot();
        assert_eq!(stage_line(&hud), "Stage 3   Kills 4/9");
        hud.required = 0;
        assert_eq!(stage_line(&hud), "Stage 3");
    }
}
