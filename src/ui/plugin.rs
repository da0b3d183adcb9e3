//! UI plugin - menus, HUD, and interface elements.

use bevy::prelude::*;

use super::hud;
use crate::core::GameState;
use crate::simulation::Simulation;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app.add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
            .add_systems(OnExit(GameState::MainMenu), despawn_screen::<MainMenuUi>)
            .add_systems(OnEnter(GameState::Paused), setup_pause_menu)
            .add_systems(OnExit(GameState::Paused), despawn_screen::<PauseMenuUi>)
            .add_systems(OnEnter(GameState::GameOver), setup_game_over)
            .add_systems(OnExit(GameState::GameOver), despawn_screen::<GameOverUi>)
            .add_systems(
                Update,
                menu_button_input.run_if(
                    in_state(GameState::MainMenu)
                        .or(in_state(GameState::Paused))
                        .or(in_state(GameState::GameOver)),
                ),
            );
    }
}

/// Title screen entities, camera included.
#[derive(Component)]
struct MainMenuUi;

#[derive(Component)]
struct PauseMenuUi;

/// Game over overlay. Drawn over the frozen arena, so it needs no camera.
#[derive(Component)]
struct GameOverUi;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
enum MenuButton {
    NewGame,
    Quit,
    Resume,
    MainMenu,
    Retry,
}

impl MenuButton {
    fn label(self) -> &'static str {
        match self {
            MenuButton::NewGame => "New Game",
            MenuButton::Quit => "Quit",
            MenuButton::Resume => "Resume",
            MenuButton::MainMenu => "Main Menu",
            MenuButton::Retry => "Retry",
        }
    }

    /// State a press leads to. `None` quits the app.
    fn target(self) -> Option<GameState> {
        match self {
            MenuButton::NewGame | MenuButton::Resume | MenuButton::Retry => Some(GameState::InGame),
            MenuButton::MainMenu => Some(GameState::MainMenu),
            MenuButton::Quit => None,
        }
    }
}

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.15, 0.2);
const BUTTON_HOVERED: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);

/// Full-screen centred column.
fn overlay(background: Color) -> (Node, BackgroundColor) {
    (
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(background),
    )
}

fn heading(text: impl Into<String>, size: f32, color: Color, gap: f32) -> (Text, TextFont, TextColor, Node) {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
        Node {
            margin: UiRect::bottom(Val::Px(gap)),
            ..default()
        },
    )
}

fn spawn_menu_button(parent: &mut ChildBuilder, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            button,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(button.label()),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

fn setup_main_menu(mut commands: Commands) {
    // No arena camera exists on the title screen
    commands.spawn((Camera2d, MainMenuUi));

    commands
        .spawn((overlay(Color::srgb(0.05, 0.05, 0.08)), MainMenuUi))
        .with_children(|parent| {
            parent.spawn(heading("STAGE SHOOTER", 80.0, Color::srgb(0.85, 0.3, 0.2), 50.0));
            parent.spawn(heading("Survive the waves", 24.0, Color::srgb(0.5, 0.5, 0.55), 60.0));
            spawn_menu_button(parent, MenuButton::NewGame);
            spawn_menu_button(parent, MenuButton::Quit);
        });
}

fn setup_pause_menu(mut commands: Commands, simulation: Option<Res<Simulation>>) {
    let stage = simulation
        .map(|sim| format!("Stage {}", sim.0.director().stage()))
        .unwrap_or_default();

    commands
        .spawn((overlay(Color::srgba(0.0, 0.0, 0.0, 0.7)), PauseMenuUi))
        .with_children(|parent| {
            parent.spawn(heading("PAUSED", 48.0, Color::srgb(0.8, 0.8, 0.85), 10.0));
            parent.spawn(heading(stage, 20.0, Color::srgb(0.6, 0.6, 0.65), 30.0));
            spawn_menu_button(parent, MenuButton::Resume);
            spawn_menu_button(parent, MenuButton::MainMenu);
        });
}

/// Summary line for the game over screen.
fn run_summary(stage: u32, killed: u32) -> String {
    format!("Fell on stage {} after {} kills this wave", stage, killed)
}

fn setup_game_over(mut commands: Commands, simulation: Option<Res<Simulation>>) {
    let summary = simulation
        .map(|sim| run_summary(sim.0.director().stage(), sim.0.director().killed()))
        .unwrap_or_default();

    commands
        .spawn((overlay(Color::srgba(0.1, 0.0, 0.0, 0.9)), GameOverUi))
        .with_children(|parent| {
            parent.spawn(heading("YOU DIED", 72.0, Color::srgb(0.8, 0.2, 0.2), 20.0));
            parent.spawn(heading(summary, 22.0, Color::srgb(0.7, 0.6, 0.6), 40.0));
            spawn_menu_button(parent, MenuButton::Retry);
            spawn_menu_button(parent, MenuButton::MainMenu);
        });
}

/// Button presses on every menu screen.
fn menu_button_input(
    mut interaction_query: Query<(&Interaction, &MenuButton, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut background) in &mut interaction_query {
        let color = match interaction {
            Interaction::Pressed => {
                match button.target() {
                    Some(state) => next_state.set(state),
                    None => {
                        exit.send(AppExit::Success);
                    }
                }
                BUTTON_PRESSED
            }
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_IDLE,
        };
        *background = BackgroundColor(color);
    }
}

fn despawn_screen<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
