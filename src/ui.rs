// ui.rs - Settings panel, score HUD and victory screen
//
// Each panel is spawned on entering its phase and tagged with DespawnOnExit,
// so leaving the phase removes it. Buttons only command the GameController
// or change Tunables; the phase itself changes when the gameplay plugin
// forwards the controller's signals.
//
//   Settings  tunable rows with -/+ buttons, Start button, key hints
//   Playing   score in the top-left corner
//   Victory   final score and a Restart button over the frozen field

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::config::Tunables;
use crate::controller::{GameController, GamePhase};
use crate::gameplay::{now_ms, GameplaySet, Score};
use crate::settings::save_to_disk;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GamePhase::Settings), spawn_settings_panel)
            .add_systems(OnEnter(GamePhase::Playing), spawn_score_hud)
            .add_systems(OnEnter(GamePhase::Victory), spawn_victory_panel)
            .add_systems(
                Update,
                (handle_tunable_buttons, update_tunable_labels, handle_start_button)
                    .chain()
                    .run_if(in_state(GamePhase::Settings))
                    .in_set(GameplaySet::Input),
            )
            .add_systems(
                Update,
                handle_restart_button
                    .run_if(in_state(GamePhase::Victory))
                    .in_set(GameplaySet::Input),
            )
            .add_systems(
                Update,
                update_score_hud
                    .run_if(in_state(GamePhase::Playing))
                    .after(GameplaySet::Signals),
            );
    }
}

pub const MIN_SPEED_SETTING: f32 = 1.0;
pub const MAX_SPEED_SETTING: f32 = 20.0;
pub const SPEED_STEP: f32 = 1.0;
pub const MIN_FRAME_SETTING: u32 = 10;
pub const MAX_FRAME_SETTING: u32 = 1000;
pub const FRAME_STEP: u32 = 10;

const PANEL_COLOR: Color = Color::srgba(0.05, 0.05, 0.1, 0.92);
const BUTTON_COLOR: Color = Color::srgb(0.2, 0.3, 0.5);
const BUTTON_BORDER: Color = Color::srgb(0.4, 0.5, 0.7);
const START_COLOR: Color = Color::srgb(0.5, 0.1, 0.1);
const START_BORDER: Color = Color::srgb(0.8, 0.3, 0.3);
const HINT_COLOR: Color = Color::srgb(0.7, 0.7, 0.7);

/// One press of a -/+ button on the settings panel.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TunableStep {
    SpeedDown,
    SpeedUp,
    FrameDown,
    FrameUp,
}

impl TunableStep {
    /// The tunables after this step, kept inside the panel's range.
    pub fn apply(self, tunables: Tunables) -> Tunables {
        let mut next = tunables;
        match self {
            TunableStep::SpeedDown => next.enemy_speed -= SPEED_STEP,
            TunableStep::SpeedUp => next.enemy_speed += SPEED_STEP,
            TunableStep::FrameDown => {
                next.anim_frame_ms = next.anim_frame_ms.saturating_sub(FRAME_STEP);
            }
            TunableStep::FrameUp => {
                next.anim_frame_ms = next.anim_frame_ms.saturating_add(FRAME_STEP);
            }
        }
        next.enemy_speed = next.enemy_speed.clamp(MIN_SPEED_SETTING, MAX_SPEED_SETTING);
        next.anim_frame_ms = next.anim_frame_ms.clamp(MIN_FRAME_SETTING, MAX_FRAME_SETTING);
        next.sanitized()
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
enum TunableLabel {
    Speed,
    FrameDuration,
}

impl TunableLabel {
    fn text(self, tunables: &Tunables) -> String {
        match self {
            TunableLabel::Speed => format!("Enemy speed: {}", tunables.enemy_speed),
            TunableLabel::FrameDuration => format!("Frame duration: {} ms", tunables.anim_frame_ms),
        }
    }
}

#[derive(Component)]
struct StartButton;

#[derive(Component)]
struct RestartButton;

#[derive(Component)]
struct ScoreText;

fn spawn_button(
    parent: &mut ChildSpawnerCommands,
    label: &str,
    width: f32,
    colors: (Color, Color),
    marker: impl Bundle,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(width),
                height: Val::Px(50.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(3.0)),
                ..default()
            },
            BackgroundColor(colors.0),
            BorderColor::all(colors.1),
            marker,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn spawn_tunable_row(
    parent: &mut ChildSpawnerCommands,
    tunables: &Tunables,
    label: TunableLabel,
    down: TunableStep,
    up: TunableStep,
) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            column_gap: Val::Px(16.0),
            ..default()
        })
        .with_children(|row| {
            spawn_button(row, "-", 50.0, (BUTTON_COLOR, BUTTON_BORDER), down);
            row.spawn((
                Node {
                    width: Val::Px(320.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                Text::new(label.text(tunables)),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                TextLayout::new_with_justify(Justify::Center),
                label,
            ));
            spawn_button(row, "+", 50.0, (BUTTON_COLOR, BUTTON_BORDER), up);
        });
}

fn spawn_settings_panel(mut commands: Commands, tunables: Res<Tunables>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(24.0),
                ..default()
            },
            BackgroundColor(PANEL_COLOR),
            DespawnOnExit(GamePhase::Settings),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Click Shooter"),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            spawn_tunable_row(
                parent,
                &tunables,
                TunableLabel::Speed,
                TunableStep::SpeedDown,
                TunableStep::SpeedUp,
            );
            spawn_tunable_row(
                parent,
                &tunables,
                TunableLabel::FrameDuration,
                TunableStep::FrameDown,
                TunableStep::FrameUp,
            );

            spawn_button(parent, "Start", 200.0, (START_COLOR, START_BORDER), StartButton);

            parent.spawn((
                Text::new("Enter: start    R: reload images    Esc (in game): back here"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(HINT_COLOR),
            ));
        });
}

fn handle_tunable_buttons(
    query: Query<(&Interaction, &TunableStep), Changed<Interaction>>,
    mut tunables: ResMut<Tunables>,
) {
    for (interaction, step) in &query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let next = step.apply(*tunables);
        if next != *tunables {
            *tunables = next;
            info!("Tunables changed: {:?}", next);
            save_to_disk(&next);
        }
    }
}

fn update_tunable_labels(tunables: Res<Tunables>, mut labels: Query<(&TunableLabel, &mut Text)>) {
    if !tunables.is_changed() {
        return;
    }
    for (label, mut text) in &mut labels {
        text.0 = label.text(&tunables);
    }
}

fn handle_start_button(
    query: Query<&Interaction, (Changed<Interaction>, With<StartButton>)>,
    time: Res<Time>,
    mut controller: ResMut<GameController>,
) {
    for interaction in &query {
        if *interaction == Interaction::Pressed {
            controller.start(now_ms(&time));
        }
    }
}

fn spawn_score_hud(mut commands: Commands, score: Res<Score>, controller: Res<GameController>) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(16.0),
            ..default()
        },
        Text::new(score_text(score.0, controller.config().win_score)),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::WHITE),
        ScoreText,
        DespawnOnExit(GamePhase::Playing),
    ));
}

fn score_text(score: u32, win_score: u32) -> String {
    format!("Score: {} / {}", score, win_score)
}

fn update_score_hud(
    score: Res<Score>,
    controller: Res<GameController>,
    mut texts: Query<&mut Text, With<ScoreText>>,
) {
    if !score.is_changed() {
        return;
    }
    for mut text in &mut texts {
        text.0 = score_text(score.0, controller.config().win_score);
    }
}

fn spawn_victory_panel(mut commands: Commands, score: Res<Score>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(40.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
            DespawnOnExit(GamePhase::Victory),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("VICTORY!"),
                TextFont {
                    font_size: 96.0,
                    ..default()
                },
                TextColor(Color::srgb(0.2, 0.8, 0.2)),
            ));
            parent.spawn((
                Text::new(format!("{} hits", score.0)),
                TextFont {
                    font_size: 36.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            spawn_button(parent, "Restart", 250.0, (BUTTON_COLOR, BUTTON_BORDER), RestartButton);
        });
}

fn handle_restart_button(
    query: Query<&Interaction, (Changed<Interaction>, With<RestartButton>)>,
    mut controller: ResMut<GameController>,
) {
    for interaction in &query {
        if *interaction == Interaction::Pressed {
            controller.restart();
        }
    }
}
