// gameplay.rs - Connects the GameController to Bevy's schedule
//
// Each frame, in order:
//   Input     keyboard commands, pointer position and clicks
//   Simulate  refresh the DrawList's size and loaded images, then tick
//   Signals   drain the controller's signals into Score and NextState
//
// The controller decides phase changes; GamePhase as a Bevy state only
// follows it, one frame later, so that OnEnter/OnExit can drive the UI.

use bevy::prelude::*;
use bevy::window::{CursorOptions, PrimaryWindow};

use crate::config::Tunables;
use crate::controller::{GameController, GamePhase, GameSignal};
use crate::sprites::{ImageHandles, SpriteLibrary};
use crate::surface::{DrawList, Surface};

pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GamePhase>()
            .init_resource::<GameController>()
            .init_resource::<DrawList>()
            .init_resource::<Tunables>()
            .init_resource::<Score>()
            .configure_sets(
                Update,
                (GameplaySet::Input, GameplaySet::Simulate, GameplaySet::Signals).chain(),
            )
            .add_systems(OnEnter(GamePhase::Settings), clear_draw_list)
            .add_systems(OnEnter(GamePhase::Playing), hide_system_cursor)
            .add_systems(OnExit(GamePhase::Playing), show_system_cursor)
            .add_systems(
                Update,
                (
                    keyboard_commands_system,
                    pointer_system.run_if(in_state(GamePhase::Playing)),
                )
                    .chain()
                    .in_set(GameplaySet::Input),
            )
            .add_systems(
                Update,
                (sync_surface_system, tick_system)
                    .chain()
                    .run_if(in_state(GamePhase::Playing))
                    .in_set(GameplaySet::Simulate),
            )
            .add_systems(Update, apply_game_signals.in_set(GameplaySet::Signals));
    }
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum GameplaySet {
    Input,
    Simulate,
    Signals,
}

/// Hits so far this round, as last reported by the controller.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score(pub u32);

/// The simulation clock: milliseconds since the app started.
pub fn now_ms(time: &Time) -> f64 {
    time.elapsed_secs_f64() * 1000.0
}

/// Enter starts a round from settings and leaves the victory screen.
/// Escape abandons a round in progress.
fn keyboard_commands_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut controller: ResMut<GameController>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        match controller.phase() {
            GamePhase::Settings => controller.start(now_ms(&time)),
            GamePhase::Victory => controller.restart(),
            GamePhase::Playing => {}
        }
    }

    if keyboard.just_pressed(KeyCode::Escape) && controller.phase() == GamePhase::Playing {
        controller.return_to_settings();
    }
}

fn pointer_system(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    sprites: Res<SpriteLibrary>,
    tunables: Res<Tunables>,
    mut controller: ResMut<GameController>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    // Window cursor positions are already top-left origin, like the surface.
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    controller.pointer_moved(cursor);
    if buttons.just_pressed(MouseButton::Left) {
        controller.click(cursor, &sprites, &tunables);
    }
}

/// Keeps the surface the size of the window and tells it which images have
/// finished loading.
fn sync_surface_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    images: Res<Assets<Image>>,
    handles: Res<ImageHandles>,
    mut draw_list: ResMut<DrawList>,
) {
    if let Ok(window) = windows.single() {
        draw_list.resize(Vec2::new(window.width(), window.height()));
    }
    draw_list.set_resolved(handles.resolved(&images));
}

fn tick_system(
    time: Res<Time>,
    sprites: Res<SpriteLibrary>,
    tunables: Res<Tunables>,
    mut controller: ResMut<GameController>,
    mut draw_list: ResMut<DrawList>,
) {
    controller.tick(now_ms(&time), &mut *draw_list, &sprites, &tunables);
}

/// Forwards everything the controller reported this frame. Runs after all
/// systems that may command the controller, including the UI buttons.
pub fn apply_game_signals(
    mut controller: ResMut<GameController>,
    mut score: ResMut<Score>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    for signal in controller.take_signals() {
        match signal {
            GameSignal::ScoreChanged(value) => score.0 = value,
            GameSignal::PhaseChanged(phase) => {
                info!("Phase -> {:?}", phase);
                next_phase.set(phase);
            }
        }
    }
}

fn clear_draw_list(mut draw_list: ResMut<DrawList>) {
    draw_list.clear();
}

// The crosshair is drawn by the game while playing.
fn hide_system_cursor(mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    for mut cursor in &mut cursors {
        cursor.visible = false;
    }
}

fn show_system_cursor(mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    for mut cursor in &mut cursors {
        cursor.visible = true;
    }
}
