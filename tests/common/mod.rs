//! Headless app for plugin-level tests.
//!
//! `MinimalPlugins` gives the schedule and a clock, `StatesPlugin` the phase
//! state. Input and window resources are inserted by hand so tests can press
//! keys without a real window, and the clock advances a fixed 100 ms per
//! update so spawn timing is predictable.

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use bevy::window::PrimaryWindow;

use click_shooter::gameplay::GameplayPlugin;
use click_shooter::sprites::{ImageHandles, SpriteLibrary};

pub const STEP_MS: u64 = 100;

pub fn app_headless() -> App {
    let mut app = App::new();

    app.add_plugins((MinimalPlugins, StatesPlugin, AssetPlugin::default()))
        .init_asset::<Image>()
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<ButtonInput<MouseButton>>()
        .init_resource::<SpriteLibrary>()
        .init_resource::<ImageHandles>()
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
            STEP_MS,
        )))
        .add_plugins(GameplayPlugin);

    app.world_mut().spawn((Window::default(), PrimaryWindow));
    app
}

/// Presses `key` for exactly one update.
pub fn tap(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
    app.update();

    let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keyboard.release(key);
    keyboard.clear();
}
