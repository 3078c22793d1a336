use bevy::prelude::*;

use click_shooter::{gameplay, render, settings, sprites, ui};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Click Shooter".into(),
                    ..default()
                }),
                ..default()
            }),
            settings::SettingsPlugin,
            sprites::SpriteLibraryPlugin,
            gameplay::GameplayPlugin,
            render::RenderPlugin,
            ui::UiPlugin,
        ))
        .run();
}
