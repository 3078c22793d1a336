// settings.rs - Loads and saves the player's tunables
//
// The two tunables (enemy speed, animation frame duration) are written as RON
// to the per-user config directory whenever the settings panel changes them,
// and read back once before the first frame. A missing or broken file is not
// an error: the game logs it and starts from the defaults.

use bevy::prelude::*;

use crate::config::Tunables;

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_tunables);
    }
}

const APP_DIR: &str = "click-shooter";
const FILE_NAME: &str = "settings.ron";

/// Parses a settings file. Missing fields take their default; out-of-range
/// values are clamped.
pub fn parse_tunables(contents: &str) -> Result<Tunables, ron::error::SpannedError> {
    ron::from_str::<Tunables>(contents).map(Tunables::sanitized)
}

pub fn serialize_tunables(tunables: &Tunables) -> Result<String, ron::Error> {
    ron::ser::to_string_pretty(tunables, ron::ser::PrettyConfig::default())
}

#[cfg(not(target_arch = "wasm32"))]
mod storage {
    use std::path::PathBuf;

    use bevy::prelude::*;

    use super::{parse_tunables, serialize_tunables, APP_DIR, FILE_NAME};
    use crate::config::Tunables;

    /// `<config dir>/click-shooter/settings.ron`, or `settings.ron` in the
    /// working directory on platforms without a config dir.
    fn settings_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join(APP_DIR).join(FILE_NAME),
            None => PathBuf::from(FILE_NAME),
        }
    }

    pub fn load() -> Option<Tunables> {
        let path = settings_path();

        if !path.exists() {
            info!("No settings file at {:?}. Using defaults.", path);
            return None;
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => match parse_tunables(&contents) {
                Ok(tunables) => {
                    info!("Loaded settings from {:?}: {:?}", path, tunables);
                    Some(tunables)
                }
                Err(e) => {
                    error!("Failed to parse settings file: {}. Using defaults.", e);
                    None
                }
            },
            Err(e) => {
                error!("Failed to read settings file: {}. Using defaults.", e);
                None
            }
        }
    }

    pub fn save(tunables: &Tunables) {
        let path = settings_path();

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!("Failed to create settings directory: {}", e);
                return;
            }
        }

        match serialize_tunables(tunables) {
            Ok(serialized) => {
                if let Err(e) = std::fs::write(&path, serialized) {
                    error!("Failed to write settings file: {}", e);
                } else {
                    debug!("Settings saved to {:?}", path);
                }
            }
            Err(e) => error!("Failed to serialize settings: {}", e),
        }
    }
}

// Browsers have no filesystem; settings last for the session only.
#[cfg(target_arch = "wasm32")]
mod storage {
    use bevy::prelude::*;

    use crate::config::Tunables;

    pub fn load() -> Option<Tunables> {
        warn!("Settings persistence is not available on the web. Using defaults.");
        None
    }

    pub fn save(_tunables: &Tunables) {}
}

fn load_tunables(mut commands: Commands) {
    let tunables = storage::load().unwrap_or_default();
    commands.insert_resource(tunables);
}

/// Writes the tunables out. Called by the settings panel after every change,
/// not every frame.
pub fn save_to_disk(tunables: &Tunables) {
    storage::save(tunables);
}
