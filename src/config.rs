// config.rs - Fixed game rules and the two player-adjustable tunables
//
// GameConfig holds the constants the simulation is built around (sizes,
// spawn cadence, win threshold). Tunables holds the two values the settings
// panel can change. Tunables are clamped here, at the point where they enter
// the simulation, because every tick assumes a positive speed and duration.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed rules of the game. Every field has a documented default; tests build
/// custom configs with struct update syntax (`GameConfig { win_score: 3, ..default() }`).
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Score that ends the Playing phase and enters Victory.
    pub win_score: u32,
    pub enemy_width: f32,
    pub enemy_height: f32,
    /// Edge length of the cursor image when a cursor sprite is configured.
    pub cursor_size: f32,
    /// An enemy spawns once more than this many milliseconds have passed.
    pub spawn_interval_ms: f64,
    /// Highest point (smallest y) an enemy may spawn at.
    pub min_spawn_y: f32,
    /// Gap kept between the lowest spawn position and the bottom edge.
    pub spawn_margin: f32,
    /// Edge length of the muzzle-flash effect, centred on the click point.
    pub effect_size: f32,
    pub crosshair_radius: f32,
    pub crosshair_arm: f32,
    /// Spacing of the grid drawn on the default background.
    pub grid_size: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_score: 10,
            enemy_width: 80.0,
            enemy_height: 80.0,
            cursor_size: 40.0,
            spawn_interval_ms: 2000.0,
            min_spawn_y: 100.0,
            spawn_margin: 50.0,
            effect_size: 60.0,
            crosshair_radius: 15.0,
            crosshair_arm: 20.0,
            grid_size: 50.0,
        }
    }
}

pub const MIN_ENEMY_SPEED: f32 = 0.1;
pub const MAX_ENEMY_SPEED: f32 = 50.0;
pub const MIN_FRAME_MS: u32 = 1;
pub const MAX_FRAME_MS: u32 = 5000;

/// The two values the player tunes on the settings panel.
///
/// `enemy_speed` is read when an enemy spawns, so changing it mid-game only
/// affects enemies spawned afterwards. `anim_frame_ms` is read whenever a new
/// animation is created (enemy spawn, muzzle flash).
///
/// #[serde(default)] lets an older settings file that is missing a field load
/// anyway, with the missing value taken from Default.
#[derive(Resource, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Tunables {
    /// Pixels moved per tick.
    pub enemy_speed: f32,
    /// Milliseconds each animation frame is shown for.
    pub anim_frame_ms: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            enemy_speed: 3.0,
            anim_frame_ms: 150,
        }
    }
}

impl Tunables {
    /// Returns a copy that is safe for the simulation: positive, finite and
    /// inside the supported range.
    pub fn sanitized(self) -> Self {
        let enemy_speed = if self.enemy_speed.is_finite() {
            self.enemy_speed.clamp(MIN_ENEMY_SPEED, MAX_ENEMY_SPEED)
        } else {
            Self::default().enemy_speed
        };

        Self {
            enemy_speed,
            anim_frame_ms: self.anim_frame_ms.clamp(MIN_FRAME_MS, MAX_FRAME_MS),
        }
    }

    /// Frame duration for enemy move/death animations.
    pub fn frame_duration_ms(&self) -> f64 {
        f64::from(self.sanitized().anim_frame_ms)
    }

    /// The muzzle flash plays twice as fast as the enemy animations.
    pub fn effect_frame_duration_ms(&self) -> f64 {
        self.frame_duration_ms() / 2.0
    }
}
