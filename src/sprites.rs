// sprites.rs - Finds, orders and loads the game's images
//
// Images live in fixed sub-directories of the asset root:
//
//   assets/background/    first image is stretched over the whole screen
//   assets/cursor/        first image replaces the crosshair
//   assets/enemy_move/    looping walk/fly frames
//   assets/enemy_death/   one-shot death frames
//   assets/fire_effect/   one-shot muzzle flash frames
//
// Frame order is the natural sort of the file names, so `frame2.png` comes
// before `frame10.png`. Any directory may be missing or empty; the game then
// falls back to its built-in visuals.
//
// The simulation only sees ImageKeys. `ImageHandles` maps each key to the
// Bevy handle, and the render plugin looks the handle up when drawing.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use bevy::prelude::*;

use crate::controller::GamePhase;
use crate::surface::ImageKey;

pub struct SpriteLibraryPlugin;

impl Plugin for SpriteLibraryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AssetLayout>()
            .init_resource::<SpriteLibrary>()
            .init_resource::<ImageHandles>()
            .add_systems(Startup, load_sprite_library)
            .add_systems(
                Update,
                reload_sprite_library_system.run_if(in_state(GamePhase::Settings)),
            );
    }
}

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Where the image directories live on disk. Must be the same directory the
/// AssetServer reads from, since files are listed here and loaded through it.
#[derive(Resource, Debug, Clone)]
pub struct AssetLayout {
    pub disk_root: PathBuf,
}

impl Default for AssetLayout {
    fn default() -> Self {
        // Same lookup order as Bevy's file asset reader.
        let base = std::env::var_os("BEVY_ASSET_ROOT")
            .or_else(|| std::env::var_os("CARGO_MANIFEST_DIR"))
            .map(PathBuf::from)
            .or_else(|| {
                std::env::current_exe()
                    .ok()
                    .and_then(|exe| exe.parent().map(Path::to_path_buf))
            })
            .unwrap_or_default();
        Self {
            disk_root: base.join("assets"),
        }
    }
}

/// The images the simulation can use, as keys into `ImageHandles`.
/// Every field may be empty.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SpriteLibrary {
    pub background: Option<ImageKey>,
    pub cursor: Option<ImageKey>,
    pub enemy_move: Vec<ImageKey>,
    pub enemy_death: Vec<ImageKey>,
    pub fire_effect: Vec<ImageKey>,
}

/// Handle table indexed by `ImageKey`.
#[derive(Resource, Debug, Clone, Default)]
pub struct ImageHandles(pub Vec<Handle<Image>>);

impl ImageHandles {
    pub fn get(&self, key: ImageKey) -> Option<&Handle<Image>> {
        self.0.get(key.0)
    }

    /// Which keys have finished loading, in key order.
    pub fn resolved(&self, images: &Assets<Image>) -> Vec<bool> {
        self.0.iter().map(|handle| images.contains(handle.id())).collect()
    }
}

/// The sub-directories the library is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteSlot {
    Background,
    Cursor,
    EnemyMove,
    EnemyDeath,
    FireEffect,
}

impl SpriteSlot {
    pub const ALL: [SpriteSlot; 5] = [
        SpriteSlot::Background,
        SpriteSlot::Cursor,
        SpriteSlot::EnemyMove,
        SpriteSlot::EnemyDeath,
        SpriteSlot::FireEffect,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            SpriteSlot::Background => "background",
            SpriteSlot::Cursor => "cursor",
            SpriteSlot::EnemyMove => "enemy_move",
            SpriteSlot::EnemyDeath => "enemy_death",
            SpriteSlot::FireEffect => "fire_effect",
        }
    }

    /// Background and cursor are single images; the rest are sequences.
    pub fn is_single(self) -> bool {
        matches!(self, SpriteSlot::Background | SpriteSlot::Cursor)
    }
}

/// Compares two file names the way a person would order numbered frames:
/// case-insensitive, with runs of digits compared by value.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let run_a = take_digits(&mut a);
                let run_b = take_digits(&mut b);
                let ordering = compare_digit_runs(&run_a, &run_b);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(ca), Some(cb)) => {
                let ordering = ca.to_lowercase().cmp(cb.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        run.push(c);
    }
    run
}

/// Compares digit runs by numeric value without parsing, so arbitrarily long
/// runs can't overflow. Leading zeros only break ties ("01" after "1").
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let trimmed_a = a.trim_start_matches('0');
    let trimmed_b = b.trim_start_matches('0');
    trimmed_a
        .len()
        .cmp(&trimmed_b.len())
        .then_with(|| trimmed_a.cmp(trimmed_b))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Lists the image files in `dir`, naturally sorted by file name.
/// A missing or unreadable directory yields an empty list.
pub fn list_frames(dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No images read from {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| has_image_extension(name))
        .collect();

    names.sort_by(|a, b| natural_cmp(a, b));
    names
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Scans every slot directory and asks the AssetServer for each image.
/// Loading happens in the background; keys stay unresolved until it's done.
pub fn build_sprite_library(
    layout: &AssetLayout,
    asset_server: &AssetServer,
) -> (SpriteLibrary, ImageHandles) {
    let mut library = SpriteLibrary::default();
    let mut handles = ImageHandles::default();

    for slot in SpriteSlot::ALL {
        let mut files = list_frames(&layout.disk_root.join(slot.dir_name()));
        if slot.is_single() {
            files.truncate(1);
        }

        let keys: Vec<ImageKey> = files
            .iter()
            .map(|file| {
                let key = ImageKey(handles.0.len());
                handles
                    .0
                    .push(asset_server.load(format!("{}/{}", slot.dir_name(), file)));
                key
            })
            .collect();

        match slot {
            SpriteSlot::Background => library.background = keys.first().copied(),
            SpriteSlot::Cursor => library.cursor = keys.first().copied(),
            SpriteSlot::EnemyMove => library.enemy_move = keys,
            SpriteSlot::EnemyDeath => library.enemy_death = keys,
            SpriteSlot::FireEffect => library.fire_effect = keys,
        }
    }

    (library, handles)
}

pub fn load_sprite_library(
    mut commands: Commands,
    layout: Res<AssetLayout>,
    asset_server: Res<AssetServer>,
) {
    if !layout.disk_root.is_dir() {
        warn!(
            "Asset directory {:?} not found. Using built-in visuals.",
            layout.disk_root
        );
    }

    let (library, handles) = build_sprite_library(&layout, &asset_server);
    info!(
        "Sprite library: background={} cursor={} move={} death={} fire={}",
        library.background.is_some(),
        library.cursor.is_some(),
        library.enemy_move.len(),
        library.enemy_death.len(),
        library.fire_effect.len(),
    );

    commands.insert_resource(library);
    commands.insert_resource(handles);
}

/// R on the settings panel rescans the image directories, so frames can be
/// swapped without restarting the game.
fn reload_sprite_library_system(
    commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    layout: Res<AssetLayout>,
    asset_server: Res<AssetServer>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        info!("Reloading sprite library");
        load_sprite_library(commands, layout, asset_server);
    }
}
