// surface.rs - The 2D drawing surface the simulation renders onto
//
// The simulation never talks to Bevy's renderer directly. It issues draw
// calls against the `Surface` trait using top-left origin, y-down pixel
// coordinates (the same space pointer events arrive in). `DrawList` is the
// implementation used everywhere: it records the calls, and the render plugin
// turns the recorded list into sprites and gizmos once per frame. Tests read
// the same list to check what would have been drawn.

use bevy::prelude::*;

/// Index of an image in the sprite library's handle table.
///
/// A newtype instead of a bare usize so an image index can't be mixed up with
/// a frame index or an enemy index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageKey(pub usize);

/// Something the game can draw onto.
pub trait Surface {
    /// Current drawable size in pixels. May change between ticks when the
    /// window is resized.
    fn size(&self) -> Vec2;

    /// True once the image behind `key` has finished loading. Drawing an
    /// unresolved image is skipped by the callers for that frame.
    fn is_resolved(&self, key: ImageKey) -> bool;

    /// Drops everything drawn so far this frame.
    fn clear(&mut self);

    /// Draws an image stretched to `rect`. With `flip_x` the image is
    /// mirrored about the rect's own vertical centre line.
    fn draw_image(&mut self, key: ImageKey, rect: Rect, flip_x: bool);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color);
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Image {
        key: ImageKey,
        rect: Rect,
        flip_x: bool,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
}

/// A surface that records draw calls in order.
///
/// `resolved` is indexed by `ImageKey`; the gameplay plugin refreshes it from
/// `Assets<Image>` before every tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct DrawList {
    size: Vec2,
    resolved: Vec<bool>,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            ..default()
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Replaces the table of which image keys have finished loading.
    pub fn set_resolved(&mut self, resolved: Vec<bool>) {
        self.resolved = resolved;
    }

    /// Marks every key below `count` as loaded. Handy for tests.
    pub fn resolve_all(&mut self, count: usize) {
        self.resolved = vec![true; count];
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Just the image draws, in order.
    pub fn images(&self) -> impl Iterator<Item = (ImageKey, Rect, bool)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Image { key, rect, flip_x } => Some((*key, *rect, *flip_x)),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn is_resolved(&self, key: ImageKey) -> bool {
        self.resolved.get(key.0).copied().unwrap_or(false)
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn draw_image(&mut self, key: ImageKey, rect: Rect, flip_x: bool) {
        self.commands.push(DrawCommand::Image { key, rect, flip_x });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
}
