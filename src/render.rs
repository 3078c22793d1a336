// render.rs - Puts the recorded DrawList on screen
//
// The simulation draws in window pixels: origin top-left, y down. Bevy's 2D
// camera puts the origin at the centre of the window with y up, one world
// unit per logical pixel. `to_world` converts between the two.
//
// Images and filled rects become sprites from a pool of `DrawSlot` entities.
// Slot i shows the i-th quad of the list and sits at z = i * Z_STEP, so later
// draws cover earlier ones like they would on a canvas. Slots are never
// despawned; spare ones are hidden.
//
// Lines and circles go through gizmos. Bevy draws 2D gizmos after every
// sprite, so strokes always end up on top; the game only strokes its
// crosshair, which is the last thing drawn anyway. Gizmos keep their
// default 2 px width.
//
// The pool is refreshed every frame, whatever the phase. The tick only runs
// while Playing, so on the victory screen the last frame stays visible under
// the panel.

use bevy::prelude::*;

use crate::gameplay::GameplaySet;
use crate::sprites::ImageHandles;
use crate::surface::{DrawCommand, DrawList, Surface};

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(
                Update,
                (present_quads_system, present_strokes_system).after(GameplaySet::Simulate),
            );
    }
}

const Z_STEP: f32 = 0.001;

/// Pool index of a sprite entity used to show one quad of the DrawList.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawSlot(pub usize);

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Window pixel (top-left origin) to world position (centre origin, y up).
pub fn to_world(point: Vec2, surface_size: Vec2) -> Vec2 {
    Vec2::new(point.x - surface_size.x / 2.0, surface_size.y / 2.0 - point.y)
}

/// A quad ready to be shown by a sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub center: Vec2,
    pub size: Vec2,
    pub fill: QuadFill,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuadFill {
    Image { handle: Handle<Image>, flip_x: bool },
    Color(Color),
}

impl Quad {
    fn sprite(&self) -> Sprite {
        match &self.fill {
            QuadFill::Image { handle, flip_x } => Sprite {
                image: handle.clone(),
                custom_size: Some(self.size),
                flip_x: *flip_x,
                ..default()
            },
            QuadFill::Color(color) => Sprite {
                color: *color,
                custom_size: Some(self.size),
                ..default()
            },
        }
    }

    pub fn transform(&self, slot: usize) -> Transform {
        Transform::from_translation(self.center.extend(slot as f32 * Z_STEP))
    }
}

/// The image and rect commands of `list`, in draw order, converted to world
/// space. Images whose key has no handle are dropped.
pub fn collect_quads(list: &DrawList, handles: &ImageHandles) -> Vec<Quad> {
    let size = list.size();
    list.commands()
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Image { key, rect, flip_x } => Some(Quad {
                center: to_world(rect.center(), size),
                size: rect.size(),
                fill: QuadFill::Image {
                    handle: handles.get(*key)?.clone(),
                    flip_x: *flip_x,
                },
            }),
            DrawCommand::FillRect { rect, color } => Some(Quad {
                center: to_world(rect.center(), size),
                size: rect.size(),
                fill: QuadFill::Color(*color),
            }),
            DrawCommand::Line { .. } | DrawCommand::Circle { .. } => None,
        })
        .collect()
}

fn present_quads_system(
    mut commands: Commands,
    draw_list: Res<DrawList>,
    handles: Res<ImageHandles>,
    mut slots: Query<(&DrawSlot, &mut Sprite, &mut Transform, &mut Visibility)>,
) {
    let quads = collect_quads(&draw_list, &handles);

    let mut pooled = 0;
    for (slot, mut sprite, mut transform, mut visibility) in &mut slots {
        pooled = pooled.max(slot.0 + 1);
        match quads.get(slot.0) {
            Some(quad) => {
                *sprite = quad.sprite();
                *transform = quad.transform(slot.0);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }

    for (index, quad) in quads.iter().enumerate().skip(pooled) {
        commands.spawn((DrawSlot(index), quad.sprite(), quad.transform(index)));
    }
}

fn present_strokes_system(mut gizmos: Gizmos, draw_list: Res<DrawList>) {
    let size = draw_list.size();
    for command in draw_list.commands() {
        match command {
            DrawCommand::Line { from, to, color } => {
                gizmos.line_2d(to_world(*from, size), to_world(*to, size), *color);
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => {
                gizmos.circle_2d(to_world(*center, size), *radius, *color);
            }
            DrawCommand::Image { .. } | DrawCommand::FillRect { .. } => {}
        }
    }
}
