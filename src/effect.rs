use bevy::prelude::*;

use crate::animation::AnimationPlayer;
use crate::surface::{ImageKey, Surface};

/// A one-shot visual centred on a point, e.g. the muzzle flash on a click.
/// It never interacts with enemies and is removed once its animation ends.
#[derive(Debug, Clone)]
pub struct Effect {
    pub center: Vec2,
    pub size: Vec2,
    animation: AnimationPlayer,
    finished: bool,
}

impl Effect {
    pub fn new(center: Vec2, size: Vec2, frames: Vec<ImageKey>, frame_duration_ms: f64) -> Self {
        // With nothing to play there is nothing to wait for.
        let finished = frames.is_empty();
        Effect {
            center,
            size,
            animation: AnimationPlayer::one_shot(frames, frame_duration_ms),
            finished,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn animation(&self) -> &AnimationPlayer {
        &self.animation
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, self.size)
    }

    pub fn update(&mut self, now_ms: f64) {
        if self.finished {
            return;
        }
        if self.animation.advance(now_ms) {
            self.finished = true;
        }
    }

    pub fn render(&self, surface: &mut impl Surface) {
        if self.finished {
            return;
        }
        self.animation.render(surface, self.bounds(), false);
    }
}
