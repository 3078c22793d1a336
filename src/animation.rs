use bevy::prelude::*;

use crate::surface::{ImageKey, Surface};

/// Plays a sequence of image frames on a wall-clock cadence.
///
/// Time is measured in milliseconds on whatever clock the caller passes to
/// `advance`. A looping player wraps back to frame 0; a one-shot player stops
/// on its last frame and reports completion exactly once, as the return value
/// of the `advance` call that finished it.
///
/// Everything here is best-effort: an empty frame list makes every operation
/// a no-op instead of an error.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPlayer {
    frames: Vec<ImageKey>,
    frame_duration_ms: f64,
    frame_index: usize,
    last_advance_ms: f64,
    playing: bool,
    looping: bool,
    finished: bool,
}

impl AnimationPlayer {
    pub fn new(frames: Vec<ImageKey>, frame_duration_ms: f64, looping: bool) -> Self {
        AnimationPlayer {
            frames,
            frame_duration_ms,
            frame_index: 0,
            last_advance_ms: 0.0,
            playing: true,
            looping,
            finished: false,
        }
    }

    pub fn looping(frames: Vec<ImageKey>, frame_duration_ms: f64) -> Self {
        Self::new(frames, frame_duration_ms, true)
    }

    pub fn one_shot(frames: Vec<ImageKey>, frame_duration_ms: f64) -> Self {
        Self::new(frames, frame_duration_ms, false)
    }

    /// Moves to the next frame once `frame_duration_ms` has passed since the
    /// last step. Returns true only on the call where a one-shot animation
    /// runs off its last frame.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        if !self.playing || self.frames.is_empty() {
            return false;
        }

        if now_ms - self.last_advance_ms < self.frame_duration_ms {
            return false;
        }

        self.last_advance_ms = now_ms;
        self.frame_index += 1;

        if self.frame_index < self.frames.len() {
            return false;
        }

        if self.looping {
            self.frame_index = 0;
            false
        } else {
            self.frame_index = self.frames.len() - 1;
            self.playing = false;
            self.finished = true;
            true
        }
    }

    /// Draws the current frame stretched to `rect`. `flip_x` mirrors the
    /// image inside `rect`, not across the whole surface.
    pub fn render(&self, surface: &mut impl Surface, rect: Rect, flip_x: bool) {
        let Some(key) = self.current_frame() else {
            return;
        };
        if !surface.is_resolved(key) {
            return;
        }
        surface.draw_image(key, rect, flip_x);
    }

    /// Back to frame 0 and playing. The step clock restarts from zero, so the
    /// first `advance` after a reset steps as soon as `now` reaches one
    /// frame duration.
    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.playing = true;
        self.finished = false;
        self.last_advance_ms = 0.0;
    }

    /// Pauses on the current frame.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn current_frame(&self) -> Option<ImageKey> {
        self.frames.get(self.frame_index).copied()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// True once a one-shot animation has played through. Cleared by `reset`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
