// enemy.rs - A moving, animated target with a one-way life cycle
//
// Alive  -> moves sideways every tick, plays its move animation, can be hit.
// Dying  -> frozen in place, plays its one-shot death animation, can't be hit.
// Dead   -> draws nothing; the controller removes it on the same tick.

use bevy::prelude::*;

use crate::animation::AnimationPlayer;
use crate::surface::{ImageKey, Surface};

/// Colour used for enemies that have no move frames configured.
const PLACEHOLDER_COLOR: Color = Color::srgb(0.85, 0.25, 0.25);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifeState {
    Alive,
    Dying,
    Dead,
}

/// Which way an enemy crosses the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    /// +1 for left-to-right, -1 for right-to-left.
    pub fn sign(self) -> f32 {
        match self {
            Direction::LeftToRight => 1.0,
            Direction::RightToLeft => -1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    /// Top-left corner in surface pixels.
    pub position: Vec2,
    pub size: Vec2,
    pub direction: Direction,
    /// Pixels per tick, fixed for the enemy's whole life.
    pub speed: f32,
    state: LifeState,
    move_animation: Option<AnimationPlayer>,
    death_animation: Option<AnimationPlayer>,
}

impl Enemy {
    /// Builds an alive enemy. Empty frame lists mean "no animation": the
    /// enemy draws a placeholder box while alive, and skips straight from
    /// dying to dead when it has no death frames.
    pub fn new(
        position: Vec2,
        size: Vec2,
        direction: Direction,
        move_frames: Vec<ImageKey>,
        death_frames: Vec<ImageKey>,
        frame_duration_ms: f64,
        speed: f32,
    ) -> Self {
        let move_animation = (!move_frames.is_empty())
            .then(|| AnimationPlayer::looping(move_frames, frame_duration_ms));
        let death_animation = (!death_frames.is_empty())
            .then(|| AnimationPlayer::one_shot(death_frames, frame_duration_ms));

        Enemy {
            position,
            size,
            direction,
            speed,
            state: LifeState::Alive,
            move_animation,
            death_animation,
        }
    }

    pub fn state(&self) -> LifeState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == LifeState::Alive
    }

    pub fn is_dead(&self) -> bool {
        self.state == LifeState::Dead
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.position, self.position + self.size)
    }

    pub fn move_animation(&self) -> Option<&AnimationPlayer> {
        self.move_animation.as_ref()
    }

    pub fn death_animation(&self) -> Option<&AnimationPlayer> {
        self.death_animation.as_ref()
    }

    pub fn update(&mut self, now_ms: f64) {
        match self.state {
            LifeState::Alive => {
                self.position.x += self.speed * self.direction.sign();
                if let Some(animation) = self.move_animation.as_mut() {
                    animation.advance(now_ms);
                }
            }
            LifeState::Dying => {
                let finished = match self.death_animation.as_mut() {
                    Some(animation) => animation.advance(now_ms),
                    None => true,
                };
                if finished {
                    self.state = LifeState::Dead;
                }
            }
            LifeState::Dead => {}
        }
    }

    pub fn render(&self, surface: &mut impl Surface) {
        let flip_x = self.direction == Direction::RightToLeft;
        let rect = self.bounds();

        match self.state {
            LifeState::Alive => match &self.move_animation {
                Some(animation) => animation.render(surface, rect, flip_x),
                None => surface.fill_rect(rect, PLACEHOLDER_COLOR),
            },
            LifeState::Dying => {
                if let Some(animation) = &self.death_animation {
                    animation.render(surface, rect, flip_x);
                }
            }
            LifeState::Dead => {}
        }
    }

    /// Axis-aligned containment test, edges included. Only alive enemies can
    /// be hit.
    pub fn hit_test(&self, point: Vec2) -> bool {
        self.is_alive() && self.bounds().contains(point)
    }

    /// Starts dying. Does nothing unless the enemy is alive.
    pub fn kill(&mut self) {
        if self.state != LifeState::Alive {
            return;
        }
        self.state = LifeState::Dying;
        if let Some(animation) = self.death_animation.as_mut() {
            animation.reset();
        }
    }

    /// True once the enemy has fully left the screen on the side it was
    /// heading towards.
    pub fn is_offscreen(&self, surface_width: f32) -> bool {
        match self.direction {
            Direction::LeftToRight => self.position.x > surface_width,
            Direction::RightToLeft => self.position.x + self.size.x < 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawList;

    const SIZE: Vec2 = Vec2::new(80.0, 80.0);

    fn enemy_at(x: f32, direction: Direction, speed: f32) -> Enemy {
        Enemy::new(
            Vec2::new(x, 100.0),
            SIZE,
            direction,
            vec![ImageKey(0), ImageKey(1)],
            vec![ImageKey(2), ImageKey(3), ImageKey(4)],
            100.0,
            speed,
        )
    }

    #[test]
    fn moves_only_while_alive() {
        let mut enemy = enemy_at(0.0, Direction::LeftToRight, 3.0);
        let walk = enemy.move_animation().map(|a| (a.frame_count(), a.is_looping()));
        assert_eq!(walk, Some((2, true)));
        enemy.update(16.0);
        assert_eq!(enemy.position.x, 3.0);

        enemy.kill();
        enemy.update(32.0);
        assert_eq!(enemy.position.x, 3.0);
    }

    #[test]
    fn right_to_left_moves_negative() {
        let mut enemy = enemy_at(800.0, Direction::RightToLeft, 4.0);
        enemy.update(16.0);
        assert_eq!(enemy.position.x, 796.0);
    }

    #[test]
    fn states_only_move_forward() {
        let mut enemy = enemy_at(0.0, Direction::LeftToRight, 3.0);
        assert_eq!(enemy.state(), LifeState::Alive);

        enemy.kill();
        assert_eq!(enemy.state(), LifeState::Dying);

        // Three death frames at 100 ms: the third step runs off the end.
        let mut now = 1_000.0;
        while !enemy.is_dead() {
            let before = enemy.state();
            enemy.update(now);
            assert!(!(before == LifeState::Dying && enemy.state() == LifeState::Alive));
            now += 100.0;
        }

        enemy.kill();
        enemy.update(now + 500.0);
        assert_eq!(enemy.state(), LifeState::Dead);
    }

    #[test]
    fn kill_is_idempotent() {
        let mut enemy = enemy_at(0.0, Direction::LeftToRight, 3.0);
        enemy.kill();
        enemy.update(100.0);
        let frame = enemy.death_animation().map(|a| a.frame_index());

        // A second kill must not rewind the death animation.
        enemy.kill();
        assert_eq!(enemy.state(), LifeState::Dying);
        assert_eq!(enemy.death_animation().map(|a| a.frame_index()), frame);
    }

    #[test]
    fn hit_test_is_false_unless_alive() {
        let mut enemy = enemy_at(10.0, Direction::LeftToRight, 3.0);
        let inside = Vec2::new(50.0, 140.0);
        assert!(enemy.hit_test(inside));
        assert!(enemy.hit_test(Vec2::new(10.0, 100.0)));
        assert!(enemy.hit_test(Vec2::new(90.0, 180.0)));
        assert!(!enemy.hit_test(Vec2::new(91.0, 140.0)));

        enemy.kill();
        for x in 0..20 {
            for y in 0..20 {
                let point = Vec2::new(x as f32 * 10.0, y as f32 * 10.0);
                assert!(!enemy.hit_test(point));
            }
        }
    }

    #[test]
    fn without_death_frames_dying_lasts_one_update() {
        let mut enemy = Enemy::new(
            Vec2::ZERO,
            SIZE,
            Direction::LeftToRight,
            Vec::new(),
            Vec::new(),
            100.0,
            3.0,
        );
        assert!(enemy.move_animation().is_none());
        assert!(enemy.death_animation().is_none());

        enemy.kill();
        assert_eq!(enemy.state(), LifeState::Dying);
        enemy.update(0.0);
        assert_eq!(enemy.state(), LifeState::Dead);
    }

    #[test]
    fn leaves_the_screen_after_expected_ticks() {
        let mut enemy = enemy_at(-80.0, Direction::LeftToRight, 3.0);
        let mut ticks = 0;
        while !enemy.is_offscreen(800.0) {
            enemy.update(ticks as f64 * 16.0);
            ticks += 1;
        }
        assert_eq!(ticks, 294);
        assert!(enemy.position.x > 800.0);
    }

    #[test]
    fn right_to_left_offscreen_uses_right_edge() {
        let mut enemy = enemy_at(-79.0, Direction::RightToLeft, 1.0);
        assert!(!enemy.is_offscreen(800.0));
        enemy.update(0.0);
        assert!(!enemy.is_offscreen(800.0));
        enemy.update(0.0);
        assert!(enemy.is_offscreen(800.0));
    }

    #[test]
    fn renders_mirrored_when_heading_left() {
        let enemy = enemy_at(200.0, Direction::RightToLeft, 3.0);
        let mut surface = DrawList::new(Vec2::new(800.0, 600.0));
        surface.resolve_all(5);
        enemy.render(&mut surface);

        let drawn: Vec<_> = surface.images().collect();
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].0, ImageKey(0));
        assert_eq!(drawn[0].1, enemy.bounds());
        assert!(drawn[0].2);
    }

    #[test]
    fn renders_death_frames_while_dying_and_nothing_when_dead() {
        let mut enemy = enemy_at(200.0, Direction::LeftToRight, 3.0);
        let mut surface = DrawList::new(Vec2::new(800.0, 600.0));
        surface.resolve_all(5);

        enemy.kill();
        enemy.render(&mut surface);
        assert_eq!(surface.images().next().map(|d| d.0), Some(ImageKey(2)));

        let mut now = 10_000.0;
        while !enemy.is_dead() {
            enemy.update(now);
            now += 100.0;
        }
        surface.clear();
        enemy.render(&mut surface);
        assert!(surface.commands().is_empty());
    }
}
