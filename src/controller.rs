// controller.rs - The simulation loop and the top-level game state machine
//
// GameController owns every enemy and effect, the score, and the phase:
//
//   Settings --start--> Playing --score reaches win_score--> Victory
//       ^                  |                                   |
//       +--return_to_settings--------------------restart-------+
//
// It does not know about Bevy's schedule. The gameplay plugin calls `tick`
// once per frame with the current clock, and forwards pointer events to
// `pointer_moved` / `click` between ticks. Anything the host UI needs to hear
// about (score, phase) is queued as a GameSignal and drained by the host.
//
// `tick` checks the phase on entry, so a tick that arrives after Victory or a
// return to settings does nothing. That is the whole cancellation story: no
// scheduled work survives a phase change.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{GameConfig, Tunables};
use crate::effect::Effect;
use crate::enemy::{Direction, Enemy};
use crate::sprites::SpriteLibrary;
use crate::surface::Surface;

const DEFAULT_BACKGROUND: Color = Color::srgb(0.102, 0.102, 0.180);
const GRID_COLOR: Color = Color::srgba(0.298, 0.686, 0.314, 0.1);
const CROSSHAIR_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
const GRID_LINE_WIDTH: f32 = 1.0;

/// Top-level phase of the game. Also registered as Bevy `States` so panels
/// can be spawned with OnEnter and scoped with DespawnOnExit.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Settings,
    Playing,
    Victory,
}

/// Outgoing notifications for the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSignal {
    ScoreChanged(u32),
    PhaseChanged(GamePhase),
}

#[derive(Resource, Debug)]
pub struct GameController {
    config: GameConfig,
    phase: GamePhase,
    score: u32,
    /// Insertion order matters: a click kills the first match in this order.
    enemies: Vec<Enemy>,
    effects: Vec<Effect>,
    last_spawn_ms: f64,
    pointer: Vec2,
    rng: StdRng,
    signals: Vec<GameSignal>,
}

impl Default for GameController {
    fn default() -> Self {
        Self::new(GameConfig::default(), StdRng::from_entropy())
    }
}

impl GameController {
    /// Pass a seeded rng to make spawn positions and directions reproducible.
    pub fn new(config: GameConfig, rng: StdRng) -> Self {
        GameController {
            config,
            phase: GamePhase::Settings,
            score: 0,
            enemies: Vec::new(),
            effects: Vec::new(),
            last_spawn_ms: 0.0,
            pointer: Vec2::ZERO,
            rng,
            signals: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Hands over every signal queued since the last call.
    pub fn take_signals(&mut self) -> Vec<GameSignal> {
        std::mem::take(&mut self.signals)
    }

    // ── Commands ────────────────────────────────────────────────────────────

    /// Begins a fresh round. Ignored in Victory, where the only way out is
    /// `restart`. Starting while already Playing restarts the round.
    pub fn start(&mut self, now_ms: f64) {
        if self.phase == GamePhase::Victory {
            debug!("Start ignored while showing the victory screen");
            return;
        }

        self.clear_round();
        self.last_spawn_ms = now_ms;
        self.set_phase(GamePhase::Playing);
        info!("Round started (win at {} hits)", self.config.win_score);
    }

    /// Stops the round, whatever the phase, and goes back to the settings
    /// panel with an empty field and a zero score.
    pub fn return_to_settings(&mut self) {
        self.clear_round();
        self.set_phase(GamePhase::Settings);
        info!("Returned to settings");
    }

    /// The restart command on the victory screen. Same as returning to
    /// settings; a new round begins with the next `start`.
    pub fn restart(&mut self) {
        self.return_to_settings();
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer = position;
    }

    /// A pointer press at `point`. Spawns a muzzle flash when fire frames are
    /// configured, then kills the first alive enemy under the point.
    /// Returns whether an enemy was hit.
    pub fn click(&mut self, point: Vec2, sprites: &SpriteLibrary, tunables: &Tunables) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.pointer = point;

        if !sprites.fire_effect.is_empty() {
            self.effects.push(Effect::new(
                point,
                Vec2::splat(self.config.effect_size),
                sprites.fire_effect.clone(),
                tunables.effect_frame_duration_ms(),
            ));
        }

        let Some(enemy) = self.enemies.iter_mut().find(|enemy| enemy.hit_test(point)) else {
            debug!("Miss at ({:.0}, {:.0})", point.x, point.y);
            return false;
        };

        enemy.kill();
        self.score += 1;
        self.signals.push(GameSignal::ScoreChanged(self.score));
        debug!("Hit at ({:.0}, {:.0}), score {}", point.x, point.y, self.score);

        if self.score >= self.config.win_score {
            self.set_phase(GamePhase::Victory);
            info!("Victory with {} hits", self.score);
        }
        true
    }

    // ── Per-frame tick ──────────────────────────────────────────────────────

    /// One frame of the simulation: draw the background, maybe spawn, update
    /// and draw every enemy and effect, then draw the cursor.
    /// Does nothing outside the Playing phase.
    pub fn tick(
        &mut self,
        now_ms: f64,
        surface: &mut impl Surface,
        sprites: &SpriteLibrary,
        tunables: &Tunables,
    ) {
        if self.phase != GamePhase::Playing {
            return;
        }

        surface.clear();
        self.draw_background(surface, sprites);

        if now_ms - self.last_spawn_ms > self.config.spawn_interval_ms {
            self.spawn_enemy(surface.size(), sprites, tunables);
            self.last_spawn_ms = now_ms;
        }

        // Walk backwards so removing index i never shifts an unvisited enemy.
        let width = surface.size().x;
        for i in (0..self.enemies.len()).rev() {
            let enemy = &mut self.enemies[i];
            enemy.update(now_ms);
            enemy.render(surface);

            let expired = enemy.is_dead() || (enemy.is_alive() && enemy.is_offscreen(width));
            if expired {
                self.enemies.remove(i);
            }
        }

        for i in (0..self.effects.len()).rev() {
            let effect = &mut self.effects[i];
            effect.update(now_ms);
            effect.render(surface);

            if effect.is_finished() {
                self.effects.remove(i);
            }
        }

        self.draw_cursor(surface, sprites);
    }

    /// Speed and frame duration are read here, so enemies already on screen
    /// keep the values they spawned with.
    fn spawn_enemy(&mut self, surface_size: Vec2, sprites: &SpriteLibrary, tunables: &Tunables) {
        let tunables = tunables.sanitized();
        let size = Vec2::new(self.config.enemy_width, self.config.enemy_height);

        let min_y = self.config.min_spawn_y;
        let max_y = surface_size.y - size.y - self.config.spawn_margin;
        // A window too short for the spawn band pins enemies to its top.
        let y = if max_y > min_y {
            self.rng.gen_range(min_y..=max_y)
        } else {
            min_y
        };

        let (direction, x) = if self.rng.gen_bool(0.5) {
            (Direction::LeftToRight, -size.x)
        } else {
            (Direction::RightToLeft, surface_size.x)
        };

        debug!(
            "Spawning enemy at ({:.0}, {:.0}) heading {:?} at {} px/tick",
            x, y, direction, tunables.enemy_speed
        );

        self.enemies.push(Enemy::new(
            Vec2::new(x, y),
            size,
            direction,
            sprites.enemy_move.clone(),
            sprites.enemy_death.clone(),
            tunables.frame_duration_ms(),
            tunables.enemy_speed,
        ));
    }

    fn draw_background(&self, surface: &mut impl Surface, sprites: &SpriteLibrary) {
        let size = surface.size();
        let full = Rect::from_corners(Vec2::ZERO, size);

        if let Some(key) = sprites.background.filter(|key| surface.is_resolved(*key)) {
            surface.draw_image(key, full, false);
            return;
        }

        surface.fill_rect(full, DEFAULT_BACKGROUND);

        // Grid lines are 1 px rects rather than strokes so they stay under
        // everything drawn after the background.
        let step = self.config.grid_size.max(1.0);
        let mut x = 0.0;
        while x < size.x {
            let line = Rect::new(x, 0.0, x + GRID_LINE_WIDTH, size.y);
            surface.fill_rect(line, GRID_COLOR);
            x += step;
        }
        let mut y = 0.0;
        while y < size.y {
            let line = Rect::new(0.0, y, size.x, y + GRID_LINE_WIDTH);
            surface.fill_rect(line, GRID_COLOR);
            y += step;
        }
    }

    fn draw_cursor(&self, surface: &mut impl Surface, sprites: &SpriteLibrary) {
        let p = self.pointer;

        if let Some(key) = sprites.cursor.filter(|key| surface.is_resolved(*key)) {
            let rect = Rect::from_center_size(p, Vec2::splat(self.config.cursor_size));
            surface.draw_image(key, rect, false);
            return;
        }

        let arm = self.config.crosshair_arm;
        surface.stroke_circle(p, self.config.crosshair_radius, CROSSHAIR_COLOR);
        surface.stroke_line(p - Vec2::X * arm, p + Vec2::X * arm, CROSSHAIR_COLOR);
        surface.stroke_line(p - Vec2::Y * arm, p + Vec2::Y * arm, CROSSHAIR_COLOR);
    }

    fn clear_round(&mut self) {
        self.enemies.clear();
        self.effects.clear();
        self.score = 0;
        self.signals.push(GameSignal::ScoreChanged(0));
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.signals.push(GameSignal::PhaseChanged(phase));
    }
}
