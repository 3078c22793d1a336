//! End-to-end rounds driven through the controller's public API, the same
//! way the gameplay plugin drives it, but with a recording surface and a
//! seeded rng instead of a window.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use click_shooter::config::{GameConfig, Tunables};
use click_shooter::controller::{GameController, GamePhase, GameSignal};
use click_shooter::render::{collect_quads, QuadFill};
use click_shooter::sprites::{ImageHandles, SpriteLibrary};
use click_shooter::surface::{DrawCommand, DrawList, ImageKey};

const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

fn game(seed: u64) -> GameController {
    GameController::new(GameConfig::default(), StdRng::seed_from_u64(seed))
}

fn sprites() -> SpriteLibrary {
    SpriteLibrary {
        background: None,
        cursor: None,
        enemy_move: vec![ImageKey(0), ImageKey(1), ImageKey(2)],
        enemy_death: vec![ImageKey(3), ImageKey(4)],
        fire_effect: vec![ImageKey(5), ImageKey(6)],
    }
}

fn surface() -> DrawList {
    let mut surface = DrawList::new(SCREEN);
    surface.resolve_all(7);
    surface
}

/// Ticks just past the spawn interval so exactly one enemy appears.
fn tick_until_spawn(
    game: &mut GameController,
    now: &mut f64,
    surface: &mut DrawList,
    sprites: &SpriteLibrary,
    tunables: &Tunables,
) {
    *now += game.config().spawn_interval_ms + 1.0;
    game.tick(*now, surface, sprites, tunables);
}

#[test]
fn ten_hits_win_the_round() {
    let mut game = game(11);
    let mut surface = surface();
    let sprites = sprites();
    let tunables = Tunables::default();
    let mut now = 0.0;

    game.start(now);
    game.take_signals();

    for hit in 1..=10 {
        tick_until_spawn(&mut game, &mut now, &mut surface, &sprites, &tunables);
        let target = game
            .enemies()
            .iter()
            .rev()
            .find(|enemy| enemy.is_alive())
            .map(|enemy| enemy.bounds().center())
            .expect("an enemy should have spawned");

        assert!(game.click(target, &sprites, &tunables));
        assert_eq!(game.score(), hit);
    }

    assert_eq!(game.phase(), GamePhase::Victory);
    let signals = game.take_signals();
    assert_eq!(signals.first(), Some(&GameSignal::ScoreChanged(1)));
    assert_eq!(
        &signals[signals.len() - 2..],
        &[
            GameSignal::ScoreChanged(10),
            GameSignal::PhaseChanged(GamePhase::Victory)
        ]
    );

    // The field is frozen until restart.
    let frozen = surface.commands().to_vec();
    game.tick(now + 10_000.0, &mut surface, &sprites, &tunables);
    assert_eq!(surface.commands(), frozen.as_slice());
    assert!(!game.click(Vec2::new(400.0, 300.0), &sprites, &tunables));

    game.restart();
    assert_eq!(game.phase(), GamePhase::Settings);
    assert_eq!(game.score(), 0);
    assert!(game.enemies().is_empty());
    assert!(game.effects().is_empty());
}

#[test]
fn rounds_can_be_played_back_to_back() {
    let mut game = game(3);
    let mut surface = surface();
    let sprites = sprites();
    let tunables = Tunables::default();
    let mut now = 0.0;

    for _ in 0..2 {
        game.start(now);
        tick_until_spawn(&mut game, &mut now, &mut surface, &sprites, &tunables);
        assert_eq!(game.enemies().len(), 1);

        game.click(Vec2::new(-500.0, -500.0), &sprites, &tunables);
        let target = game.enemies()[0].bounds().center();
        assert!(game.click(target, &sprites, &tunables));
        assert_eq!(game.score(), 1);
        assert_eq!(game.effects().len(), 2);

        game.return_to_settings();
        assert_eq!(game.phase(), GamePhase::Settings);
        assert_eq!(game.score(), 0);
        assert!(game.enemies().is_empty());
        assert!(game.effects().is_empty());

        // Time keeps moving while the settings panel is up.
        now += 5_000.0;
    }
}

#[test]
fn enemies_that_cross_the_screen_are_dropped_without_scoring() {
    let mut game = game(5);
    let mut surface = surface();
    let sprites = sprites();
    let tunables = Tunables {
        enemy_speed: 50.0,
        ..Tunables::default()
    };
    let mut now = 0.0;

    game.start(now);
    tick_until_spawn(&mut game, &mut now, &mut surface, &sprites, &tunables);
    assert_eq!(game.enemies().len(), 1);

    // 880 px at 50 px per tick, well inside one spawn interval.
    for _ in 0..20 {
        now += 16.0;
        game.tick(now, &mut surface, &sprites, &tunables);
    }

    assert!(game.enemies().is_empty());
    assert_eq!(game.score(), 0);
    assert_eq!(game.phase(), GamePhase::Playing);
}

#[test]
fn speed_change_applies_to_later_spawns_only() {
    let mut game = game(9);
    let mut surface = surface();
    let sprites = sprites();
    let mut tunables = Tunables::default();
    let mut now = 0.0;

    game.start(now);
    tick_until_spawn(&mut game, &mut now, &mut surface, &sprites, &tunables);

    tunables.enemy_speed = 10.0;
    tick_until_spawn(&mut game, &mut now, &mut surface, &sprites, &tunables);

    let speeds: Vec<f32> = game.enemies().iter().map(|enemy| enemy.speed).collect();
    assert_eq!(speeds, vec![3.0, 10.0]);
}

#[test]
fn every_frame_draws_background_then_enemies_then_cursor() {
    let mut game = game(1);
    let mut surface = surface();
    let sprites = sprites();
    let tunables = Tunables::default();
    let mut now = 0.0;

    game.start(now);
    game.pointer_moved(Vec2::new(200.0, 200.0));
    tick_until_spawn(&mut game, &mut now, &mut surface, &sprites, &tunables);

    let commands = surface.commands();
    assert!(matches!(commands.first(), Some(DrawCommand::FillRect { .. })));
    assert!(matches!(commands.last(), Some(DrawCommand::Line { .. })));

    // The animation clock starts at zero, so the first update at 2001 ms has
    // already stepped to the second walk frame.
    let enemy_frames: Vec<ImageKey> = surface.images().map(|(key, _, _)| key).collect();
    assert_eq!(enemy_frames, vec![ImageKey(1)]);
}

#[test]
fn default_grid_is_layered_under_enemies() {
    let mut game = game(4);
    let mut surface = surface();
    let sprites = sprites();
    let tunables = Tunables::default();
    let mut now = 0.0;

    game.start(now);
    tick_until_spawn(&mut game, &mut now, &mut surface, &sprites, &tunables);

    let handles = ImageHandles(vec![Handle::default(); 7]);
    let quads = collect_quads(&surface, &handles);
    let first_image = quads
        .iter()
        .position(|quad| matches!(quad.fill, QuadFill::Image { .. }))
        .expect("the enemy should be drawn");

    // Backdrop and 1 px grid come first, so their sprite slots get lower z.
    assert_eq!(first_image, 1 + 16 + 12);
    assert!(quads[..first_image]
        .iter()
        .all(|quad| matches!(quad.fill, QuadFill::Color(_))));
    assert!(quads[1..first_image]
        .iter()
        .all(|quad| quad.size.x == 1.0 || quad.size.y == 1.0));
    assert!(
        quads[first_image - 1].transform(first_image - 1).translation.z
            < quads[first_image].transform(first_image).translation.z
    );
}
