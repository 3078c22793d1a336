mod common;

use bevy::prelude::*;

use click_shooter::controller::{GameController, GamePhase};
use click_shooter::gameplay::Score;
use click_shooter::surface::{DrawList, Surface};

fn phase(app: &App) -> GamePhase {
    *app.world().resource::<State<GamePhase>>().get()
}

#[test]
fn boots_into_settings_and_idles() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }

    assert_eq!(phase(&app), GamePhase::Settings);
    assert!(app.world().resource::<DrawList>().commands().is_empty());
    assert_eq!(app.world().resource::<GameController>().enemies().len(), 0);
}

#[test]
fn enter_starts_a_round_and_escape_leaves_it() {
    let mut app = common::app_headless();
    app.update();

    common::tap(&mut app, KeyCode::Enter);
    app.update();
    assert_eq!(phase(&app), GamePhase::Playing);

    // Past the 2 s spawn interval.
    for _ in 0..25 {
        app.update();
    }

    let window_width = app
        .world_mut()
        .query::<&Window>()
        .single(app.world())
        .map(|window| window.width())
        .unwrap();
    {
        let draw_list = app.world().resource::<DrawList>();
        assert_eq!(draw_list.size().x, window_width);
        assert!(!draw_list.commands().is_empty());
    }
    assert!(!app.world().resource::<GameController>().enemies().is_empty());
    assert_eq!(app.world().resource::<Score>().0, 0);

    common::tap(&mut app, KeyCode::Escape);
    app.update();

    assert_eq!(phase(&app), GamePhase::Settings);
    assert!(app.world().resource::<GameController>().enemies().is_empty());
    assert!(app.world().resource::<DrawList>().commands().is_empty());
}
