use space_invaders::compute::init_session;
use space_invaders::entities::*;

#[test]
fn direction_helpers() {
    assert_eq!(Direction::Left.sign(), -1.0);
    assert_eq!(Direction::Right.sign(), 1.0);
    assert_eq!(Direction::Left.reversed(), Direction::Right);
    assert_eq!(Direction::Right.reversed().reversed(), Direction::Right);
}

#[test]
fn default_options_enable_everything() {
    let options = GameOptions::default();
    assert!(options.sound_enabled);
    assert!(options.misses_cost_points);
}

#[test]
fn total_score_subtracts_miss_penalty() {
    let mut s = init_session("Ada", GameOptions::default(), 0);
    s.state.score = 40;
    s.state.miss_count = 3;
    assert_eq!(s.miss_penalty(), 15);
    assert_eq!(s.total_score(), 25);

    s.state.miss_count = 10;
    assert_eq!(s.total_score(), -10);
}

#[test]
fn total_score_ignores_misses_when_free() {
    let options = GameOptions {
        sound_enabled: true,
        misses_cost_points: false,
    };
    let mut s = init_session("Ada", options, 0);
    s.state.score = 40;
    s.state.miss_count = 3;
    assert_eq!(s.total_score(), 40);
}

#[test]
fn session_clone_is_independent() {
    let original = init_session("Ada", GameOptions::default(), 0);
    let mut copy = original.clone();
    copy.enemies.clear();
    copy.state.lives = 0;
    assert_eq!(original.enemies.len(), 18);
    assert_eq!(original.state.lives, 3);
    assert_ne!(original, copy);
}

#[test]
fn entity_rects_match_their_boxes() {
    let s = init_session("Ada", GameOptions::default(), 0);
    let r = s.player.rect();
    assert_eq!((r.x, r.y, r.width, r.height), (375.0, 550.0, 50.0, 40.0));
    assert_eq!(s.player.centre(), (400.0, 570.0));

    let e = &s.enemies[0];
    assert_eq!(e.rect().right(), 80.0);
    assert_eq!(e.rect().bottom(), 60.0);
    assert_eq!(e.centre(), (60.0, 45.0));
}

#[test]
fn status_reports_over() {
    let mut s = init_session("Ada", GameOptions::default(), 0);
    assert!(!s.is_over());
    s.state.status = GameStatus::GameOver;
    assert!(s.is_over());
}
