mod support;

use space_invaders::compute::{init_session, toggle_pause, Controls};
use space_invaders::display::C_BACKGROUND;
use space_invaders::driver::{run_loop, FrameInput, LoopExit};
use space_invaders::entities::*;
use space_invaders::sound::GameEvent;
use space_invaders::tuning::*;

use rand::rngs::StdRng;
use rand::SeedableRng;
use support::{ManualScheduler, Op, Recorder, ScriptedInput, SoundLog};

struct Rig {
    canvas: Recorder,
    sound: SoundLog,
    scheduler: ManualScheduler,
    rng: StdRng,
}

impl Rig {
    fn new() -> Self {
        Rig {
            canvas: Recorder::default(),
            sound: SoundLog::default(),
            scheduler: ManualScheduler::default(),
            rng: StdRng::seed_from_u64(7),
        }
    }

    fn run(&mut self, session: Session, script: Vec<FrameInput>) -> LoopExit {
        let mut input = ScriptedInput::new(script);
        run_loop(
            session,
            &mut self.canvas,
            &mut input,
            &mut self.sound,
            &mut self.scheduler,
            &mut self.rng,
            0,
        )
        .unwrap()
    }
}

fn quiet_session() -> Session {
    let mut s = init_session("Tester", GameOptions::default(), 0);
    s.enemies.truncate(1);
    s.settings.enemy_fire_rate = 0.0;
    s
}

/// One life left and an enemy bullet about to land on the player.
fn doomed_session() -> Session {
    let mut s = quiet_session();
    s.state.lives = 1;
    s.enemy_bullets.push(Bullet {
        x: 390.0,
        y: 540.0,
        width: BULLET_WIDTH,
        height: BULLET_HEIGHT,
        speed: ENEMY_BULLET_SPEED,
        owner: BulletOwner::Enemy,
        hit: false,
    });
    s
}

fn press(f: impl FnOnce(&mut FrameInput)) -> FrameInput {
    let mut frame = FrameInput::default();
    f(&mut frame);
    frame
}

#[test]
fn game_over_stops_without_scheduling() {
    let mut rig = Rig::new();
    let exit = rig.run(doomed_session(), Vec::new());
    match exit {
        LoopExit::GameOver(s) => {
            assert!(s.is_over());
            assert_eq!(s.state.lives, 0);
        }
        other => panic!("unexpected exit: {other:?}"),
    }
    assert_eq!(rig.scheduler.waits, 0);
    assert_eq!(rig.canvas.presents(), 1);
    assert_eq!(rig.sound.played, vec![GameEvent::Damage, GameEvent::GameOver]);
}

#[test]
fn muted_session_plays_nothing() {
    let mut s = doomed_session();
    s.options.sound_enabled = false;
    let mut rig = Rig::new();
    let exit = rig.run(s, Vec::new());
    assert!(matches!(exit, LoopExit::GameOver(_)));
    assert!(rig.sound.played.is_empty());
}

#[test]
fn paused_frames_keep_rendering_but_freeze_state() {
    let original = quiet_session();
    let script = vec![
        press(|f| f.toggle_pause = true),
        FrameInput::default(),
        FrameInput::default(),
        press(|f| f.open_options = true),
    ];
    let mut rig = Rig::new();
    let exit = rig.run(original.clone(), script);
    match exit {
        LoopExit::Options(s) => {
            assert!(s.state.paused);
            assert_eq!(s, toggle_pause(&original));
            assert_eq!(s.enemies, original.enemies);
            assert_eq!(s.player, original.player);
        }
        other => panic!("unexpected exit: {other:?}"),
    }
    assert_eq!(rig.canvas.presents(), 3);
    assert_eq!(rig.scheduler.waits, 3);
    assert!(rig.sound.played.is_empty());
}

#[test]
fn options_hand_back_a_paused_session() {
    let script = vec![
        press(|f| {
            f.controls = Controls {
                left: true,
                ..Controls::default()
            }
        }),
        press(|f| f.open_options = true),
    ];
    let mut rig = Rig::new();
    match rig.run(quiet_session(), script) {
        LoopExit::Options(s) => {
            assert!(s.state.paused);
            assert_eq!(s.player.x, 370.0);
        }
        other => panic!("unexpected exit: {other:?}"),
    }
    assert_eq!(rig.scheduler.waits, 1);
}

#[test]
fn fire_plays_shoot_sound() {
    let script = vec![
        press(|f| {
            f.controls = Controls {
                fire: true,
                ..Controls::default()
            }
        }),
        press(|f| f.quit = true),
    ];
    let mut rig = Rig::new();
    assert!(matches!(rig.run(quiet_session(), script), LoopExit::Quit));
    assert_eq!(rig.sound.played, vec![GameEvent::Shoot]);
}

#[test]
fn restart_leaves_before_rendering() {
    let mut rig = Rig::new();
    let exit = rig.run(quiet_session(), vec![press(|f| f.restart = true)]);
    assert!(matches!(exit, LoopExit::Restart));
    assert!(rig.canvas.ops.is_empty());
    assert_eq!(rig.scheduler.waits, 0);
}

#[test]
fn quit_wins_over_restart() {
    let mut rig = Rig::new();
    let exit = rig.run(
        quiet_session(),
        vec![press(|f| {
            f.quit = true;
            f.restart = true;
        })],
    );
    assert!(matches!(exit, LoopExit::Quit));
}

#[test]
fn resize_applies_before_the_next_frame_is_drawn() {
    let script = vec![
        FrameInput::default(),
        press(|f| f.resize = Some((120, 40))),
        press(|f| f.quit = true),
    ];
    let mut rig = Rig::new();
    assert!(matches!(rig.run(quiet_session(), script), LoopExit::Quit));

    let resize_at = rig
        .canvas
        .ops
        .iter()
        .position(|op| *op == Op::Resize { cols: 120, rows: 40 })
        .expect("resize reaches the canvas");
    let presents_before = rig.canvas.ops[..resize_at]
        .iter()
        .filter(|op| **op == Op::Present)
        .count();
    assert_eq!(presents_before, 1);
    assert_eq!(rig.canvas.presents(), 2);
    assert_eq!(rig.canvas.ops[resize_at + 1], Op::Clear(C_BACKGROUND));
}
