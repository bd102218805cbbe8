/// Frame loop: update, render, then wait for the next display tick.
///
/// The loop owns the `Session` for its lifetime and hands it back through
/// `LoopExit`, so nothing about a game lives in globals.  Pausing never stops
/// the loop; the update step simply does nothing while paused.

use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::compute::{set_paused, tick, toggle_pause, Controls};
use crate::display::{self, Canvas};
use crate::entities::Session;
use crate::sound::SoundSink;

/// ≈60 FPS, the display refresh the movement constants are tuned for.
pub const FRAME: Duration = Duration::from_millis(16);

/// "Run me again on the next display tick."
pub trait FrameScheduler {
    fn wait_for_frame(&mut self);
}

/// Sleeps away whatever is left of the frame budget.
pub struct FixedRate {
    frame: Duration,
    last: Instant,
}

impl FixedRate {
    pub fn new(frame: Duration) -> Self {
        FixedRate {
            frame,
            last: Instant::now(),
        }
    }
}

impl FrameScheduler for FixedRate {
    fn wait_for_frame(&mut self) {
        let elapsed = self.last.elapsed();
        if elapsed < self.frame {
            thread::sleep(self.frame - elapsed);
        }
        self.last = Instant::now();
    }
}

/// Everything the player asked for since the previous frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub controls: Controls,
    pub toggle_pause: bool,
    pub open_options: bool,
    pub restart: bool,
    pub quit: bool,
    /// New terminal size in cells, when it changed.
    pub resize: Option<(u16, u16)>,
}

pub trait InputSource {
    fn poll(&mut self) -> FrameInput;
}

#[derive(Debug)]
pub enum LoopExit {
    /// The session ended; the game-over sequence is the caller's.
    GameOver(Session),
    /// The player wants the options screen; the session comes back paused.
    Options(Session),
    Restart,
    Quit,
}

/// Drive `session` until it ends or the player leaves it.
#[allow(clippy::too_many_arguments)]
pub fn run_loop<C, I, S, F, R>(
    session: Session,
    canvas: &mut C,
    input: &mut I,
    sound: &mut S,
    scheduler: &mut F,
    rng: &mut R,
    high_score: u32,
) -> std::io::Result<LoopExit>
where
    C: Canvas,
    I: InputSource,
    S: SoundSink,
    F: FrameScheduler,
    R: Rng,
{
    let mut session = session;
    loop {
        let frame = input.poll();
        if let Some((cols, rows)) = frame.resize {
            canvas.resize(cols, rows);
        }
        if frame.quit {
            return Ok(LoopExit::Quit);
        }
        if frame.restart {
            return Ok(LoopExit::Restart);
        }
        if frame.open_options {
            return Ok(LoopExit::Options(set_paused(&session, true)));
        }
        if frame.toggle_pause {
            session = toggle_pause(&session);
            tracing::debug!(paused = session.state.paused, "pause toggled");
        }

        let (next, events) = tick(&session, &frame.controls, rng);
        session = next;
        for event in events {
            tracing::debug!(?event, "game event");
            if session.options.sound_enabled {
                sound.play(event);
            }
        }

        display::render(canvas, &session, high_score)?;

        if session.is_over() {
            return Ok(LoopExit::GameOver(session));
        }
        scheduler.wait_for_frame();
    }
}
