//! Keyboard model: turns raw crossterm events into one `FrameInput` per frame.
//!
//! Instead of acting on each key event individually, we keep a `key_frame` map
//! that records the frame number of the last press/repeat event for every key.
//! Each frame we check which keys are still "fresh" (within `HOLD_WINDOW`
//! frames) and apply all their effects simultaneously, so Space and ←/→ can be
//! held at the same time with no interference.
//!
//! Works on two classes of terminal:
//! * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
//!   `Press` / `Repeat` / `Release` events, keys are removed on release.
//! * **Classic terminals**: only `Press` events (OS key-repeat shows as
//!   repeated `Press`).  Keys expire after `HOLD_WINDOW` frames of silence.
//!
//! Firing is press-driven: a shot needs a Space press that arrives while Space
//! was not already held, so keeping the key down fires once.

use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::compute::Controls;
use crate::driver::FrameInput;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  The OS key-repeat rate is ≥ 15 Hz, so a window of 8
/// frames (≈133 ms) is always refreshed while the key stays down.
pub const HOLD_WINDOW: u64 = 8;

/// Min frames between two separate fire presses (≈6 shots/sec for a fast
/// tapper); the 5-bullet cap still bites.
pub const SHOOT_COOLDOWN: u32 = 10;

const FIRE: KeyCode = KeyCode::Char(' ');

#[derive(Debug, Default)]
pub struct KeyboardState {
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    shoot_cooldown: u32,
    /// Space was still held when the previous frame closed.
    fire_was_held: bool,
    /// A fresh Space press arrived during the current frame.
    fire_pressed: bool,
    pending: FrameInput,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_held(&self, key: &KeyCode) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Fold one terminal event into the frame being collected.
    pub fn handle(&mut self, event: &Event) {
        let KeyEvent {
            code,
            kind,
            modifiers,
            ..
        } = match event {
            Event::Key(key) => *key,
            Event::Resize(cols, rows) => {
                self.pending.resize = Some((*cols, *rows));
                return;
            }
            _ => return,
        };

        match kind {
            KeyEventKind::Press => {
                if code == FIRE && !self.fire_was_held && !self.is_held(&FIRE) {
                    self.fire_pressed = true;
                }
                self.key_frame.insert(code, self.frame);
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.pending.quit = true
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        self.pending.quit = true
                    }
                    KeyCode::Char('p') | KeyCode::Char('P') => self.pending.toggle_pause = true,
                    KeyCode::Char('o') | KeyCode::Char('O') => self.pending.open_options = true,
                    KeyCode::Char('r') | KeyCode::Char('R') => self.pending.restart = true,
                    _ => {}
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
            }
        }
    }

    /// Close the current frame and hand back everything asked for during it.
    pub fn finish_frame(&mut self) -> FrameInput {
        let mut input = std::mem::take(&mut self.pending);
        input.controls = Controls {
            left: self.is_held(&KeyCode::Left),
            right: self.is_held(&KeyCode::Right),
            fire: false,
        };

        if self.fire_pressed && self.shoot_cooldown == 0 {
            input.controls.fire = true;
            self.shoot_cooldown = SHOOT_COOLDOWN;
        }
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        self.fire_pressed = false;
        self.fire_was_held = self.is_held(&FIRE);

        self.frame += 1;
        input
    }
}
