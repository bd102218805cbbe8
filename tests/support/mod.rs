// Shared fakes for driving the game without a terminal.
#![allow(dead_code)]

use std::collections::VecDeque;

use crossterm::style::Color;

use space_invaders::display::Canvas;
use space_invaders::driver::{FrameInput, FrameScheduler, InputSource};
use space_invaders::sound::{GameEvent, SoundSink};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Clear(Color),
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
    Circle { cx: f32, cy: f32, r: f32, color: Color, alpha: f32 },
    Text { x: f32, y: f32, text: String, color: Color },
    Present,
    Resize { cols: u16, rows: u16 },
}

// Canvas that remembers every call, 10 field px per character.
#[derive(Default)]
pub struct Recorder {
    pub ops: Vec<Op>,
}

impl Recorder {
    pub fn rects_in(&self, color: Color) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Rect { color: c, .. } if *c == color))
            .count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn presents(&self) -> usize {
        self.ops.iter().filter(|op| **op == Op::Present).count()
    }
}

impl Canvas for Recorder {
    fn size(&self) -> (f32, f32) {
        (800.0, 600.0)
    }

    fn clear(&mut self, color: Color) {
        self.ops.push(Op::Clear(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ops.push(Op::Rect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color, alpha: f32) {
        self.ops.push(Op::Circle { cx, cy, r, color, alpha });
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        self.ops.push(Op::Text {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }

    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.ops.push(Op::Present);
        Ok(())
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.ops.push(Op::Resize { cols, rows });
    }
}

// Input replayed frame by frame; idle once the script runs out.
pub struct ScriptedInput {
    pub frames: VecDeque<FrameInput>,
}

impl ScriptedInput {
    pub fn new(frames: Vec<FrameInput>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> FrameInput {
        self.frames.pop_front().unwrap_or_default()
    }
}

// Scheduler that never sleeps and counts how often the loop asked for another frame.
#[derive(Default)]
pub struct ManualScheduler {
    pub waits: usize,
}

impl FrameScheduler for ManualScheduler {
    fn wait_for_frame(&mut self) {
        self.waits += 1;
    }
}

#[derive(Default)]
pub struct SoundLog {
    pub played: Vec<GameEvent>,
}

impl SoundSink for SoundLog {
    fn play(&mut self, event: GameEvent) {
        self.played.push(event);
    }
}
