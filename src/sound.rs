/// Sound events emitted by the update step and the sinks that voice them.

use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Shoot,
    Hit,
    Miss,
    Damage,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Waveform {
    Sine,
    Square,
}

/// A synthesised cue: start and end frequency (equal unless the tone glides).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration_ms: u32,
    pub waveform: Waveform,
}

impl GameEvent {
    pub fn tone(self) -> Tone {
        let (start_hz, end_hz, duration_ms, waveform) = match self {
            GameEvent::Shoot => (400.0, 400.0, 100, Waveform::Square),
            GameEvent::Hit => (800.0, 800.0, 200, Waveform::Sine),
            GameEvent::Miss => (200.0, 200.0, 150, Waveform::Sine),
            GameEvent::Damage => (100.0, 100.0, 300, Waveform::Square),
            GameEvent::GameOver => (400.0, 100.0, 800, Waveform::Sine),
        };
        Tone {
            start_hz,
            end_hz,
            duration_ms,
            waveform,
        }
    }
}

pub trait SoundSink {
    fn play(&mut self, event: GameEvent);
}

/// Rings the terminal bell for the cues worth interrupting the player for.
/// Shots and misses are too frequent to bell on.
pub struct BellSink<W: Write> {
    out: W,
}

impl<W: Write> BellSink<W> {
    pub fn new(out: W) -> Self {
        BellSink { out }
    }
}

impl<W: Write> SoundSink for BellSink<W> {
    fn play(&mut self, event: GameEvent) {
        if matches!(event, GameEvent::Hit | GameEvent::Damage | GameEvent::GameOver) {
            // A lost bell is not worth failing the frame over.
            let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_over_tone_glides_down() {
        let tone = GameEvent::GameOver.tone();
        assert_eq!(tone.start_hz, 400.0);
        assert_eq!(tone.end_hz, 100.0);
        assert_eq!(tone.duration_ms, 800);
    }

    #[test]
    fn bell_only_for_loud_events() {
        let mut sink = BellSink::new(Vec::new());
        sink.play(GameEvent::Shoot);
        sink.play(GameEvent::Miss);
        assert!(sink.out.is_empty());
        sink.play(GameEvent::Hit);
        sink.play(GameEvent::Damage);
        assert_eq!(sink.out, b"\x07\x07");
    }
}
