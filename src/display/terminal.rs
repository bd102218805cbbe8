/// Half-block rasteriser: every terminal cell shows two vertically stacked
/// field pixels (`▀` with the upper one as foreground, the lower as background).

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use super::Canvas;

pub struct TerminalCanvas<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    field_width: f32,
    field_height: f32,
    background: Color,
    /// `cols × rows*2` colours, row-major.
    pixels: Vec<Color>,
    labels: Vec<(u16, u16, String, Color)>,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, cols: u16, rows: u16, field_width: f32, field_height: f32) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        TerminalCanvas {
            out,
            cols,
            rows,
            field_width,
            field_height,
            background: Color::Black,
            pixels: vec![Color::Black; cols as usize * rows as usize * 2],
            labels: Vec::new(),
        }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    /// Field pixels per sub-cell, horizontally and vertically.
    fn scale(&self) -> (f32, f32) {
        (
            self.field_width / self.cols as f32,
            self.field_height / (self.rows as f32 * 2.0),
        )
    }

    /// Sub-cell span covered by `[start, start + len)` along one axis,
    /// never empty for a positive `len` that lies on screen.
    fn span(start: f32, len: f32, unit: f32, limit: usize) -> std::ops::Range<usize> {
        let lo = (start / unit).floor().max(0.0);
        let hi = ((start + len) / unit).ceil().max(lo + 1.0);
        let lo = (lo as usize).min(limit);
        let hi = (hi as usize).min(limit);
        lo..hi
    }

    fn plot(&mut self, x0: f32, y0: f32, w: f32, h: f32, mut shade: impl FnMut(Color) -> Color) {
        if w <= 0.0 || h <= 0.0 || x0 + w <= 0.0 || y0 + h <= 0.0 {
            return;
        }
        let (sx, sy) = self.scale();
        let width = self.cols as usize;
        let height = self.rows as usize * 2;
        for py in Self::span(y0, h, sy, height) {
            for px in Self::span(x0, w, sx, width) {
                let idx = py * width + px;
                self.pixels[idx] = shade(self.pixels[idx]);
            }
        }
    }
}

/// Mix `fg` over `bg` at `alpha`; non-RGB colours fall back to a threshold.
pub fn blend(fg: Color, bg: Color, alpha: f32) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);
    match (fg, bg) {
        (Color::Rgb { r, g, b }, Color::Rgb { r: br, g: bg_, b: bb }) => {
            let mix = |f: u8, b: u8| (f as f32 * alpha + b as f32 * (1.0 - alpha)).round() as u8;
            Color::Rgb {
                r: mix(r, br),
                g: mix(g, bg_),
                b: mix(b, bb),
            }
        }
        _ if alpha >= 0.5 => fg,
        _ => bg,
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn size(&self) -> (f32, f32) {
        (self.field_width, self.field_height)
    }

    fn clear(&mut self, color: Color) {
        self.background = color;
        self.pixels.iter_mut().for_each(|p| *p = color);
        self.labels.clear();
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.plot(x, y, width, height, |_| color);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, alpha: f32) {
        // At terminal resolution a disc of a few pixels is its bounding box.
        let d = radius * 2.0;
        self.plot(cx - radius, cy - radius, d, d, |under| blend(color, under, alpha));
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        let (sx, _) = self.scale();
        let row_px = self.field_height / self.rows as f32;
        let col = (x / sx).max(0.0) as u16;
        let row = ((y / row_px).max(0.0) as u16).min(self.rows - 1);
        if col < self.cols {
            self.labels.push((col, row, text.to_string(), color));
        }
    }

    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.scale().0
    }

    fn present(&mut self) -> std::io::Result<()> {
        let width = self.cols as usize;
        self.out.queue(terminal::BeginSynchronizedUpdate)?;

        for row in 0..self.rows as usize {
            self.out.queue(cursor::MoveTo(0, row as u16))?;
            let mut current: Option<(Color, Color)> = None;
            for col in 0..width {
                let top = self.pixels[(row * 2) * width + col];
                let bottom = self.pixels[(row * 2 + 1) * width + col];
                if current != Some((top, bottom)) {
                    self.out.queue(style::SetForegroundColor(top))?;
                    self.out.queue(style::SetBackgroundColor(bottom))?;
                    current = Some((top, bottom));
                }
                self.out.queue(Print(if top == bottom { ' ' } else { '▀' }))?;
            }
        }

        // Labels sit on the background colour so they stay legible.
        self.out.queue(style::SetBackgroundColor(self.background))?;
        for (col, row, text, color) in &self.labels {
            let room = (self.cols - col) as usize;
            let clipped: String = text.chars().take(room).collect();
            self.out.queue(cursor::MoveTo(*col, *row))?;
            self.out.queue(style::SetForegroundColor(*color))?;
            self.out.queue(Print(clipped))?;
        }

        self.out.queue(style::ResetColor)?;
        self.out.queue(terminal::EndSynchronizedUpdate)?;
        self.out.flush()
    }

    /// Adopt a new terminal size and wipe the screen; the next frame redraws
    /// into the new grid.
    fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.pixels = vec![self.background; self.cols as usize * self.rows as usize * 2];
        self.labels.clear();
        let _ = self.out.queue(terminal::Clear(terminal::ClearType::All));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> TerminalCanvas<Vec<u8>> {
        // 80×30 cells → 10 field px per column, 10 per half-row.
        TerminalCanvas::new(Vec::new(), 80, 30, 800.0, 600.0)
    }

    #[test]
    fn thin_rect_still_covers_a_cell() {
        let mut c = canvas();
        c.clear(Color::Black);
        c.fill_rect(402.0, 300.0, 4.0, 10.0, Color::Green);
        assert_eq!(c.pixels[30 * 80 + 40], Color::Green);
        assert_eq!(c.pixels.iter().filter(|&&p| p == Color::Green).count(), 1);
    }

    #[test]
    fn offscreen_rect_draws_nothing() {
        let mut c = canvas();
        c.clear(Color::Black);
        c.fill_rect(-50.0, -50.0, 10.0, 10.0, Color::Green);
        c.fill_rect(900.0, 700.0, 10.0, 10.0, Color::Green);
        assert!(c.pixels.iter().all(|&p| p == Color::Black));
    }

    #[test]
    fn blend_halfway_between_rgb() {
        let mixed = blend(
            Color::Rgb { r: 200, g: 100, b: 0 },
            Color::Rgb { r: 0, g: 0, b: 0 },
            0.5,
        );
        assert_eq!(mixed, Color::Rgb { r: 100, g: 50, b: 0 });
    }

    #[test]
    fn resize_reshapes_the_grid() {
        let mut c = canvas();
        c.resize(40, 15);
        assert_eq!(c.pixels.len(), 40 * 30);
        // 20 field px per column now, so a 4px bullet still lands in one cell.
        c.clear(Color::Black);
        c.fill_rect(402.0, 300.0, 4.0, 10.0, Color::Green);
        assert_eq!(c.pixels[15 * 40 + 20], Color::Green);
    }

    #[test]
    fn present_writes_bytes() {
        let mut c = canvas();
        c.clear(Color::Black);
        c.text(10.0, 0.0, "Wave: 1", Color::Green);
        c.present().unwrap();
        let written = String::from_utf8_lossy(c.writer());
        assert!(written.contains("Wave: 1"));
    }
}
