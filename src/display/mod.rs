/// Rendering layer.
///
/// Each function receives a mutable `Canvas` and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into drawing calls in field coordinates.  `terminal` rasterises
/// those calls onto a crossterm screen.

pub mod terminal;

use crossterm::style::Color;

use crate::entities::{BulletOwner, Enemy, GameOptions, Particle, Session};
use crate::leaderboard::ScoreRecord;
use crate::tuning::PARTICLE_LIFE;

// ── Drawing surface ───────────────────────────────────────────────────────────

/// A 2D surface addressed in field pixels (origin top-left, y down).
pub trait Canvas {
    /// Logical `(width, height)` of the surface.
    fn size(&self) -> (f32, f32);
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    /// A filled disc drawn at `alpha` opacity over whatever is beneath it.
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, alpha: f32);
    /// Draw a line of text whose top-left corner is at `(x, y)`.
    fn text(&mut self, x: f32, y: f32, text: &str, color: Color);
    /// Horizontal extent of `text` in field pixels.
    fn measure(&self, text: &str) -> f32;
    fn present(&mut self) -> std::io::Result<()>;
    /// The output device changed size (in its own cells); surfaces that
    /// don't care ignore it.
    fn resize(&mut self, _cols: u16, _rows: u16) {}
}

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BACKGROUND: Color = rgb(0x0a, 0x0a, 0x0a);
pub const C_PLAYER: Color = rgb(0x00, 0xff, 0x00);
pub const C_ENEMY_BODY: Color = rgb(0xff, 0x00, 0x00);
pub const C_ENEMY_SHADE: Color = rgb(0xcc, 0x00, 0x00);
pub const C_ENEMY_EYE: Color = rgb(0xff, 0xaa, 0x00);
pub const C_BULLET_ENEMY: Color = rgb(0xff, 0x00, 0x00);
pub const C_HUD: Color = rgb(0xff, 0xff, 0x00);
pub const C_HUD_LIVES: Color = rgb(0xff, 0x40, 0x40);
pub const C_HINT: Color = rgb(0x60, 0x60, 0x60);
pub const C_TEXT: Color = rgb(0xff, 0xff, 0xff);
pub const C_HIGHLIGHT: Color = rgb(0x00, 0xff, 0xff);

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

// ── Invader sprite ────────────────────────────────────────────────────────────

pub const INVADER_PATTERN: [[u8; 8]; 6] = [
    [0, 0, 1, 1, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 0, 1, 1, 0, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 0, 1, 1, 0, 1, 0],
    [0, 0, 1, 0, 0, 1, 0, 0],
];

/// Colour zone of one lit cell: eyes, shaded lower body and flanks, or body.
pub fn invader_cell_color(row: usize, col: usize) -> Color {
    if (col == 2 || col == 5) && (row == 1 || row == 2) {
        C_ENEMY_EYE
    } else if row == 3 || (row == 2 && (col == 0 || col == 7)) {
        C_ENEMY_SHADE
    } else {
        C_ENEMY_BODY
    }
}

/// Fully saturated, half-lightness colour for `hue` degrees.
pub fn hue_to_rgb(hue: f32) -> Color {
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let scale = |c: f32| (c * 255.0).round() as u8;
    rgb(scale(r), scale(g), scale(b))
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame and present it.
pub fn render<C: Canvas>(canvas: &mut C, session: &Session, high_score: u32) -> std::io::Result<()> {
    draw_field(canvas, session, high_score);
    canvas.present()
}

/// Paint a frame without presenting, so overlays can be stacked on top.
pub fn draw_field<C: Canvas>(canvas: &mut C, session: &Session, high_score: u32) {
    canvas.clear(C_BACKGROUND);

    draw_player(canvas, session);
    for bullet in &session.player.bullets {
        canvas.fill_rect(bullet.x, bullet.y, bullet.width, bullet.height, C_PLAYER);
    }
    for enemy in session.enemies.iter().filter(|e| e.active) {
        draw_invader(canvas, enemy);
    }
    for bullet in session.enemy_bullets.iter().filter(|b| b.owner == BulletOwner::Enemy) {
        canvas.fill_rect(bullet.x, bullet.y, bullet.width, bullet.height, C_BULLET_ENEMY);
    }
    for particle in &session.particles {
        draw_particle(canvas, particle);
    }

    draw_hud(canvas, session, high_score);
    canvas.text(10.0, 25.0, &format!("Wave: {}", session.state.level), C_PLAYER);
    draw_controls_hint(canvas);

    if session.state.paused {
        draw_centered_block(
            canvas,
            &[
                ("PAUSED", C_HUD),
                ("P - Resume   O - Options   R - Restart", C_TEXT),
            ],
            0.45,
        );
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<C: Canvas>(canvas: &mut C, session: &Session) {
    let p = &session.player;
    canvas.fill_rect(p.x, p.y, p.width, p.height, C_PLAYER);

    // Nose: a 10px triangle above the hull, stacked from thin slices.
    const NOSE_HEIGHT: f32 = 10.0;
    const SLICES: usize = 5;
    let slice = NOSE_HEIGHT / SLICES as f32;
    for i in 0..SLICES {
        let widen = (i + 1) as f32 / SLICES as f32;
        let w = p.width * widen;
        let y = p.y - NOSE_HEIGHT + i as f32 * slice;
        canvas.fill_rect(p.x + (p.width - w) / 2.0, y, w, slice, C_PLAYER);
    }
}

fn draw_invader<C: Canvas>(canvas: &mut C, enemy: &Enemy) {
    let cell = enemy.width / 8.0;
    for (row, cells) in INVADER_PATTERN.iter().enumerate() {
        for (col, &lit) in cells.iter().enumerate() {
            if lit == 1 {
                canvas.fill_rect(
                    enemy.x + col as f32 * cell,
                    enemy.y + row as f32 * cell,
                    cell,
                    cell,
                    invader_cell_color(row, col),
                );
            }
        }
    }
}

fn draw_particle<C: Canvas>(canvas: &mut C, p: &Particle) {
    let life = PARTICLE_LIFE as f32;
    let elapsed = (life - p.life as f32) / life;
    let alpha = p.life as f32 / life;
    canvas.fill_circle(
        p.x + p.vx * elapsed,
        p.y + p.vy * elapsed,
        3.0,
        hue_to_rgb(p.hue),
        alpha,
    );
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<C: Canvas>(canvas: &mut C, session: &Session, high_score: u32) {
    let s = &session.state;
    let left = format!(
        "{}  Hi:{}  Lvl:{}  Hits:{}  Misses:{} (-{})  Score:{}",
        s.player_name,
        high_score,
        s.level,
        s.score,
        s.miss_count,
        session.miss_penalty(),
        session.total_score(),
    );
    canvas.text(10.0, 0.0, &left, C_HUD);

    let lives = format!("Lives:{}", s.lives.max(0));
    let (width, _) = canvas.size();
    let x = width - canvas.measure(&lives) - 10.0;
    canvas.text(x, 0.0, &lives, C_HUD_LIVES);
}

fn draw_controls_hint<C: Canvas>(canvas: &mut C) {
    let (_, height) = canvas.size();
    canvas.text(
        10.0,
        height - 12.0,
        "← → : Move  SPACE : Shoot  P : Pause  O : Options  Q : Quit",
        C_HINT,
    );
}

/// Stack `lines` centred horizontally, starting at `top` × field height.
fn draw_centered_block<C: Canvas>(canvas: &mut C, lines: &[(&str, Color)], top: f32) {
    let (width, height) = canvas.size();
    let line_height = 25.0;
    for (i, (line, color)) in lines.iter().enumerate() {
        let x = ((width - canvas.measure(line)) / 2.0).max(0.0);
        canvas.text(x, height * top + i as f32 * line_height, line, *color);
    }
}

// ── Screens ───────────────────────────────────────────────────────────────────

/// Draw the leaderboard as a ranked list starting at `top` (field pixels).
/// Rows belonging to `highlight` are drawn in the highlight colour.
pub fn draw_leaderboard<C: Canvas>(
    canvas: &mut C,
    entries: &[ScoreRecord],
    highlight: Option<&str>,
    top: f32,
) {
    let line_height = 25.0;
    if entries.is_empty() {
        let (_, height) = canvas.size();
        draw_centered_block(canvas, &[("No scores yet. Be the first!", C_HINT)], top / height);
        return;
    }

    let mut y = top;
    let leader_is_player = highlight.is_some_and(|name| entries[0].name == name);
    if leader_is_player {
        let banner = "*** NEW TOP SCORE! ***";
        let x = (canvas.size().0 - canvas.measure(banner)) / 2.0;
        canvas.text(x.max(0.0), y, banner, C_HUD);
        y += line_height;
    }

    for (rank, entry) in entries.iter().enumerate() {
        let crown = if rank == 0 && leader_is_player { "♛ " } else { "  " };
        let line = format!(
            "{}#{:<3}{:<16}{:>7}  Lvl:{:<3}{:>8}",
            crown,
            rank + 1,
            entry.name,
            entry.score,
            entry.level,
            format_duration(entry.duration),
        );
        let color = if highlight.is_some_and(|name| entry.name == name) {
            C_HIGHLIGHT
        } else {
            C_TEXT
        };
        let x = ((canvas.size().0 - canvas.measure(&line)) / 2.0).max(0.0);
        canvas.text(x, y, &line, color);
        y += line_height;
    }
}

/// `"3m 7s"`, or `"-"` when no duration was recorded.
pub fn format_duration(secs: u64) -> String {
    if secs == 0 {
        "-".to_string()
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

pub fn render_start_screen<C: Canvas>(
    canvas: &mut C,
    name_input: &str,
    leaderboard: &[ScoreRecord],
) -> std::io::Result<()> {
    canvas.clear(C_BACKGROUND);
    let name_line = format!("Name: {}_", name_input);
    draw_centered_block(
        canvas,
        &[
            ("SPACE  INVADERS", C_PLAYER),
            ("", C_TEXT),
            (name_line.as_str(), C_TEXT),
            ("ENTER - Start   TAB - Options   ESC - Quit", C_HINT),
        ],
        0.08,
    );
    let (_, height) = canvas.size();
    draw_leaderboard(canvas, leaderboard, None, height * 0.35);
    canvas.present()
}

pub fn render_options<C: Canvas>(canvas: &mut C, options: &GameOptions) -> std::io::Result<()> {
    canvas.clear(C_BACKGROUND);
    let flag = |on: bool| if on { "[x]" } else { "[ ]" };
    let sound = format!("1  {} Sound", flag(options.sound_enabled));
    let misses = format!("2  {} Misses cost points", flag(options.misses_cost_points));
    draw_centered_block(
        canvas,
        &[
            ("OPTIONS", C_HUD),
            ("", C_TEXT),
            (sound.as_str(), C_TEXT),
            (misses.as_str(), C_TEXT),
            ("", C_TEXT),
            ("O / ESC - Close", C_HINT),
        ],
        0.3,
    );
    canvas.present()
}

pub fn render_game_over<C: Canvas>(
    canvas: &mut C,
    session: &Session,
    leaderboard: &[ScoreRecord],
) -> std::io::Result<()> {
    canvas.clear(C_BACKGROUND);
    let s = &session.state;
    let player = format!("Player: {}", s.player_name);
    let score = format!("Final Score: {}", s.score);
    let level = format!("Level Reached: {}", s.level);
    draw_centered_block(
        canvas,
        &[
            ("GAME OVER!", C_ENEMY_BODY),
            ("Better luck next time!", C_TEXT),
            (player.as_str(), C_TEXT),
            (score.as_str(), C_HUD),
            (level.as_str(), C_TEXT),
            ("R - Play Again   Q - Quit", C_HINT),
        ],
        0.05,
    );
    let (_, height) = canvas.size();
    draw_leaderboard(canvas, leaderboard, Some(&s.player_name), height * 0.35);
    canvas.present()
}
