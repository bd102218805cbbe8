/// Gameplay constants and the level → difficulty tables.

use crate::entities::GameSettings;

// ── Field ─────────────────────────────────────────────────────────────────────

pub const CANVAS_WIDTH: f32 = 800.0;
pub const CANVAS_HEIGHT: f32 = 600.0;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 40.0;
pub const PLAYER_SPEED: f32 = 5.0;
/// Distance from the bottom edge to the player's top edge.
pub const PLAYER_BOTTOM_OFFSET: f32 = 50.0;
pub const STARTING_LIVES: i32 = 3;

// ── Bullets ───────────────────────────────────────────────────────────────────

pub const BULLET_WIDTH: f32 = 4.0;
pub const BULLET_HEIGHT: f32 = 10.0;
pub const PLAYER_BULLET_SPEED: f32 = 7.0;
pub const ENEMY_BULLET_SPEED: f32 = 4.0;
pub const MAX_PLAYER_BULLETS: usize = 5;
pub const MAX_ENEMY_BULLETS: usize = 3;

// ── Enemies ───────────────────────────────────────────────────────────────────

pub const ENEMY_WIDTH: f32 = 40.0;
pub const ENEMY_HEIGHT: f32 = 30.0;
pub const ENEMY_ORIGIN_X: f32 = 40.0;
pub const ENEMY_ORIGIN_Y: f32 = 30.0;
pub const ENEMY_COL_PITCH: f32 = 70.0;
pub const ENEMY_ROW_PITCH: f32 = 60.0;
pub const FORMATION_DROP: f32 = 30.0;
pub const MAX_WAVE_ROWS: u32 = 5;
pub const MAX_WAVE_COLS: u32 = 10;

// ── Scoring ───────────────────────────────────────────────────────────────────

pub const POINTS_PER_LEVEL: u32 = 10;
pub const MISS_PENALTY: u32 = 5;

// ── Explosions ────────────────────────────────────────────────────────────────

pub const EXPLOSION_PARTICLES: usize = 10;
pub const PARTICLE_LIFE: u32 = 20;
/// Velocity components are drawn from `[-PARTICLE_SPREAD/2, PARTICLE_SPREAD/2)`.
pub const PARTICLE_SPREAD: f32 = 4.0;
pub const PARTICLE_HUE_MIN: f32 = 20.0;
pub const PARTICLE_HUE_RANGE: f32 = 60.0;

// ── Difficulty tables ─────────────────────────────────────────────────────────

pub fn settings_for_level(level: u32) -> GameSettings {
    let step = level.saturating_sub(1);
    GameSettings {
        enemy_speed: 1.0 + step as f32 * 0.5,
        enemy_fire_rate: 0.01 + step as f64 * 0.003,
        enemy_spawn_rate: 0.95 - step as f64 * 0.02,
    }
}

/// `(rows, cols)` of the wave spawned at `level`.
pub fn wave_dimensions(level: u32) -> (u32, u32) {
    let rows = (3 + level / 3).min(MAX_WAVE_ROWS);
    let cols = (6 + level / 2).min(MAX_WAVE_COLS);
    (rows, cols)
}

/// Points awarded for one kill at `level`.
pub fn kill_score(level: u32) -> u32 {
    POINTS_PER_LEVEL * level
}
