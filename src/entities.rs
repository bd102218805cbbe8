/// All game entity types: pure data, no logic.

use crate::collision::Rect;

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels travelled per frame; direction comes from `owner`.
    pub speed: f32,
    pub owner: BulletOwner,
    /// Set once the bullet has struck something, so it never counts as a miss.
    pub hit: bool,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Active player bullets, oldest first.
    pub bullets: Vec<Bullet>,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn centre(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub active: bool,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn centre(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// ── Effects ───────────────────────────────────────────────────────────────────

/// One spark of an explosion. Drawn offset from its origin along its velocity
/// in proportion to elapsed life, so the stored position never moves.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Frames left before the particle is removed.
    pub life: u32,
    /// Hue in degrees (fully saturated, half lightness).
    pub hue: f32,
}

// ── Session-level state ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub level: u32,
    /// Hit score (before any miss penalty).
    pub score: u32,
    pub miss_count: u32,
    pub lives: i32,
    pub paused: bool,
    pub status: GameStatus,
    pub player_name: String,
    pub shots_fired: u32,
    /// Milliseconds since the Unix epoch when the session started.
    pub started_at_ms: u64,
    /// Whole seconds played; filled in by the game-over sequence.
    pub duration_secs: u64,
}

/// Difficulty scalars, recomputed from the level at every wave start.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    pub enemy_speed: f32,
    pub enemy_fire_rate: f64,
    pub enemy_spawn_rate: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameOptions {
    pub sound_enabled: bool,
    pub misses_cost_points: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        GameOptions {
            sound_enabled: true,
            misses_cost_points: true,
        }
    }
}

/// Everything one game needs, owned by the loop driver and handed to
/// update and render explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub state: GameState,
    pub settings: GameSettings,
    pub options: GameOptions,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<Bullet>,
    pub enemy_direction: Direction,
    pub particles: Vec<Particle>,
    pub width: f32,
    pub height: f32,
}

impl Session {
    pub fn is_over(&self) -> bool {
        self.state.status == GameStatus::GameOver
    }

    pub fn miss_penalty(&self) -> u32 {
        self.state.miss_count * crate::tuning::MISS_PENALTY
    }

    /// Score shown to the player: hits minus the miss penalty when misses cost points.
    pub fn total_score(&self) -> i64 {
        let hits = self.state.score as i64;
        if self.options.misses_cost_points {
            hits - self.miss_penalty() as i64
        } else {
            hits
        }
    }
}
