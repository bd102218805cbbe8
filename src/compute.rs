/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `Session` (and, where needed, an RNG handle) and returns a brand-new
/// `Session`.  Side effects are limited to the injected RNG; sounds come back
/// to the caller as `GameEvent`s.

use rand::Rng;

use crate::collision::collides;
use crate::entities::{
    Bullet, BulletOwner, Direction, Enemy, GameOptions, GameState, GameStatus, Particle, Player,
    Session,
};
use crate::sound::GameEvent;
use crate::tuning::*;

/// Input held during one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    /// True only on the frame a fresh fire press arrived; holding the key
    /// does not keep it set.
    pub fire: bool,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session on the standard 800×600 field with the first wave spawned.
pub fn init_session(player_name: &str, options: GameOptions, started_at_ms: u64) -> Session {
    let (width, height) = (CANVAS_WIDTH, CANVAS_HEIGHT);
    let name = player_name.trim();
    Session {
        state: GameState {
            level: 1,
            score: 0,
            miss_count: 0,
            lives: STARTING_LIVES,
            paused: false,
            status: GameStatus::Playing,
            player_name: if name.is_empty() { "Player".to_string() } else { name.to_string() },
            shots_fired: 0,
            started_at_ms,
            duration_secs: 0,
        },
        settings: settings_for_level(1),
        options,
        player: Player {
            x: width / 2.0 - PLAYER_WIDTH / 2.0,
            y: height - PLAYER_BOTTOM_OFFSET,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            bullets: Vec::new(),
        },
        enemies: spawn_wave(1),
        enemy_bullets: Vec::new(),
        enemy_direction: Direction::Right,
        particles: Vec::new(),
        width,
        height,
    }
}

/// Lay out the enemy grid for `level`, row by row.
pub fn spawn_wave(level: u32) -> Vec<Enemy> {
    let (rows, cols) = wave_dimensions(level);
    (0..rows)
        .flat_map(|row| {
            (0..cols).map(move |col| Enemy {
                x: col as f32 * ENEMY_COL_PITCH + ENEMY_ORIGIN_X,
                y: row as f32 * ENEMY_ROW_PITCH + ENEMY_ORIGIN_Y,
                width: ENEMY_WIDTH,
                height: ENEMY_HEIGHT,
                active: true,
            })
        })
        .collect()
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(state: &Session) -> Session {
    let mut next = state.clone();
    step_player(&mut next, Direction::Left);
    next
}

pub fn move_player_right(state: &Session) -> Session {
    let mut next = state.clone();
    step_player(&mut next, Direction::Right);
    next
}

/// Fire a bullet from the player, capped at `MAX_PLAYER_BULLETS` simultaneous bullets.
pub fn player_shoot(state: &Session) -> (Session, Option<GameEvent>) {
    let mut next = state.clone();
    let fired = fire(&mut next);
    (next, fired.then_some(GameEvent::Shoot))
}

pub fn toggle_pause(state: &Session) -> Session {
    let mut next = state.clone();
    if !next.is_over() {
        next.state.paused = !next.state.paused;
    }
    next
}

pub fn set_paused(state: &Session, paused: bool) -> Session {
    let mut next = state.clone();
    next.state.paused = paused && !next.is_over();
    next
}

/// Stamp the play time in whole seconds.
pub fn finish_session(state: &Session, now_ms: u64) -> Session {
    let mut next = state.clone();
    next.state.duration_secs = now_ms.saturating_sub(state.state.started_at_ms) / 1000;
    next
}

fn step_player(session: &mut Session, direction: Direction) {
    let max_x = (session.width - session.player.width).max(0.0);
    let p = &mut session.player;
    p.x = (p.x + direction.sign() * p.speed).clamp(0.0, max_x);
}

fn fire(session: &mut Session) -> bool {
    if session.player.bullets.len() >= MAX_PLAYER_BULLETS {
        return false;
    }
    let p = &session.player;
    let bullet = Bullet {
        x: p.x + p.width / 2.0 - BULLET_WIDTH / 2.0,
        y: p.y,
        width: BULLET_WIDTH,
        height: BULLET_HEIGHT,
        speed: PLAYER_BULLET_SPEED,
        owner: BulletOwner::Player,
        hit: false,
    };
    session.player.bullets.push(bullet);
    session.state.shots_fired += 1;
    true
}

// ── Per-frame tick (nearly pure; RNG is injected) ───────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// A paused or finished session comes back unchanged with no events.
pub fn tick(state: &Session, controls: &Controls, rng: &mut impl Rng) -> (Session, Vec<GameEvent>) {
    if state.state.paused || state.is_over() {
        return (state.clone(), Vec::new());
    }

    let mut events = Vec::new();

    // ── 1. Player input ──────────────────────────────────────────────────────
    let mut next = if controls.left {
        move_player_left(state)
    } else {
        state.clone()
    };
    if controls.right {
        next = move_player_right(&next);
    }
    if controls.fire {
        let (fired, event) = player_shoot(&next);
        next = fired;
        events.extend(event);
    }

    // ── 2. Player bullets climb; leaving the top unhit is a miss ─────────────
    advance_player_bullets(&mut next, &mut events);

    // ── 3. Formation sweep ───────────────────────────────────────────────────
    sweep_formation(&mut next);

    // ── 4. Enemies randomly shoot ────────────────────────────────────────────
    enemy_fire(&mut next, rng);

    // ── 5. Enemy bullets fall ────────────────────────────────────────────────
    let height = next.height;
    next.enemy_bullets.retain_mut(|b| {
        b.y += b.speed;
        b.y < height
    });

    // ── 6. Collision: player bullets ↔ enemies ───────────────────────────────
    resolve_enemy_hits(&mut next, &mut events, rng);

    // ── 7. Collision: enemy bullets ↔ player ─────────────────────────────────
    resolve_player_hits(&mut next, &mut events, rng);

    // ── 8. Wave clear ────────────────────────────────────────────────────────
    if next.enemies.is_empty() {
        next.state.level += 1;
        next.enemies = spawn_wave(next.state.level);
        next.settings = settings_for_level(next.state.level);
        tracing::info!(
            level = next.state.level,
            enemies = next.enemies.len(),
            "wave cleared"
        );
    }

    // ── 9. Particles age ─────────────────────────────────────────────────────
    next.particles.retain_mut(|p| {
        p.life = p.life.saturating_sub(1);
        p.life > 0
    });

    // ── 10. Terminal check ───────────────────────────────────────────────────
    let overrun = next.enemies.iter().any(|e| e.rect().bottom() >= next.height);
    if next.state.lives <= 0 || overrun {
        next.state.status = GameStatus::GameOver;
        events.push(GameEvent::GameOver);
        tracing::info!(
            score = next.state.score,
            level = next.state.level,
            lives = next.state.lives,
            overrun,
            "game over"
        );
    }

    (next, events)
}

fn advance_player_bullets(session: &mut Session, events: &mut Vec<GameEvent>) {
    let count_misses = session.options.misses_cost_points;
    let mut misses = 0;
    session.player.bullets.retain_mut(|b| {
        b.y -= b.speed;
        let on_screen = b.y > 0.0;
        if !on_screen && !b.hit && count_misses {
            misses += 1;
        }
        on_screen
    });
    session.state.miss_count += misses;
    events.extend(std::iter::repeat(GameEvent::Miss).take(misses as usize));
}

/// Shift every enemy sideways; when any of them reaches a side wall the whole
/// formation turns around and drops one row.
fn sweep_formation(session: &mut Session) {
    let dx = session.enemy_direction.sign() * session.settings.enemy_speed;
    let width = session.width;
    let mut hit_wall = false;
    for enemy in &mut session.enemies {
        enemy.x += dx;
        if enemy.x <= 0.0 || enemy.rect().right() >= width {
            hit_wall = true;
        }
    }
    if hit_wall {
        session.enemy_direction = session.enemy_direction.reversed();
        for enemy in &mut session.enemies {
            enemy.y += FORMATION_DROP;
        }
    }
}

fn enemy_fire(session: &mut Session, rng: &mut impl Rng) {
    let rate = session.settings.enemy_fire_rate;
    for enemy in session.enemies.iter().filter(|e| e.active) {
        // Roll for every enemy so the RNG stream doesn't depend on the cap.
        let wants_to_fire = rng.gen::<f64>() < rate;
        if wants_to_fire && session.enemy_bullets.len() < MAX_ENEMY_BULLETS {
            session.enemy_bullets.push(Bullet {
                x: enemy.x + enemy.width / 2.0 - BULLET_WIDTH / 2.0,
                y: enemy.y + enemy.height,
                width: BULLET_WIDTH,
                height: BULLET_HEIGHT,
                speed: ENEMY_BULLET_SPEED,
                owner: BulletOwner::Enemy,
                hit: false,
            });
        }
    }
}

/// Mark first, remove after: each bullet takes the first live enemy it
/// overlaps, and an enemy can be claimed by only one bullet per frame.
fn resolve_enemy_hits(session: &mut Session, events: &mut Vec<GameEvent>, rng: &mut impl Rng) {
    let mut killed = vec![false; session.enemies.len()];
    let mut blasts = Vec::new();

    for bullet in &mut session.player.bullets {
        let target = session
            .enemies
            .iter()
            .enumerate()
            .find(|(i, e)| !killed[*i] && collides(&bullet.rect(), &e.rect()))
            .map(|(i, _)| i);
        if let Some(i) = target {
            killed[i] = true;
            bullet.hit = true;
            blasts.push(session.enemies[i].centre());
        }
    }

    if blasts.is_empty() {
        return;
    }

    let gain = kill_score(session.state.level) * blasts.len() as u32;
    session.state.score += gain;
    session.player.bullets.retain(|b| !b.hit);
    let mut flags = killed.into_iter();
    session.enemies.retain(|_| !flags.next().unwrap_or(false));

    for (x, y) in blasts {
        events.push(GameEvent::Hit);
        explode(&mut session.particles, x, y, rng);
    }
}

fn resolve_player_hits(session: &mut Session, events: &mut Vec<GameEvent>, rng: &mut impl Rng) {
    let target = session.player.rect();
    let before = session.enemy_bullets.len();
    session.enemy_bullets.retain(|b| !collides(&b.rect(), &target));
    let hits = before - session.enemy_bullets.len();

    let (cx, cy) = session.player.centre();
    for _ in 0..hits {
        session.state.lives -= 1;
        events.push(GameEvent::Damage);
        explode(&mut session.particles, cx, cy, rng);
    }
    if hits > 0 {
        tracing::debug!(lives = session.state.lives, "player hit");
    }
}

/// Scatter a burst of particles from `(x, y)`.
pub fn explode(particles: &mut Vec<Particle>, x: f32, y: f32, rng: &mut impl Rng) {
    for _ in 0..EXPLOSION_PARTICLES {
        particles.push(Particle {
            x,
            y,
            vx: (rng.gen::<f32>() - 0.5) * PARTICLE_SPREAD,
            vy: (rng.gen::<f32>() - 0.5) * PARTICLE_SPREAD,
            life: PARTICLE_LIFE,
            hue: rng.gen::<f32>() * PARTICLE_HUE_RANGE + PARTICLE_HUE_MIN,
        });
    }
}
