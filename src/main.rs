use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tokio::runtime::Runtime;

use space_invaders::compute::{finish_session, init_session, set_paused};
use space_invaders::display::{self, terminal::TerminalCanvas, Canvas};
use space_invaders::driver::{run_loop, FixedRate, FrameInput, InputSource, LoopExit, FRAME};
use space_invaders::entities::GameOptions;
use space_invaders::input::KeyboardState;
use space_invaders::leaderboard::{self, client::LeaderboardClient, config};
use space_invaders::sound::BellSink;
use space_invaders::tuning::{CANVAS_HEIGHT, CANVAS_WIDTH};

type Screen = TerminalCanvas<BufWriter<std::io::Stdout>>;

const MAX_NAME_LEN: usize = 16;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ── Last player name ──────────────────────────────────────────────────────────

fn last_name_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".space_invaders_name")
}

fn load_last_name() -> String {
    std::fs::read_to_string(last_name_path())
        .map(|s| s.trim().chars().take(MAX_NAME_LEN).collect())
        .unwrap_or_default()
}

fn save_last_name(name: &str) {
    if let Err(e) = std::fs::write(last_name_path(), name) {
        tracing::warn!(error = %e, "could not remember player name");
    }
}

// ── Keyboard ──────────────────────────────────────────────────────────────────

/// Feeds the event thread's output into the shared keyboard model once per frame.
struct TerminalInput<'a> {
    rx: &'a mpsc::Receiver<Event>,
    keys: KeyboardState,
}

impl<'a> TerminalInput<'a> {
    fn new(rx: &'a mpsc::Receiver<Event>) -> Self {
        TerminalInput {
            rx,
            keys: KeyboardState::new(),
        }
    }
}

impl InputSource for TerminalInput<'_> {
    fn poll(&mut self) -> FrameInput {
        // Drain all pending input events (non-blocking).
        while let Ok(ev) = self.rx.try_recv() {
            self.keys.handle(&ev);
        }
        self.keys.finish_frame()
    }
}

/// Block until the next key press.
fn next_key(rx: &mpsc::Receiver<Event>, screen: &mut Screen) -> Option<KeyEvent> {
    loop {
        match rx.recv() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => return Some(key),
            Ok(Event::Resize(cols, rows)) => screen.resize(cols, rows),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

// ── Screens ───────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn start_screen(
    screen: &mut Screen,
    rx: &mpsc::Receiver<Event>,
    name: &mut String,
    options: &mut GameOptions,
    board: &[leaderboard::ScoreRecord],
) -> std::io::Result<MenuResult> {
    loop {
        display::render_start_screen(screen, name, board)?;
        let Some(key) = next_key(rx, screen) else {
            return Ok(MenuResult::Quit);
        };
        if is_quit(&key) {
            return Ok(MenuResult::Quit);
        }
        match key.code {
            KeyCode::Enter => return Ok(MenuResult::Start),
            KeyCode::Tab => options_screen(screen, rx, options)?,
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Char(c) if !c.is_control() && name.chars().count() < MAX_NAME_LEN => {
                name.push(c);
            }
            _ => {}
        }
    }
}

fn options_screen(
    screen: &mut Screen,
    rx: &mpsc::Receiver<Event>,
    options: &mut GameOptions,
) -> std::io::Result<()> {
    loop {
        display::render_options(screen, options)?;
        let Some(key) = next_key(rx, screen) else {
            return Ok(());
        };
        match key.code {
            KeyCode::Char('1') => options.sound_enabled = !options.sound_enabled,
            KeyCode::Char('2') => options.misses_cost_points = !options.misses_cost_points,
            KeyCode::Char('o') | KeyCode::Char('O') | KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => {
                tracing::debug!(?options, "options closed");
                return Ok(());
            }
            _ => {}
        }
    }
}

/// What to do once a game has finished or been abandoned.
enum AfterGame {
    PlayAgain,
    Quit,
}

fn play(
    screen: &mut Screen,
    rx: &mpsc::Receiver<Event>,
    runtime: &Runtime,
    client: &mut LeaderboardClient,
    name: &str,
    options: &mut GameOptions,
) -> std::io::Result<AfterGame> {
    let mut rng = thread_rng();
    let mut sound = BellSink::new(stdout());
    let mut scheduler = FixedRate::new(FRAME);
    let mut input = TerminalInput::new(rx);
    let high_score = leaderboard::high_score(client.cached());

    let mut session = init_session(name, options.clone(), now_ms());
    tracing::info!(player = %session.state.player_name, "game started");

    let finished = loop {
        let exit = run_loop(
            session,
            screen,
            &mut input,
            &mut sound,
            &mut scheduler,
            &mut rng,
            high_score,
        )?;
        match exit {
            LoopExit::Options(mut paused) => {
                options_screen(screen, rx, &mut paused.options)?;
                *options = paused.options.clone();
                session = set_paused(&paused, false);
            }
            LoopExit::Restart => return Ok(AfterGame::PlayAgain),
            LoopExit::Quit => return Ok(AfterGame::Quit),
            LoopExit::GameOver(over) => break over,
        }
    };

    // ── Game-over sequence ───────────────────────────────────────────────────
    let finished = finish_session(&finished, now_ms());
    tracing::info!(
        player = %finished.state.player_name,
        score = finished.state.score,
        level = finished.state.level,
        duration = finished.state.duration_secs,
        "session finished"
    );
    display::render_game_over(screen, &finished, client.cached())?;

    let board = runtime.block_on(client.record_session(&finished));
    display::render_game_over(screen, &finished, &board)?;

    loop {
        let Some(key) = next_key(rx, screen) else {
            return Ok(AfterGame::Quit);
        };
        if is_quit(&key) {
            return Ok(AfterGame::Quit);
        }
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => return Ok(AfterGame::PlayAgain),
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(AfterGame::Quit),
            _ => display::render_game_over(screen, &finished, &board)?,
        }
    }
}

fn run(
    screen: &mut Screen,
    rx: &mpsc::Receiver<Event>,
    runtime: &Runtime,
    client: &mut LeaderboardClient,
) -> std::io::Result<()> {
    let mut name = load_last_name();
    let mut options = GameOptions::default();

    let board = runtime.block_on(client.fetch());
    if let MenuResult::Quit = start_screen(screen, rx, &mut name, &mut options, &board)? {
        return Ok(());
    }
    let name = name.trim().to_string();
    if !name.is_empty() {
        save_last_name(&name);
    }

    // Restart goes straight into a fresh game.
    while let AfterGame::PlayAgain = play(screen, rx, runtime, client, &name, &mut options)? {}
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// stdout belongs to the game, so logs go to a file.
fn init_tracing() {
    let path = config::game_log_file();
    let Ok(file) = File::create(&path) else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn main() -> std::io::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let mut client = LeaderboardClient::new(config::service_url(), config::request_timeout())
        .map_err(std::io::Error::other)?;

    let raw_out = stdout();
    let out = BufWriter::new(raw_out);
    let (cols, rows) = terminal::size()?;
    let mut screen = TerminalCanvas::new(out, cols, rows, CANVAS_WIDTH, CANVAS_HEIGHT);

    terminal::enable_raw_mode()?;
    screen.writer().execute(terminal::EnterAlternateScreen)?;
    screen.writer().execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = screen
        .writer()
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut screen, &rx, &runtime, &mut client);
    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal error");
    }

    // Always restore the terminal
    let out = screen.writer();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();

    result
}
