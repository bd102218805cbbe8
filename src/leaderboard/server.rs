use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::sync::Mutex;

use super::config;
use super::store::{LeaderboardStore, StoreError};
use super::{ScoreRecord, Submission};

/// Shared state for the leaderboard routes. The mutex serialises the file's
/// read-modify-write cycle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<LeaderboardStore>>,
}

impl AppState {
    pub fn new(store: LeaderboardStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard).post(post_leaderboard))
        .with_state(state)
}

/// Full stored leaderboard, best first; `[]` when nothing is stored.
async fn get_leaderboard(State(state): State<AppState>) -> Json<Vec<ScoreRecord>> {
    let store = state.store.lock().await;
    Json(store.load())
}

/// Record a finished session and answer with the new top ten.
async fn post_leaderboard(
    State(state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<Json<Vec<ScoreRecord>>, ApiError> {
    let Json(submission) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected leaderboard payload");
        api_error(StatusCode::BAD_REQUEST, "Invalid score or player name")
    })?;

    let player = submission.player_name.clone();
    let score = submission.score;
    let store = state.store.lock().await;
    match store.submit(submission, now_ms()) {
        Ok(top) => {
            tracing::info!(%player, score, "score recorded");
            Ok(Json(top))
        }
        Err(StoreError::InvalidSubmission) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid score or player name",
        )),
        Err(e) => {
            tracing::error!(error = %e, "error saving to leaderboard");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save score",
            ))
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let path = config::data_file();
    let store = match LeaderboardStore::open(&path) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to prepare leaderboard file");
            return;
        }
    };

    let file = store.path().display().to_string();
    let app = app(AppState::new(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], config::http_port()));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            return;
        }
    };
    tracing::info!(%addr, %file, "leaderboard listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
    }
}
