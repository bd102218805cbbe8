use std::{env, path::PathBuf, time::Duration};

// Runtime settings for the leaderboard service and its client.

pub fn http_port() -> u16 {
    env::var("LEADERBOARD_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

pub fn data_file() -> PathBuf {
    env::var("LEADERBOARD_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data").join("leaderboard.json"))
}

pub fn service_url() -> String {
    env::var("LEADERBOARD_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string())
}

pub fn request_timeout() -> Duration {
    let millis = env::var("LEADERBOARD_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(1500);
    Duration::from_millis(millis)
}

/// Where the game writes its log, since the terminal itself is taken.
pub fn game_log_file() -> PathBuf {
    env::var("INVADERS_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("invaders.log"))
}
