//! Score persistence: the JSON-file store, its HTTP surface, and the
//! fail-soft client the game talks to it through.

pub mod client;
pub mod config;
pub mod server;
pub mod store;

use serde::{Deserialize, Serialize};

use crate::entities::Session;

/// How many records the file keeps.
pub const STORED_LIMIT: usize = 50;
/// How many records a successful submission returns.
pub const RESPONSE_LIMIT: usize = 10;

fn first_level() -> u32 {
    1
}

/// One persisted leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub name: String,
    pub score: i64,
    #[serde(default)]
    pub miss_count: u32,
    #[serde(default = "first_level")]
    pub level: u32,
    #[serde(default)]
    pub shots_fired: u32,
    /// Seconds played.
    #[serde(default)]
    pub duration: u64,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: u64,
    /// `timestamp` as an ISO-8601 UTC string.
    #[serde(default)]
    pub date: String,
}

/// Request payload for a finished session. Everything but the name and score
/// is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miss_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots_fired: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl Submission {
    pub fn from_session(session: &Session) -> Self {
        let s = &session.state;
        Submission {
            player_name: s.player_name.clone(),
            score: s.score as i64,
            miss_count: Some(s.miss_count),
            level: Some(s.level),
            shots_fired: Some(s.shots_fired),
            duration: Some(s.duration_secs),
        }
    }

    /// A submission needs a positive score and a non-blank name.
    pub fn is_valid(&self) -> bool {
        self.score > 0 && !self.player_name.trim().is_empty()
    }

    pub fn into_record(self, timestamp: u64) -> ScoreRecord {
        ScoreRecord {
            name: self.player_name,
            score: self.score,
            miss_count: self.miss_count.unwrap_or(0),
            level: self.level.unwrap_or(1),
            shots_fired: self.shots_fired.unwrap_or(0),
            duration: self.duration.unwrap_or(0),
            timestamp,
            date: iso_date(timestamp),
        }
    }
}

/// Format epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn iso_date(epoch_ms: u64) -> String {
    let secs = epoch_ms / 1000;
    let millis = epoch_ms % 1000;
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (hour, minute, second) = (rem / 3600, (rem % 3600) / 60, rem % 60);

    // Days since 1970-01-01 to a proleptic Gregorian date.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);

    format!(
        "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{millis:03}Z"
    )
}

/// Highest stored score, or 0 for an empty board.
pub fn high_score(records: &[ScoreRecord]) -> u32 {
    records
        .first()
        .map(|r| r.score.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}
