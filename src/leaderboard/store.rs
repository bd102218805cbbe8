use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use super::{ScoreRecord, Submission, RESPONSE_LIMIT, STORED_LIMIT};

#[derive(Debug)]
pub enum StoreError {
    InvalidSubmission,
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidSubmission => write!(f, "invalid score or player name"),
            StoreError::Io(e) => write!(f, "leaderboard file i/o failed: {e}"),
            StoreError::Json(e) => write!(f, "leaderboard encoding failed: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Leaderboard persisted as one pretty-printed JSON array, highest score first.
#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    /// Point the store at `path`, creating its parent directory if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
                tracing::info!(dir = %dir.display(), "created leaderboard data directory");
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored record. A missing or unreadable file reads as empty.
    pub fn load(&self) -> Vec<ScoreRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read leaderboard");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "malformed leaderboard file");
                Vec::new()
            }
        }
    }

    /// Append a record, keep the best `STORED_LIMIT`, persist, and return the
    /// top `RESPONSE_LIMIT`. Equal scores keep their arrival order.
    pub fn submit(&self, submission: Submission, now_ms: u64) -> Result<Vec<ScoreRecord>, StoreError> {
        if !submission.is_valid() {
            return Err(StoreError::InvalidSubmission);
        }

        let mut records = self.load();
        records.push(submission.into_record(now_ms));
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(STORED_LIMIT);

        let encoded = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, encoded)?;

        records.truncate(RESPONSE_LIMIT);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, score: i64) -> Submission {
        Submission {
            player_name: name.to_string(),
            score,
            ..Default::default()
        }
    }

    fn temp_store() -> (tempfile::TempDir, LeaderboardStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LeaderboardStore::open(dir.path().join("data").join("leaderboard.json"))
            .expect("open store");
        (dir, store)
    }

    #[test]
    fn open_creates_missing_directory() {
        let (dir, _store) = temp_store();
        assert!(dir.path().join("data").is_dir());
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn malformed_file_loads_empty_and_accepts_writes() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_empty());

        let top = store.submit(submission("Ada", 100), 1).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn ada_then_bo_orders_by_score() {
        let (_dir, store) = temp_store();
        let top = store.submit(submission("Ada", 100), 1).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "Ada");
        assert_eq!(top[0].score, 100);

        let top = store.submit(submission("Bo", 50), 2).unwrap();
        let names: Vec<_> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Ada", "Bo"]);
    }

    #[test]
    fn invalid_submission_leaves_file_untouched() {
        let (_dir, store) = temp_store();
        store.submit(submission("Ada", 100), 1).unwrap();

        assert!(matches!(
            store.submit(submission("Ada", 0), 2),
            Err(StoreError::InvalidSubmission)
        ));
        assert!(matches!(
            store.submit(submission("", 10), 3),
            Err(StoreError::InvalidSubmission)
        ));
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn response_is_top_ten_but_file_keeps_fifty() {
        let (_dir, store) = temp_store();
        for i in 1..=50 {
            store.submit(submission(&format!("p{i}"), i * 10), i as u64).unwrap();
        }
        assert_eq!(store.load().len(), 50);

        // 51st write pushes out the lowest score (p1, 10 points).
        let top = store.submit(submission("late", 15), 99).unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].score, 500);

        let all = store.load();
        assert_eq!(all.len(), 50);
        assert!(all.iter().all(|r| r.name != "p1"));
        assert!(all.iter().any(|r| r.name == "late"));
        assert!(all.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn records_survive_reopen() {
        let (dir, store) = temp_store();
        for (name, score) in [("c", 30), ("a", 10), ("b", 20)] {
            store.submit(submission(name, score), 0).unwrap();
        }
        drop(store);

        let reopened = LeaderboardStore::open(dir.path().join("data").join("leaderboard.json")).unwrap();
        let scores: Vec<_> = reopened.load().iter().map(|r| r.score).collect();
        assert_eq!(scores, [30, 20, 10]);
    }
}
