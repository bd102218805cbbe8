use std::time::Duration;

use super::{ScoreRecord, Submission};
use crate::entities::Session;

#[derive(Debug)]
enum ClientError {
    Transport(reqwest::Error),
    Status(reqwest::StatusCode),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "request failed: {e}"),
            ClientError::Status(status) => write!(f, "unexpected status {status}"),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e)
    }
}

/// Thin reqwest client for the leaderboard service. Every call is single-shot
/// and fail-soft: on any error it answers with the last list it saw.
pub struct LeaderboardClient {
    http: reqwest::Client,
    base_url: String,
    cached: Vec<ScoreRecord>,
}

impl LeaderboardClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cached: Vec::new(),
        })
    }

    /// The last leaderboard successfully received.
    pub fn cached(&self) -> &[ScoreRecord] {
        &self.cached
    }

    fn url(&self) -> String {
        format!("{}/api/leaderboard", self.base_url)
    }

    /// Full leaderboard, or the cached copy when the service can't be reached.
    pub async fn fetch(&mut self) -> Vec<ScoreRecord> {
        match self.try_fetch().await {
            Ok(records) => {
                self.cached = records;
            }
            Err(e) => {
                tracing::warn!(error = %e, "error fetching leaderboard, using cached copy");
            }
        }
        self.cached.clone()
    }

    /// Post a finished session; answers with the service's top ten, or the
    /// cached list when the write fails.
    pub async fn submit(&mut self, submission: &Submission) -> Vec<ScoreRecord> {
        match self.try_submit(submission).await {
            Ok(records) => {
                self.cached = records;
            }
            Err(e) => {
                tracing::warn!(error = %e, "error saving to leaderboard, using cached copy");
            }
        }
        self.cached.clone()
    }

    /// Game-over step: a session that scored is submitted, anything else just
    /// refreshes the board. Either way the answer is the board to show.
    pub async fn record_session(&mut self, session: &Session) -> Vec<ScoreRecord> {
        if session.state.score > 0 {
            self.submit(&Submission::from_session(session)).await
        } else {
            self.fetch().await
        }
    }

    async fn try_fetch(&self) -> Result<Vec<ScoreRecord>, ClientError> {
        let response = self.http.get(self.url()).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        Ok(response.json::<Vec<ScoreRecord>>().await?)
    }

    async fn try_submit(&self, submission: &Submission) -> Result<Vec<ScoreRecord>, ClientError> {
        let response = self.http.post(self.url()).json(submission).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        Ok(response.json::<Vec<ScoreRecord>>().await?)
    }
}
