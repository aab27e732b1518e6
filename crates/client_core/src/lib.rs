use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    error::ApiError,
    protocol::{
        GameStatusResponse, GuessRequest, GuessResponse, HealthResponse, LeaderboardEntry,
        LeaderboardResponse, StartGameRequest, StartGameResponse, StatsResponse,
    },
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod controller;
pub mod session;
pub mod view;

pub use controller::{GameController, GuessSubmission, Notice, NoticeLevel, Screen};
pub use session::{DifficultySelector, Session, SessionState};
pub use view::{GameOutcome, GameView, GuessRecord, LeaderboardView, RankedEntry, ResultSummary};

#[derive(Debug, Error)]
pub enum GameServerError {
    #[error("invalid game server url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("game server rejected request ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("failed to reach game server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed game server response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GameServerError {
    /// True when the server answered with a non-success status.
    pub fn is_rejection(&self) -> bool {
        matches!(self, GameServerError::Rejected { .. })
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            GameServerError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Requests the controller issues against the game server.
#[async_trait]
pub trait GameServer: Send + Sync {
    async fn start_game(
        &self,
        request: &StartGameRequest,
    ) -> Result<StartGameResponse, GameServerError>;
    async fn submit_guess(
        &self,
        game_id: &str,
        guess: i64,
    ) -> Result<GuessResponse, GameServerError>;
    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, GameServerError>;
}

pub struct HttpGameServer {
    http: Client,
    base_url: Url,
}

impl HttpGameServer {
    pub fn new(base_url: &str) -> Result<Self, GameServerError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, GameServerError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GameServerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GameServerError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn game_status(&self, game_id: &str) -> Result<GameStatusResponse, GameServerError> {
        let url = self.endpoint(&["game", game_id])?;
        debug!(%url, "fetching game status");
        read_json(self.http.get(url).send().await?).await
    }

    pub async fn health(&self) -> Result<HealthResponse, GameServerError> {
        let url = self.endpoint(&["health"])?;
        debug!(%url, "checking server health");
        read_json(self.http.get(url).send().await?).await
    }

    pub async fn stats(&self) -> Result<StatsResponse, GameServerError> {
        let url = self.endpoint(&["stats"])?;
        debug!(%url, "fetching server stats");
        read_json(self.http.get(url).send().await?).await
    }
}

#[async_trait]
impl GameServer for HttpGameServer {
    async fn start_game(
        &self,
        request: &StartGameRequest,
    ) -> Result<StartGameResponse, GameServerError> {
        let url = self.endpoint(&["game", "start"])?;
        debug!(%url, difficulty = %request.difficulty, "starting game");
        read_json(self.http.post(url).json(request).send().await?).await
    }

    async fn submit_guess(
        &self,
        game_id: &str,
        guess: i64,
    ) -> Result<GuessResponse, GameServerError> {
        let url = self.endpoint(&["game", game_id, "guess"])?;
        debug!(%url, guess, "submitting guess");
        read_json(
            self.http
                .post(url)
                .json(&GuessRequest { guess })
                .send()
                .await?,
        )
        .await
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, GameServerError> {
        let url = self.endpoint(&["leaderboard"])?;
        debug!(%url, "fetching leaderboard");
        let body: LeaderboardResponse = read_json(self.http.get(url).send().await?).await?;
        Ok(body.leaderboard)
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, GameServerError> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).map_err(|e| GameServerError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(GameServerError::InvalidUrl {
            url: raw.to_string(),
            reason: "expected an http(s) base url".to_string(),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GameServerError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        let api_error: ApiError = serde_json::from_slice(&body).unwrap_or_default();
        return Err(GameServerError::Rejected {
            status: status.as_u16(),
            message: api_error.message().map(str::to_owned),
        });
    }
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
