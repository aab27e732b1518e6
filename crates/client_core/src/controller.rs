//! Game controller: input handlers, server mediation and screen transitions.

use shared::{domain::Difficulty, protocol::StartGameRequest};
use tracing::{error, info, warn};

use crate::{
    session::{DifficultySelector, Session, SessionState},
    view::{GameView, GuessRecord, LeaderboardView, ResultSummary},
    GameServer, GameServerError,
};

pub const EMPTY_NAME: &str = "Please enter your hero name!";
pub const INVALID_NUMBER: &str = "Please enter a valid number! 🕷️";
pub const NO_ACTIVE_GAME: &str = "No game in progress. Start a new game first!";
pub const GAME_IN_PROGRESS: &str = "A game is already in progress.";
pub const START_FAILED: &str = "Failed to start game";
pub const START_UNREACHABLE: &str = "Failed to connect to server. Please try again.";
pub const GUESS_REJECTED: &str = "Invalid guess";
pub const GUESS_UNREACHABLE: &str = "Connection error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    ActiveGame,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-facing message returned by a handler; the host picks the presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Outcome of a guess submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessSubmission {
    /// Nothing was sent. The input keeps its text.
    Rejected(Notice),
    /// The guess went to the server. The input should be cleared and refocused.
    Dispatched(Option<Notice>),
}

impl GuessSubmission {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            GuessSubmission::Rejected(notice) => Some(notice),
            GuessSubmission::Dispatched(notice) => notice.as_ref(),
        }
    }

    pub fn clears_input(&self) -> bool {
        matches!(self, GuessSubmission::Dispatched(_))
    }
}

pub fn parse_guess(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

pub struct GameController<S, V> {
    server: S,
    view: V,
    state: SessionState,
    screen: Screen,
    leaderboard_open: bool,
    last_result: Option<ResultSummary>,
}

impl<S: GameServer, V: GameView> GameController<S, V> {
    pub fn new(server: S, view: V) -> Self {
        Self {
            server,
            view,
            state: SessionState::default(),
            screen: Screen::Setup,
            leaderboard_open: false,
            last_result: None,
        }
    }

    /// Draws the initial setup screen.
    pub fn initialize(&mut self) {
        self.view.render_setup(self.state.selector());
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.state.session()
    }

    pub fn selector(&self) -> &DifficultySelector {
        self.state.selector()
    }

    pub fn last_result(&self) -> Option<&ResultSummary> {
        self.last_result.as_ref()
    }

    pub fn leaderboard_open(&self) -> bool {
        self.leaderboard_open
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_parts(self) -> (S, V) {
        (self.server, self.view)
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Option<Notice> {
        if self.screen != Screen::Setup {
            return Some(Notice::warning(GAME_IN_PROGRESS));
        }
        self.state.select_difficulty(difficulty);
        self.view.render_difficulty(self.state.selector());
        None
    }

    pub async fn submit_start(&mut self, raw_player_name: &str) -> Option<Notice> {
        if self.screen != Screen::Setup {
            return Some(Notice::warning(GAME_IN_PROGRESS));
        }
        let player_name = raw_player_name.trim();
        if player_name.is_empty() {
            return Some(Notice::warning(EMPTY_NAME));
        }

        let request = StartGameRequest {
            player_name: player_name.to_string(),
            difficulty: self.state.selector().selected(),
        };
        match self.server.start_game(&request).await {
            Ok(response) => {
                let session = self.state.start_session(request.player_name, &response);
                info!(
                    game_id = %session.game_id(),
                    difficulty = %session.difficulty(),
                    max_attempts = session.max_attempts(),
                    "game started"
                );
                self.screen = Screen::ActiveGame;
                self.last_result = None;
                self.view.render_active_game(session);
                None
            }
            Err(err) if err.is_rejection() => {
                warn!(error = %err, "server refused to start game");
                Some(Notice::error(err.server_message().unwrap_or(START_FAILED)))
            }
            Err(err) => {
                error!(error = %err, "error starting game");
                Some(Notice::error(START_UNREACHABLE))
            }
        }
    }

    pub async fn submit_guess(&mut self, raw_guess: &str) -> GuessSubmission {
        let Some(guess) = parse_guess(raw_guess) else {
            if self.state.is_active() {
                self.view.render_hint(Some(INVALID_NUMBER));
            }
            return GuessSubmission::Rejected(Notice::warning(INVALID_NUMBER));
        };
        let Some(game_id) = self.state.session().map(|s| s.game_id().to_string()) else {
            return GuessSubmission::Rejected(Notice::warning(NO_ACTIVE_GAME));
        };

        let response = match self.server.submit_guess(&game_id, guess).await {
            Ok(response) => response,
            Err(err) => {
                let notice = guess_failure(&game_id, err);
                self.view.render_hint(Some(&notice.message));
                return GuessSubmission::Dispatched(Some(notice));
            }
        };

        let Some(attempt_number) = self.state.record_guess() else {
            return GuessSubmission::Dispatched(Some(Notice::warning(NO_ACTIVE_GAME)));
        };
        let remaining = self
            .state
            .session()
            .map(Session::attempts_remaining)
            .unwrap_or_default();
        self.view.render_attempts(remaining);
        self.view.render_history_entry(&GuessRecord::new(
            attempt_number,
            guess,
            response.hint_text(),
        ));

        match ResultSummary::from_response(&response, attempt_number) {
            Some(summary) => {
                info!(
                    %game_id,
                    outcome = ?summary.outcome,
                    attempts = summary.attempts,
                    "game finished"
                );
                self.state.end_session();
                self.screen = Screen::Result;
                self.view.render_result(&summary);
                self.last_result = Some(summary);
            }
            None => self.view.render_hint(response.hint_text()),
        }
        GuessSubmission::Dispatched(None)
    }

    /// Flips the leaderboard popup, fetching fresh entries when it opens.
    pub async fn toggle_leaderboard(&mut self) -> bool {
        if self.leaderboard_open {
            self.close_leaderboard();
        } else {
            self.open_leaderboard().await;
        }
        self.leaderboard_open
    }

    pub async fn open_leaderboard(&mut self) {
        self.leaderboard_open = true;
        let board = match self.server.fetch_leaderboard().await {
            Ok(entries) => LeaderboardView::from_entries(entries),
            Err(err) => {
                error!(error = %err, "error loading leaderboard");
                LeaderboardView::Failed
            }
        };
        self.view.render_leaderboard(&board);
    }

    pub fn close_leaderboard(&mut self) {
        self.leaderboard_open = false;
        self.view.render_leaderboard(&LeaderboardView::Hidden);
    }

    pub fn restart(&mut self) {
        if let Some(session) = self.state.session() {
            info!(game_id = %session.game_id(), "abandoning game");
        }
        self.state.reset();
        self.screen = Screen::Setup;
        self.last_result = None;
        self.view.clear_history();
        self.view.render_hint(None);
        self.view.render_setup(self.state.selector());
    }
}

fn guess_failure(game_id: &str, err: GameServerError) -> Notice {
    if err.is_rejection() {
        warn!(%game_id, error = %err, "guess rejected");
        Notice::warning(err.server_message().unwrap_or(GUESS_REJECTED))
    } else {
        error!(%game_id, error = %err, "error making guess");
        Notice::warning(GUESS_UNREACHABLE)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
