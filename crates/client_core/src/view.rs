//! Render contract between the controller and whatever draws the game.

use shared::protocol::{GuessResponse, GuessVerdict, LeaderboardEntry};

use crate::session::{DifficultySelector, Session};

/// Hint shown in the history when the server sends none.
pub const PENDING_HINT: &str = "checking...";
pub const EMPTY_LEADERBOARD: &str = "No heroes yet. Be the first!";
pub const LEADERBOARD_FAILED: &str = "Failed to load leaderboard";

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

pub trait GameView {
    fn render_setup(&mut self, selector: &DifficultySelector);
    fn render_difficulty(&mut self, selector: &DifficultySelector);
    fn render_active_game(&mut self, session: &Session);
    fn render_attempts(&mut self, remaining: u32);
    /// `None` hides the hint box.
    fn render_hint(&mut self, hint: Option<&str>);
    /// Called once per accepted guess; newest entries go on top.
    fn render_history_entry(&mut self, entry: &GuessRecord);
    fn clear_history(&mut self);
    fn render_result(&mut self, summary: &ResultSummary);
    fn render_leaderboard(&mut self, board: &LeaderboardView);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessRecord {
    pub attempt_number: u32,
    pub guess_value: i64,
    pub hint: String,
}

impl GuessRecord {
    pub fn new(attempt_number: u32, guess_value: i64, hint: Option<&str>) -> Self {
        Self {
            attempt_number,
            guess_value,
            hint: hint.unwrap_or(PENDING_HINT).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub outcome: GameOutcome,
    score: i64,
    pub target_number: Option<i64>,
    pub attempts: u32,
}

impl ResultSummary {
    /// Builds the summary for a terminal response; `None` for a continue tag.
    /// `attempts_used` covers servers that omit the attempt count.
    pub fn from_response(response: &GuessResponse, attempts_used: u32) -> Option<Self> {
        let outcome = match response.result {
            GuessVerdict::Win => GameOutcome::Won,
            GuessVerdict::Lose => GameOutcome::Lost,
            GuessVerdict::Continue => return None,
        };
        Some(Self {
            outcome,
            score: response.score.unwrap_or(0),
            target_number: response.target_number,
            attempts: response.attempts.unwrap_or(attempts_used),
        })
    }

    pub fn won(&self) -> bool {
        self.outcome == GameOutcome::Won
    }

    /// Score to display. Lost games hide the score field entirely.
    pub fn score(&self) -> Option<i64> {
        self.won().then_some(self.score)
    }

    pub fn emoji(&self) -> &'static str {
        match self.outcome {
            GameOutcome::Won => "🎉",
            GameOutcome::Lost => "😢",
        }
    }

    pub fn title(&self) -> &'static str {
        match self.outcome {
            GameOutcome::Won => "MISSION ACCOMPLISHED!",
            GameOutcome::Lost => "MISSION FAILED",
        }
    }

    pub fn message(&self) -> &'static str {
        match self.outcome {
            GameOutcome::Won => "Great job, web-slinger! You guessed it!",
            GameOutcome::Lost => "Out of web shots! Better luck next time!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub rank: usize,
    pub marker: String,
    pub entry: LeaderboardEntry,
}

impl RankedEntry {
    pub fn details(&self) -> String {
        format!(
            "{} • {} attempts",
            self.entry.difficulty, self.entry.attempts
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LeaderboardView {
    Hidden,
    Empty,
    Ranked(Vec<RankedEntry>),
    Failed,
}

impl LeaderboardView {
    /// Ranks entries in the order the server returned them.
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        if entries.is_empty() {
            return LeaderboardView::Empty;
        }
        LeaderboardView::Ranked(
            entries
                .into_iter()
                .enumerate()
                .map(|(index, entry)| RankedEntry {
                    rank: index + 1,
                    marker: rank_marker(index),
                    entry,
                })
                .collect(),
        )
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            LeaderboardView::Empty => Some(EMPTY_LEADERBOARD),
            LeaderboardView::Failed => Some(LEADERBOARD_FAILED),
            LeaderboardView::Hidden | LeaderboardView::Ranked(_) => None,
        }
    }
}

/// Medal for the top three, `#N` after that. `index` is zero based.
pub fn rank_marker(index: usize) -> String {
    MEDALS
        .get(index)
        .map(|medal| medal.to_string())
        .unwrap_or_else(|| format!("#{}", index + 1))
}
