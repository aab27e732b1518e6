//! Line-oriented rendering of the game for a terminal.

use std::io::Write;

use client_core::{
    DifficultySelector, GameView, GuessRecord, LeaderboardView, Notice, NoticeLevel, Session,
    ResultSummary,
};
use shared::protocol::{GameStatusResponse, HealthResponse, StatsResponse};
use tracing::warn;

pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        if let Err(err) = writeln!(self.out, "{}", text.as_ref()) {
            warn!(error = %err, "failed to write to terminal");
        }
    }

    pub fn notice(&mut self, notice: &Notice) {
        let marker = match notice.level {
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Warning => "⚠",
            NoticeLevel::Error => "✖",
        };
        self.line(format!("{marker} {}", notice.message));
    }

    pub fn prompt(&mut self, label: &str) {
        if let Err(err) = write!(self.out, "{label}> ").and_then(|()| self.out.flush()) {
            warn!(error = %err, "failed to write prompt");
        }
    }

    pub fn game_status(&mut self, status: &GameStatusResponse) {
        self.line(format!(
            "Game {} · {} · {} ({})",
            status.game_id,
            status.player_name,
            status.difficulty.label(),
            status.difficulty.range_label()
        ));
        self.line(format!(
            "Status: {:?} · attempts {}/{}",
            status.status, status.attempts, status.max_attempts
        ));
        for guess in &status.guesses {
            self.line(format!(
                "  🎯 Attempt {}: {}  {}",
                guess.attempt, guess.guess, guess.hint
            ));
        }
        if let Some(target) = status.target_number {
            self.line(format!("Target number: {target}"));
        }
        if let Some(score) = status.score {
            self.line(format!("Score: {score}"));
        }
    }

    pub fn health(&mut self, health: &HealthResponse) {
        let checked_at = health
            .timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        self.line(format!(
            "Server {} · {} active games · checked {checked_at}",
            health.status, health.active_games
        ));
    }

    pub fn stats(&mut self, stats: &StatsResponse) {
        self.line(format!("Total games:     {}", stats.total_games));
        self.line(format!("Active games:    {}", stats.active_games));
        self.line(format!("Completed games: {}", stats.completed_games));
        self.line(format!("Won / lost:      {} / {}", stats.won_games, stats.lost_games));
        self.line(format!("Win rate:        {:.2}%", stats.win_rate));
    }
}

impl<W: Write> GameView for TerminalView<W> {
    fn render_setup(&mut self, selector: &DifficultySelector) {
        self.line("🕷️  SPIDER-GUESSER 🕷️");
        self.line("Enter your hero name to start. Commands: :easy :medium :hard :board :quit");
        self.render_difficulty(selector);
    }

    fn render_difficulty(&mut self, selector: &DifficultySelector) {
        let options: Vec<String> = selector
            .options()
            .iter()
            .map(|(difficulty, active)| {
                let label = format!("{} ({})", difficulty.label(), difficulty.range_label());
                if *active {
                    format!("[{label}]")
                } else {
                    format!(" {label} ")
                }
            })
            .collect();
        self.line(format!("Difficulty: {}", options.join(" ")));
    }

    fn render_active_game(&mut self, session: &Session) {
        self.line(format!(
            "Hero: {} · Difficulty: {} · Range: {}",
            session.player_name(),
            session.difficulty().label(),
            session.difficulty().range_label()
        ));
        self.line(format!(
            "Web shots: {} of {}",
            session.attempts_remaining(),
            session.max_attempts()
        ));
    }

    fn render_attempts(&mut self, remaining: u32) {
        self.line(format!("Web shots remaining: {remaining}"));
    }

    fn render_hint(&mut self, hint: Option<&str>) {
        if let Some(hint) = hint {
            self.line(format!("💡 {hint}"));
        }
    }

    fn render_history_entry(&mut self, entry: &GuessRecord) {
        self.line(format!(
            "🎯 Attempt {}: {}  {}",
            entry.attempt_number, entry.guess_value, entry.hint
        ));
    }

    fn clear_history(&mut self) {
        self.line("");
    }

    fn render_result(&mut self, summary: &ResultSummary) {
        self.line(format!("{} {}", summary.emoji(), summary.title()));
        self.line(summary.message());
        if let Some(score) = summary.score() {
            self.line(format!("Score: {score}"));
        }
        let target = summary
            .target_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        self.line(format!("Target number: {target}"));
        self.line(format!("Total attempts: {}", summary.attempts));
        self.line("Type :restart to play again or :quit to leave.");
    }

    fn render_leaderboard(&mut self, board: &LeaderboardView) {
        match board {
            LeaderboardView::Hidden => {}
            LeaderboardView::Ranked(rows) => {
                self.line("🏆 LEADERBOARD");
                for row in rows {
                    self.line(format!(
                        "{:>4}  {:<20} {:<24} {:>6}",
                        row.marker,
                        row.entry.player_name,
                        row.details(),
                        row.entry.score
                    ));
                }
            }
            LeaderboardView::Empty | LeaderboardView::Failed => {
                self.line("🏆 LEADERBOARD");
                if let Some(placeholder) = board.placeholder() {
                    self.line(placeholder);
                }
            }
        }
    }
}
