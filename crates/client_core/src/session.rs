//! Transient state of the game in progress, owned by the controller.

use shared::{domain::Difficulty, protocol::StartGameResponse};
use tracing::warn;

/// Single-select difficulty group. Exactly one option is active at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultySelector {
    selected: Difficulty,
}

impl DifficultySelector {
    pub fn selected(&self) -> Difficulty {
        self.selected
    }

    pub fn select(&mut self, difficulty: Difficulty) {
        self.selected = difficulty;
    }

    pub fn is_active(&self, difficulty: Difficulty) -> bool {
        self.selected == difficulty
    }

    /// Every option with its active flag, in display order.
    pub fn options(&self) -> [(Difficulty, bool); 3] {
        Difficulty::ALL.map(|difficulty| (difficulty, self.is_active(difficulty)))
    }

    pub fn reset(&mut self) {
        self.selected = Difficulty::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    game_id: String,
    player_name: String,
    difficulty: Difficulty,
    max_attempts: u32,
    attempts_used: u32,
}

impl Session {
    pub fn start(
        player_name: impl Into<String>,
        difficulty: Difficulty,
        response: &StartGameResponse,
    ) -> Self {
        Self {
            game_id: response.game_id.clone(),
            player_name: player_name.into(),
            difficulty,
            max_attempts: response.max_attempts,
            attempts_used: 0,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts_used)
    }

    /// Counts one accepted guess and returns its attempt number.
    pub fn record_guess(&mut self) -> u32 {
        if self.attempts_used >= self.max_attempts {
            warn!(
                game_id = %self.game_id,
                max_attempts = self.max_attempts,
                "server accepted a guess past the attempt limit"
            );
            return self.max_attempts;
        }
        self.attempts_used += 1;
        self.attempts_used
    }
}

/// Session slot plus the difficulty chosen for the next game.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    session: Option<Session>,
    selector: DifficultySelector,
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn selector(&self) -> &DifficultySelector {
        &self.selector
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.selector.select(difficulty);
    }

    pub fn start_session(
        &mut self,
        player_name: impl Into<String>,
        response: &StartGameResponse,
    ) -> &Session {
        self.session
            .insert(Session::start(player_name, self.selector.selected(), response))
    }

    /// Returns `None` when no game is in progress.
    pub fn record_guess(&mut self) -> Option<u32> {
        self.session.as_mut().map(Session::record_guess)
    }

    /// Drops the session after a terminal result. The chosen difficulty is kept.
    pub fn end_session(&mut self) -> Option<Session> {
        self.session.take()
    }

    pub fn reset(&mut self) {
        self.session = None;
        self.selector.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_response(max_attempts: u32) -> StartGameResponse {
        StartGameResponse {
            game_id: "abc".into(),
            max_attempts,
            message: None,
            difficulty: None,
        }
    }

    #[test]
    fn exactly_one_difficulty_is_active_after_any_clicks() {
        let mut selector = DifficultySelector::default();
        assert!(selector.is_active(Difficulty::Easy));

        let clicks = [
            Difficulty::Hard,
            Difficulty::Medium,
            Difficulty::Medium,
            Difficulty::Easy,
            Difficulty::Hard,
        ];
        for click in clicks {
            selector.select(click);
            let active = selector.options().iter().filter(|(_, on)| *on).count();
            assert_eq!(active, 1);
            assert_eq!(selector.selected(), click);
        }
    }

    #[test]
    fn selecting_b_after_a_deactivates_a() {
        let mut selector = DifficultySelector::default();
        selector.select(Difficulty::Medium);
        selector.select(Difficulty::Hard);
        assert!(!selector.is_active(Difficulty::Medium));
        assert!(selector.is_active(Difficulty::Hard));
    }

    #[test]
    fn session_uses_selected_difficulty() {
        let mut state = SessionState::default();
        state.select_difficulty(Difficulty::Hard);
        let session = state.start_session("Miles", &start_response(5));
        assert_eq!(session.difficulty(), Difficulty::Hard);
        assert_eq!(session.attempts_used(), 0);
        assert_eq!(session.attempts_remaining(), 5);
    }

    #[test]
    fn record_guess_never_exceeds_max_attempts() {
        let mut session = Session::start("Miles", Difficulty::Easy, &start_response(2));
        assert_eq!(session.record_guess(), 1);
        assert_eq!(session.record_guess(), 2);
        assert_eq!(session.record_guess(), 2);
        assert_eq!(session.attempts_used(), 2);
        assert_eq!(session.attempts_remaining(), 0);
    }

    #[test]
    fn record_guess_without_session_is_noop() {
        let mut state = SessionState::default();
        assert_eq!(state.record_guess(), None);
        assert!(!state.is_active());
    }

    #[test]
    fn reset_clears_session_and_restores_easy() {
        let mut state = SessionState::default();
        state.select_difficulty(Difficulty::Medium);
        state.start_session("Miles", &start_response(7));
        state.reset();
        assert!(state.session().is_none());
        assert_eq!(state.selector().selected(), Difficulty::Easy);
    }

    #[test]
    fn end_session_keeps_selected_difficulty() {
        let mut state = SessionState::default();
        state.select_difficulty(Difficulty::Medium);
        state.start_session("Miles", &start_response(7));
        let ended = state.end_session().expect("session");
        assert_eq!(ended.game_id(), "abc");
        assert!(!state.is_active());
        assert_eq!(state.selector().selected(), Difficulty::Medium);
    }
}
