use chrono::{DateTime, NaiveDateTime};
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::domain::{Difficulty, GameStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGameRequest {
    pub player_name: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGameResponse {
    pub game_id: String,
    pub max_attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRequest {
    pub guess: i64,
}

/// Result tag of a guess. Anything other than `win` or `lose` keeps the game going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessVerdict {
    Win,
    Lose,
    #[serde(other)]
    Continue,
}

impl GuessVerdict {
    pub fn is_terminal(self) -> bool {
        matches!(self, GuessVerdict::Win | GuessVerdict::Lose)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessResponse {
    pub result: GuessVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_number: Option<i64>,
    #[serde(
        default,
        alias = "attempts_used",
        skip_serializing_if = "Option::is_none"
    )]
    pub attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GuessResponse {
    /// Hint text, treating an empty string the same as a missing one.
    pub fn hint_text(&self) -> Option<&str> {
        self.hint.as_deref().filter(|hint| !hint.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub difficulty: String,
    pub attempts: u32,
    pub score: i64,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_games: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedGuess {
    pub attempt: u32,
    pub guess: i64,
    pub hint: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStatusResponse {
    pub game_id: String,
    pub player_name: String,
    pub difficulty: Difficulty,
    pub status: GameStatus,
    pub attempts: u32,
    pub max_attempts: u32,
    #[serde(default)]
    pub guesses: Vec<RecordedGuess>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub active_games: u64,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_games: u64,
    pub active_games: u64,
    pub completed_games: u64,
    pub won_games: u64,
    pub lost_games: u64,
    pub win_rate: f64,
}

/// Server timestamps are informational. Offset-qualified values are normalized to
/// UTC and anything unreadable becomes `None` instead of failing the whole body.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        #[allow(dead_code)]
        Other(IgnoredAny),
    }

    let Some(RawTimestamp::Text(text)) = Option::<RawTimestamp>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(DateTime::parse_from_rfc3339(&text)
        .map(|ts| ts.naive_utc())
        .or_else(|_| text.parse::<NaiveDateTime>())
        .ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_result_tags_continue_the_game() {
        let raw = r#"{"result":"higher","hint":"Too low!","target_number":null,"attempts":1}"#;
        let response: GuessResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(response.result, GuessVerdict::Continue);
        assert!(!response.result.is_terminal());
        assert_eq!(response.hint_text(), Some("Too low!"));
        assert_eq!(response.target_number, None);
        assert_eq!(response.attempts, Some(1));
    }

    #[test]
    fn continue_response_accepts_attempts_used_field() {
        let raw = r#"{"result":"continue","hint":"too high","attempts_used":3,"attempts_remaining":7}"#;
        let response: GuessResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(response.attempts, Some(3));
        assert_eq!(response.attempts_remaining, Some(7));
    }

    #[test]
    fn win_response_without_hint_has_no_hint_text() {
        let raw = r#"{"result":"win","hint":"","score":85,"target_number":40,"attempts":2}"#;
        let response: GuessResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(response.result, GuessVerdict::Win);
        assert_eq!(response.hint_text(), None);
        assert_eq!(response.score, Some(85));
    }

    #[test]
    fn leaderboard_defaults_to_empty_list() {
        let response: LeaderboardResponse = serde_json::from_str("{}").expect("decode");
        assert!(response.leaderboard.is_empty());
    }

    #[test]
    fn leaderboard_entry_parses_server_timestamp() {
        let raw = r#"{"player_name":"Gwen","difficulty":"hard","attempts":2,"score":330,"completed_at":"2024-05-01T10:15:30.123456"}"#;
        let entry: LeaderboardEntry = serde_json::from_str(raw).expect("decode");
        assert_eq!(entry.score, 330);
        assert!(entry.completed_at.is_some());
    }

    #[test]
    fn leaderboard_survives_offset_and_garbage_timestamps() {
        let raw = r#"{"leaderboard":[
            {"player_name":"Miles","difficulty":"hard","attempts":2,"score":330,"completed_at":"2024-05-01T12:15:30+02:00"},
            {"player_name":"Gwen","difficulty":"easy","attempts":3,"score":170,"completed_at":"yesterday"},
            {"player_name":"Peter","difficulty":"medium","attempts":5,"score":120,"completed_at":null}
        ]}"#;
        let response: LeaderboardResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(response.leaderboard.len(), 3);
        let expected: NaiveDateTime = "2024-05-01T10:15:30".parse().expect("timestamp");
        assert_eq!(response.leaderboard[0].completed_at, Some(expected));
        assert_eq!(response.leaderboard[1].completed_at, None);
        assert_eq!(response.leaderboard[2].completed_at, None);
    }

    #[test]
    fn health_accepts_utc_suffix() {
        let raw = r#"{"status":"healthy","active_games":1,"timestamp":"2024-05-01T10:15:30Z"}"#;
        let health: HealthResponse = serde_json::from_str(raw).expect("decode");
        let expected: NaiveDateTime = "2024-05-01T10:15:30".parse().expect("timestamp");
        assert_eq!(health.timestamp, Some(expected));
    }
}
