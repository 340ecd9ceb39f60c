use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Choice, Outcome};

/// Cumulative win/lose/draw counters, wholly owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub player_wins: i64,
    pub computer_wins: i64,
    pub draws: i64,
    pub total_games: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRequest {
    pub choice: Choice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayResponse {
    pub player_choice: Choice,
    pub computer_choice: Choice,
    pub result: Outcome,
    pub stats: StatsSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub message: String,
    pub stats: StatsSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub player_choice: Choice,
    pub computer_choice: Choice,
    pub result: Outcome,
    pub played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
