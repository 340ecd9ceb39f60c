use rand::Rng;
use shared::{
    domain::{Choice, Outcome},
    error::{ApiError, ErrorCode},
    protocol::{HistoryEntry, PlayResponse, ResetResponse, StatsSnapshot},
};
use storage::Storage;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub const RESET_MESSAGE: &str = "Statistics reset successfully";

const DEFAULT_HISTORY_LIMIT: u32 = 20;
const MAX_HISTORY_LIMIT: u32 = 100;

/// Outcome of one round from the player's perspective. The server is the
/// only place this relation is evaluated; clients just display the result.
pub fn resolve_outcome(player: Choice, computer: Choice) -> Outcome {
    if player == computer {
        return Outcome::Draw;
    }
    let player_wins = matches!(
        (player, computer),
        (Choice::Rock, Choice::Scissors)
            | (Choice::Paper, Choice::Rock)
            | (Choice::Scissors, Choice::Paper)
    );
    if player_wins {
        Outcome::Player
    } else {
        Outcome::Computer
    }
}

fn random_choice() -> Choice {
    let index = rand::rng().random_range(0..Choice::ALL.len());
    Choice::ALL[index]
}

pub async fn play(ctx: &ApiContext, player_choice: Choice) -> Result<PlayResponse, ApiError> {
    let computer_choice = random_choice();
    let result = resolve_outcome(player_choice, computer_choice);

    ctx.storage
        .record_round(player_choice, computer_choice, result)
        .await
        .map_err(internal)?;
    let stats = ctx.storage.stats().await.map_err(internal)?;

    Ok(PlayResponse {
        player_choice,
        computer_choice,
        result,
        stats,
    })
}

pub async fn stats(ctx: &ApiContext) -> Result<StatsSnapshot, ApiError> {
    ctx.storage.stats().await.map_err(internal)
}

pub async fn reset(ctx: &ApiContext) -> Result<ResetResponse, ApiError> {
    let stats = ctx.storage.reset_stats().await.map_err(internal)?;
    Ok(ResetResponse {
        message: RESET_MESSAGE.to_string(),
        stats,
    })
}

pub async fn history(ctx: &ApiContext, limit: Option<u32>) -> Result<Vec<HistoryEntry>, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).min(MAX_HISTORY_LIMIT);
    let rounds = ctx.storage.recent_rounds(limit).await.map_err(internal)?;
    Ok(rounds
        .into_iter()
        .map(|round| HistoryEntry {
            player_choice: round.player_choice,
            computer_choice: round.computer_choice,
            result: round.result,
            played_at: round.created_at,
        })
        .collect())
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
