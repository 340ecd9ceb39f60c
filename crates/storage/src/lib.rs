use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::{Choice, Outcome},
    protocol::StatsSnapshot,
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

/// One finished round as recorded in the history table.
#[derive(Debug, Clone)]
pub struct StoredRound {
    pub player_choice: Choice,
    pub computer_choice: Choice,
    pub result: Outcome,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Current counters from the singleton stats row.
    pub async fn stats(&self) -> Result<StatsSnapshot> {
        let row = sqlx::query(
            "SELECT player_wins, computer_wins, draws, total_games FROM game_stats WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await
        .context("stats row missing")?;

        Ok(StatsSnapshot {
            player_wins: row.get(0),
            computer_wins: row.get(1),
            draws: row.get(2),
            total_games: row.get(3),
        })
    }

    /// Applies one round: bumps the matching counter and appends a history
    /// row, both within a single transaction.
    pub async fn record_round(
        &self,
        player_choice: Choice,
        computer_choice: Choice,
        result: Outcome,
    ) -> Result<()> {
        let counter = match result {
            Outcome::Player => "player_wins",
            Outcome::Computer => "computer_wins",
            Outcome::Draw => "draws",
        };
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!(
            "UPDATE game_stats
             SET {counter} = {counter} + 1,
                 total_games = total_games + 1,
                 last_updated = ?
             WHERE id = 1"
        ))
        .bind(now)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO game_history (player_choice, computer_choice, result, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(player_choice.as_str())
        .bind(computer_choice.as_str())
        .bind(result.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Zeroes the counters and drops the history, returning the fresh snapshot.
    pub async fn reset_stats(&self) -> Result<StatsSnapshot> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE game_stats
             SET player_wins = 0, computer_wins = 0, draws = 0, total_games = 0, last_updated = ?
             WHERE id = 1",
        )
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM game_history").execute(&mut *tx).await?;
        tx.commit().await?;

        self.stats().await
    }

    /// Most recent rounds, newest first.
    pub async fn recent_rounds(&self, limit: u32) -> Result<Vec<StoredRound>> {
        let rows = sqlx::query(
            "SELECT player_choice, computer_choice, result, created_at
             FROM game_history
             ORDER BY id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut rounds = Vec::with_capacity(rows.len());
        for row in rows {
            rounds.push(StoredRound {
                player_choice: row.get::<String, _>(0).parse()?,
                computer_choice: row.get::<String, _>(1).parse()?,
                result: row.get::<String, _>(2).parse()?,
                created_at: row.get(3),
            });
        }
        Ok(rounds)
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
