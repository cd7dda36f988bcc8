use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::{MatchCompletion, PlayerRating, ScoreRow};
use crate::shared::AppError;

/// Backend that stores finished scores and serves ratings.
///
/// Rating recalculation happens on the backend after `mark_match_completed`
/// and is not observable through this trait except by re-reading ratings.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn insert_score_row(&self, row: &ScoreRow) -> Result<(), AppError>;
    async fn mark_match_completed(&self, completion: &MatchCompletion) -> Result<(), AppError>;
    async fn fetch_current_ratings(
        &self,
        player_ids: &[String],
    ) -> Result<Vec<PlayerRating>, AppError>;
}

#[derive(Debug, Clone)]
pub struct StoredScoreRow {
    pub id: String,
    pub row: ScoreRow,
}

/// In-memory implementation of ScoreRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryScoreRepository {
    score_rows: Arc<RwLock<Vec<StoredScoreRow>>>,
    completions: Arc<RwLock<HashMap<String, MatchCompletion>>>,
    ratings: Arc<RwLock<HashMap<String, f64>>>,
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository with pre-populated ratings
    pub fn with_ratings(ratings: Vec<PlayerRating>) -> Self {
        let ratings = ratings
            .into_iter()
            .map(|r| (r.player_id, r.rating))
            .collect();
        Self {
            ratings: Arc::new(RwLock::new(ratings)),
            ..Self::default()
        }
    }

    pub async fn set_rating(&self, player_id: &str, rating: f64) {
        self.ratings
            .write()
            .await
            .insert(player_id.to_string(), rating);
    }

    pub async fn score_rows(&self, match_id: &str) -> Vec<ScoreRow> {
        self.score_rows
            .read()
            .await
            .iter()
            .filter(|stored| stored.row.match_id == match_id)
            .map(|stored| stored.row.clone())
            .collect()
    }

    pub async fn completion(&self, match_id: &str) -> Option<MatchCompletion> {
        self.completions.read().await.get(match_id).cloned()
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    #[instrument(skip(self, row), fields(match_id = %row.match_id, set_number = row.set_number))]
    async fn insert_score_row(&self, row: &ScoreRow) -> Result<(), AppError> {
        let id = Uuid::new_v4().to_string();
        debug!(row_id = %id, "Inserting score row in memory");

        self.score_rows.write().await.push(StoredScoreRow {
            id,
            row: row.clone(),
        });
        Ok(())
    }

    #[instrument(skip(self, completion), fields(match_id = %completion.match_id))]
    async fn mark_match_completed(&self, completion: &MatchCompletion) -> Result<(), AppError> {
        debug!(winner = %completion.winner_side_id, "Marking match completed in memory");

        let mut completions = self.completions.write().await;
        if completions.contains_key(&completion.match_id) {
            warn!("Match already marked completed in memory");
            return Err(AppError::Conflict(format!(
                "Match {} already completed",
                completion.match_id
            )));
        }
        completions.insert(completion.match_id.clone(), completion.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_current_ratings(
        &self,
        player_ids: &[String],
    ) -> Result<Vec<PlayerRating>, AppError> {
        let ratings = self.ratings.read().await;
        Ok(player_ids
            .iter()
            .filter_map(|id| {
                ratings.get(id).map(|rating| PlayerRating {
                    player_id: id.clone(),
                    rating: *rating,
                })
            })
            .collect())
    }
}

/// PostgreSQL implementation of score repository
pub struct PostgresScoreRepository {
    pool: PgPool,
}

impl PostgresScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreRepository for PostgresScoreRepository {
    #[instrument(skip(self, row), fields(match_id = %row.match_id, set_number = row.set_number))]
    async fn insert_score_row(&self, row: &ScoreRow) -> Result<(), AppError> {
        debug!("Inserting score row in database");

        sqlx::query(
            "INSERT INTO match_scores (id, match_id, set_number, side_a_games, side_b_games, tiebreak_a, tiebreak_b, recorded_by, game_history) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
        )
        .bind(Uuid::new_v4())
        .bind(&row.match_id)
        .bind(row.set_number)
        .bind(row.side_a_games)
        .bind(row.side_b_games)
        .bind(row.tiebreak_a)
        .bind(row.tiebreak_b)
        .bind(&row.recorded_by)
        .bind(&row.game_history)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to insert score row");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self, completion), fields(match_id = %completion.match_id))]
    async fn mark_match_completed(&self, completion: &MatchCompletion) -> Result<(), AppError> {
        debug!(winner = %completion.winner_side_id, "Marking match completed in database");

        let result = sqlx::query(
            "UPDATE events SET status = 'completed', winner_id = $2 WHERE id = $1 AND status <> 'completed'",
        )
        .bind(&completion.match_id)
        .bind(&completion.winner_side_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to mark match completed");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!("Match not found or already completed");
            return Err(AppError::NotFound(format!(
                "No open match with id {}",
                completion.match_id
            )));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_current_ratings(
        &self,
        player_ids: &[String],
    ) -> Result<Vec<PlayerRating>, AppError> {
        sqlx::query_as::<_, PlayerRating>(
            "SELECT player_id, rating FROM rankings WHERE player_id = ANY($1)",
        )
        .bind(player_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch ratings");
            AppError::DatabaseError(e.to_string())
        })
    }
}
