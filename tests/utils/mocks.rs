use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use courtside::{
    notify::{NotificationLevel, Notifier},
    persistence::{
        InMemoryScoreRepository, MatchCompletion, PlayerRating, ScoreRepository, ScoreRow,
    },
    AppError,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Score repository with injectable failures and latency
#[derive(Default)]
pub struct MockScoreRepository {
    inner: InMemoryScoreRepository,
    insert_calls: RwLock<usize>,
    fail_on_insert: RwLock<Option<usize>>,
    fail_completion: RwLock<bool>,
    latency: RwLock<Duration>,
}

impl MockScoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the nth insert call (1-based) from now on
    pub async fn fail_on_insert(&self, call: usize) {
        *self.fail_on_insert.write().await = Some(call);
    }

    pub async fn fail_completion(&self, fail: bool) {
        *self.fail_completion.write().await = fail;
    }

    pub async fn clear_failures(&self) {
        *self.fail_on_insert.write().await = None;
        *self.fail_completion.write().await = false;
    }

    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = latency;
    }

    pub async fn score_rows(&self, match_id: &str) -> Vec<ScoreRow> {
        self.inner.score_rows(match_id).await
    }

    pub async fn completion(&self, match_id: &str) -> Option<MatchCompletion> {
        self.inner.completion(match_id).await
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.read().await;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ScoreRepository for MockScoreRepository {
    async fn insert_score_row(&self, row: &ScoreRow) -> Result<(), AppError> {
        self.simulate_latency().await;

        let call = {
            let mut calls = self.insert_calls.write().await;
            *calls += 1;
            *calls
        };
        if *self.fail_on_insert.read().await == Some(call) {
            return Err(AppError::DatabaseError("connection reset".to_string()));
        }
        self.inner.insert_score_row(row).await
    }

    async fn mark_match_completed(&self, completion: &MatchCompletion) -> Result<(), AppError> {
        self.simulate_latency().await;

        if *self.fail_completion.read().await {
            return Err(AppError::DatabaseError("statement timeout".to_string()));
        }
        self.inner.mark_match_completed(completion).await
    }

    async fn fetch_current_ratings(
        &self,
        player_ids: &[String],
    ) -> Result<Vec<PlayerRating>, AppError> {
        self.inner.fetch_current_ratings(player_ids).await
    }
}

/// Notifier that records every message it is asked to show
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<RwLock<Vec<(NotificationLevel, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<(NotificationLevel, String)> {
        self.messages.read().await.clone()
    }

    pub async fn messages_at(&self, level: NotificationLevel) -> Vec<String> {
        self.messages
            .read()
            .await
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, _match_id: &str, level: NotificationLevel, message: &str) {
        self.messages
            .write()
            .await
            .push((level, message.to_string()));
    }
}
