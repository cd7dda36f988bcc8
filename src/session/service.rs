use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use super::errors::SessionError;
use super::manager::{SessionManager, SharedSession};
use super::models::{MatchParticipants, ScoringSession};
use crate::event::{EventBus, MatchEvent};
use crate::notify::Notifier;
use crate::persistence::{
    rating_changes, MatchCompletion, PlayerRating, RatingChange, ScoreRepository, ScoreRow,
};
use crate::scoring::{MatchConfig, MatchResult, PointOutcome, ScoreboardView, Side};

/// Bounds on the best-effort rating read that follows a submission
#[derive(Debug, Clone, Copy)]
pub struct FinalizeSettings {
    pub rating_poll_delay: Duration,
    pub rating_poll_attempts: u32,
}

impl Default for FinalizeSettings {
    fn default() -> Self {
        Self {
            rating_poll_delay: Duration::from_millis(1500),
            rating_poll_attempts: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreUpdate {
    pub outcome: Option<PointOutcome>,
    pub view: ScoreboardView,
}

/// Whether the backend had recalculated ratings by the time we looked
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "changes", rename_all = "snake_case")]
pub enum RatingSync {
    Updated(Vec<RatingChange>),
    Pending,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalizeOutcome {
    pub result: MatchResult,
    pub rating_sync: RatingSync,
}

/// Drives scoring sessions: applies commands, publishes score changes and
/// submits decided matches to the score repository.
pub struct MatchService {
    sessions: SessionManager,
    repository: Arc<dyn ScoreRepository>,
    notifier: Arc<dyn Notifier>,
    event_bus: EventBus,
    settings: FinalizeSettings,
}

impl MatchService {
    pub fn new(
        repository: Arc<dyn ScoreRepository>,
        notifier: Arc<dyn Notifier>,
        event_bus: EventBus,
        settings: FinalizeSettings,
    ) -> Self {
        Self {
            sessions: SessionManager::new(),
            repository,
            notifier,
            event_bus,
            settings,
        }
    }

    #[instrument(skip(self, participants, config))]
    pub async fn open_session(
        &self,
        match_id: &str,
        participants: MatchParticipants,
        config: MatchConfig,
    ) -> Result<ScoreboardView, SessionError> {
        if match_id.trim().is_empty() {
            return Err(SessionError::InvalidParticipants(
                "match id cannot be empty".to_string(),
            ));
        }
        let session = ScoringSession::new(match_id, participants, config)?;
        let view = session.view();
        self.sessions.open(session).await?;

        info!(match_id = %match_id, sets_to_win = config.sets_to_win, "Scoring session opened");
        Ok(view)
    }

    /// Discards the in-memory score. Nothing is persisted for an unfinalized match.
    #[instrument(skip(self))]
    pub async fn close_session(&self, match_id: &str) -> Result<(), SessionError> {
        let session = self.sessions.close(match_id).await?;
        {
            let guard = session.lock().await;
            info!(
                match_id = %match_id,
                submission = ?guard.submission(),
                opened_at = %guard.opened_at(),
                "Scoring session closed"
            );
        }

        self.event_bus
            .emit_to_match(match_id, MatchEvent::SessionClosed)
            .await;
        self.event_bus.remove_match(match_id).await;
        Ok(())
    }

    /// Live feed of an open match. Ends when the session closes.
    pub async fn subscribe(
        &self,
        match_id: &str,
    ) -> Result<broadcast::Receiver<MatchEvent>, SessionError> {
        self.sessions.subscribe(match_id, &self.event_bus).await
    }

    pub async fn view(&self, match_id: &str) -> Result<ScoreboardView, SessionError> {
        let session = self.sessions.get(match_id).await?;
        let guard = session.lock().await;
        Ok(guard.view())
    }

    pub async fn award_point(
        &self,
        match_id: &str,
        side: Side,
        is_ace: bool,
    ) -> Result<ScoreUpdate, SessionError> {
        let session = self.sessions.get(match_id).await?;
        let result = {
            let mut guard = session.lock().await;
            guard
                .award_point(side, is_ace)
                .map(|outcome| (Some(outcome), guard.view()))
        };
        let update = self.publish(match_id, result).await?;

        if let Some(PointOutcome::MatchWon { winner }) = update.outcome {
            info!(match_id = %match_id, winner = %winner, "Match decided");
        }
        Ok(update)
    }

    pub async fn toggle_serve(&self, match_id: &str) -> Result<ScoreUpdate, SessionError> {
        let session = self.sessions.get(match_id).await?;
        let result = {
            let mut guard = session.lock().await;
            guard.toggle_serve().map(|_| (None, guard.view()))
        };
        self.publish(match_id, result).await
    }

    pub async fn record_tiebreak_point(
        &self,
        match_id: &str,
        side: Side,
    ) -> Result<ScoreUpdate, SessionError> {
        let session = self.sessions.get(match_id).await?;
        let result = {
            let mut guard = session.lock().await;
            guard.record_tiebreak_point(side).map(|_| (None, guard.view()))
        };
        self.publish(match_id, result).await
    }

    pub async fn undo(&self, match_id: &str) -> Result<ScoreUpdate, SessionError> {
        let session = self.sessions.get(match_id).await?;
        let result = {
            let mut guard = session.lock().await;
            guard.undo().map(|_| (None, guard.view()))
        };
        self.publish(match_id, result).await
    }

    /// Persists the result of a decided match exactly once.
    ///
    /// Score rows are written one per set, in order, followed by the
    /// completion marker. On failure the score is left untouched and the
    /// submission can be retried; rows already written are not rolled back.
    #[instrument(skip(self))]
    pub async fn finalize(
        &self,
        match_id: &str,
        recorded_by: &str,
    ) -> Result<FinalizeOutcome, SessionError> {
        let session = self.sessions.get(match_id).await?;
        let claimed = {
            let mut guard = session.lock().await;
            guard
                .begin_submission()
                .map(|result| (result, guard.participants().clone()))
        };
        let (result, participants) = match claimed {
            Ok(claimed) => claimed,
            Err(err) => {
                self.notifier.notify_warning(match_id, &err.to_string()).await;
                return Err(err);
            }
        };

        let player_ids = participants.player_ids();
        let ratings_before = self.read_ratings(match_id, &player_ids).await;

        if let Err(err) = self.persist(&result, &participants, recorded_by).await {
            self.release(match_id, &session, false).await;
            warn!(match_id = %match_id, error = %err, partial = err.is_partial_write(), "Result submission failed");
            self.notifier.notify_error(match_id, &err.to_string()).await;
            return Err(err);
        }
        self.release(match_id, &session, true).await;

        info!(match_id = %match_id, winner = %result.winner, sets = result.sets.len(), "Match result submitted");
        self.notifier
            .notify_success(match_id, "Match result saved")
            .await;
        self.event_bus
            .emit_to_match(
                match_id,
                MatchEvent::MatchFinalized {
                    result: result.clone(),
                },
            )
            .await;

        let rating_sync = match ratings_before {
            Some(before) => self.poll_ratings(match_id, &player_ids, &before).await,
            None => RatingSync::Pending,
        };
        match &rating_sync {
            RatingSync::Updated(changes) => {
                self.notifier
                    .notify_success(
                        match_id,
                        &format!("Ratings updated for {} players", changes.len()),
                    )
                    .await;
                self.event_bus
                    .emit_to_match(
                        match_id,
                        MatchEvent::RatingsUpdated {
                            changes: changes.clone(),
                        },
                    )
                    .await;
            }
            RatingSync::Pending => {
                self.notifier
                    .notify_warning(match_id, "Rating update pending")
                    .await;
            }
        }

        Ok(FinalizeOutcome {
            result,
            rating_sync,
        })
    }

    async fn persist(
        &self,
        result: &MatchResult,
        participants: &MatchParticipants,
        recorded_by: &str,
    ) -> Result<(), SessionError> {
        let rows_total = result.sets.len();
        for (rows_written, set) in result.sets.iter().enumerate() {
            let row = ScoreRow::from_set(&result.match_id, set, recorded_by);
            self.repository
                .insert_score_row(&row)
                .await
                .map_err(|source| SessionError::ScoreRowFailed {
                    set_number: set.set_number,
                    rows_written,
                    rows_total,
                    source,
                })?;
            debug!(match_id = %result.match_id, set_number = set.set_number, "Score row written");
        }

        let completion = MatchCompletion {
            match_id: result.match_id.clone(),
            winner_side_id: participants.roster(result.winner).side_id.clone(),
        };
        self.repository
            .mark_match_completed(&completion)
            .await
            .map_err(|source| SessionError::CompletionFailed { source })
    }

    async fn release(&self, match_id: &str, session: &SharedSession, succeeded: bool) {
        if succeeded {
            self.sessions.mark_finalized(match_id).await;
        }
        let mut guard = session.lock().await;
        if succeeded {
            guard.complete_submission();
        } else {
            guard.abort_submission();
        }
    }

    async fn read_ratings(&self, match_id: &str, player_ids: &[String]) -> Option<Vec<PlayerRating>> {
        if player_ids.is_empty() {
            return None;
        }
        match self.repository.fetch_current_ratings(player_ids).await {
            Ok(ratings) => Some(ratings),
            Err(err) => {
                warn!(match_id = %match_id, error = %err, "Could not read ratings before submission");
                None
            }
        }
    }

    async fn poll_ratings(
        &self,
        match_id: &str,
        player_ids: &[String],
        before: &[PlayerRating],
    ) -> RatingSync {
        for attempt in 1..=self.settings.rating_poll_attempts {
            tokio::time::sleep(self.settings.rating_poll_delay).await;

            match self.repository.fetch_current_ratings(player_ids).await {
                Ok(after) => {
                    let changes = rating_changes(before, &after);
                    if !changes.is_empty() {
                        return RatingSync::Updated(changes);
                    }
                    debug!(match_id = %match_id, attempt, "Ratings not updated yet");
                }
                Err(err) => {
                    warn!(match_id = %match_id, attempt, error = %err, "Rating poll failed");
                }
            }
        }
        RatingSync::Pending
    }

    async fn publish(
        &self,
        match_id: &str,
        result: Result<(Option<PointOutcome>, ScoreboardView), SessionError>,
    ) -> Result<ScoreUpdate, SessionError> {
        match result {
            Ok((outcome, view)) => {
                self.event_bus
                    .emit_to_match(
                        match_id,
                        MatchEvent::ScoreChanged {
                            view: view.clone(),
                            outcome,
                        },
                    )
                    .await;
                Ok(ScoreUpdate { outcome, view })
            }
            Err(err) => {
                debug!(match_id = %match_id, error = %err, "Command rejected");
                self.notifier.notify_warning(match_id, &err.to_string()).await;
                Err(err)
            }
        }
    }
}
