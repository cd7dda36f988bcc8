use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, instrument, warn};

use super::{
    service::{FinalizeOutcome, ScoreUpdate},
    types::{AwardPointRequest, FinalizeRequest, OpenSessionRequest, TiebreakPointRequest},
};
use crate::scoring::ScoreboardView;
use crate::shared::{AppError, AppState};

/// Routes issuing scoreboard commands for one match
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/matches/:match_id/session",
            post(open_session).delete(close_session),
        )
        .route("/matches/:match_id/score", get(get_score))
        .route("/matches/:match_id/points", post(award_point))
        .route("/matches/:match_id/serve", post(toggle_serve))
        .route("/matches/:match_id/tiebreak", post(record_tiebreak_point))
        .route("/matches/:match_id/undo", post(undo))
        .route("/matches/:match_id/finalize", post(finalize))
        .route("/matches/:match_id/events", get(match_events))
}

/// POST /matches/:match_id/session
#[instrument(name = "open_session", skip(state, request))]
pub async fn open_session(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<ScoreboardView>), AppError> {
    let mut config = state.match_defaults;
    if let Some(sets_to_win) = request.sets_to_win {
        config.sets_to_win = sets_to_win;
    }
    if let Some(server) = request.initial_server {
        config.initial_server = server;
    }

    let view = state
        .match_service
        .open_session(&match_id, request.participants, config)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// DELETE /matches/:match_id/session
#[instrument(name = "close_session", skip(state))]
pub async fn close_session(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.match_service.close_session(&match_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /matches/:match_id/score
pub async fn get_score(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<ScoreboardView>, AppError> {
    Ok(Json(state.match_service.view(&match_id).await?))
}

/// POST /matches/:match_id/points
pub async fn award_point(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<AwardPointRequest>,
) -> Result<Json<ScoreUpdate>, AppError> {
    let update = state
        .match_service
        .award_point(&match_id, request.side, request.ace)
        .await?;
    Ok(Json(update))
}

/// POST /matches/:match_id/serve
pub async fn toggle_serve(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<ScoreUpdate>, AppError> {
    Ok(Json(state.match_service.toggle_serve(&match_id).await?))
}

/// POST /matches/:match_id/tiebreak
pub async fn record_tiebreak_point(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<TiebreakPointRequest>,
) -> Result<Json<ScoreUpdate>, AppError> {
    let update = state
        .match_service
        .record_tiebreak_point(&match_id, request.side)
        .await?;
    Ok(Json(update))
}

/// POST /matches/:match_id/undo
pub async fn undo(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<ScoreUpdate>, AppError> {
    Ok(Json(state.match_service.undo(&match_id).await?))
}

/// POST /matches/:match_id/finalize
#[instrument(name = "finalize", skip(state, request))]
pub async fn finalize(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<FinalizeRequest>,
) -> Result<Json<FinalizeOutcome>, AppError> {
    info!(recorded_by = %request.recorded_by, "Submitting match result");
    let outcome = state
        .match_service
        .finalize(&match_id, &request.recorded_by)
        .await?;
    Ok(Json(outcome))
}

/// GET /matches/:match_id/events
///
/// Server-sent events for live scoreboards. The stream ends when the session closes.
pub async fn match_events(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let receiver = state.match_service.subscribe(&match_id).await?;
    let stream = futures::stream::unfold(receiver, move |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let sse = Event::default().event(event.event_type()).json_data(&event);
                    return Some((sse, receiver));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live scoreboard lagged behind match events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
