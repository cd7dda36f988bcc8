use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::scoring::MatchConfig;
use crate::session::MatchService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub match_service: Arc<MatchService>,
    /// Applied to new sessions unless the request overrides it
    pub match_defaults: MatchConfig,
}

impl AppState {
    pub fn new(match_service: Arc<MatchService>, match_defaults: MatchConfig) -> Self {
        Self {
            match_service,
            match_defaults,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::event::EventBus;
    use crate::notify::EventBusNotifier;
    use crate::persistence::{InMemoryScoreRepository, ScoreRepository};
    use crate::session::FinalizeSettings;
    use std::time::Duration;

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        repository: Option<Arc<dyn ScoreRepository>>,
        settings: FinalizeSettings,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                repository: None,
                settings: FinalizeSettings {
                    rating_poll_delay: Duration::ZERO,
                    rating_poll_attempts: 1,
                },
            }
        }

        pub fn with_repository(mut self, repo: Arc<dyn ScoreRepository>) -> Self {
            self.repository = Some(repo);
            self
        }

        pub fn build(self) -> AppState {
            let event_bus = EventBus::new(100);
            let repository = self
                .repository
                .unwrap_or_else(|| Arc::new(InMemoryScoreRepository::new()));
            let notifier = Arc::new(EventBusNotifier::new(event_bus.clone()));
            let match_service = Arc::new(MatchService::new(
                repository,
                notifier,
                event_bus.clone(),
                self.settings,
            ));
            AppState::new(match_service, MatchConfig::default())
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
