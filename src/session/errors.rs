use thiserror::Error;

use crate::scoring::ScoringError;
use crate::shared::AppError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No scoring session open for match {0}")]
    NotFound(String),

    #[error("A scoring session is already open for match {0}")]
    AlreadyOpen(String),

    #[error("Invalid participants: {0}")]
    InvalidParticipants(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Match has no winner yet")]
    MatchNotDecided,

    #[error("Result submission already in progress")]
    SubmissionInFlight,

    #[error("Result already submitted")]
    AlreadyFinalized,

    #[error("Failed to save set {set_number} ({rows_written} of {rows_total} sets saved): {source}")]
    ScoreRowFailed {
        set_number: u32,
        rows_written: usize,
        rows_total: usize,
        #[source]
        source: AppError,
    },

    #[error("Scores saved but match could not be marked completed: {source}")]
    CompletionFailed {
        #[source]
        source: AppError,
    },
}

impl SessionError {
    /// Whether some score rows reached the backend before the failure
    pub fn is_partial_write(&self) -> bool {
        match self {
            SessionError::ScoreRowFailed { rows_written, .. } => *rows_written > 0,
            SessionError::CompletionFailed { .. } => true,
            _ => false,
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => AppError::NotFound(err.to_string()),
            SessionError::AlreadyOpen(_)
            | SessionError::SubmissionInFlight
            | SessionError::AlreadyFinalized => AppError::Conflict(err.to_string()),
            SessionError::InvalidParticipants(_)
            | SessionError::Scoring(_)
            | SessionError::MatchNotDecided => AppError::BadRequest(err.to_string()),
            SessionError::ScoreRowFailed { .. } | SessionError::CompletionFailed { .. } => {
                AppError::DatabaseError(err.to_string())
            }
        }
    }
}
