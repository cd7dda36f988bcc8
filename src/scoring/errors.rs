use thiserror::Error;

/// Commands the engine refuses. A rejected command never changes the score.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("Match has already been decided")]
    MatchAlreadyDecided,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Tiebreak is not active (requires 6-6 in games)")]
    TiebreakNotActive,

    #[error("Invalid point index: {0}")]
    InvalidPointIndex(u8),

    #[error("Invalid match configuration: {0}")]
    InvalidConfig(String),
}
