// Library crate for the courtside match scoring service
// This file exposes the public API for integration tests

pub mod config;
pub mod event;
pub mod notify;
pub mod persistence;
pub mod scoring;
pub mod session;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use event::{EventBus, MatchEvent};
pub use notify::{EventBusNotifier, NotificationLevel, Notifier};
pub use persistence::{InMemoryScoreRepository, ScoreRepository};
pub use scoring::{MatchConfig, MatchResult, PointOutcome, ScoreBoard, ScoringError, Side};
pub use session::{MatchParticipants, MatchService, SessionError};
pub use shared::{AppError, AppState};
