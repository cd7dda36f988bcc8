pub mod handlers;
pub mod manager;
pub mod models;
pub mod service;
pub mod types;

mod errors;

pub use errors::SessionError;
pub use handlers::router;
pub use manager::SessionManager;
pub use models::{MatchParticipants, ScoringSession, SideRoster, SubmissionState};
pub use service::{FinalizeOutcome, FinalizeSettings, MatchService, RatingSync, ScoreUpdate};
