pub mod models;
pub mod repository;

pub use models::{rating_changes, MatchCompletion, PlayerRating, RatingChange, ScoreRow};
pub use repository::{InMemoryScoreRepository, PostgresScoreRepository, ScoreRepository};
