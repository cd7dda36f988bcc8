use serde::Serialize;

use crate::notify::NotificationLevel;
use crate::persistence::RatingChange;
use crate::scoring::{MatchResult, PointOutcome, ScoreboardView};

/// Events published on a match channel.
///
/// Events represent facts about things that have already happened; live
/// scoreboards subscribe to them instead of polling the session.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    /// The score changed through a point, serve toggle, tiebreak entry or undo
    ScoreChanged {
        view: ScoreboardView,
        outcome: Option<PointOutcome>,
    },

    /// Message for the notification toast
    Notification {
        level: NotificationLevel,
        message: String,
    },

    /// The result was persisted and the match marked completed
    MatchFinalized { result: MatchResult },

    /// Ratings moved after the match was completed
    RatingsUpdated { changes: Vec<RatingChange> },

    /// The scoring session was closed and its in-memory state dropped
    SessionClosed,
}

impl MatchEvent {
    /// Get a short name of the event type, used for SSE event names and logs
    pub fn event_type(&self) -> &'static str {
        match self {
            MatchEvent::ScoreChanged { .. } => "score_changed",
            MatchEvent::Notification { .. } => "notification",
            MatchEvent::MatchFinalized { .. } => "match_finalized",
            MatchEvent::RatingsUpdated { .. } => "ratings_updated",
            MatchEvent::SessionClosed => "session_closed",
        }
    }
}
