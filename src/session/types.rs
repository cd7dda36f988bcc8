use serde::Deserialize;

use super::models::MatchParticipants;
use crate::scoring::Side;

/// Request to open a scoring session
#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    pub participants: MatchParticipants,
    pub sets_to_win: Option<u32>,
    pub initial_server: Option<Side>,
}

#[derive(Debug, Deserialize)]
pub struct AwardPointRequest {
    pub side: Side,
    #[serde(default)]
    pub ace: bool,
}

#[derive(Debug, Deserialize)]
pub struct TiebreakPointRequest {
    pub side: Side,
}

#[derive(Debug, Deserialize)]
pub struct FinalizeRequest {
    /// Profile id of whoever entered the score
    pub recorded_by: String,
}
