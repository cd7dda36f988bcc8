use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::SessionError;
use crate::scoring::{
    MatchConfig, MatchResult, PointOutcome, ScoreBoard, ScoreboardView, Side, TiebreakState,
};

/// Who plays on one side of the net
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideRoster {
    /// Profile id in singles, team id in doubles. Written as the winner id.
    pub side_id: String,
    pub player_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchParticipants {
    pub side_a: SideRoster,
    pub side_b: SideRoster,
}

impl MatchParticipants {
    pub fn singles(player_a: &str, player_b: &str) -> Self {
        Self {
            side_a: SideRoster {
                side_id: player_a.to_string(),
                player_ids: vec![player_a.to_string()],
            },
            side_b: SideRoster {
                side_id: player_b.to_string(),
                player_ids: vec![player_b.to_string()],
            },
        }
    }

    pub fn roster(&self, side: Side) -> &SideRoster {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn player_ids(&self) -> Vec<String> {
        self.side_a
            .player_ids
            .iter()
            .chain(self.side_b.player_ids.iter())
            .cloned()
            .collect()
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.side_a.side_id.trim().is_empty() || self.side_b.side_id.trim().is_empty() {
            return Err(SessionError::InvalidParticipants(
                "side ids cannot be empty".to_string(),
            ));
        }
        if self.side_a.side_id == self.side_b.side_id {
            return Err(SessionError::InvalidParticipants(
                "both sides have the same id".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    InFlight,
    Completed,
}

/// In-memory owner of one match's score. Only one session exists per match id.
#[derive(Debug)]
pub struct ScoringSession {
    match_id: String,
    participants: MatchParticipants,
    board: ScoreBoard,
    submission: SubmissionState,
    opened_at: DateTime<Utc>,
}

impl ScoringSession {
    pub fn new(
        match_id: &str,
        participants: MatchParticipants,
        config: MatchConfig,
    ) -> Result<Self, SessionError> {
        participants.validate()?;
        Ok(Self {
            match_id: match_id.to_string(),
            participants,
            board: ScoreBoard::new(config)?,
            submission: SubmissionState::Idle,
            opened_at: Utc::now(),
        })
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn participants(&self) -> &MatchParticipants {
        &self.participants
    }

    pub fn board(&self) -> &ScoreBoard {
        &self.board
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn view(&self) -> ScoreboardView {
        ScoreboardView::from_board(&self.board)
    }

    pub fn award_point(&mut self, side: Side, is_ace: bool) -> Result<PointOutcome, SessionError> {
        Ok(self.board.award_point(side, is_ace)?)
    }

    pub fn toggle_serve(&mut self) -> Result<Side, SessionError> {
        Ok(self.board.toggle_serve()?)
    }

    pub fn record_tiebreak_point(&mut self, side: Side) -> Result<TiebreakState, SessionError> {
        Ok(self.board.record_tiebreak_point(side)?)
    }

    /// Undo is frozen once a submission has started.
    pub fn undo(&mut self) -> Result<(), SessionError> {
        self.ensure_not_submitting()?;
        Ok(self.board.undo()?)
    }

    /// Claims the submission slot and returns the result to persist.
    pub fn begin_submission(&mut self) -> Result<MatchResult, SessionError> {
        self.ensure_not_submitting()?;
        let result = MatchResult::from_board(&self.match_id, &self.board)
            .ok_or(SessionError::MatchNotDecided)?;
        self.submission = SubmissionState::InFlight;
        Ok(result)
    }

    pub fn complete_submission(&mut self) {
        self.submission = SubmissionState::Completed;
    }

    /// Releases the slot after a failed submission so it can be retried.
    pub fn abort_submission(&mut self) {
        if self.submission == SubmissionState::InFlight {
            self.submission = SubmissionState::Idle;
        }
    }

    fn ensure_not_submitting(&self) -> Result<(), SessionError> {
        match self.submission {
            SubmissionState::Idle => Ok(()),
            SubmissionState::InFlight => Err(SessionError::SubmissionInFlight),
            SubmissionState::Completed => Err(SessionError::AlreadyFinalized),
        }
    }
}
