use serde::{Deserialize, Serialize};

use super::errors::ScoringError;
use super::points::{PointScore, Side};

/// Games each side must hold, both at once, for the tiebreak tally to open.
pub const TIEBREAK_TRIGGER_GAMES: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Sets required to take the match (2 for best-of-3).
    pub sets_to_win: u32,
    pub initial_server: Side,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            sets_to_win: 2,
            initial_server: Side::A,
        }
    }
}

impl MatchConfig {
    pub fn best_of(sets: u32) -> Result<Self, ScoringError> {
        if sets == 0 || sets % 2 == 0 {
            return Err(ScoringError::InvalidConfig(format!(
                "best-of must be a positive odd number, got {}",
                sets
            )));
        }
        Ok(Self {
            sets_to_win: sets / 2 + 1,
            ..Self::default()
        })
    }

    pub fn with_initial_server(mut self, server: Side) -> Self {
        self.initial_server = server;
        self
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.sets_to_win == 0 {
            return Err(ScoringError::InvalidConfig(
                "sets_to_win must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Entry in a set's per-game winner log. Serialized into the score row blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameWinnerEntry {
    pub winner: Side,
    pub game_number: u32,
}

/// Manually entered tiebreak points. Advisory only: the set is decided by games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiebreakState {
    pub points: [u32; 2],
}

impl TiebreakState {
    pub fn points(&self, side: Side) -> u32 {
        self.points[side.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSummary {
    /// 1-based.
    pub set_number: u32,
    pub games_a: u32,
    pub games_b: u32,
    pub tiebreak: Option<TiebreakState>,
    pub games: Vec<GameWinnerEntry>,
}

impl SetSummary {
    pub fn winner(&self) -> Side {
        if self.games_a > self.games_b {
            Side::A
        } else {
            Side::B
        }
    }
}

/// Full score of a match in progress. Also the unit stored in undo history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub(crate) points: [PointScore; 2],
    pub(crate) games: [u32; 2],
    pub(crate) sets: [u32; 2],
    pub(crate) aces: [u32; 2],
    pub(crate) tiebreak: Option<TiebreakState>,
    pub(crate) serving: Side,
    pub(crate) winner: Option<Side>,
    pub(crate) game_log: Vec<GameWinnerEntry>,
    pub(crate) completed_sets: Vec<SetSummary>,
}

impl ScoreState {
    pub fn new(initial_server: Side) -> Self {
        Self {
            points: [PointScore::Love; 2],
            games: [0; 2],
            sets: [0; 2],
            aces: [0; 2],
            tiebreak: None,
            serving: initial_server,
            winner: None,
            game_log: Vec::new(),
            completed_sets: Vec::new(),
        }
    }

    pub fn point(&self, side: Side) -> PointScore {
        self.points[side.index()]
    }

    pub fn games(&self, side: Side) -> u32 {
        self.games[side.index()]
    }

    pub fn sets(&self, side: Side) -> u32 {
        self.sets[side.index()]
    }

    pub fn aces(&self, side: Side) -> u32 {
        self.aces[side.index()]
    }

    pub fn serving(&self) -> Side {
        self.serving
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn tiebreak(&self) -> Option<&TiebreakState> {
        self.tiebreak.as_ref()
    }

    pub fn game_log(&self) -> &[GameWinnerEntry] {
        &self.game_log
    }

    pub fn completed_sets(&self) -> &[SetSummary] {
        &self.completed_sets
    }

    /// Set currently being played, 1-based.
    pub fn current_set_number(&self) -> u32 {
        self.completed_sets.len() as u32 + 1
    }
}
