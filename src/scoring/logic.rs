// The score board is handed around by the session layer, which applies one
// command at a time. Every accepted command snapshots the score first so it
// can be undone in one step.
use serde::Serialize;
use tracing::debug;

use super::errors::ScoringError;
use super::points::{PointScore, Side};
use super::state::{
    GameWinnerEntry, MatchConfig, ScoreState, SetSummary, TiebreakState, TIEBREAK_TRIGGER_GAMES,
};

/// What a single point award led to, from smallest to largest unit decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointOutcome {
    /// The game continues.
    Point,
    GameWon { winner: Side },
    SetWon { winner: Side, set_number: u32 },
    MatchWon { winner: Side },
}

#[derive(Debug, Clone)]
pub struct ScoreBoard {
    config: MatchConfig,
    state: ScoreState,
    history: Vec<ScoreState>,
}

impl ScoreBoard {
    pub fn new(config: MatchConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self {
            config,
            state: ScoreState::new(config.initial_server),
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.winner
    }

    pub fn is_decided(&self) -> bool {
        self.state.winner.is_some()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Awards the current point to `side`. An ace is credited to `side`
    /// whatever the point decides.
    pub fn award_point(&mut self, side: Side, is_ace: bool) -> Result<PointOutcome, ScoringError> {
        self.ensure_in_progress()?;
        self.history.push(self.state.clone());

        if is_ace {
            self.state.aces[side.index()] += 1;
        }

        let outcome = apply_point(&mut self.state, side, self.config.sets_to_win);
        debug!(side = %side, is_ace, outcome = ?outcome, "Point awarded");
        Ok(outcome)
    }

    /// Manual serve correction. Completed games flip the serve on their own.
    pub fn toggle_serve(&mut self) -> Result<Side, ScoringError> {
        self.ensure_in_progress()?;
        self.history.push(self.state.clone());

        self.state.serving = self.state.serving.other();
        debug!(serving = %self.state.serving, "Serve toggled");
        Ok(self.state.serving)
    }

    /// Adds a point to the tiebreak tally shown at 6-6. Does not decide the set.
    pub fn record_tiebreak_point(&mut self, side: Side) -> Result<TiebreakState, ScoringError> {
        self.ensure_in_progress()?;
        if self.state.tiebreak.is_none() {
            return Err(ScoringError::TiebreakNotActive);
        }
        self.history.push(self.state.clone());

        let tiebreak = self.state.tiebreak.get_or_insert_with(TiebreakState::default);
        tiebreak.points[side.index()] += 1;
        Ok(*tiebreak)
    }

    /// Restores the score as it was before the most recent accepted command.
    pub fn undo(&mut self) -> Result<(), ScoringError> {
        let previous = self.history.pop().ok_or(ScoringError::NothingToUndo)?;
        self.state = previous;
        debug!(history_len = self.history.len(), "Score restored from history");
        Ok(())
    }

    fn ensure_in_progress(&self) -> Result<(), ScoringError> {
        if self.state.winner.is_some() {
            return Err(ScoringError::MatchAlreadyDecided);
        }
        Ok(())
    }
}

/// A side takes the set with 6+ games and a 2 game lead, or at 7-6.
pub(crate) fn set_won(winner_games: u32, opponent_games: u32) -> bool {
    let clear_lead = winner_games >= 6 && winner_games >= opponent_games + 2;
    let tiebreak_set = winner_games == 7 && opponent_games == 6;
    clear_lead || tiebreak_set
}

fn apply_point(state: &mut ScoreState, side: Side, sets_to_win: u32) -> PointOutcome {
    let scorer = state.point(side);
    let opponent = state.point(side.other());

    match (scorer, opponent) {
        (s, _) if s < PointScore::Forty => {
            state.points[side.index()] = next_point(s);
            PointOutcome::Point
        }
        (PointScore::Forty, PointScore::Forty) => {
            state.points[side.index()] = PointScore::Advantage;
            PointOutcome::Point
        }
        (PointScore::Forty, PointScore::Advantage) => {
            state.points[side.other().index()] = PointScore::Forty;
            PointOutcome::Point
        }
        // 40 against less than 40, or advantage converted.
        _ => complete_game(state, side, sets_to_win),
    }
}

fn next_point(score: PointScore) -> PointScore {
    match score {
        PointScore::Love => PointScore::Fifteen,
        PointScore::Fifteen => PointScore::Thirty,
        PointScore::Thirty => PointScore::Forty,
        PointScore::Forty | PointScore::Advantage => PointScore::Advantage,
    }
}

fn complete_game(state: &mut ScoreState, winner: Side, sets_to_win: u32) -> PointOutcome {
    state.games[winner.index()] += 1;
    state.points = [PointScore::Love; 2];
    state.serving = state.serving.other();
    state.game_log.push(GameWinnerEntry {
        winner,
        game_number: state.game_log.len() as u32 + 1,
    });

    let winner_games = state.games(winner);
    let opponent_games = state.games(winner.other());

    if !set_won(winner_games, opponent_games) {
        if winner_games == TIEBREAK_TRIGGER_GAMES && opponent_games == TIEBREAK_TRIGGER_GAMES {
            state.tiebreak.get_or_insert_with(TiebreakState::default);
        }
        return PointOutcome::GameWon { winner };
    }

    let set_number = state.current_set_number();
    state.completed_sets.push(SetSummary {
        set_number,
        games_a: state.games(Side::A),
        games_b: state.games(Side::B),
        tiebreak: state.tiebreak.take(),
        games: std::mem::take(&mut state.game_log),
    });
    state.games = [0; 2];
    state.sets[winner.index()] += 1;

    if state.sets(winner) >= sets_to_win {
        state.winner = Some(winner);
        return PointOutcome::MatchWon { winner };
    }

    PointOutcome::SetWon { winner, set_number }
}
