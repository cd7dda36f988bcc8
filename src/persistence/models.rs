use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::scoring::{GameWinnerEntry, SetSummary};

/// One persisted row per completed set (`match_scores` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub match_id: String,
    pub set_number: i32,
    pub side_a_games: i32,
    pub side_b_games: i32,
    pub tiebreak_a: Option<i32>,
    pub tiebreak_b: Option<i32>,
    pub recorded_by: String,
    /// Ordered `{winner, gameNumber}` entries for the set.
    pub game_history: serde_json::Value,
}

impl ScoreRow {
    pub fn from_set(match_id: &str, set: &SetSummary, recorded_by: &str) -> Self {
        Self {
            match_id: match_id.to_string(),
            set_number: set.set_number as i32,
            side_a_games: set.games_a as i32,
            side_b_games: set.games_b as i32,
            tiebreak_a: set.tiebreak.map(|tb| tb.points[0] as i32),
            tiebreak_b: set.tiebreak.map(|tb| tb.points[1] as i32),
            recorded_by: recorded_by.to_string(),
            game_history: game_history_json(&set.games),
        }
    }
}

fn game_history_json(games: &[GameWinnerEntry]) -> serde_json::Value {
    serde_json::to_value(games).unwrap_or(serde_json::Value::Array(Vec::new()))
}

/// Marks a match completed; the backend recalculates ratings from this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCompletion {
    pub match_id: String,
    pub winner_side_id: String,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PlayerRating {
    pub player_id: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: String,
    pub before: Option<f64>,
    pub after: f64,
}

/// Compares two rating reads, keeping players whose rating moved or appeared.
pub fn rating_changes(before: &[PlayerRating], after: &[PlayerRating]) -> Vec<RatingChange> {
    after
        .iter()
        .filter_map(|current| {
            let previous = before
                .iter()
                .find(|r| r.player_id == current.player_id)
                .map(|r| r.rating);
            match previous {
                Some(rating) if (rating - current.rating).abs() < f64::EPSILON => None,
                _ => Some(RatingChange {
                    player_id: current.player_id.clone(),
                    before: previous,
                    after: current.rating,
                }),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Side, TiebreakState};

    fn rating(id: &str, value: f64) -> PlayerRating {
        PlayerRating {
            player_id: id.to_string(),
            rating: value,
        }
    }

    #[test]
    fn test_score_row_from_tiebreak_set() {
        let set = SetSummary {
            set_number: 2,
            games_a: 7,
            games_b: 6,
            tiebreak: Some(TiebreakState { points: [7, 4] }),
            games: vec![
                GameWinnerEntry {
                    winner: Side::A,
                    game_number: 1,
                },
                GameWinnerEntry {
                    winner: Side::B,
                    game_number: 2,
                },
            ],
        };

        let row = ScoreRow::from_set("match-1", &set, "umpire");
        assert_eq!(row.set_number, 2);
        assert_eq!((row.side_a_games, row.side_b_games), (7, 6));
        assert_eq!((row.tiebreak_a, row.tiebreak_b), (Some(7), Some(4)));
        assert_eq!(
            row.game_history,
            serde_json::json!([
                {"winner": "A", "gameNumber": 1},
                {"winner": "B", "gameNumber": 2}
            ])
        );
    }

    #[test]
    fn test_rating_changes_ignores_unchanged() {
        let before = vec![rating("p1", 1200.0), rating("p2", 1100.0)];
        let after = vec![rating("p1", 1216.0), rating("p2", 1100.0), rating("p3", 1000.0)];

        let changes = rating_changes(&before, &after);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].player_id, "p1");
        assert_eq!(changes[0].before, Some(1200.0));
        assert_eq!(changes[1].player_id, "p3");
        assert_eq!(changes[1].before, None);
    }

    #[test]
    fn test_rating_changes_empty_when_nothing_moved() {
        let ratings = vec![rating("p1", 1200.0)];
        assert!(rating_changes(&ratings, &ratings).is_empty());
    }
}
