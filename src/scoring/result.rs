use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::logic::ScoreBoard;
use super::points::Side;
use super::state::SetSummary;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideStats {
    pub aces: u32,
    pub games_won: u32,
    pub sets_won: u32,
}

/// Terminal record of a decided match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: String,
    pub winner: Side,
    pub sets: Vec<SetSummary>,
    pub side_a: SideStats,
    pub side_b: SideStats,
    pub completed_at: DateTime<Utc>,
}

impl MatchResult {
    /// Builds the result of a decided match, `None` while it is still in play.
    pub fn from_board(match_id: &str, board: &ScoreBoard) -> Option<Self> {
        let winner = board.winner()?;
        let state = board.state();

        let stats_for = |side: Side| SideStats {
            aces: state.aces(side),
            games_won: state
                .completed_sets()
                .iter()
                .map(|set| match side {
                    Side::A => set.games_a,
                    Side::B => set.games_b,
                })
                .sum::<u32>()
                + state.games(side),
            sets_won: state.sets(side),
        };

        Some(Self {
            match_id: match_id.to_string(),
            winner,
            sets: state.completed_sets().to_vec(),
            side_a: stats_for(Side::A),
            side_b: stats_for(Side::B),
            completed_at: Utc::now(),
        })
    }

    pub fn stats(&self, side: Side) -> &SideStats {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::state::MatchConfig;

    fn win_game(board: &mut ScoreBoard, side: Side, aces: bool) {
        for _ in 0..4 {
            board.award_point(side, aces).unwrap();
        }
    }

    #[test]
    fn test_no_result_while_in_play() {
        let mut board = ScoreBoard::new(MatchConfig::default()).unwrap();
        win_game(&mut board, Side::A, false);
        assert!(MatchResult::from_board("m-1", &board).is_none());
    }

    #[test]
    fn test_result_aggregates_sets_and_stats() {
        let mut board = ScoreBoard::new(MatchConfig::default()).unwrap();

        // 6-2, 3-6, 6-0 for A
        for _ in 0..2 {
            win_game(&mut board, Side::A, false);
            win_game(&mut board, Side::B, false);
        }
        for _ in 0..4 {
            win_game(&mut board, Side::A, false);
        }
        for _ in 0..3 {
            win_game(&mut board, Side::A, false);
            win_game(&mut board, Side::B, true);
        }
        for _ in 0..3 {
            win_game(&mut board, Side::B, false);
        }
        for _ in 0..6 {
            win_game(&mut board, Side::A, false);
        }

        let result = MatchResult::from_board("m-1", &board).unwrap();
        assert_eq!(result.match_id, "m-1");
        assert_eq!(result.winner, Side::A);
        assert_eq!(result.sets.len(), 3);
        assert_eq!((result.sets[0].games_a, result.sets[0].games_b), (6, 2));
        assert_eq!((result.sets[1].games_a, result.sets[1].games_b), (3, 6));
        assert_eq!(result.sets[1].winner(), Side::B);
        assert_eq!((result.sets[2].games_a, result.sets[2].games_b), (6, 0));

        assert_eq!(
            result.stats(Side::A),
            &SideStats {
                aces: 0,
                games_won: 15,
                sets_won: 2
            }
        );
        assert_eq!(
            result.stats(Side::B),
            &SideStats {
                aces: 12,
                games_won: 8,
                sets_won: 1
            }
        );
    }
}
