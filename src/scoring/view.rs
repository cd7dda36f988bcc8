use serde::Serialize;

use super::logic::ScoreBoard;
use super::points::Side;
use super::state::SetSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideView {
    /// "0", "15", "30", "40" or "AD".
    pub points: String,
    pub games: u32,
    pub sets: u32,
    pub aces: u32,
    pub tiebreak_points: Option<u32>,
}

/// Read-only projection of a score board for live scoreboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreboardView {
    pub side_a: SideView,
    pub side_b: SideView,
    pub serving: Side,
    pub winner: Option<Side>,
    pub set_number: u32,
    pub completed_sets: Vec<SetSummary>,
    pub can_undo: bool,
}

impl ScoreboardView {
    pub fn from_board(board: &ScoreBoard) -> Self {
        let state = board.state();
        let side_view = |side: Side| SideView {
            points: state.point(side).to_string(),
            games: state.games(side),
            sets: state.sets(side),
            aces: state.aces(side),
            tiebreak_points: state.tiebreak().map(|tb| tb.points(side)),
        };

        Self {
            side_a: side_view(Side::A),
            side_b: side_view(Side::B),
            serving: state.serving(),
            winner: state.winner(),
            set_number: state.current_set_number(),
            completed_sets: state.completed_sets().to_vec(),
            can_undo: board.can_undo(),
        }
    }

    /// Point score as read out by an umpire, server first: "30-15", "Deuce", "AD-40".
    pub fn call(&self) -> String {
        let (server, receiver) = match self.serving {
            Side::A => (&self.side_a, &self.side_b),
            Side::B => (&self.side_b, &self.side_a),
        };
        if server.points == "40" && receiver.points == "40" {
            return "Deuce".to_string();
        }
        format!("{}-{}", server.points, receiver.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::state::MatchConfig;

    #[test]
    fn test_view_reflects_board() {
        let mut board = ScoreBoard::new(MatchConfig::default()).unwrap();
        board.award_point(Side::A, true).unwrap();
        board.award_point(Side::A, false).unwrap();
        board.award_point(Side::B, false).unwrap();

        let view = ScoreboardView::from_board(&board);
        assert_eq!(view.side_a.points, "30");
        assert_eq!(view.side_b.points, "15");
        assert_eq!(view.side_a.aces, 1);
        assert_eq!(view.serving, Side::A);
        assert_eq!(view.set_number, 1);
        assert_eq!(view.side_a.tiebreak_points, None);
        assert!(view.can_undo);
        assert_eq!(view.call(), "30-15");
    }

    #[test]
    fn test_call_reads_deuce_and_advantage() {
        let mut board = ScoreBoard::new(MatchConfig::default()).unwrap();
        for _ in 0..3 {
            board.award_point(Side::A, false).unwrap();
            board.award_point(Side::B, false).unwrap();
        }
        assert_eq!(ScoreboardView::from_board(&board).call(), "Deuce");

        board.award_point(Side::B, false).unwrap();
        assert_eq!(ScoreboardView::from_board(&board).call(), "40-AD");
    }
}
