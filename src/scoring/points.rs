use std::fmt;
use strum_macros::EnumIter;

use super::errors::ScoringError;

/// One of the two competitors in a match. A side is a single player in
/// singles or a team in doubles; the engine never needs to know which.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, EnumIter,
)]
pub enum Side {
    A = 0,
    B = 1,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Side::A => "A",
                Side::B => "B",
            }
        )
    }
}

impl TryFrom<&str> for Side {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "A" | "a" => Ok(Side::A),
            "B" | "b" => Ok(Side::B),
            _ => Err(s.to_string()),
        }
    }
}

/// Point score inside a game, stored as its ordinal index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, EnumIter,
)]
pub enum PointScore {
    Love = 0,
    Fifteen = 1,
    Thirty = 2,
    Forty = 3,
    Advantage = 4,
}

impl PointScore {
    pub fn from_index(index: u8) -> Result<Self, ScoringError> {
        match index {
            0 => Ok(PointScore::Love),
            1 => Ok(PointScore::Fifteen),
            2 => Ok(PointScore::Thirty),
            3 => Ok(PointScore::Forty),
            4 => Ok(PointScore::Advantage),
            other => Err(ScoringError::InvalidPointIndex(other)),
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            PointScore::Love => "0",
            PointScore::Fifteen => "15",
            PointScore::Thirty => "30",
            PointScore::Forty => "40",
            PointScore::Advantage => "AD",
        }
    }
}

impl PartialOrd for PointScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PointScore {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl fmt::Display for PointScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(0, "0")]
    #[case(1, "15")]
    #[case(2, "30")]
    #[case(3, "40")]
    #[case(4, "AD")]
    fn test_point_labels(#[case] index: u8, #[case] expected: &str) {
        let score = PointScore::from_index(index).unwrap();
        assert_eq!(score.to_string(), expected);
        assert_eq!(score.index(), index);
    }

    #[test]
    fn test_point_index_out_of_range() {
        let result = PointScore::from_index(5);
        assert!(matches!(result, Err(ScoringError::InvalidPointIndex(5))));
    }

    #[test]
    fn test_point_ordering_follows_index() {
        let scores: Vec<PointScore> = PointScore::iter().collect();
        let mut sorted = scores.clone();
        sorted.sort();
        assert_eq!(scores, sorted);
        assert!(PointScore::Advantage > PointScore::Forty);
    }

    #[test]
    fn test_side_other_and_parse() {
        assert_eq!(Side::A.other(), Side::B);
        assert_eq!(Side::B.other(), Side::A);
        assert_eq!(Side::try_from("b"), Ok(Side::B));
        assert!(Side::try_from("C").is_err());
        assert_eq!(Side::iter().count(), 2);
    }
}
