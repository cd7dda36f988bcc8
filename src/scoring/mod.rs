// Public API
pub use errors::ScoringError;
pub use logic::{PointOutcome, ScoreBoard};
pub use points::{PointScore, Side};
pub use result::{MatchResult, SideStats};
pub use state::{GameWinnerEntry, MatchConfig, ScoreState, SetSummary, TiebreakState};
pub use view::{ScoreboardView, SideView};

// Internal modules
mod errors;
mod logic;
mod points;
mod result;
mod state;
mod view;
