//! Computer opponents of three strengths.
//!
//! Each strategy picks an empty cell for the acting mark. Selection is
//! decoupled from turn handling so opponents are interchangeable at
//! match setup.

mod heuristic;
mod optimal;
mod random;

pub use heuristic::HeuristicStrategy;
pub use optimal::OptimalStrategy;
pub use random::RandomStrategy;

use crate::board::{Board, Mark};
use serde::{Deserialize, Serialize};

/// Error raised when a strategy cannot produce a move.
///
/// Reaching this means terminality checks were skipped upstream; it is
/// a programming error, not a recoverable game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum StrategyError {
    /// The board has no empty cell left.
    #[display("No empty cell to play")]
    NoMovesAvailable,
}

impl std::error::Error for StrategyError {}

/// Picks moves for one side of the board.
pub trait Strategy: Send {
    /// Chooses an empty cell for `mark` on the given board.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::NoMovesAvailable`] on a full board.
    fn choose_move(&mut self, board: &Board, mark: Mark) -> Result<usize, StrategyError>;

    /// Short display name of the strategy.
    fn name(&self) -> &'static str;
}

/// Computer opponent strength.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Difficulty {
    /// Uniformly random moves.
    Easy,
    /// Takes wins and blocks losses, otherwise random.
    Medium,
    /// Full minimax search; never loses.
    Hard,
}

impl Difficulty {
    /// Display label for this difficulty.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Builds the strategy for this difficulty.
    pub fn strategy(self) -> Box<dyn Strategy> {
        match self {
            Difficulty::Easy => Box::new(RandomStrategy::new()),
            Difficulty::Medium => Box::new(HeuristicStrategy::new()),
            Difficulty::Hard => Box::new(OptimalStrategy::new()),
        }
    }

    /// Builds the strategy with a fixed seed for its random choices.
    ///
    /// `Hard` takes no random decisions, so the seed is unused there.
    pub fn strategy_seeded(self, seed: u64) -> Box<dyn Strategy> {
        match self {
            Difficulty::Easy => Box::new(RandomStrategy::seeded(seed)),
            Difficulty::Medium => Box::new(HeuristicStrategy::seeded(seed)),
            Difficulty::Hard => Box::new(OptimalStrategy::new()),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_difficulty_builds_a_strategy() {
        let board = Board::new();
        for difficulty in Difficulty::iter() {
            let mut strategy = difficulty.strategy_seeded(1);
            let index = strategy
                .choose_move(&board, Mark::O)
                .expect("empty board has moves");
            assert!(index < 9);
        }
    }

    #[test]
    fn test_labels_are_distinct() {
        let labels: Vec<_> = Difficulty::iter().map(|d| d.label()).collect();
        assert_eq!(labels, vec!["Easy", "Medium", "Hard"]);
    }
}
