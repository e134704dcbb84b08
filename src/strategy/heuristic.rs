//! Block-or-win heuristic.
//!
//! Takes an immediate win when one exists, otherwise blocks an
//! immediate opponent win, otherwise plays at random.

use super::random::RandomStrategy;
use super::{Strategy, StrategyError};
use crate::board::{Board, Mark};
use crate::rules::{Outcome, evaluate};
use tracing::debug;

/// The medium-strength opponent.
pub struct HeuristicStrategy {
    fallback: RandomStrategy,
}

impl HeuristicStrategy {
    /// Creates a strategy with an entropy-seeded random fallback.
    pub fn new() -> Self {
        Self {
            fallback: RandomStrategy::new(),
        }
    }

    /// Creates a strategy with a deterministic fallback.
    pub fn seeded(seed: u64) -> Self {
        Self {
            fallback: RandomStrategy::seeded(seed),
        }
    }
}

impl Default for HeuristicStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for HeuristicStrategy {
    fn choose_move(&mut self, board: &Board, mark: Mark) -> Result<usize, StrategyError> {
        if let Some(index) = winning_move(board, mark) {
            debug!(index, "Heuristic takes the win");
            return Ok(index);
        }
        if let Some(index) = winning_move(board, mark.opponent()) {
            debug!(index, "Heuristic blocks the opponent");
            return Ok(index);
        }
        self.fallback.choose_move(board, mark)
    }

    fn name(&self) -> &'static str {
        "block-or-win"
    }
}

/// First empty cell in index order that completes a line for `mark`.
fn winning_move(board: &Board, mark: Mark) -> Option<usize> {
    for index in board.empty_cells() {
        let mut probe = board.clone();
        probe.play(index, mark);
        if evaluate(&probe) == Outcome::Win(mark) {
            return Some(index);
        }
    }
    None
}
