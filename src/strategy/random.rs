//! Uniformly random move selection.

use super::{Strategy, StrategyError};
use crate::board::{Board, Mark};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Picks uniformly among the empty cells.
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    /// Creates a strategy seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a deterministic strategy from an explicit seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn choose_move(&mut self, board: &Board, _mark: Mark) -> Result<usize, StrategyError> {
        let open = board.empty_cells();
        if open.is_empty() {
            return Err(StrategyError::NoMovesAvailable);
        }
        let index = open[self.rng.gen_range(0..open.len())];
        debug!(index, "Random strategy chose a cell");
        Ok(index)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    #[test]
    fn test_only_empty_cells_are_chosen() {
        let mut board = Board::new();
        for index in [0, 1, 2, 3, 5, 6, 7] {
            board.play(index, Mark::X);
        }
        let mut strategy = RandomStrategy::seeded(3);
        for _ in 0..20 {
            let index = strategy
                .choose_move(&board, Mark::O)
                .expect("two cells open");
            assert!(index == 4 || index == 8);
        }
    }

    #[test]
    fn test_seeded_strategies_agree() {
        let board = Board::new();
        let mut first = RandomStrategy::seeded(42);
        let mut second = RandomStrategy::seeded(42);
        for _ in 0..10 {
            assert_eq!(
                first.choose_move(&board, Mark::X),
                second.choose_move(&board, Mark::X)
            );
        }
    }

    #[test]
    fn test_full_board_is_an_error() {
        let board = Board::from_cells([Cell::Occupied(Mark::X); 9]);
        let mut strategy = RandomStrategy::seeded(0);
        assert_eq!(
            strategy.choose_move(&board, Mark::O),
            Err(StrategyError::NoMovesAvailable)
        );
    }
}
