//! Exhaustive minimax search.
//!
//! The 3x3 game tree is small enough to search completely, so the hard
//! opponent plays perfectly: it never loses a position where a draw or
//! win is available.

use super::{Strategy, StrategyError};
use crate::board::{BOARD_CELLS, Board, Mark};
use crate::rules::{Outcome, evaluate};
use tracing::{debug, instrument};

/// Base score of a terminal win. Depth shrinks it toward zero so the
/// search prefers fast wins and slow losses.
const WIN_SCORE: i32 = 10;

/// The perfect-play opponent.
pub struct OptimalStrategy;

impl OptimalStrategy {
    /// Creates the strategy. Stateless; every call searches afresh.
    pub fn new() -> Self {
        Self
    }
}

impl Default for OptimalStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for OptimalStrategy {
    #[instrument(skip(self, board))]
    fn choose_move(&mut self, board: &Board, mark: Mark) -> Result<usize, StrategyError> {
        let mut scratch = board.clone();
        let mut best: Option<(usize, i32)> = None;

        // Root children in index order; strict improvement keeps the
        // first move attaining the maximal value.
        for index in 0..BOARD_CELLS {
            if !scratch.is_empty(index) {
                continue;
            }
            scratch.play(index, mark);
            let score = minimax(&mut scratch, mark.opponent(), mark, 1, i32::MIN, i32::MAX);
            scratch.undo(index);
            if best.is_none_or(|(_, current)| score > current) {
                best = Some((index, score));
            }
        }

        match best {
            Some((index, score)) => {
                debug!(index, score, "Minimax chose a cell");
                Ok(index)
            }
            None => Err(StrategyError::NoMovesAvailable),
        }
    }

    fn name(&self) -> &'static str {
        "minimax"
    }
}

/// Minimax value of the position for `root`, with alpha-beta pruning.
///
/// `depth` counts plies already played from the searched position, so a
/// win found sooner scores higher than the same win found later.
fn minimax(
    board: &mut Board,
    to_move: Mark,
    root: Mark,
    depth: i32,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    match evaluate(board) {
        Outcome::Win(mark) if mark == root => return WIN_SCORE - depth,
        Outcome::Win(_) => return depth - WIN_SCORE,
        Outcome::Draw => return 0,
        Outcome::InProgress => {}
    }

    if to_move == root {
        let mut best = i32::MIN;
        for index in 0..BOARD_CELLS {
            if !board.is_empty(index) {
                continue;
            }
            board.play(index, to_move);
            let value = minimax(board, to_move.opponent(), root, depth + 1, alpha, beta);
            board.undo(index);
            best = best.max(value);
            alpha = alpha.max(best);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = i32::MAX;
        for index in 0..BOARD_CELLS {
            if !board.is_empty(index) {
                continue;
            }
            board.play(index, to_move);
            let value = minimax(board, to_move.opponent(), root, depth + 1, alpha, beta);
            board.undo(index);
            best = best.min(value);
            beta = beta.min(best);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}
