//! Single-round turn engine.
//!
//! Owns the live board, whose turn it is, and the round outcome. Once
//! the outcome is terminal the board is frozen until [`TurnEngine::reset`].

use crate::board::{BOARD_CELLS, Board, Mark};
use crate::rules::{self, Outcome};
use tracing::{debug, instrument};

/// Error raised for a move the engine cannot apply.
///
/// Callers treat these as no-ops; a rejected move never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The cell at the index is already occupied.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(usize),

    /// The index does not name a cell.
    #[display("Index {} is out of bounds", _0)]
    OutOfBounds(usize),

    /// The round has already ended.
    #[display("The round is already over")]
    RoundOver,
}

impl std::error::Error for MoveError {}

/// State machine for one round: accepting moves until the outcome
/// turns terminal.
#[derive(Debug, Clone)]
pub struct TurnEngine {
    board: Board,
    to_move: Mark,
    outcome: Outcome,
}

impl TurnEngine {
    /// Creates an engine on an empty board with X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            outcome: Outcome::InProgress,
        }
    }

    /// Returns the live board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark whose turn it is.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns the round outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// True once the outcome is terminal.
    pub fn is_round_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Applies a move for the active mark at the given cell.
    ///
    /// Re-evaluates the board afterwards. A terminal result freezes the
    /// board; otherwise the active mark flips.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] when the round is over, the index is out
    /// of bounds, or the cell is occupied. State is untouched on error.
    #[instrument(skip(self), fields(mark = ?self.to_move))]
    pub fn apply_move(&mut self, index: usize) -> Result<Outcome, MoveError> {
        if self.outcome.is_terminal() {
            return Err(MoveError::RoundOver);
        }
        if index >= BOARD_CELLS {
            return Err(MoveError::OutOfBounds(index));
        }
        if !self.board.is_empty(index) {
            return Err(MoveError::CellOccupied(index));
        }

        self.board.play(index, self.to_move);
        debug_assert!(self.board.is_balanced(), "Mark counts out of balance");

        let outcome = rules::evaluate(&self.board);
        match outcome {
            Outcome::InProgress => self.to_move = self.to_move.opponent(),
            Outcome::Win(_) | Outcome::Draw => self.outcome = outcome,
        }

        debug!(index, %outcome, "Move applied");
        Ok(outcome)
    }

    /// Clears the board and hands the first move back to X.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        debug!("Resetting round");
        *self = Self::new();
    }
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new()
    }
}
