//! Round termination rules.
//!
//! Pure functions over board snapshots. Evaluation never mutates and
//! must be called on a settled board, not one with a half-applied move.

use crate::board::{Board, Cell, Mark};
use serde::{Deserialize, Serialize};

/// The eight winning lines: three rows, three columns, two diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of evaluating a board snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The round is still going.
    InProgress,
    /// The round ended with a completed line for this mark.
    Win(Mark),
    /// The board is full with no completed line.
    Draw,
}

impl Outcome {
    /// True for `Win` and `Draw`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Returns the winning mark, if any.
    pub fn winner(self) -> Option<Mark> {
        match self {
            Outcome::Win(mark) => Some(mark),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "In progress"),
            Outcome::Win(mark) => write!(f, "{} wins", mark.symbol()),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Evaluates a board snapshot.
///
/// Returns `Win` if any line's three cells hold the same mark, `Draw`
/// if the board is full without one, `InProgress` otherwise.
pub fn evaluate(board: &Board) -> Outcome {
    for [a, b, c] in LINES {
        let cell = board.get(a);
        if cell != Some(Cell::Empty) && cell == board.get(b) && cell == board.get(c) {
            if let Some(Cell::Occupied(mark)) = cell {
                return Outcome::Win(mark);
            }
        }
    }

    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}
