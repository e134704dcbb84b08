//! Turn-based tic-tac-toe match engine with computer opponents.
//!
//! The engine is synchronous and event-driven: a surrounding UI feeds
//! it intents (mode selection, cell clicks, restarts) and delivers its
//! scheduled events (countdown ticks, delayed computer replies) by
//! token, then reads back a serializable projection of the match.
//!
//! # Architecture
//!
//! - **Rules**: pure terminal detection over board snapshots
//! - **Strategies**: random, block-or-win, and minimax opponents
//! - **Turn engine**: one round of alternating moves on the live board
//! - **Round scheduler**: score, round limits, timed intermissions
//! - **Match controller**: intents in, projections out
//!
//! # Example
//!
//! ```
//! use noughts::{Difficulty, MatchController, Mode, StatusKind};
//!
//! let mut game = MatchController::new();
//! game.select_mode_seeded(Mode::VsComputer(Difficulty::Hard), 7);
//!
//! game.click_cell(4);
//! if let Some(token) = game.pending_reply() {
//!     game.computer_reply(token);
//! }
//!
//! assert_eq!(game.view().status(), &StatusKind::InProgress);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod controller;
mod engine;
mod feedback;
mod round;
mod rules;
mod schedule;
mod strategy;

// Crate-level exports - Board types
pub use board::{BOARD_CELLS, Board, Cell, Mark};

// Crate-level exports - Rules
pub use rules::{LINES, Outcome, evaluate};

// Crate-level exports - Strategies
pub use strategy::{
    Difficulty, HeuristicStrategy, OptimalStrategy, RandomStrategy, Strategy, StrategyError,
};

// Crate-level exports - Turn engine
pub use engine::{MoveError, TurnEngine};

// Crate-level exports - Round scheduling
pub use round::{
    INTERMISSION_TICKS, RoundPhase, RoundScheduler, Score, TWO_PLAYER_ROUNDS, TickResult,
    VS_COMPUTER_ROUNDS,
};

// Crate-level exports - Scheduled-task identity
pub use schedule::{TaskToken, TokenSource};

// Crate-level exports - Match controller
pub use controller::{MatchController, MatchView, Mode, StatusKind};

// Crate-level exports - Feedback collaborator contract
pub use feedback::{FeedbackError, FeedbackId, FeedbackRecord, FeedbackSink, LogSink};
