//! Command-line interface for the noughts binary.

use clap::{Parser, ValueEnum};
use noughts::{Difficulty, Mode};

/// Tic-tac-toe in the terminal, with optional computer opponents.
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Play tic-tac-toe against a friend or the computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Match mode; prompted interactively when omitted
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Seed for the computer opponent's random choices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Emit match state as one JSON object per transition instead of board text
    #[arg(long)]
    pub json: bool,
}

/// Mode names accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModeArg {
    /// Two humans sharing the board
    TwoPlayer,
    /// Against the random computer opponent
    Easy,
    /// Against the block-or-win computer opponent
    Medium,
    /// Against the minimax computer opponent
    Hard,
}

impl ModeArg {
    /// Maps the flag to an engine mode.
    pub fn to_mode(self) -> Mode {
        match self {
            ModeArg::TwoPlayer => Mode::TwoPlayer,
            ModeArg::Easy => Mode::VsComputer(Difficulty::Easy),
            ModeArg::Medium => Mode::VsComputer(Difficulty::Medium),
            ModeArg::Hard => Mode::VsComputer(Difficulty::Hard),
        }
    }
}
