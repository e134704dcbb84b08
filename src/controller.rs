//! Top-level match orchestration.
//!
//! The controller owns at most one live match, translates UI intents
//! into engine and scheduler transitions, and projects read-only state
//! for display. Every intent is synchronous and total: invalid calls
//! are logged no-ops, never panics.

use crate::board::{Board, Mark};
use crate::engine::TurnEngine;
use crate::round::{
    RoundPhase, RoundScheduler, Score, TWO_PLAYER_ROUNDS, TickResult, VS_COMPUTER_ROUNDS,
};
use crate::rules::Outcome;
use crate::schedule::{TaskToken, TokenSource};
use crate::strategy::{Difficulty, Strategy};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

/// The computer always holds O; the human holds X and moves first.
const COMPUTER_MARK: Mark = Mark::O;

/// Who the second player is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Two humans sharing the board over a multi-round match.
    TwoPlayer,
    /// A human against a computer opponent of the given strength.
    VsComputer(Difficulty),
}

impl Mode {
    /// Round limit for a match in this mode.
    pub fn round_limit(&self) -> u32 {
        match self {
            Mode::TwoPlayer => TWO_PLAYER_ROUNDS,
            Mode::VsComputer(_) => VS_COMPUTER_ROUNDS,
        }
    }
}

/// Status category projected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    /// No mode selected yet.
    AwaitingModeSelection,
    /// A round is accepting moves.
    InProgress,
    /// The current round ended with a win.
    Win(Mark),
    /// The current round ended in a draw.
    Draw,
    /// The round limit was reached.
    MatchOver,
}

/// Read-only projection of the current match state.
///
/// Rebuilt from scratch on every call; holding one never blocks or
/// observes later transitions.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct MatchView {
    /// Board snapshot.
    board: Board,
    /// Mark to move, absent outside an active round.
    to_move: Option<Mark>,
    /// Status category.
    status: StatusKind,
    /// Selected mode, absent before selection.
    mode: Option<Mode>,
    /// Current round number, 1-based; zero before mode selection.
    round: u32,
    /// Round limit of the match; zero before mode selection.
    round_limit: u32,
    /// Cumulative score.
    score: Score,
    /// True once the round limit was reached.
    match_over: bool,
    /// Remaining intermission ticks while a countdown runs.
    countdown: Option<u32>,
}

// ─────────────────────────────────────────────────────────────
//  Session state
// ─────────────────────────────────────────────────────────────

/// One live match: engine, scheduler, and the computer side if any.
struct MatchSession {
    engine: TurnEngine,
    scheduler: RoundScheduler,
    mode: Mode,
    strategy: Option<Box<dyn Strategy>>,
    pending_reply: Option<TaskToken>,
}

impl MatchSession {
    fn is_computer_turn(&self) -> bool {
        self.strategy.is_some()
            && !self.engine.is_round_over()
            && self.engine.to_move() == COMPUTER_MARK
    }
}

/// Orchestrates one match at a time in response to UI intents.
pub struct MatchController {
    session: Option<MatchSession>,
    tokens: TokenSource,
}

impl MatchController {
    /// Creates a controller with no mode selected.
    pub fn new() -> Self {
        Self {
            session: None,
            tokens: TokenSource::new(),
        }
    }

    /// Starts a match in the given mode, replacing any match in
    /// progress. Scheduled events of the old match die with it.
    #[instrument(skip(self))]
    pub fn select_mode(&mut self, mode: Mode) {
        self.start_session(mode, None);
    }

    /// Like [`MatchController::select_mode`], with a fixed seed for the
    /// computer opponent's random choices.
    #[instrument(skip(self))]
    pub fn select_mode_seeded(&mut self, mode: Mode, seed: u64) {
        self.start_session(mode, Some(seed));
    }

    fn start_session(&mut self, mode: Mode, seed: Option<u64>) {
        let strategy = match mode {
            Mode::VsComputer(difficulty) => Some(match seed {
                Some(seed) => difficulty.strategy_seeded(seed),
                None => difficulty.strategy(),
            }),
            Mode::TwoPlayer => None,
        };
        info!(?mode, "Starting match");
        self.session = Some(MatchSession {
            engine: TurnEngine::new(),
            scheduler: RoundScheduler::new(mode.round_limit()),
            mode,
            strategy,
            pending_reply: None,
        });
    }

    /// Plays the active human mark at the given cell.
    ///
    /// In a computer mode a successful non-terminal move schedules the
    /// computer's reply; the driver delivers it with
    /// [`MatchController::computer_reply`] after its display delay.
    #[instrument(skip(self))]
    pub fn click_cell(&mut self, index: usize) {
        let Some(session) = self.session.as_mut() else {
            debug!("Click with no mode selected");
            return;
        };
        if session.scheduler.phase() != RoundPhase::Playing {
            debug!("Click outside an active round");
            return;
        }
        if session.is_computer_turn() {
            debug!("Click during the computer's turn");
            return;
        }

        let outcome = match session.engine.apply_move(index) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(index, error = %e, "Ignoring invalid move");
                return;
            }
        };

        if outcome.is_terminal() {
            session.scheduler.record_outcome(outcome, self.tokens.issue());
        } else if session.is_computer_turn() {
            let token = self.tokens.issue();
            session.pending_reply = Some(token);
            debug!(?token, "Computer reply scheduled");
        }
    }

    /// Delivers a scheduled computer reply.
    ///
    /// Stale tokens (superseded by a restart, mode change, or teardown)
    /// are dropped without touching state.
    #[instrument(skip(self))]
    pub fn computer_reply(&mut self, token: TaskToken) {
        let Some(session) = self.session.as_mut() else {
            debug!(?token, "Dropping computer reply without a match");
            return;
        };
        if session.pending_reply != Some(token) {
            debug!(?token, "Dropping stale computer reply");
            return;
        }
        session.pending_reply = None;

        if session.scheduler.phase() != RoundPhase::Playing || session.engine.is_round_over() {
            debug!("Computer reply arrived outside an active round");
            return;
        }
        let Some(strategy) = session.strategy.as_mut() else {
            warn!("Computer reply scheduled without a computer opponent");
            return;
        };

        let index = match strategy.choose_move(session.engine.board(), COMPUTER_MARK) {
            Ok(index) => index,
            Err(e) => {
                debug_assert!(false, "Strategy invoked on a full board");
                error!(error = %e, "Strategy failed to produce a move");
                return;
            }
        };
        match session.engine.apply_move(index) {
            Ok(outcome) if outcome.is_terminal() => {
                session.scheduler.record_outcome(outcome, self.tokens.issue());
            }
            Ok(_) => {}
            Err(e) => {
                debug_assert!(false, "Strategy chose an unplayable cell");
                error!(index, error = %e, "Discarding unplayable computer move");
            }
        }
    }

    /// Delivers one countdown tick. Advances the round or finishes the
    /// match when the countdown expires; stale tokens are dropped.
    #[instrument(skip(self))]
    pub fn tick(&mut self, token: TaskToken) {
        let Some(session) = self.session.as_mut() else {
            debug!(?token, "Dropping tick without a match");
            return;
        };
        if session.scheduler.tick(token) == TickResult::NextRound {
            session.engine.reset();
        }
    }

    /// Restarts the current round, cancelling any running countdown.
    /// Score and round number are kept. No-op once the match is over.
    #[instrument(skip(self))]
    pub fn restart_round(&mut self) {
        let Some(session) = self.session.as_mut() else {
            debug!("Round restart with no mode selected");
            return;
        };
        if session.scheduler.is_match_over() {
            debug!("Round restart after the match ended");
            return;
        }
        session.scheduler.cancel_countdown();
        session.pending_reply = None;
        session.engine.reset();
        info!(round = session.scheduler.round(), "Round restarted");
    }

    /// Restarts the match: round 1, cleared score, fresh board. All
    /// scheduled events go stale.
    #[instrument(skip(self))]
    pub fn restart_match(&mut self) {
        let Some(session) = self.session.as_mut() else {
            debug!("Match restart with no mode selected");
            return;
        };
        session.scheduler.restart();
        session.pending_reply = None;
        session.engine.reset();
        info!("Match restarted");
    }

    /// Tears the match down and returns to mode selection. All
    /// scheduled events go stale with the dropped session.
    #[instrument(skip(self))]
    pub fn return_to_mode_select(&mut self) {
        if self.session.take().is_some() {
            info!("Returned to mode selection");
        } else {
            debug!("Already at mode selection");
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Read-only projections
    // ─────────────────────────────────────────────────────────────

    /// Token of the computer reply awaiting delivery, if any.
    pub fn pending_reply(&self) -> Option<TaskToken> {
        self.session.as_ref().and_then(|s| s.pending_reply)
    }

    /// Token of the running countdown, if any.
    pub fn countdown_token(&self) -> Option<TaskToken> {
        self.session
            .as_ref()
            .and_then(|s| s.scheduler.countdown_token())
    }

    /// Builds the read-only projection of the current state.
    pub fn view(&self) -> MatchView {
        let Some(session) = self.session.as_ref() else {
            return MatchView {
                board: Board::new(),
                to_move: None,
                status: StatusKind::AwaitingModeSelection,
                mode: None,
                round: 0,
                round_limit: 0,
                score: Score::new(),
                match_over: false,
                countdown: None,
            };
        };

        let match_over = session.scheduler.is_match_over();
        let status = if match_over {
            StatusKind::MatchOver
        } else {
            match session.engine.outcome() {
                Outcome::InProgress => StatusKind::InProgress,
                Outcome::Win(mark) => StatusKind::Win(mark),
                Outcome::Draw => StatusKind::Draw,
            }
        };
        let to_move = (!session.engine.is_round_over() && !match_over)
            .then(|| session.engine.to_move());

        MatchView {
            board: session.engine.board().clone(),
            to_move,
            status,
            mode: Some(session.mode),
            round: session.scheduler.round(),
            round_limit: session.scheduler.limit(),
            score: *session.scheduler.score(),
            match_over,
            countdown: session.scheduler.countdown(),
        }
    }
}

impl Default for MatchController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_through_countdown(controller: &mut MatchController) {
        while let Some(token) = controller.countdown_token() {
            controller.tick(token);
        }
    }

    #[test]
    fn test_view_before_mode_selection() {
        let controller = MatchController::new();
        let view = controller.view();
        assert_eq!(view.status(), &StatusKind::AwaitingModeSelection);
        assert_eq!(view.mode(), &None);
        assert_eq!(view.countdown(), &None);
    }

    #[test]
    fn test_two_player_round_win_updates_score() {
        let mut controller = MatchController::new();
        controller.select_mode(Mode::TwoPlayer);
        for index in [0, 3, 1, 4, 2] {
            controller.click_cell(index);
        }

        let view = controller.view();
        assert_eq!(view.status(), &StatusKind::Win(Mark::X));
        assert_eq!(*view.score().x_wins(), 1);
        assert_eq!(view.countdown(), &Some(crate::round::INTERMISSION_TICKS));

        tick_through_countdown(&mut controller);
        let view = controller.view();
        assert_eq!(*view.round(), 2);
        assert_eq!(view.status(), &StatusKind::InProgress);
        assert!(view.board().empty_cells().len() == 9);
    }

    #[test]
    fn test_clicks_ignored_while_counting_down() {
        let mut controller = MatchController::new();
        controller.select_mode(Mode::TwoPlayer);
        for index in [0, 3, 1, 4, 2] {
            controller.click_cell(index);
        }
        controller.click_cell(5);
        assert!(controller.view().board().is_empty(5));
    }

    #[test]
    fn test_computer_replies_after_human_move() {
        let mut controller = MatchController::new();
        controller.select_mode_seeded(Mode::VsComputer(Difficulty::Hard), 0);
        controller.click_cell(4);

        let token = controller.pending_reply().expect("reply scheduled");
        controller.computer_reply(token);

        let view = controller.view();
        assert_eq!(view.board().mark_count(Mark::X), 1);
        assert_eq!(view.board().mark_count(Mark::O), 1);
        assert_eq!(view.to_move(), &Some(Mark::X));
        assert_eq!(controller.pending_reply(), None);
    }

    #[test]
    fn test_clicks_ignored_during_computer_turn() {
        let mut controller = MatchController::new();
        controller.select_mode_seeded(Mode::VsComputer(Difficulty::Easy), 1);
        controller.click_cell(4);
        assert!(controller.pending_reply().is_some());

        // The reply has not landed yet; the human cannot move again.
        controller.click_cell(0);
        assert_eq!(controller.view().board().mark_count(Mark::X), 1);
    }

    #[test]
    fn test_stale_computer_reply_is_dropped() {
        let mut controller = MatchController::new();
        controller.select_mode_seeded(Mode::VsComputer(Difficulty::Easy), 1);
        controller.click_cell(4);
        let stale = controller.pending_reply().expect("reply scheduled");

        controller.restart_round();
        controller.computer_reply(stale);
        assert_eq!(controller.view().board().empty_cells().len(), 9);
    }

    #[test]
    fn test_restart_round_keeps_score_and_round() {
        let mut controller = MatchController::new();
        controller.select_mode(Mode::TwoPlayer);
        for index in [0, 3, 1, 4, 2] {
            controller.click_cell(index);
        }
        let countdown = controller.countdown_token().expect("countdown running");

        controller.restart_round();
        let view = controller.view();
        assert_eq!(*view.round(), 1);
        assert_eq!(*view.score().x_wins(), 1);
        assert_eq!(view.status(), &StatusKind::InProgress);

        // The cancelled countdown must not advance anything.
        controller.tick(countdown);
        assert_eq!(*controller.view().round(), 1);
    }

    #[test]
    fn test_restart_match_clears_score() {
        let mut controller = MatchController::new();
        controller.select_mode(Mode::TwoPlayer);
        for index in [0, 3, 1, 4, 2] {
            controller.click_cell(index);
        }
        controller.restart_match();

        let view = controller.view();
        assert_eq!(*view.round(), 1);
        assert_eq!(view.score(), &Score::new());
        assert_eq!(view.status(), &StatusKind::InProgress);
    }

    #[test]
    fn test_return_to_mode_select_tears_down() {
        let mut controller = MatchController::new();
        controller.select_mode(Mode::TwoPlayer);
        for index in [0, 3, 1, 4, 2] {
            controller.click_cell(index);
        }
        let countdown = controller.countdown_token().expect("countdown running");

        controller.return_to_mode_select();
        controller.tick(countdown);

        let view = controller.view();
        assert_eq!(view.status(), &StatusKind::AwaitingModeSelection);
        assert_eq!(controller.countdown_token(), None);
    }

    #[test]
    fn test_intents_without_mode_are_no_ops() {
        let mut controller = MatchController::new();
        controller.click_cell(0);
        controller.restart_round();
        controller.restart_match();
        controller.return_to_mode_select();
        assert_eq!(controller.view().status(), &StatusKind::AwaitingModeSelection);
    }
}
