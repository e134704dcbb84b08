//! Round and match scheduling above the turn engine.
//!
//! Tracks round number and cumulative score, and drives the timed
//! intermission between rounds. Ticks arrive as external events
//! carrying the token the countdown was started with; anything stale
//! is dropped.

use crate::board::Mark;
use crate::rules::Outcome;
use crate::schedule::TaskToken;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Countdown ticks between a finished round and the next one.
pub const INTERMISSION_TICKS: u32 = 3;

/// Rounds in a two-player match.
pub const TWO_PLAYER_ROUNDS: u32 = 10;

/// Rounds in a match against the computer.
pub const VS_COMPUTER_ROUNDS: u32 = 1;

/// Cumulative round results for one match.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters,
)]
pub struct Score {
    /// Rounds won by X.
    x_wins: u32,
    /// Rounds won by O.
    o_wins: u32,
    /// Drawn rounds.
    draws: u32,
}

impl Score {
    /// Creates an all-zero score.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one finished round.
    pub(crate) fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win(Mark::X) => self.x_wins += 1,
            Outcome::Win(Mark::O) => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::InProgress => warn!("Ignoring attempt to score an unfinished round"),
        }
    }
}

/// Where the scheduler is within the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// A round is in progress and accepting moves.
    Playing,
    /// The last round ended; counting down to the next round or the
    /// match summary.
    CountingDown {
        /// Ticks left before advancing.
        remaining: u32,
        /// Token the countdown was scheduled under.
        token: TaskToken,
    },
    /// The round limit was reached.
    MatchOver,
}

/// Result of delivering one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// The token was stale or no countdown is running; nothing changed.
    Stale,
    /// The countdown decremented and keeps running.
    Counting(u32),
    /// The countdown expired; the next round should start on a fresh board.
    NextRound,
    /// The countdown expired after the final round; the match is over.
    MatchFinished,
}

/// State machine for round progression and scoring.
#[derive(Debug, Clone)]
pub struct RoundScheduler {
    round: u32,
    limit: u32,
    score: Score,
    phase: RoundPhase,
}

impl RoundScheduler {
    /// Creates a scheduler for a match of `limit` rounds.
    pub fn new(limit: u32) -> Self {
        Self {
            round: 1,
            limit: limit.max(1),
            score: Score::new(),
            phase: RoundPhase::Playing,
        }
    }

    /// Current round number, 1-based.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Round limit of the match.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Cumulative score.
    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Remaining ticks of the running countdown, if one is running.
    pub fn countdown(&self) -> Option<u32> {
        match self.phase {
            RoundPhase::CountingDown { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    /// Token of the running countdown, if one is running.
    pub fn countdown_token(&self) -> Option<TaskToken> {
        match self.phase {
            RoundPhase::CountingDown { token, .. } => Some(token),
            _ => None,
        }
    }

    /// True once the round limit was reached.
    pub fn is_match_over(&self) -> bool {
        matches!(self.phase, RoundPhase::MatchOver)
    }

    /// Records a finished round and starts the intermission countdown
    /// under the given token.
    ///
    /// A countdown already running is replaced; its token goes stale.
    /// At most one countdown is ever live.
    #[instrument(skip(self))]
    pub fn record_outcome(&mut self, outcome: Outcome, token: TaskToken) {
        if !outcome.is_terminal() {
            warn!(%outcome, "Refusing to record an unfinished round");
            return;
        }
        if self.is_match_over() {
            warn!("Refusing to record a round after the match ended");
            return;
        }
        self.score.record(outcome);
        self.phase = RoundPhase::CountingDown {
            remaining: INTERMISSION_TICKS,
            token,
        };
        info!(round = self.round, %outcome, "Round finished, countdown started");
    }

    /// Delivers one countdown tick.
    #[instrument(skip(self))]
    pub fn tick(&mut self, token: TaskToken) -> TickResult {
        let RoundPhase::CountingDown {
            remaining,
            token: active,
        } = self.phase
        else {
            debug!("Tick with no countdown running");
            return TickResult::Stale;
        };
        if active != token {
            debug!(?token, "Dropping stale countdown tick");
            return TickResult::Stale;
        }

        let remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            self.phase = RoundPhase::CountingDown {
                remaining,
                token: active,
            };
            debug!(remaining, "Countdown ticked");
            return TickResult::Counting(remaining);
        }

        if self.round >= self.limit {
            self.phase = RoundPhase::MatchOver;
            info!(rounds = self.round, "Round limit reached, match over");
            TickResult::MatchFinished
        } else {
            self.round += 1;
            self.phase = RoundPhase::Playing;
            info!(round = self.round, "Advancing to the next round");
            TickResult::NextRound
        }
    }

    /// Cancels a running countdown, staying in the current round.
    pub(crate) fn cancel_countdown(&mut self) {
        if matches!(self.phase, RoundPhase::CountingDown { .. }) {
            debug!("Countdown cancelled");
            self.phase = RoundPhase::Playing;
        }
    }

    /// Resets to round 1 with a cleared score, cancelling any countdown.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        self.round = 1;
        self.score = Score::new();
        self.phase = RoundPhase::Playing;
        info!("Match state cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::TokenSource;

    fn run_countdown(scheduler: &mut RoundScheduler, token: TaskToken) -> TickResult {
        loop {
            match scheduler.tick(token) {
                TickResult::Counting(_) => continue,
                done => return done,
            }
        }
    }

    #[test]
    fn test_outcome_recorded_once_into_score() {
        let mut tokens = TokenSource::new();
        let mut scheduler = RoundScheduler::new(TWO_PLAYER_ROUNDS);
        scheduler.record_outcome(Outcome::Win(Mark::X), tokens.issue());
        assert_eq!(*scheduler.score().x_wins(), 1);
        assert_eq!(*scheduler.score().o_wins(), 0);
        assert_eq!(scheduler.countdown(), Some(INTERMISSION_TICKS));
    }

    #[test]
    fn test_countdown_counts_down_then_advances() {
        let mut tokens = TokenSource::new();
        let mut scheduler = RoundScheduler::new(TWO_PLAYER_ROUNDS);
        let token = tokens.issue();
        scheduler.record_outcome(Outcome::Draw, token);

        assert_eq!(scheduler.tick(token), TickResult::Counting(2));
        assert_eq!(scheduler.tick(token), TickResult::Counting(1));
        assert_eq!(scheduler.tick(token), TickResult::NextRound);
        assert_eq!(scheduler.round(), 2);
        assert_eq!(scheduler.phase(), RoundPhase::Playing);
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let mut tokens = TokenSource::new();
        let mut scheduler = RoundScheduler::new(TWO_PLAYER_ROUNDS);
        let stale = tokens.issue();
        scheduler.record_outcome(Outcome::Draw, stale);

        // A new round end replaces the countdown and its token.
        let fresh = tokens.issue();
        scheduler.record_outcome(Outcome::Win(Mark::O), fresh);

        assert_eq!(scheduler.tick(stale), TickResult::Stale);
        assert_eq!(scheduler.countdown(), Some(INTERMISSION_TICKS));
        assert_eq!(run_countdown(&mut scheduler, fresh), TickResult::NextRound);
    }

    #[test]
    fn test_final_round_finishes_the_match() {
        let mut tokens = TokenSource::new();
        let mut scheduler = RoundScheduler::new(2);

        let token = tokens.issue();
        scheduler.record_outcome(Outcome::Win(Mark::X), token);
        assert_eq!(run_countdown(&mut scheduler, token), TickResult::NextRound);

        let token = tokens.issue();
        scheduler.record_outcome(Outcome::Win(Mark::O), token);
        assert_eq!(
            run_countdown(&mut scheduler, token),
            TickResult::MatchFinished
        );
        assert!(scheduler.is_match_over());

        // Nothing further ticks or records.
        assert_eq!(scheduler.tick(token), TickResult::Stale);
        scheduler.record_outcome(Outcome::Draw, tokens.issue());
        assert_eq!(*scheduler.score().draws(), 0);
    }

    #[test]
    fn test_single_round_limit_for_computer_matches() {
        let mut tokens = TokenSource::new();
        let mut scheduler = RoundScheduler::new(VS_COMPUTER_ROUNDS);
        let token = tokens.issue();
        scheduler.record_outcome(Outcome::Draw, token);
        assert_eq!(
            run_countdown(&mut scheduler, token),
            TickResult::MatchFinished
        );
    }

    #[test]
    fn test_restart_clears_score_and_countdown() {
        let mut tokens = TokenSource::new();
        let mut scheduler = RoundScheduler::new(TWO_PLAYER_ROUNDS);
        let token = tokens.issue();
        scheduler.record_outcome(Outcome::Win(Mark::X), token);
        scheduler.restart();

        assert_eq!(scheduler.round(), 1);
        assert_eq!(scheduler.score(), &Score::new());
        assert_eq!(scheduler.phase(), RoundPhase::Playing);
        assert_eq!(scheduler.tick(token), TickResult::Stale);
    }

    #[test]
    fn test_cancel_countdown_keeps_round_and_score() {
        let mut tokens = TokenSource::new();
        let mut scheduler = RoundScheduler::new(TWO_PLAYER_ROUNDS);
        let token = tokens.issue();
        scheduler.record_outcome(Outcome::Win(Mark::O), token);
        scheduler.cancel_countdown();

        assert_eq!(scheduler.phase(), RoundPhase::Playing);
        assert_eq!(scheduler.round(), 1);
        assert_eq!(*scheduler.score().o_wins(), 1);
        assert_eq!(scheduler.tick(token), TickResult::Stale);
    }
}
