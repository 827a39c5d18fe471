//! Per-session game state: where the player is in the sequence, how well
//! they are doing, and whether the clock or the mistake budget has run out.
//!
//! `SessionState` has no rendering or timer dependency. Callers feed it one
//! keystroke at a time through [`SessionState::submit`] and one second at a
//! time through [`SessionState::tick`]; once the session has ended both are
//! silent no-ops, so late timer callbacks are harmless.

use tracing::debug;

use crate::digits::DigitSequence;
use crate::mode::{Mode, ModePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    Completed,
    MistakeLimitReached,
    TimeExpired,
}

impl EndReason {
    pub fn message(&self) -> &'static str {
        match self {
            EndReason::Completed => "You memorized all loaded digits!",
            EndReason::MistakeLimitReached => "Too many mistakes!",
            EndReason::TimeExpired => "Time's up!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Ended(EndReason),
}

/// Result of one accepted submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    SessionEnded(EndReason),
}

#[derive(Debug, Clone)]
pub struct SessionState {
    mode: Mode,
    policy: ModePolicy,
    sequence: DigitSequence,
    phase: Phase,
    index: usize,
    score: u32,
    combo: u32,
    best_combo: u32,
    mistakes: u32,
    time_remaining: Option<u32>,
}

impl SessionState {
    /// A session that has not started yet
    pub fn new(mode: Mode, sequence: DigitSequence) -> Self {
        let policy = mode.policy();
        Self {
            mode,
            policy,
            sequence,
            phase: Phase::Idle,
            index: 0,
            score: 0,
            combo: 0,
            best_combo: 0,
            mistakes: 0,
            time_remaining: policy.time_budget_secs,
        }
    }

    /// Shorthand for `new` followed by `start` with the same arguments
    pub fn started(mode: Mode, sequence: DigitSequence) -> Self {
        let mut state = Self::new(mode, sequence.clone());
        state.start(mode, sequence);
        state
    }

    /// Reset every counter and become active, whatever the current phase
    pub fn start(&mut self, mode: Mode, sequence: DigitSequence) {
        *self = Self::new(mode, sequence);
        self.phase = Phase::Active;
        debug!(
            "session started: mode={} symbols={}",
            self.mode,
            self.sequence.len()
        );
    }

    /// Check `symbol` against the next expected one.
    ///
    /// A `.` only matches an expected `.` and a digit never does, so a
    /// wrong-kind keystroke takes the same path as any other mismatch.
    /// Returns None while the session is not active.
    pub fn submit(&mut self, symbol: char) -> Option<Outcome> {
        if !self.is_active() {
            return None;
        }
        let expected = self.sequence.get(self.index)?;

        if symbol == expected {
            self.score += 1;
            self.combo += 1;
            self.best_combo = self.best_combo.max(self.combo);
            self.index += 1;
            if self.index == self.sequence.len() {
                self.end(EndReason::Completed);
                return Some(Outcome::SessionEnded(EndReason::Completed));
            }
            return Some(Outcome::Correct);
        }

        self.combo = 0;
        if let Some(budget) = self.policy.mistake_budget {
            self.mistakes += 1;
            if self.mistakes >= budget {
                self.end(EndReason::MistakeLimitReached);
                return Some(Outcome::SessionEnded(EndReason::MistakeLimitReached));
            }
        }
        Some(Outcome::Incorrect)
    }

    /// Advance the clock by one second. Returns the end reason if this tick
    /// ran the clock out. Untimed or inactive sessions ignore ticks.
    pub fn tick(&mut self) -> Option<EndReason> {
        if !self.is_active() {
            return None;
        }
        let remaining = self.time_remaining.as_mut()?;
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.end(EndReason::TimeExpired);
            return Some(EndReason::TimeExpired);
        }
        None
    }

    fn end(&mut self, reason: EndReason) {
        self.phase = Phase::Ended(reason);
        debug!(
            "session ended: mode={} reason={:?} score={}",
            self.mode, reason, self.score
        );
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn policy(&self) -> ModePolicy {
        self.policy
    }

    pub fn sequence(&self) -> &DigitSequence {
        &self.sequence
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn has_ended(&self) -> bool {
        matches!(self.phase, Phase::Ended(_))
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.phase {
            Phase::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The symbols entered correctly so far
    pub fn entered(&self) -> &str {
        &self.sequence.as_str()[..self.index]
    }

    pub fn expected(&self) -> Option<char> {
        self.sequence.get(self.index)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn best_combo(&self) -> u32 {
        self.best_combo
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn mistakes_left(&self) -> Option<u32> {
        self.policy
            .mistake_budget
            .map(|budget| budget.saturating_sub(self.mistakes))
    }

    /// Seconds left on the clock; None for untimed modes
    pub fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }
}
