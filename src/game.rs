use tracing::info;

use crate::digits::DigitSequence;
use crate::high_scores::ScoreStore;
use crate::mode::Mode;
use crate::session::{EndReason, Outcome, SessionState};

/// Presentation hooks fired on every state change. All default to no-ops.
pub trait SessionObserver {
    fn on_submit(&mut self, _symbol: char, _outcome: Outcome) {}
    fn on_tick(&mut self, _time_remaining: Option<u32>) {}
    fn on_session_end(&mut self, _reason: EndReason, _final_score: u32) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// What a finished session achieved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub mode: Mode,
    pub reason: EndReason,
    pub score: u32,
    pub best_combo: u32,
    pub previous_best: u32,
    pub new_best: bool,
}

/// Owns the loaded sequence, the score store, and the current session.
/// Reports each finished session's score to the store exactly once.
#[derive(Debug)]
pub struct Game<S: ScoreStore> {
    sequence: DigitSequence,
    store: S,
    session: SessionState,
    result: Option<GameResult>,
}

impl<S: ScoreStore> Game<S> {
    pub fn new(sequence: DigitSequence, store: S, mode: Mode) -> Self {
        Self {
            session: SessionState::new(mode, sequence.clone()),
            sequence,
            store,
            result: None,
        }
    }

    pub fn start(&mut self, mode: Mode) {
        self.session.start(mode, self.sequence.clone());
        self.result = None;
        info!("starting {} session", mode);
    }

    /// Start again in the current mode
    pub fn restart(&mut self) {
        self.start(self.session.mode());
    }

    /// Drop the current session without recording anything
    pub fn abandon(&mut self) {
        if self.session.is_active() {
            info!(
                "abandoned {} session at score {}",
                self.session.mode(),
                self.session.score()
            );
        }
        self.session = SessionState::new(self.session.mode(), self.sequence.clone());
        self.result = None;
    }

    pub fn submit(&mut self, symbol: char, observer: &mut dyn SessionObserver) -> Option<Outcome> {
        let outcome = self.session.submit(symbol)?;
        observer.on_submit(symbol, outcome);
        if let Outcome::SessionEnded(reason) = outcome {
            self.finish(reason, observer);
        }
        Some(outcome)
    }

    pub fn tick(&mut self, observer: &mut dyn SessionObserver) -> Option<EndReason> {
        if !self.session.is_active() || !self.session.policy().is_timed() {
            return None;
        }
        let ended = self.session.tick();
        observer.on_tick(self.session.time_remaining());
        if let Some(reason) = ended {
            self.finish(reason, observer);
        }
        ended
    }

    fn finish(&mut self, reason: EndReason, observer: &mut dyn SessionObserver) {
        if self.result.is_some() {
            return;
        }
        let mode = self.session.mode();
        let score = self.session.score();
        let previous_best = self.store.get(mode);
        let new_best = self.store.update(mode, score);
        info!(
            "{} session over ({:?}): score={} best={}",
            mode,
            reason,
            score,
            previous_best.max(score)
        );
        self.result = Some(GameResult {
            mode,
            reason,
            score,
            best_combo: self.session.best_combo(),
            previous_best,
            new_best,
        });
        observer.on_session_end(reason, score);
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn high_score(&self, mode: Mode) -> u32 {
        self.store.get(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::high_scores::MemoryScoreStore;
    use crate::session::Phase;
    use assert_matches::assert_matches;

    #[derive(Default)]
    struct Recorder {
        submits: Vec<(char, Outcome)>,
        ticks: Vec<Option<u32>>,
        ends: Vec<(EndReason, u32)>,
    }

    impl SessionObserver for Recorder {
        fn on_submit(&mut self, symbol: char, outcome: Outcome) {
            self.submits.push((symbol, outcome));
        }
        fn on_tick(&mut self, time_remaining: Option<u32>) {
            self.ticks.push(time_remaining);
        }
        fn on_session_end(&mut self, reason: EndReason, final_score: u32) {
            self.ends.push((reason, final_score));
        }
    }

    /// Counts how often the store is asked to update
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryScoreStore,
        updates: usize,
    }

    impl ScoreStore for CountingStore {
        fn get(&self, mode: Mode) -> u32 {
            self.inner.get(mode)
        }
        fn update(&mut self, mode: Mode, score: u32) -> bool {
            self.updates += 1;
            self.inner.update(mode, score)
        }
        fn reset(&mut self) {
            self.inner.reset()
        }
    }

    fn game(digits: &str) -> Game<CountingStore> {
        Game::new(
            DigitSequence::new(digits).unwrap(),
            CountingStore::default(),
            Mode::Unlimited,
        )
    }

    #[test]
    fn test_new_game_is_idle() {
        let mut g = game("3.14");
        assert_eq!(g.session().phase(), Phase::Idle);
        assert_eq!(g.submit('3', &mut NoopObserver), None);
    }

    #[test]
    fn test_completion_records_score_once() {
        let mut g = game("3.14");
        let mut rec = Recorder::default();
        g.start(Mode::Standard);
        for c in "3.14".chars() {
            g.submit(c, &mut rec);
        }
        // late input and timer callbacks after the end
        g.submit('1', &mut rec);
        g.tick(&mut rec);

        assert_eq!(g.store().updates, 1);
        assert_eq!(g.high_score(Mode::Standard), 4);
        assert_eq!(rec.ends, vec![(EndReason::Completed, 4)]);
        assert_eq!(rec.submits.len(), 4);
        assert!(rec.ticks.is_empty());

        let result = g.result().unwrap();
        assert_eq!(result.reason, EndReason::Completed);
        assert!(result.new_best);
        assert_eq!(result.previous_best, 0);
        assert_eq!(result.best_combo, 4);
    }

    #[test]
    fn test_lower_score_is_not_a_new_best() {
        let mut g = game("3.14");
        g.start(Mode::Unlimited);
        for c in "3.14".chars() {
            g.submit(c, &mut NoopObserver);
        }
        g.start(Mode::Unlimited);
        g.submit('3', &mut NoopObserver);
        for _ in 0..3 {
            g.submit('0', &mut NoopObserver);
        }
        let result = g.result().unwrap();
        assert_eq!(result.reason, EndReason::MistakeLimitReached);
        assert_eq!(result.score, 1);
        assert_eq!(result.previous_best, 4);
        assert!(!result.new_best);
        assert_eq!(g.high_score(Mode::Unlimited), 4);
    }

    #[test]
    fn test_tick_reports_time_and_expires() {
        let mut g = game("3.14");
        let mut rec = Recorder::default();
        g.start(Mode::Blitz);
        let mut ended = None;
        for _ in 0..30 {
            ended = g.tick(&mut rec);
        }
        assert_eq!(ended, Some(EndReason::TimeExpired));
        assert_eq!(rec.ticks.first(), Some(&Some(29)));
        assert_eq!(rec.ticks.last(), Some(&Some(0)));
        assert_eq!(rec.ends, vec![(EndReason::TimeExpired, 0)]);
        assert_eq!(g.store().updates, 1);
    }

    #[test]
    fn test_untimed_ticks_are_silent() {
        let mut g = game("3.14");
        let mut rec = Recorder::default();
        g.start(Mode::Unlimited);
        assert_eq!(g.tick(&mut rec), None);
        assert!(rec.ticks.is_empty());
    }

    #[test]
    fn test_abandon_does_not_record() {
        let mut g = game("3.14159");
        g.start(Mode::Blitz);
        g.submit('3', &mut NoopObserver);
        g.abandon();
        assert_eq!(g.session().phase(), Phase::Idle);
        assert_eq!(g.store().updates, 0);
        assert!(g.result().is_none());
    }

    #[test]
    fn test_restart_keeps_mode() {
        let mut g = game("3.14");
        g.start(Mode::Blitz);
        g.submit('3', &mut NoopObserver);
        g.restart();
        assert_eq!(g.session().mode(), Mode::Blitz);
        assert_eq!(g.session().score(), 0);
        assert!(g.session().is_active());
        assert_matches!(g.submit('3', &mut NoopObserver), Some(Outcome::Correct));
    }
}
