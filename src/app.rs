use crossterm::event::KeyEvent;
use tracing::{debug, warn};

use crate::config::{Config, ConfigStore};
use crate::digits::DigitSequence;
use crate::game::{Game, SessionObserver};
use crate::high_scores::ScoreStore;
use crate::input::{self, Command};
use crate::mode::Mode;
use crate::session::{EndReason, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Landing,
    Countdown { remaining: u8 },
    Playing,
    GameOver,
}

/// Last thing that happened in the session, for on-screen feedback
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub last_outcome: Option<Outcome>,
    pub last_symbol: Option<char>,
}

impl Feedback {
    pub fn is_error(&self) -> bool {
        matches!(
            self.last_outcome,
            Some(Outcome::Incorrect) | Some(Outcome::SessionEnded(EndReason::MistakeLimitReached))
        )
    }
}

impl SessionObserver for Feedback {
    fn on_submit(&mut self, symbol: char, outcome: Outcome) {
        self.last_symbol = Some(symbol);
        self.last_outcome = Some(outcome);
    }

    fn on_tick(&mut self, _time_remaining: Option<u32>) {
        // a wrong keystroke stays highlighted for at most one tick
        if self.last_outcome == Some(Outcome::Incorrect) {
            self.last_outcome = None;
        }
    }
}

pub struct App {
    pub game: Game<Box<dyn ScoreStore>>,
    pub state: AppState,
    /// Mode highlighted on the landing screen
    pub selected: Mode,
    pub feedback: Feedback,
    pub config: Config,
    countdown_secs: u8,
    config_store: Option<Box<dyn ConfigStore>>,
    clock_reset: bool,
    should_quit: bool,
}

impl App {
    pub fn new(sequence: DigitSequence, store: Box<dyn ScoreStore>, config: Config) -> Self {
        Self {
            game: Game::new(sequence, store, config.last_mode),
            state: AppState::Landing,
            selected: config.last_mode,
            feedback: Feedback::default(),
            countdown_secs: config.countdown_secs,
            config,
            config_store: None,
            clock_reset: false,
            should_quit: false,
        }
    }

    /// Persist the chosen mode through `store` whenever a session begins
    pub fn with_config_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    /// Countdown length for this run only; not written back to the config
    pub fn with_countdown(mut self, secs: u8) -> Self {
        self.countdown_secs = secs;
        self
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// True once after the app wants the tick schedule restarted
    pub fn take_clock_reset(&mut self) -> bool {
        std::mem::take(&mut self.clock_reset)
    }

    /// Enter the countdown for `mode`, or go straight to play without one
    pub fn begin(&mut self, mode: Mode) {
        self.selected = mode;
        self.feedback = Feedback::default();
        self.remember_mode(mode);
        self.game.abandon();
        if self.countdown_secs == 0 {
            self.play();
        } else {
            self.state = AppState::Countdown {
                remaining: self.countdown_secs,
            };
            self.clock_reset = true;
        }
    }

    fn play(&mut self) {
        self.game.start(self.selected);
        self.state = AppState::Playing;
        self.clock_reset = true;
    }

    fn remember_mode(&mut self, mode: Mode) {
        if self.config.last_mode == mode {
            return;
        }
        self.config.last_mode = mode;
        if let Some(store) = &self.config_store {
            if let Err(e) = store.save(&self.config) {
                warn!("saving config: {}", e);
            }
        }
    }

    fn back_to_landing(&mut self) {
        self.game.abandon();
        self.feedback = Feedback::default();
        self.state = AppState::Landing;
    }

    pub fn on_key(&mut self, key: &KeyEvent) {
        let cmd = input::interpret(key);
        if cmd == Command::Quit {
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Landing => match cmd {
                Command::Symbol('1') | Command::Other('b') => self.begin(Mode::Blitz),
                Command::Symbol('2') | Command::Other('s') => self.begin(Mode::Standard),
                Command::Symbol('3') | Command::Other('u') => self.begin(Mode::Unlimited),
                Command::Up => self.selected = self.selected.prev(),
                Command::Down => self.selected = self.selected.next(),
                Command::Confirm => self.begin(self.selected),
                Command::Back | Command::Other('q') => self.should_quit = true,
                _ => {}
            },
            AppState::Countdown { .. } => {
                if cmd == Command::Back {
                    self.back_to_landing();
                }
            }
            AppState::Playing => match cmd {
                Command::Symbol(c) => {
                    if let Some(Outcome::SessionEnded(_)) = self.game.submit(c, &mut self.feedback)
                    {
                        self.state = AppState::GameOver;
                    }
                }
                Command::Back => self.back_to_landing(),
                _ => {}
            },
            AppState::GameOver => match cmd {
                Command::Confirm | Command::Other('r') => self.begin(self.selected),
                Command::Back | Command::Other('m') => self.back_to_landing(),
                Command::Other('q') => self.should_quit = true,
                _ => {}
            },
        }
    }

    pub fn on_tick(&mut self) {
        match self.state {
            AppState::Countdown { remaining } => {
                let remaining = remaining.saturating_sub(1);
                debug!("countdown {}", remaining);
                if remaining == 0 {
                    self.play();
                } else {
                    self.state = AppState::Countdown { remaining };
                }
            }
            AppState::Playing => {
                if self.game.tick(&mut self.feedback).is_some() {
                    self.state = AppState::GameOver;
                }
            }
            AppState::Landing | AppState::GameOver => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfigStore;
    use crate::high_scores::MemoryScoreStore;
    use crossterm::event::{KeyCode, KeyModifiers};
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(countdown_secs: u8) -> App {
        let config = Config {
            countdown_secs,
            ..Config::default()
        };
        App::new(
            DigitSequence::new("3.14").unwrap(),
            Box::new(MemoryScoreStore::new()),
            config,
        )
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.on_key(&key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_landing_selects_mode_by_number() {
        let mut a = app(3);
        a.on_key(&key(KeyCode::Char('1')));
        assert_eq!(a.selected, Mode::Blitz);
        assert_eq!(a.state, AppState::Countdown { remaining: 3 });
        assert!(a.take_clock_reset());
        assert!(!a.take_clock_reset());
    }

    #[test]
    fn test_countdown_leads_to_play() {
        let mut a = app(3);
        a.on_key(&key(KeyCode::Char('u')));
        a.on_tick();
        a.on_tick();
        assert_eq!(a.state, AppState::Countdown { remaining: 1 });
        assert!(!a.game.session().is_active());
        a.on_tick();
        assert_eq!(a.state, AppState::Playing);
        assert!(a.game.session().is_active());
        assert_eq!(a.game.session().mode(), Mode::Unlimited);
    }

    #[test]
    fn test_keys_during_countdown_do_not_count() {
        let mut a = app(2);
        a.on_key(&key(KeyCode::Char('2')));
        type_str(&mut a, "3.14");
        a.on_tick();
        a.on_tick();
        assert_eq!(a.state, AppState::Playing);
        assert_eq!(a.game.session().score(), 0);
    }

    #[test]
    fn test_full_sequence_reaches_game_over() {
        let mut a = app(0);
        a.on_key(&key(KeyCode::Char('s')));
        assert_eq!(a.state, AppState::Playing);
        type_str(&mut a, "3.14");
        assert_eq!(a.state, AppState::GameOver);
        let result = a.game.result().unwrap();
        assert_eq!(result.reason, EndReason::Completed);
        assert_eq!(a.game.high_score(Mode::Standard), 4);
    }

    #[test]
    fn test_wrong_key_flags_feedback_until_tick() {
        let mut a = app(0);
        a.on_key(&key(KeyCode::Char('b')));
        type_str(&mut a, "9");
        assert!(a.feedback.is_error());
        assert_eq!(a.feedback.last_symbol, Some('9'));
        a.on_tick();
        assert!(!a.feedback.is_error());
    }

    #[test]
    fn test_blitz_times_out() {
        let mut a = app(0);
        a.on_key(&key(KeyCode::Char('1')));
        type_str(&mut a, "3.");
        for _ in 0..30 {
            a.on_tick();
        }
        assert_eq!(a.state, AppState::GameOver);
        assert_eq!(a.game.result().unwrap().reason, EndReason::TimeExpired);
        assert_eq!(a.game.high_score(Mode::Blitz), 2);
    }

    #[test]
    fn test_escape_abandons_without_score() {
        let mut a = app(0);
        a.on_key(&key(KeyCode::Char('3')));
        type_str(&mut a, "3.1");
        a.on_key(&key(KeyCode::Esc));
        assert_eq!(a.state, AppState::Landing);
        assert_eq!(a.game.high_score(Mode::Unlimited), 0);
    }

    #[test]
    fn test_game_over_retry_and_menu() {
        let mut a = app(0);
        a.on_key(&key(KeyCode::Char('3')));
        type_str(&mut a, "000");
        assert_eq!(a.state, AppState::GameOver);
        assert_eq!(
            a.game.result().unwrap().reason,
            EndReason::MistakeLimitReached
        );

        a.on_key(&key(KeyCode::Char('r')));
        assert_eq!(a.state, AppState::Playing);
        assert_eq!(a.game.session().mode(), Mode::Unlimited);
        assert_eq!(a.game.session().mistakes(), 0);

        type_str(&mut a, "000");
        a.on_key(&key(KeyCode::Char('m')));
        assert_eq!(a.state, AppState::Landing);
    }

    #[test]
    fn test_landing_navigation_and_quit() {
        let mut a = app(3);
        assert_eq!(a.selected, Mode::Standard);
        a.on_key(&key(KeyCode::Down));
        assert_eq!(a.selected, Mode::Unlimited);
        a.on_key(&key(KeyCode::Up));
        a.on_key(&key(KeyCode::Up));
        assert_eq!(a.selected, Mode::Blitz);
        a.on_key(&key(KeyCode::Esc));
        assert!(a.should_quit());
    }

    #[test]
    fn test_ctrl_c_quits_mid_game() {
        let mut a = app(0);
        a.on_key(&key(KeyCode::Char('1')));
        a.on_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(a.should_quit());
    }

    #[test]
    fn test_countdown_override_is_not_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut a = app(3)
            .with_countdown(0)
            .with_config_store(Box::new(FileConfigStore::with_path(&path)));
        a.on_key(&key(KeyCode::Char('u')));
        assert_eq!(a.state, AppState::Playing);
        assert_eq!(FileConfigStore::with_path(&path).load().countdown_secs, 3);
    }

    #[test]
    fn test_chosen_mode_is_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut a = app(3).with_config_store(Box::new(FileConfigStore::with_path(&path)));
        a.on_key(&key(KeyCode::Char('b')));
        let saved = FileConfigStore::with_path(&path).load();
        assert_eq!(saved.last_mode, Mode::Blitz);
        assert_eq!(saved.countdown_secs, 3);
    }
}
