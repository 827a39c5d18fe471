use ratatui::{buffer::Buffer, layout::Rect};

use crate::{
    app::{App, AppState},
    ui::{render_countdown, render_game_over, render_landing, render_playing},
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Mode picker with the stored high scores
pub struct LandingScreen;

impl Screen for LandingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_landing(app, area, buf);
    }
}

pub struct CountdownScreen {
    remaining: u8,
}

impl Screen for CountdownScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_countdown(app, self.remaining, area, buf);
    }
}

/// Stats bar and the board of entered digits
pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_playing(app, area, buf);
    }
}

pub struct GameOverScreen;

impl Screen for GameOverScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_game_over(app, area, buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Landing => Box::new(LandingScreen),
        AppState::Countdown { remaining } => Box::new(CountdownScreen {
            remaining: *remaining,
        }),
        AppState::Playing => Box::new(PlayingScreen),
        AppState::GameOver => Box::new(GameOverScreen),
    }
}
