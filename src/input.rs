//! Keystroke interpretation for the game screens.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key means to the app, independent of the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A digit or decimal point for the session
    Symbol(char),
    Confirm,
    Back,
    Quit,
    Up,
    Down,
    Other(char),
    Ignore,
}

/// Ctrl+C always quits
pub fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn interpret(key: &KeyEvent) -> Command {
    // key release events arrive on some platforms; only presses count
    if key.kind == KeyEventKind::Release {
        return Command::Ignore;
    }
    if is_quit(key) {
        return Command::Quit;
    }
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return Command::Ignore;
    }

    match key.code {
        // numpad keys come through as plain characters; `,` covers
        // keypads that emit a decimal comma
        KeyCode::Char(c) if c.is_ascii_digit() => Command::Symbol(c),
        KeyCode::Char('.') | KeyCode::Char(',') => Command::Symbol('.'),
        KeyCode::Char(c) => Command::Other(c.to_ascii_lowercase()),
        KeyCode::Enter => Command::Confirm,
        KeyCode::Esc => Command::Back,
        KeyCode::Up | KeyCode::Left => Command::Up,
        KeyCode::Down | KeyCode::Right => Command::Down,
        _ => Command::Ignore,
    }
}
