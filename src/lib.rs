// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires the terminal, logging, and CLI to it.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod digits;
pub mod error;
pub mod game;
pub mod high_scores;
pub mod input;
pub mod mode;
pub mod runtime;
pub mod session;
pub mod ui;

pub use error::{Error, Result};
pub use mode::Mode;
