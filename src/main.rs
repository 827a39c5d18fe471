use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use piq::{
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    digits::{load_or_fallback, EmbeddedDigits, FileDigits},
    high_scores::{FileScoreStore, ScoreStore},
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    ui, Mode,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "piq=info";

/// memorize the digits of pi, one keystroke at a time
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = "Type the digits of pi from memory. Blitz gives you 30 seconds, Standard three minutes, and Unlimited has no clock but ends after three mistakes."
)]
pub struct Cli {
    /// start a session in this mode right away
    #[arg(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// digit file to use instead of the built-in one
    #[arg(short = 'd', long)]
    digits: Option<PathBuf>,

    /// seconds of countdown before a session starts (0 skips it)
    #[arg(short = 'c', long)]
    countdown: Option<u8>,

    /// high score file location
    #[arg(long)]
    scores: Option<PathBuf>,

    /// do not write a log file
    #[arg(long)]
    no_log: bool,

    /// reset every high score to 0 and exit
    #[arg(long)]
    reset_scores: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let _log_guard = if cli.no_log {
        None
    } else {
        setup_logging()
    };

    let config_store = FileConfigStore::new();
    let config = config_store.load();

    let scores_path = cli.scores.clone().unwrap_or_else(AppDirs::high_scores_path);
    let mut store = FileScoreStore::open(&scores_path);

    if cli.reset_scores {
        store.reset();
        println!("high scores reset ({})", scores_path.display());
        return Ok(());
    }

    let sequence = match cli.digits.as_ref().or(config.digits_path.as_ref()) {
        Some(path) => load_or_fallback(&FileDigits::with_path(path)),
        None => load_or_fallback(&EmbeddedDigits),
    };
    info!("{} symbols loaded", sequence.len());

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app =
        App::new(sequence, Box::new(store), config).with_config_store(Box::new(config_store));
    if let Some(secs) = cli.countdown {
        app = app.with_countdown(secs);
    }
    if let Some(mode) = cli.mode {
        app.begin(mode);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        if app.take_clock_reset() {
            runner.reset_clock();
        }
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            GameEvent::Tick => app.on_tick(),
            GameEvent::Resize => {}
            GameEvent::Key(key) => app.on_key(&key),
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// `RUST_LOG` when set and parseable, `piq=info` otherwise
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn open_log_file(log_dir: &Path) -> Result<RollingFileAppender, Box<dyn Error>> {
    std::fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("piq.log")
        .build(log_dir)?;
    Ok(appender)
}

/// File-only logging; stderr belongs to the TUI. Failing to open the log
/// file is reported once and the game runs without it.
fn setup_logging() -> Option<WorkerGuard> {
    let log_dir = AppDirs::log_dir();
    let file_appender = match open_log_file(&log_dir) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("piq: logging disabled, cannot open {}: {}", log_dir.display(), e);
            return None;
        }
    };
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let rust_log = std::env::var("RUST_LOG").ok();
    let env_filter = log_filter(rust_log.as_deref());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    info!("logging to {}", log_dir.display());
    Some(guard)
}
