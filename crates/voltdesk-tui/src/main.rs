//! voltdesk - a terminal client for the voltdesk energy monitoring backend.
//!
//! Signs the user in against the backend's authentication endpoint, keeps the
//! session in memory with its token mirrored to durable storage, and shows the
//! authenticated dashboard.

mod app;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use voltdesk_core::api::{ApiClient, Authenticator};
use voltdesk_core::auth::{SessionScope, SessionStore};
use voltdesk_core::config::{Config, APP_NAME};
use voltdesk_core::models::User;
use voltdesk_core::storage::{self, StorageBackend};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Terminal client for the voltdesk energy monitoring backend
#[derive(Parser, Debug)]
#[command(name = "voltdesk", version, about)]
struct Args {
    /// Sign in from the command line instead of starting the TUI
    #[arg(long, conflicts_with = "logout")]
    login: bool,

    /// Remove the stored session token and exit
    #[arg(long)]
    logout: bool,

    /// Keep the token in memory only for this run
    #[arg(long)]
    ephemeral: bool,
}

/// Initialize the tracing subscriber. The terminal belongs to the UI, so logs
/// go to a daily file under the data directory.
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_appender = tracing_appender::rolling::daily(log_dir, format!("{}.log", APP_NAME));
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let config_path = Config::config_path().ok();
    let mut config = match config_path.as_deref().map(Config::load_from) {
        Some(Ok(c)) => c,
        Some(Err(e)) => {
            eprintln!("Warning: {:#}; using defaults", e);
            Config::default()
        }
        None => Config::default(),
    }
    .with_env_overrides();
    if args.ephemeral {
        config.storage = StorageBackend::Memory;
    }

    let data_dir = Config::data_dir().unwrap_or_else(|_| Path::new("./data").to_path_buf());
    let _log_guard = init_tracing(&data_dir.join("logs"));
    info!(api_url = config.api_url(), storage = ?config.storage, "voltdesk starting");

    let store: SessionStore<User> = SessionStore::new(storage::open(config.storage, &data_dir));

    if args.logout {
        let mut store = store;
        store.logout();
        println!("Signed out.");
        return Ok(());
    }

    let root = SessionScope::provide(store);
    let api = ApiClient::new(config.api_url())?;
    let mut app = App::new(config, config_path, api, root.child());

    if args.login {
        return app.login_interactive().await;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        warn!(error = %e, "UI loop failed");
    }

    info!("voltdesk shutting down");
    result
}

async fn run_app<A: Authenticator<User = User>>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<A>,
) -> Result<()> {
    loop {
        // Draw UI
        let signed_in = app.current_user_name()?;
        terminal.draw(|f| render(f, app, signed_in.as_deref()))?;

        // Poll for events with timeout so login results show up promptly
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).context("Key handler failed")? {
                    return Ok(());
                }
            }
        }

        // Apply answers from background login requests
        app.check_background_tasks()?;

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_args_default_to_tui() {
        let args = Args::try_parse_from(["voltdesk"]).unwrap();
        assert!(!args.login && !args.logout && !args.ephemeral);
    }

    #[test]
    fn test_args_flags() {
        let args = Args::try_parse_from(["voltdesk", "--login", "--ephemeral"]).unwrap();
        assert!(args.login);
        assert!(args.ephemeral);
        assert!(!args.logout);
    }

    #[test]
    fn test_args_help_and_unknown_flag() {
        let err = Args::try_parse_from(["voltdesk", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = Args::try_parse_from(["voltdesk", "--verbose"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_args_login_and_logout_conflict() {
        let err = Args::try_parse_from(["voltdesk", "--login", "--logout"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }
}
