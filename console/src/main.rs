//! SchoolCast console
//!
//! ```sh
//! # Use the configured backend (~/.config/schoolcast/config.toml)
//! schoolcast
//!
//! # Point at another backend
//! schoolcast --api-url https://api.schoolcast.app/api
//!
//! # Forget the stored login
//! schoolcast --logout
//! ```

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use schoolcast_api::{ApiClient, FileSessionStore, SessionRepository, User};
use schoolcast_dispatch::{EffectRuntime, EffectStoreWithMiddleware, LoggingMiddleware};

use schoolcast_console::action::Action;
use schoolcast_console::config::{ConfigError, ConsoleConfig};
use schoolcast_console::dashboard::DashboardAction;
use schoolcast_console::handler::EffectHandler;
use schoolcast_console::logging;
use schoolcast_console::reducer::reducer;
use schoolcast_console::state::{AppState, TICK_MS};
use schoolcast_console::ui::Ui;

/// Terminal administration console for SchoolCast
#[derive(Parser, Debug)]
#[command(name = "schoolcast")]
#[command(about = "Manage SchoolCast schools, admins and messaging from the terminal")]
struct Args {
    /// Backend base URL (overrides the config file and SCHOOLCAST_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Rows per list page
    #[arg(long)]
    page_size: Option<u32>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Also log every action before it is reduced
    #[arg(long, short)]
    verbose: bool,

    /// Clear the stored session and exit
    #[arg(long)]
    logout: bool,
}

fn load_config(args: &Args) -> Result<ConsoleConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => ConsoleConfig::load_from(path)?,
        None => ConsoleConfig::load()?,
    }
    .with_env();

    if let Some(url) = &args.api_url {
        config.api_base_url = url.clone();
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.clone());
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_tracing(&config.log_path()) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let sessions: Arc<dyn SessionRepository> =
        Arc::new(FileSessionStore::new(FileSessionStore::default_path()));

    if args.logout {
        if let Err(e) = sessions.clear() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        println!("Signed out.");
        return Ok(());
    }

    let client = match ApiClient::new(
        config.api_base_url.clone(),
        config.request_timeout(),
        sessions.clone(),
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: could not create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let user = match sessions.load() {
        Ok(session) => session.map(|s| s.user),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable session");
            None
        }
    };
    tracing::info!(api = %config.api_base_url, signed_in = user.is_some(), "starting console");

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &config, client, user, args.verbose).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "console exited with an error");
    }
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: &ConsoleConfig,
    client: ApiClient,
    user: Option<User>,
    verbose: bool,
) -> io::Result<()> {
    let signed_in = user.is_some();
    let middleware = if verbose {
        LoggingMiddleware::verbose()
    } else {
        LoggingMiddleware::new()
    };
    let store = EffectStoreWithMiddleware::new(
        AppState::new(user, config.page_size),
        reducer,
        middleware,
    );

    let mut runtime = EffectRuntime::from_store(store)
        .with_tick(Duration::from_millis(TICK_MS), || Action::Tick);

    // A restored session opens straight on the dashboard
    if signed_in {
        runtime.enqueue(Action::Dashboard(DashboardAction::Refresh));
    }

    let handler = EffectHandler::new(client, config.search_debounce());
    let ui = RefCell::new(Ui::new());

    runtime
        .run(
            terminal,
            |frame, area, state| ui.borrow_mut().render(frame, area, state),
            |event, state| ui.borrow_mut().map_event(event, state),
            |action| matches!(action, Action::Quit),
            |effect, ctx| handler.handle(effect, ctx),
        )
        .await
}
