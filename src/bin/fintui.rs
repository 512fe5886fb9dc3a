use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use color_eyre::Result;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::error;
use uuid::Uuid;

use fintui::config::Settings;
use fintui::services::ApiClient;
use fintui::tui::App;

/// Keyboard-first terminal dashboard for personal finance data.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the finance API (overrides the config file)
    #[arg(long = "base-url", value_name = "URL")]
    base_url: Option<String>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Select this user id once the user list loads
    #[arg(long = "user", value_name = "UUID")]
    user: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    fintui::logging::init(None, args.logging.map(Into::into))?;

    let mut settings = Settings::load(args.config.as_ref())?;
    if let Some(base_url) = args.base_url {
        settings.api_base_url = base_url;
    }

    let api = ApiClient::new(
        settings.api_base_url.clone(),
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    let mut app = App::new(&settings, api, args.user);

    // Restore the terminal before any panic output hits the screen.
    std::panic::set_hook(Box::new(|info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        better_panic::Settings::auto().create_panic_handler()(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    if let Err(err) = &result {
        error!("fatal: {err}");
    }
    result
}
