//! Ticklist Entry Point
//!
//! Launches the animated to-do list in the terminal.
//!
//! Usage:
//!   ticklist [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>      Configuration file
//!   -f, --data-file <PATH>   Task file (default: $XDG_DATA_HOME/ticklist/todos.json)
//!       --log-file <PATH>    Log file (default: ticklist.log next to the task file)
//!       --fps <N>            Tick rate while animating
//!       --no-notify          Log deadline alerts instead of showing them
//!
//! Logs go to a file because the terminal is in the alternate screen.
//! `RUST_LOG` overrides the default filter.

use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ticklist_core::config::load_config_from_path;
use ticklist_core::{
    default_config_path, CommandNotifier, ConfigOverrides, JsonFileStorage, LogNotifier, Moment,
    Notifier, Session, TicklistConfig,
};
use ticklist_tui::{theme, App};

/// Ticklist - an animated terminal to-do list
#[derive(Parser, Debug)]
#[command(name = "ticklist")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "TICKLIST_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Task file path
    #[arg(short = 'f', long, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Log file path
    #[arg(long, env = "TICKLIST_LOG_FILE", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Tick rate while anything animates or counts down
    #[arg(long, value_name = "N")]
    fps: Option<u32>,

    /// Log deadline alerts instead of sending desktop notifications
    #[arg(long)]
    no_notify: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(path) = &self.data_file {
            overrides = overrides.with_data_file(path.clone());
        }
        if let Some(fps) = self.fps {
            overrides = overrides.with_fps(fps);
        }
        if self.no_notify {
            overrides = overrides.with_notify_enabled(false);
        }
        overrides
    }
}

/// Configuration from file and environment with command line overrides on top
fn load_configuration(args: &Args) -> Result<TicklistConfig> {
    let path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(path).context("Failed to load configuration")?;
    args.overrides()
        .apply(&mut config)
        .context("Invalid command line option")?;
    Ok(config)
}

/// Initialize file logging
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {parent:?}"))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {path:?}"))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ticklist_core=info,ticklist_tui=info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(filter)
        .init();
    Ok(())
}

/// Pick the notification channel the configuration asks for
fn build_notifier(config: &TicklistConfig) -> Box<dyn Notifier> {
    if !config.notify_enabled {
        info!("Desktop notifications disabled");
        return Box::new(LogNotifier);
    }
    if let Some(argv) = &config.notify_command {
        return Box::new(CommandNotifier::new(argv.clone()));
    }
    match CommandNotifier::platform_default() {
        Some(notifier) => Box::new(notifier),
        None => {
            warn!("No notification command for this platform, logging alerts instead");
            Box::new(LogNotifier)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_configuration(&args)?;

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| config.default_log_file());
    init_logging(&log_file)?;
    info!(
        data_file = ?config.data_file,
        fps = config.fps,
        source = %config.source(),
        "Starting ticklist"
    );

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: ticklist requires a terminal (TTY)");
        eprintln!();
        eprintln!("Run it interactively, or over SSH with the -t flag.");
        std::process::exit(1);
    }

    let session = Session::load(
        Box::new(JsonFileStorage::new(&config.data_file)),
        build_notifier(&config),
        theme::THEMES.len(),
        Moment::now(),
    )
    .with_timings(config.timings());

    // Restore the terminal before the panic message is printed
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(session);
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Event loop failed");
    }
    result
}
