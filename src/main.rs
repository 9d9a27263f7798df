mod app;
mod config;
mod error;
mod task;
mod task_store;
mod ui;

use anyhow::Context;
use app::App;
use clap::Parser;
use config::Config;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};
use task_store::TaskStore;

#[derive(Parser)]
#[command(name = "daily-planner")]
#[command(about = "Daily planner with deadline and priority sorting", long_about = None)]
#[command(version)]
struct Cli {
    /// Task file to read and write
    #[arg(long, env = "PLANNER_TASKS_FILE")]
    file: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write logs
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Splits the log path into a directory that exists and a file name.
fn log_target(path: &Path) -> anyhow::Result<(PathBuf, OsString)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .context("log file path has no file name")?
        .to_owned();
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    Ok((dir, file_name))
}

fn init_logging(log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let path = log_file.unwrap_or_else(|| config::data_dir().join("planner.log"));
    let (dir, file_name) = log_target(&path)?;

    // The terminal belongs to the UI, so logs only go to the file.
    tracing_subscriber::fmt()
        .with_writer(tracing_appender::rolling::never(dir, file_name))
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // The planner still works without a log file.
    if let Err(err) = init_logging(cli.log_file) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?
        .with_tasks_file(cli.file);
    let mut app = App::new(TaskStore::new(config.tasks_file), config.status_ttl);
    tracing::info!(tasks_file = %app.store().path().display(), "daily planner starting");
    app.load_all();

    // Terminal setup
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(%err, "ui loop failed");
    }
    tracing::info!(unsaved = app.is_dirty(), "daily planner exiting");
    result.context("terminal error")
}
