use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use stockroom::config::{ClientOptions, DEFAULT_BASE_URL};
use stockroom::Client;

/// Terminal client for the stockroom inventory API
#[derive(Parser, Debug)]
#[command(name = "stockroom", version, about)]
struct Cli {
    /// Base URL of the inventory API (or STOCKROOM_URL)
    #[arg(long)]
    url: Option<String>,

    /// Path of the persisted token file (or STOCKROOM_TOKEN_FILE)
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Append logs to this file; the terminal itself is owned by the UI
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

impl Cli {
    fn options(&self) -> ClientOptions {
        let url = self
            .url
            .clone()
            .or_else(|| std::env::var("STOCKROOM_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let token_file = self
            .token_file
            .clone()
            .or_else(|| std::env::var("STOCKROOM_TOKEN_FILE").ok().map(PathBuf::from));

        let mut options = ClientOptions::default()
            .with_base_url(&url)
            .with_request_timeout(Some(Duration::from_secs(self.timeout)));
        if let Some(path) = token_file {
            options = options.with_token_file(path);
        }
        options
    }
}

fn init_logging(path: Option<&PathBuf>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stockroom=debug")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let client =
        Arc::new(Client::new(cli.options()).context("failed to construct the API client")?);

    // Leave the terminal usable even when the UI panics.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = stockroom::ui::runtime::run(&mut terminal, client).await;
    restore_terminal();
    result
}
