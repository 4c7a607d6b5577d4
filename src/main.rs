//! newsby: a news reader for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//!                 ┌──────────────────── loader thread ────────────────────┐
//!  Command ──────►│ NewsFeed::load ─► grab_news ─► dispatch ─► Store      │
//!  (channel)      │   (fan-out,        (action)    (REQUEST,   (reduce,   │
//!                 │    settle-all)                  SUCCESS/    listeners)│
//!                 │                                 FAILURE)              │
//!                 └───────────────────────────────────────┬───────────────┘
//!                                                         │ LoadMsg
//!                      ┌──────────┐  draw()  ┌──────────┐ ▼
//!                      │  ui.rs   │ ◄─────── │  app.rs  │◄┘
//!                      └──────────┘          └──────────┘
//!                                                 ▲ handle_key_event()
//!                                            ┌──────────┐
//!                                            │ input.rs │
//!                                            └──────────┘
//! ```
//!
//! * **`source/`**: the `Transport` trait, the newsapi.org client, and the
//!   `Article` payload.
//! * **`store/`**: actions, dispatch middleware, reducer, state and the
//!   `NewsFeed` aggregator.
//! * **`load`**: runs loads on a background thread and reports progress.
//! * **`app`** / **`ui`** / **`input`**: the terminal carousel.
//! * **`config`** / **`logging`**: ambient setup.
//! * **`main`**: parses args, loads config, and runs
//!   either the carousel or a one-shot `dump`.

mod app;
mod config;
mod error;
mod input;
mod load;
mod logging;
mod source;
mod store;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use app::App;
use config::{Config, Overrides};
use load::{LoadMsg, SlotStatus};
use logging::LogLevel;
use source::NewsApiClient;
use store::{AppState, NewsFeed, Store};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "newsby", version, about = "Headlines from several news sources, one page each")]
struct Cli {
    /// Config file (TOML). Defaults to <config dir>/newsby/config.toml.
    #[arg(long, env = "NEWSBY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// API root, e.g. https://newsapi.org/v1
    #[arg(long, env = "NEWSBY_API_URL", global = true)]
    api_url: Option<String>,

    /// API key sent as X-Api-Key.
    #[arg(long, env = "NEWSBY_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Source slug; repeat to build the page list in order. Replaces the
    /// configured sources.
    #[arg(long = "source", value_name = "SLUG", global = true)]
    sources: Vec<String>,

    /// Minimum log level (RUST_LOG takes precedence).
    #[arg(long, default_value = "info", global = true)]
    log_level: LogLevel,

    /// Log file for the terminal UI.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Browse the pages in the terminal (default).
    Tui,
    /// Fetch every source once and print the pages as text.
    Dump,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let config = Config::load(self.config.as_deref())
            .context("loading configuration")?
            .with_overrides(Overrides {
                api_url: self.api_url.clone(),
                api_key: self.api_key.clone(),
                sources: self.sources.clone(),
            });
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn build_feed(config: &Config) -> NewsFeed {
    if config.api_key.is_empty() {
        warn!("no API key configured; every source will fail");
    }
    let transport = NewsApiClient::new(&config.api_url, &config.api_key);
    let store = Store::new(AppState::new(config.sources.iter().cloned()));
    NewsFeed::new(store, Arc::new(transport))
}

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Raw mode and the alternate screen for as long as the guard lives,
/// restored on drop (including during unwinding).
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default hook prints a panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run_tui(cli: &Cli, config: &Config) -> Result<()> {
    let log_path = cli.log_file.clone().or_else(logging::default_log_path);
    if let Some(path) = &log_path {
        // Logging is best effort; the UI works without it.
        let _ = logging::init_file(cli.log_level, path);
    }
    info!(sources = ?config.sources, "starting terminal UI");

    install_panic_hook();

    let feed = build_feed(config);
    let loader = load::spawn(feed.clone())?;

    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(feed);

    // ~10 fps.  Each tick: drain loader messages, render, poll for a key.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = loader.events.try_recv() {
            app.handle_load_msg(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.reload_requested {
            app.reload_requested = false;
            loader.reload();
        }

        if app.quit {
            break;
        }
    }

    Ok(())
}

fn run_dump(cli: &Cli, config: &Config) -> Result<()> {
    logging::init_stderr(cli.log_level);

    let feed = build_feed(config);
    let (tx, rx) = mpsc::channel();
    load::report_progress(&feed, tx);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building runtime")?;
    runtime.block_on(feed.load());

    let mut failures = vec![None; config.sources.len()];
    for msg in rx.try_iter() {
        if let LoadMsg::Slot {
            index,
            status: SlotStatus::Failed(reason),
        } = msg
        {
            if let Some(slot) = failures.get_mut(index) {
                *slot = Some(reason);
            }
        }
    }

    let mut out = io::stdout().lock();
    write_pages(&mut out, &feed, &failures)?;

    if failures.iter().all(Option::is_some) {
        bail!("every source failed");
    }
    Ok(())
}

fn write_pages(out: &mut impl Write, feed: &NewsFeed, failures: &[Option<String>]) -> Result<()> {
    let state = feed.snapshot();
    for (index, source) in state.sources().iter().enumerate() {
        writeln!(out, "== {} ({source})", store::page_key(index))?;
        for article in state.slot(index).unwrap_or_default() {
            if !article.is_displayable() {
                continue;
            }
            writeln!(
                out,
                "  {}  <{}>",
                article.title,
                article.url.as_deref().unwrap_or_default()
            )?;
        }
    }

    let failed: Vec<_> = failures
        .iter()
        .enumerate()
        .filter_map(|(i, f)| f.as_ref().map(|reason| (i, reason)))
        .collect();
    if !failed.is_empty() {
        writeln!(out)?;
        writeln!(out, "failed sources:")?;
        for (index, reason) in failed {
            let source = state.sources().get(index).map_or("?", String::as_str);
            writeln!(out, "  {source}: {reason}")?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match cli.command {
        Some(Command::Dump) => run_dump(&cli, &config),
        Some(Command::Tui) | None => run_tui(&cli, &config),
    }
}
