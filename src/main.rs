//! Zwicky - Morphological Analysis Editor
//!
//! A local-first, vim-style TUI for building Zwicky boxes.

use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

mod app;
mod editor;
mod gateway;
mod grid;
mod input;
mod logging;
mod store;
mod ui;

use app::{App, AppConfig};
use store::JsonFileStore;

const TICK: Duration = Duration::from_millis(100);

fn main() -> anyhow::Result<()> {
    let loaded = match AppConfig::config_path() {
        Some(path) => AppConfig::load_from(&path),
        None => Ok(AppConfig::default()),
    };
    let mut config = loaded.as_ref().cloned().unwrap_or_default();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    if let Some(path) = args.get(1) {
        config.data_path = PathBuf::from(path);
    }

    let _guard = logging::init(&config.log_dir).context("failed to initialize logging")?;
    if let Err(e) = &loaded {
        tracing::warn!(error = %e, "config unusable, using defaults");
    }

    if let Some(parent) = config.data_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tracing::info!(data_path = %config.data_path.display(), "starting");

    let store = JsonFileStore::new(&config.data_path);
    let gateway = config.gateway.clone();
    let mut app = App::new(config, Box::new(store), Instant::now());
    if let Some(gateway) = gateway {
        tracing::info!(program = %gateway.program, "using gateway command");
        app = app.with_gateway(Rc::new(gateway));
    }

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "event loop failed");
        // Keep whatever was typed since the last save
        app.quit(Instant::now());
    }
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if app.handle_key_event(key, Instant::now()) {
                    break;
                }
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
