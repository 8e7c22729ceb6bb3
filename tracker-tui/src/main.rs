//! Tracker TUI - terminal project tracker
//!
//! Keeps a list of projects with dated tasks, shows summary stats and a
//! paginated duration chart, in the Kanagawa Dragon theme.

mod app;
mod chart;
mod commands;
mod config;
mod derive;
mod error;
mod logging;
mod models;
mod pagination;
mod seed;
mod store;
mod theme;
mod ui;
mod view;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use app::App;
use config::Config;
use seed::SeedClient;
use store::{FileSlot, Store};

/// Frame duration (approximately 30 FPS)
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();

    let config = Config::load()?;
    let _log_guard = logging::init_logging(&config.log_dir)?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        seed = %config.seed,
        page_size = config.page_size,
        "starting tracker"
    );

    // Load before entering raw mode
    let seeds = SeedClient::new()?;
    let slot = FileSlot::new(&config.data_dir);
    tracing::debug!(path = %slot.path().display(), "using slot file");
    let store = Store::load(Box::new(slot), &seeds, &config.seed).await;
    let mut app = App::new(store, config.page_size);

    let result = run_tui(&mut app);
    if let Err(ref error) = result {
        tracing::error!(error = %format!("{:#}", error), "tracker exited with error");
    }
    tracing::info!("tracker stopped");
    result
}

/// Run the TUI application
fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, app);

    // Cleanup
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Run the main event loop
fn run_event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Expire notifications
        app.tick();

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    if let Some(cmd) = app.handle_key(key) {
                        app.update(cmd);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
