//! Event Loop - dashboard entry point and key dispatch

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vigil_common::{Config, Console, HttpTelemetryClient};

use super::render::draw_ui;
use super::state::{TuiState, UiAction};

/// Run the dashboard until the operator quits
pub async fn run(config: &Config) -> Result<()> {
    let client = HttpTelemetryClient::new(&config.api.base_url, config.request_timeout())
        .with_context(|| format!("creating client for {}", config.api.base_url))?;
    let mut console =
        Console::new(config, Arc::new(client)).context("building console panels")?;

    // Setup terminal with error recovery
    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!(
            "Failed to enable raw mode: {}. Ensure you're running in a real terminal (TTY).",
            e
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(url = %config.api.base_url, "Dashboard started");
    console.start();

    let mut state = TuiState::default();
    let result = run_event_loop(&mut terminal, &mut state, &console);

    console.shutdown();
    let cleanup_result = restore_terminal(&mut terminal);
    info!("Dashboard closed");

    result.and(cleanup_result)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut TuiState,
    console: &Console,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw_ui(f, state, console))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = state.handle_key(key);
                if !apply_action(console, state, action) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Carry out a key's effect on the console; false means quit
pub fn apply_action(console: &Console, state: &TuiState, action: UiAction) -> bool {
    match action {
        UiAction::None => {}
        UiAction::Quit => return false,
        UiAction::Refresh => {
            for task in state.screen.tasks() {
                console.refresh(task);
            }
        }
        UiAction::ProcessSearch(search) => console.set_process_search(&search),
        UiAction::LogSearch(search) => console.update_log_filter(|c| c.set_search(search)),
        UiAction::CycleLevel => console.update_log_filter(|c| c.cycle_level()),
        UiAction::DateRange(start, end) => {
            console.update_log_filter(|c| c.set_date_range(start, end))
        }
        UiAction::NextPage => console.update_log_filter(|c| c.next_page()),
        UiAction::PrevPage => console.update_log_filter(|c| c.prev_page()),
    }
    true
}
