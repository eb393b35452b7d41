//! Rendering - header tabs, active screen, status bar and overlays

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};
use vigil_common::{Console, TaskState};

use super::screens::draw_screen;
use super::state::{Screen, TuiState};
use crate::cli::VERSION;

pub fn draw_ui(f: &mut Frame, state: &TuiState, console: &Console) {
    let size = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(5),    // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    draw_header(f, chunks[0], state.screen);
    draw_screen(f, chunks[1], state.screen, console.panels());
    draw_status_bar(f, chunks[2], state, console);

    if state.show_help {
        draw_help_overlay(f, size);
    }
}

fn draw_header(f: &mut Frame, area: Rect, screen: Screen) {
    let titles: Vec<Line> = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(screen.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("|", Style::default().fg(Color::DarkGray)));
    f.render_widget(tabs, area);
}

fn state_color(state: TaskState) -> Color {
    match state {
        TaskState::Idle => Color::DarkGray,
        TaskState::InFlight => Color::Yellow,
        TaskState::Success => Color::Green,
        TaskState::Error => Color::Red,
    }
}

/// Input prompt while typing, otherwise the screen's task states
fn draw_status_bar(f: &mut Frame, area: Rect, state: &TuiState, console: &Console) {
    let mut spans = Vec::new();

    if let Some((prompt, text)) = state.input.prompt() {
        spans.push(Span::styled(format!(" {}", prompt), Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!("{}_", text)));
    } else if let Some(notice) = &state.notice {
        spans.push(Span::styled(format!(" {}", notice), Style::default().fg(Color::Red)));
    } else {
        spans.push(Span::styled(
            format!(" vigil {} ", VERSION),
            Style::default().fg(Color::Rgb(150, 200, 255)),
        ));
        for task in state.screen.tasks() {
            if let Some(status) = console.status(task) {
                spans.push(Span::raw(format!(" {}:", task)));
                spans.push(Span::styled(
                    status.state.as_str(),
                    Style::default().fg(state_color(status.state)),
                ));
            }
        }
        spans.push(Span::styled(
            format!(
                "  {}  F1 help  q quit",
                chrono::Local::now().format("%H:%M:%S")
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<12}", k), Style::default().fg(Color::Cyan)),
            Span::raw(what),
        ])
    };
    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("1-6", "Switch screen"),
        key("Tab/S-Tab", "Next / previous screen"),
        key("r", "Refresh this screen now"),
        key("/", "Search (Processes, Logs)"),
        key("l", "Cycle log level"),
        key("d", "Log date range"),
        key("Left/Right", "Previous / next log page"),
        key("Esc", "Cancel input while typing"),
        key("q, Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press F1 to close",
            Style::default().fg(Color::Gray),
        )),
    ];

    let help_area = centered_rect(50, 60, area);
    let help_block = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, help_area);
    f.render_widget(help_block, help_area);
}

/// Create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
