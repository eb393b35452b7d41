//! Screens - one layout per tab, each reading only its own panels

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph},
    Frame,
};
use vigil_common::console::{read, Panels};

use super::state::Screen;
use super::widgets::{draw_chart, draw_fields, draw_gauge, draw_table, severity_style};

pub fn draw_screen(f: &mut Frame, area: Rect, screen: Screen, panels: &Panels) {
    match screen {
        Screen::Dashboard => draw_dashboard(f, area, panels),
        Screen::Network => draw_network(f, area, panels),
        Screen::Performance => draw_performance(f, area, panels),
        Screen::Processes => draw_processes(f, area, panels),
        Screen::Alerts => draw_alerts(f, area, panels),
        Screen::Logs => draw_logs(f, area, panels),
    }
}

fn split(direction: Direction, area: Rect, constraints: &[Constraint]) -> Vec<Rect> {
    Layout::default()
        .direction(direction)
        .constraints(constraints.to_vec())
        .split(area)
        .to_vec()
}

fn halves(direction: Direction, area: Rect) -> Vec<Rect> {
    split(
        direction,
        area,
        &[Constraint::Percentage(50), Constraint::Percentage(50)],
    )
}

fn draw_dashboard(f: &mut Frame, area: Rect, panels: &Panels) {
    let rows = split(
        Direction::Vertical,
        area,
        &[Constraint::Length(10), Constraint::Min(8), Constraint::Min(8)],
    );

    let metrics = read(&panels.metrics);
    let system = read(&panels.system);

    let top = split(
        Direction::Horizontal,
        rows[0],
        &[
            Constraint::Percentage(30),
            Constraint::Percentage(45),
            Constraint::Percentage(25),
        ],
    );
    draw_fields(f, top[0], "Live", &metrics.fields());
    draw_fields(f, top[1], "System", &system.fields());
    draw_gauge(f, top[2], system.disk());

    let charts = metrics.charts();
    let middle = halves(Direction::Horizontal, rows[1]);
    let left = halves(Direction::Vertical, middle[0]);
    let right = halves(Direction::Vertical, middle[1]);
    draw_chart(f, left[0], charts[0]);
    draw_chart(f, left[1], charts[1]);
    draw_chart(f, right[0], charts[2]);
    draw_chart(f, right[1], charts[3]);

    let bottom = halves(Direction::Horizontal, rows[2]);
    for (area, chart) in bottom.iter().zip(system.charts()) {
        draw_chart(f, *area, chart);
    }
}

fn draw_network(f: &mut Frame, area: Rect, panels: &Panels) {
    let rows = split(
        Direction::Vertical,
        area,
        &[Constraint::Length(4), Constraint::Min(10), Constraint::Length(10)],
    );
    let network = read(&panels.network);
    draw_fields(f, rows[0], "Throughput", &network.fields());
    draw_chart(f, rows[1], network.traffic());

    let ports = read(&panels.ports);
    draw_table(
        f,
        rows[2],
        "Ports",
        ports.table(),
        &["Port", "Status"],
        &[Constraint::Length(8), Constraint::Min(10)],
        |port| {
            let color = if port.is_open() { Color::Green } else { Color::DarkGray };
            vec![
                Cell::from(port.port.to_string()),
                Cell::from(port.status.clone()).style(Style::default().fg(color)),
            ]
        },
    );
}

fn draw_performance(f: &mut Frame, area: Rect, panels: &Panels) {
    let rows = split(
        Direction::Vertical,
        area,
        &[Constraint::Length(3), Constraint::Length(3), Constraint::Min(8), Constraint::Min(8)],
    );

    let performance = read(&panels.performance);
    draw_fields(f, rows[0], "Performance", &[performance.score()]);

    let gauges = split(Direction::Horizontal, rows[1], &[Constraint::Ratio(1, 4); 4]);
    for (area, gauge) in gauges.iter().zip(performance.breakdown()) {
        draw_gauge(f, *area, gauge);
    }
    draw_chart(f, rows[2], performance.trend());

    let lists = halves(Direction::Horizontal, rows[3]);
    let bottlenecks = read(&panels.bottlenecks);
    draw_table(
        f,
        lists[0],
        "Bottlenecks",
        bottlenecks.table(),
        &["Type", "Severity", "Description"],
        &[Constraint::Length(10), Constraint::Length(9), Constraint::Min(20)],
        |b| {
            vec![
                Cell::from(b.kind.clone()),
                Cell::from(b.severity.clone()).style(severity_style(&b.severity)),
                Cell::from(b.description.clone()),
            ]
        },
    );
    let recommendations = read(&panels.recommendations);
    draw_table(
        f,
        lists[1],
        "Recommendations",
        recommendations.table(),
        &["Priority", "Title", "Description"],
        &[Constraint::Length(9), Constraint::Length(24), Constraint::Min(20)],
        |r| {
            vec![
                Cell::from(r.priority.clone()).style(severity_style(&r.priority)),
                Cell::from(r.title.clone()),
                Cell::from(r.description.clone()),
            ]
        },
    );
}

fn draw_processes(f: &mut Frame, area: Rect, panels: &Panels) {
    let rows = split(Direction::Vertical, area, &[Constraint::Length(1), Constraint::Min(5)]);
    let processes = read(&panels.processes);

    let search = if processes.search().is_empty() {
        Span::styled("(none, press / to search)", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(processes.search().to_string(), Style::default().fg(Color::Cyan))
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![Span::raw(" Filter: "), search])),
        rows[0],
    );

    draw_table(
        f,
        rows[1],
        "Processes",
        processes.table(),
        &["PID", "Name", "CPU %", "Mem %"],
        &[
            Constraint::Length(8),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
        |p| {
            vec![
                Cell::from(p.pid.to_string()),
                Cell::from(p.name.clone()),
                Cell::from(format!("{:.1}", p.cpu_percent)),
                Cell::from(format!("{:.1}", p.memory_percent)),
            ]
        },
    );
}

fn draw_alerts(f: &mut Frame, area: Rect, panels: &Panels) {
    let alerts = read(&panels.alerts);
    draw_table(
        f,
        area,
        "Alert History",
        alerts.table(),
        &["Time", "Level", "Message"],
        &[Constraint::Length(20), Constraint::Length(10), Constraint::Min(20)],
        |a| {
            vec![
                Cell::from(a.timestamp.clone()),
                Cell::from(a.level.clone()).style(severity_style(&a.level)),
                Cell::from(a.message.clone()),
            ]
        },
    );
}

fn draw_logs(f: &mut Frame, area: Rect, panels: &Panels) {
    let rows = split(
        Direction::Vertical,
        area,
        &[Constraint::Length(1), Constraint::Min(5), Constraint::Length(1)],
    );
    let logs = read(&panels.logs);
    let filter = logs.controller().filter();

    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "*".to_string())
    };
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::Cyan);
    let summary = Line::from(vec![
        Span::styled(" Search: ", label),
        Span::styled(format!("{:?}", filter.search), value),
        Span::styled("  Level: ", label),
        Span::styled(filter.level.as_query(), value),
        Span::styled("  Dates: ", label),
        Span::styled(format!("{}..{}", date(filter.start_date), date(filter.end_date)), value),
        Span::styled("  Total: ", label),
        Span::styled(logs.total().render().to_string(), value),
    ]);
    f.render_widget(Paragraph::new(summary), rows[0]);

    draw_table(
        f,
        rows[1],
        "Logs",
        logs.table(),
        &["Time", "Level", "Source", "Message"],
        &[
            Constraint::Length(20),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Min(20),
        ],
        |r| {
            vec![
                Cell::from(r.timestamp.clone()),
                Cell::from(r.level.clone()).style(severity_style(&r.level)),
                Cell::from(r.source.clone()),
                Cell::from(r.message.clone()),
            ]
        },
    );

    f.render_widget(Paragraph::new(pagination_line(&logs.pagination())), rows[2]);
}

/// `< 1 2 [3] 4 5 >  page 3/9`
fn pagination_line(pagination: &vigil_common::Pagination) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let arrow = |enabled: bool, text: &'static str| {
        Span::styled(text, if enabled { Style::default() } else { dim })
    };

    let mut spans = vec![Span::raw(" "), arrow(pagination.has_prev, "<")];
    for page in &pagination.pages {
        spans.push(Span::raw(" "));
        if *page == pagination.current {
            spans.push(Span::styled(
                format!("[{}]", page),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(page.to_string()));
        }
    }
    spans.push(Span::raw(" "));
    spans.push(arrow(pagination.has_next, ">"));
    spans.push(Span::styled(
        format!("  page {}/{}", pagination.current, pagination.total_pages.max(1)),
        dim,
    ));
    Line::from(spans)
}
