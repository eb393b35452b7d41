//! Drawing helpers - turn widget adapters into ratatui widgets

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, Gauge, GraphType, Paragraph, Row, Table},
    Frame,
};
use vigil_common::widgets::{GaugeWidget, LineChart, TableWidget, TextField};

const SERIES_COLORS: [Color; 4] = [Color::Cyan, Color::Magenta, Color::Green, Color::Yellow];

fn block(title: &str, error: bool) -> Block<'_> {
    let border = if error { Color::Red } else { Color::DarkGray };
    Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn value_style(error: bool) -> Style {
    if error {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    }
}

/// Labelled values, one per line
pub fn draw_fields(f: &mut Frame, area: Rect, title: &str, fields: &[&TextField]) {
    let width = fields.iter().map(|field| field.label().len()).max().unwrap_or(0);
    let lines: Vec<Line> = fields
        .iter()
        .map(|field| {
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}  ", field.label(), width = width),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(field.render().to_string(), value_style(field.is_error())),
            ])
        })
        .collect();
    let error = fields.iter().any(|field| field.is_error());
    f.render_widget(Paragraph::new(lines).block(block(title, error)), area);
}

pub fn draw_chart(f: &mut Frame, area: Rect, chart: &LineChart) {
    let view = chart.render();
    let unit = match view.unit.as_str() {
        "" | "%" => view.unit.clone(),
        other => format!(" {}", other),
    };

    let datasets: Vec<Dataset> = view
        .datasets
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let latest = series
                .latest
                .map(|v| format!("{} {:.1}{}", series.name, v, unit))
                .unwrap_or_else(|| series.name.clone());
            Dataset::default()
                .name(latest)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(&series.points)
        })
        .collect();

    let title = if view.stale {
        format!("{} (stale)", view.title)
    } else {
        view.title.clone()
    };

    let x_labels = vec![
        Span::raw(view.first_label.clone().unwrap_or_default()),
        Span::raw(view.last_label.clone().unwrap_or_default()),
    ];
    let y_labels = vec![
        Span::raw(format!("0{}", unit)),
        Span::raw(format!("{:.0}{}", view.y_bounds[1], unit)),
    ];

    let widget = Chart::new(datasets)
        .block(block(&title, view.stale))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds(view.x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds(view.y_bounds)
                .labels(y_labels),
        );
    f.render_widget(widget, area);
}

pub fn draw_gauge(f: &mut Frame, area: Rect, gauge: &GaugeWidget) {
    let color = match gauge.ratio() {
        r if r >= 0.9 => Color::Red,
        r if r >= 0.7 => Color::Yellow,
        _ => Color::Green,
    };
    let widget = Gauge::default()
        .block(block(gauge.label(), gauge.is_error()))
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(gauge.ratio())
        .label(gauge.render());
    f.render_widget(widget, area);
}

/// Table with a header; the adapter's placeholder replaces the rows when set
pub fn draw_table<R>(
    f: &mut Frame,
    area: Rect,
    title: &str,
    table: &TableWidget<R>,
    header: &[&str],
    widths: &[Constraint],
    cells: impl Fn(&R) -> Vec<Cell<'static>>,
) {
    if let Some(message) = table.placeholder() {
        let style = if table.is_error() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let widget =
            Paragraph::new(Span::styled(message, style)).block(block(title, table.is_error()));
        f.render_widget(widget, area);
        return;
    }

    let header = Row::new(header.iter().map(|h| Cell::from(h.to_string())))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let rows = table.rows().iter().map(|row| Row::new(cells(row)));
    let widget = Table::new(rows, widths.to_vec())
        .header(header)
        .block(block(title, false));
    f.render_widget(widget, area);
}

/// Style for a severity/level word
pub fn severity_style(level: &str) -> Style {
    match level.to_ascii_lowercase().as_str() {
        "critical" | "error" | "high" => Style::default().fg(Color::Red),
        "warning" | "medium" => Style::default().fg(Color::Yellow),
        "debug" | "low" => Style::default().fg(Color::DarkGray),
        _ => Style::default().fg(Color::Cyan),
    }
}
