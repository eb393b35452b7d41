//! Widget Adapters
//!
//! Translate panel data into something a renderer can draw. Each adapter
//! knows how to show an explicit error state; none keeps data beyond what
//! its buffers or rows already hold.
//!
//! - `TextField`: one status value ("12.5%", "Error")
//! - `LineChart`: one or more bounded series sharing an x axis
//! - `GaugeWidget`: a 0-100 ratio (disk usage, score breakdown)
//! - `TableWidget`: rows replaced wholesale on every render

use crate::buffer::TimeSeriesBuffer;
use crate::error::BufferError;

/// Marker shown in place of a value after a failed tick
pub const ERROR_MARKER: &str = "Error";

/// Shown before the first successful tick
pub const PENDING_MARKER: &str = "--";

// ============================================================================
// Text field
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Pending,
    Ready(String),
    Error,
}

/// A labelled single-value display
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    id: &'static str,
    label: &'static str,
    value: FieldValue,
}

impl TextField {
    pub fn new(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            value: FieldValue::Pending,
        }
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.value = FieldValue::Ready(text.into());
    }

    pub fn show_error(&mut self) {
        self.value = FieldValue::Error;
    }

    /// Text to display
    pub fn render(&self) -> &str {
        match &self.value {
            FieldValue::Pending => PENDING_MARKER,
            FieldValue::Ready(text) => text,
            FieldValue::Error => ERROR_MARKER,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_error(&self) -> bool {
        self.value == FieldValue::Error
    }
}

// ============================================================================
// Line chart
// ============================================================================

/// One drawable series
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetView {
    pub name: String,
    pub points: Vec<(f64, f64)>,
    pub latest: Option<f64>,
}

/// Everything a renderer needs to draw a chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub title: String,
    pub unit: String,
    pub datasets: Vec<DatasetView>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub first_label: Option<String>,
    pub last_label: Option<String>,
    pub stale: bool,
}

/// Chart bound to a fixed set of buffers of equal capacity
#[derive(Debug, Clone)]
pub struct LineChart {
    title: String,
    unit: String,
    y_max: Option<f64>,
    series: Vec<TimeSeriesBuffer>,
    stale: bool,
}

impl LineChart {
    /// `y_max` pins the upper bound (percent charts); `None` scales to data
    pub fn new(
        title: impl Into<String>,
        unit: impl Into<String>,
        y_max: Option<f64>,
        series: &[&str],
        capacity: usize,
    ) -> Result<Self, BufferError> {
        let series = series
            .iter()
            .map(|label| TimeSeriesBuffer::with_capacity(*label, capacity))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            title: title.into(),
            unit: unit.into(),
            y_max,
            series,
            stale: false,
        })
    }

    /// Append one sample to each series, in series order.
    ///
    /// Extra values are ignored, missing ones leave that series unchanged.
    pub fn push(&mut self, label: &str, values: &[f64]) {
        for (buffer, value) in self.series.iter_mut().zip(values) {
            buffer.append(label, *value);
        }
        self.stale = false;
    }

    /// Series stop advancing and the chart is flagged stale
    pub fn show_error(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn series(&self) -> &[TimeSeriesBuffer] {
        &self.series
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn render(&self) -> ChartView {
        let capacity = self.series.first().map(|s| s.capacity()).unwrap_or(1);
        let data_max = self
            .series
            .iter()
            .filter_map(|s| s.max_value())
            .fold(0.0_f64, f64::max);
        let y_top = match self.y_max {
            Some(max) => max.max(data_max),
            // Headroom so the line does not sit on the border
            None if data_max > 0.0 => data_max * 1.2,
            None => 1.0,
        };
        let reference = self.series.iter().max_by_key(|s| s.len());

        ChartView {
            title: self.title.clone(),
            unit: self.unit.clone(),
            datasets: self
                .series
                .iter()
                .map(|s| DatasetView {
                    name: s.label().to_string(),
                    points: s.points(),
                    latest: s.latest().map(|sample| sample.value),
                })
                .collect(),
            x_bounds: [0.0, capacity.saturating_sub(1).max(1) as f64],
            y_bounds: [0.0, y_top],
            first_label: reference.and_then(|s| s.first_label()).map(str::to_string),
            last_label: reference.and_then(|s| s.last_label()).map(str::to_string),
            stale: self.stale,
        }
    }
}

// ============================================================================
// Gauge
// ============================================================================

/// Ratio display clamped to 0..=100
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeWidget {
    label: &'static str,
    percent: Option<f64>,
    error: bool,
}

impl GaugeWidget {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            percent: None,
            error: false,
        }
    }

    pub fn set(&mut self, percent: f64) {
        self.percent = Some(percent.clamp(0.0, 100.0));
        self.error = false;
    }

    pub fn show_error(&mut self) {
        self.error = true;
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Fraction for drawing, 0 while pending or in error
    pub fn ratio(&self) -> f64 {
        match (self.error, self.percent) {
            (false, Some(p)) => p / 100.0,
            _ => 0.0,
        }
    }

    pub fn render(&self) -> String {
        match (self.error, self.percent) {
            (true, _) => ERROR_MARKER.to_string(),
            (false, Some(p)) => format!("{:.1}%", p),
            (false, None) => PENDING_MARKER.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}

// ============================================================================
// Table
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TableStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Full replace-on-render row display
#[derive(Debug, Clone)]
pub struct TableWidget<R> {
    subject: &'static str,
    rows: Vec<R>,
    status: TableStatus,
}

impl<R> TableWidget<R> {
    /// `subject` names what is listed, used in the empty and failed messages
    pub fn new(subject: &'static str) -> Self {
        Self {
            subject,
            rows: Vec::new(),
            status: TableStatus::Loading,
        }
    }

    pub fn replace(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.status = TableStatus::Ready;
    }

    pub fn show_error(&mut self) {
        self.rows.clear();
        self.status = TableStatus::Failed(format!("Failed to load {}", self.subject));
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn status(&self) -> &TableStatus {
        &self.status
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, TableStatus::Failed(_))
    }

    /// Message to show instead of rows, if any
    pub fn placeholder(&self) -> Option<String> {
        match &self.status {
            TableStatus::Loading => Some(format!("Loading {}...", self.subject)),
            TableStatus::Failed(message) => Some(message.clone()),
            TableStatus::Ready if self.rows.is_empty() => Some(format!("No {}", self.subject)),
            TableStatus::Ready => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_states() {
        let mut field = TextField::new("cpu-value", "CPU");
        assert_eq!(field.render(), "--");
        field.set("12.5%");
        assert_eq!(field.render(), "12.5%");
        field.show_error();
        assert_eq!(field.render(), "Error");
        assert!(field.is_error());
        field.set("13%");
        assert!(!field.is_error());
    }

    #[test]
    fn test_chart_push_and_stale() {
        let mut chart = LineChart::new("Traffic", "KB/s", None, &["recv", "sent"], 3).unwrap();
        chart.push("00:01", &[1.0, 2.0]);
        chart.push("00:02", &[3.0, 4.0]);
        chart.show_error();
        let view = chart.render();
        assert!(view.stale);
        assert_eq!(view.datasets.len(), 2);
        assert_eq!(view.datasets[1].points, vec![(0.0, 2.0), (1.0, 4.0)]);
        assert_eq!(view.first_label.as_deref(), Some("00:01"));
        assert_eq!(view.last_label.as_deref(), Some("00:02"));
        assert!((view.y_bounds[1] - 4.8).abs() < 1e-9);

        chart.push("00:03", &[5.0, 6.0]);
        assert!(!chart.render().stale);
    }

    #[test]
    fn test_chart_rejects_zero_capacity() {
        assert!(LineChart::new("CPU", "%", Some(100.0), &["cpu"], 0).is_err());
    }

    #[test]
    fn test_percent_chart_keeps_fixed_bound() {
        let mut chart = LineChart::new("CPU", "%", Some(100.0), &["cpu"], 10).unwrap();
        chart.push("t", &[42.0]);
        assert_eq!(chart.render().y_bounds, [0.0, 100.0]);
        assert_eq!(chart.render().x_bounds, [0.0, 9.0]);
    }

    #[test]
    fn test_gauge_clamps_and_errors() {
        let mut gauge = GaugeWidget::new("Disk");
        assert_eq!(gauge.render(), "--");
        gauge.set(140.0);
        assert_eq!(gauge.ratio(), 1.0);
        gauge.show_error();
        assert_eq!(gauge.render(), "Error");
        assert_eq!(gauge.ratio(), 0.0);
    }

    #[test]
    fn test_table_replace_and_failure() {
        let mut table: TableWidget<u32> = TableWidget::new("processes");
        assert_eq!(table.placeholder().as_deref(), Some("Loading processes..."));
        table.replace(vec![1, 2, 3]);
        assert_eq!(table.rows(), &[1, 2, 3]);
        assert_eq!(table.placeholder(), None);
        table.replace(vec![9]);
        assert_eq!(table.rows(), &[9]);

        table.show_error();
        assert!(table.rows().is_empty());
        assert_eq!(table.placeholder().as_deref(), Some("Failed to load processes"));

        table.replace(Vec::new());
        assert!(!table.is_error());
        assert_eq!(table.placeholder().as_deref(), Some("No processes"));
    }
}
