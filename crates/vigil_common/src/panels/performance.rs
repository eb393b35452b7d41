//! Performance screen: score, breakdown, bottlenecks, recommendations

use super::clock_label;
use crate::api::{
    Bottleneck, PerformanceScore, Recommendation, PATH_PERFORMANCE_BOTTLENECKS,
    PATH_PERFORMANCE_RECOMMENDATIONS, PATH_PERFORMANCE_SCORE,
};
use crate::client::ApiRequest;
use crate::error::{BufferError, FetchError};
use crate::poll_task::PanelBinding;
use crate::widgets::{GaugeWidget, LineChart, TableWidget, TextField};

#[derive(Debug, Clone)]
pub struct PerformancePanel {
    score: TextField,
    breakdown: [GaugeWidget; 4],
    trend: LineChart,
}

impl PerformancePanel {
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        Ok(Self {
            score: TextField::new("performanceScore", "Score"),
            breakdown: [
                GaugeWidget::new("CPU"),
                GaugeWidget::new("Memory"),
                GaugeWidget::new("Disk"),
                GaugeWidget::new("Network"),
            ],
            trend: LineChart::new("Score trend", "", Some(100.0), &["score"], capacity)?,
        })
    }

    pub fn score(&self) -> &TextField {
        &self.score
    }

    pub fn breakdown(&self) -> &[GaugeWidget; 4] {
        &self.breakdown
    }

    pub fn trend(&self) -> &LineChart {
        &self.trend
    }
}

impl PanelBinding for PerformancePanel {
    type Snapshot = PerformanceScore;

    fn request(&self) -> ApiRequest {
        ApiRequest::get(PATH_PERFORMANCE_SCORE)
    }

    fn apply(
        &mut self,
        snapshot: PerformanceScore,
        _request: &ApiRequest,
    ) -> Result<(), FetchError> {
        self.score.set(format!("{}", snapshot.score.round()));
        let b = &snapshot.breakdown;
        for (gauge, value) in self.breakdown.iter_mut().zip([b.cpu, b.memory, b.disk, b.network]) {
            gauge.set(value);
        }
        self.trend.push(&clock_label(), &[snapshot.score]);
        Ok(())
    }

    fn show_error(&mut self, _error: &FetchError) {
        self.score.show_error();
        self.breakdown.iter_mut().for_each(GaugeWidget::show_error);
        self.trend.show_error();
    }
}

/// Generates a table-only panel over a JSON array endpoint
macro_rules! table_panel {
    ($(#[$doc:meta])* $name:ident, $row:ty, $path:expr, $subject:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            table: TableWidget<$row>,
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    table: TableWidget::new($subject),
                }
            }

            pub fn table(&self) -> &TableWidget<$row> {
                &self.table
            }
        }

        impl PanelBinding for $name {
            type Snapshot = Vec<$row>;

            fn request(&self) -> ApiRequest {
                ApiRequest::get($path)
            }

            fn apply(&mut self, rows: Vec<$row>, _request: &ApiRequest) -> Result<(), FetchError> {
                self.table.replace(rows);
                Ok(())
            }

            fn show_error(&mut self, _error: &FetchError) {
                self.table.show_error();
            }
        }
    };
}

pub(crate) use table_panel;

table_panel!(
    /// Detected bottlenecks (30s)
    BottlenecksPanel,
    Bottleneck,
    PATH_PERFORMANCE_BOTTLENECKS,
    "bottlenecks"
);

table_panel!(
    /// Optimization recommendations (60s)
    RecommendationsPanel,
    Recommendation,
    PATH_PERFORMANCE_RECOMMENDATIONS,
    "recommendations"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ScoreBreakdown;

    #[test]
    fn test_score_rounded_and_breakdown() {
        let mut panel = PerformancePanel::new(20).unwrap();
        panel
            .apply(
                PerformanceScore {
                    score: 86.6,
                    breakdown: ScoreBreakdown {
                        cpu: 90.0,
                        memory: 80.0,
                        disk: 70.0,
                        network: 100.0,
                    },
                },
                &panel.request(),
            )
            .unwrap();
        assert_eq!(panel.score().render(), "87");
        let ratios: Vec<f64> = panel.breakdown().iter().map(|g| g.ratio()).collect();
        assert_eq!(ratios, vec![0.9, 0.8, 0.7, 1.0]);
        assert_eq!(panel.trend().series()[0].len(), 1);

        panel.show_error(&FetchError::Transport("down".into()));
        assert!(panel.score().is_error());
        assert!(panel.breakdown().iter().all(|g| g.is_error()));
    }

    #[test]
    fn test_empty_bottlenecks_is_not_error() {
        let mut panel = BottlenecksPanel::new();
        panel.apply(Vec::new(), &panel.request()).unwrap();
        assert!(!panel.table().is_error());
        assert_eq!(panel.table().placeholder().as_deref(), Some("No bottlenecks"));
    }
}
