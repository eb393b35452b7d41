//! Panels - per-screen bindings between poll tasks and widget adapters
//!
//! Each panel implements `PanelBinding` for exactly one endpoint and owns
//! the widgets that endpoint feeds. Nothing outside the owning poll task
//! writes into a panel.

pub mod alerts;
pub mod dashboard;
pub mod logs;
pub mod network;
pub mod performance;
pub mod processes;

use crate::api::{
    PATH_ALERT_HISTORY, PATH_METRICS, PATH_NETWORK_PORTS, PATH_NETWORK_STATS,
    PATH_PERFORMANCE_BOTTLENECKS, PATH_PERFORMANCE_RECOMMENDATIONS, PATH_PERFORMANCE_SCORE,
    PATH_PROCESSES, PATH_SYSTEM_STATS,
};
use crate::client::ApiRequest;
use crate::filter::LogFilterController;

pub use alerts::AlertHistoryPanel;
pub use dashboard::{MetricsPanel, SystemStatsPanel};
pub use logs::LogPanel;
pub use network::{NetworkPanel, PortsPanel};
pub use performance::{BottlenecksPanel, PerformancePanel, RecommendationsPanel};
pub use processes::ProcessPanel;

pub const TASK_METRICS: &str = "metrics";
pub const TASK_SYSTEM: &str = "system";
pub const TASK_NETWORK: &str = "network";
pub const TASK_PORTS: &str = "ports";
pub const TASK_PERFORMANCE: &str = "performance";
pub const TASK_BOTTLENECKS: &str = "bottlenecks";
pub const TASK_RECOMMENDATIONS: &str = "recommendations";
pub const TASK_PROCESSES: &str = "processes";
pub const TASK_ALERTS: &str = "alerts";
pub const TASK_LOGS: &str = "logs";

/// Every poll task name, in registration order
pub const ALL_TASKS: [&str; 10] = [
    TASK_METRICS,
    TASK_SYSTEM,
    TASK_NETWORK,
    TASK_PORTS,
    TASK_PERFORMANCE,
    TASK_BOTTLENECKS,
    TASK_RECOMMENDATIONS,
    TASK_PROCESSES,
    TASK_ALERTS,
    TASK_LOGS,
];

/// Endpoint request a task issues on a cold start, for one-shot fetches
pub fn task_request(task: &str, page_size: u32) -> Option<ApiRequest> {
    let path = match task {
        TASK_METRICS => PATH_METRICS,
        TASK_SYSTEM => PATH_SYSTEM_STATS,
        TASK_NETWORK => PATH_NETWORK_STATS,
        TASK_PORTS => PATH_NETWORK_PORTS,
        TASK_PERFORMANCE => PATH_PERFORMANCE_SCORE,
        TASK_BOTTLENECKS => PATH_PERFORMANCE_BOTTLENECKS,
        TASK_RECOMMENDATIONS => PATH_PERFORMANCE_RECOMMENDATIONS,
        TASK_PROCESSES => PATH_PROCESSES,
        TASK_ALERTS => PATH_ALERT_HISTORY,
        TASK_LOGS => return Some(LogFilterController::new(page_size).request()),
        _ => return None,
    };
    Some(ApiRequest::get(path))
}

/// Local wall-clock label for charts whose payload carries no timestamp
pub(crate) fn clock_label() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_request() {
        assert_eq!(task_request(TASK_PORTS, 50).unwrap().path(), "/api/network/ports");
        let logs = task_request(TASK_LOGS, 25).unwrap();
        assert_eq!(logs.path(), "/api/logs");
        assert_eq!(logs.param("page"), Some("1"));
        assert_eq!(logs.param("per_page"), Some("25"));
        assert!(task_request("cpu", 50).is_none());
        assert!(ALL_TASKS.iter().all(|t| task_request(t, 50).is_some()));
    }
}
