//! Snapshot schemas for the telemetry API
//!
//! One type per endpoint payload. These are decoded once per tick and dropped
//! after the owning panel has applied them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Endpoint paths
// ============================================================================

pub const PATH_METRICS: &str = "/api/metrics";
pub const PATH_SYSTEM_STATS: &str = "/api/system/stats";
pub const PATH_NETWORK_STATS: &str = "/api/network/stats";
pub const PATH_NETWORK_PORTS: &str = "/api/network/ports";
pub const PATH_NETWORK_SPEEDTEST: &str = "/api/network/speedtest";
pub const PATH_PERFORMANCE_SCORE: &str = "/api/performance/score";
pub const PATH_PERFORMANCE_BOTTLENECKS: &str = "/api/performance/bottlenecks";
pub const PATH_PERFORMANCE_RECOMMENDATIONS: &str = "/api/performance/recommendations";
pub const PATH_PERFORMANCE_REPORT: &str = "/api/performance/report";
pub const PATH_PROCESSES: &str = "/api/processes";
pub const PATH_LOGS: &str = "/api/logs";
pub const PATH_ALERT_HISTORY: &str = "/api/alerts/history";
pub const PATH_ALERT_SETTINGS: &str = "/api/alerts/settings";
pub const PATH_ALERT_TEST: &str = "/api/alerts/test";
pub const PATH_EXPORT_CSV: &str = "/api/export-csv";
pub const PATH_REPORTS_LIST: &str = "/api/reports/list";
pub const PATH_REPORTS_GENERATE: &str = "/api/reports/generate";

/// A scalar the server may send either as text or as a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Number(n) => write!(f, "{}", n),
            DisplayValue::Text(s) => f.write_str(s),
        }
    }
}

impl Default for DisplayValue {
    fn default() -> Self {
        DisplayValue::Text(String::new())
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// `GET /api/metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub cpu: f64,
    pub memory: MemoryUsage,
    pub disk_io: DiskIo,
    /// "YYYY-MM-DD HH:MM:SS"
    pub datetime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub usage_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskIo {
    pub read_iops: f64,
    pub write_iops: f64,
}

impl MetricsSnapshot {
    /// Time-of-day half of `datetime`, used as the chart x label
    pub fn time_label(&self) -> &str {
        self.datetime
            .split_once(' ')
            .map(|(_, time)| time)
            .unwrap_or(&self.datetime)
    }
}

/// `GET /api/system/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    #[serde(default)]
    pub os_info: String,
    #[serde(default)]
    pub cpu_cores: u32,
    /// Bytes
    #[serde(default)]
    pub total_memory: u64,
    #[serde(default)]
    pub running_processes: u64,
    #[serde(default)]
    pub uptime: DisplayValue,
}

// ============================================================================
// Network
// ============================================================================

/// `GET /api/network/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub bytes_recv_per_sec: f64,
    pub bytes_sent_per_sec: f64,
}

/// `GET /api/network/ports`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortsResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<PortStatus>,
}

impl PortsResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortStatus {
    pub port: u16,
    pub status: String,
}

impl PortStatus {
    pub fn is_open(&self) -> bool {
        self.status == "open"
    }
}

/// `GET /api/network/speedtest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTestResult {
    /// Mbps
    pub download: f64,
    /// Mbps
    pub upload: f64,
    /// Milliseconds
    pub ping: f64,
}

// ============================================================================
// Performance
// ============================================================================

/// `GET /api/performance/score`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScore {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub network: f64,
}

/// Element of `GET /api/performance/bottlenecks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    #[serde(default)]
    pub description: String,
}

/// Element of `GET /api/performance/recommendations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: String,
}

// ============================================================================
// Processes, logs, alerts, reports
// ============================================================================

/// Element of `GET /api/processes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_percent: f64,
}

/// `GET /api/logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogPage {
    #[serde(default)]
    pub logs: Vec<LogRecord>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: String,
    pub message: String,
    #[serde(default)]
    pub source: String,
}

/// Element of `GET /api/alerts/history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub level: String,
    pub message: String,
    pub timestamp: String,
}

/// `GET|POST /api/alerts/settings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    pub cpu_threshold: f64,
    pub memory_threshold: f64,
    pub disk_threshold: f64,
    #[serde(default)]
    pub email_enabled: bool,
    #[serde(default)]
    pub slack_enabled: bool,
}

/// `GET /api/reports/list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportList {
    #[serde(default)]
    pub reports: Vec<ReportSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
}

/// Body of `POST /api/reports/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Reply of the action endpoints. Some use `success`, some use `status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        self.success == Some(true) || self.status.as_deref() == Some("success")
    }
}
