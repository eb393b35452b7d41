//! Vigil configuration
//!
//! Config file: `$XDG_CONFIG_HOME/vigil/config.toml` (usually
//! `~/.config/vigil/config.toml`). Every field has a default, so an empty or
//! partial file is valid.

use crate::error::ConfigError;
use crate::panels;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_metrics_secs() -> u64 {
    1
}

fn default_two_secs() -> u64 {
    2
}

fn default_five_secs() -> u64 {
    5
}

fn default_thirty_secs() -> u64 {
    30
}

fn default_recommendations_secs() -> u64 {
    60
}

fn default_metrics_points() -> usize {
    60
}

fn default_system_points() -> usize {
    10
}

fn default_network_points() -> usize {
    30
}

fn default_performance_points() -> usize {
    20
}

fn default_page_size() -> u32 {
    crate::filter::DEFAULT_PAGE_SIZE
}

/// Telemetry API connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request deadline; a request still pending after this is an error
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Poll cadence per task, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalConfig {
    #[serde(default = "default_metrics_secs")]
    pub metrics_secs: u64,
    #[serde(default = "default_two_secs")]
    pub system_secs: u64,
    #[serde(default = "default_two_secs")]
    pub network_secs: u64,
    #[serde(default = "default_thirty_secs")]
    pub ports_secs: u64,
    #[serde(default = "default_five_secs")]
    pub performance_secs: u64,
    #[serde(default = "default_thirty_secs")]
    pub bottlenecks_secs: u64,
    #[serde(default = "default_recommendations_secs")]
    pub recommendations_secs: u64,
    #[serde(default = "default_five_secs")]
    pub processes_secs: u64,
    #[serde(default = "default_thirty_secs")]
    pub alerts_secs: u64,
    /// Re-poll of the current log page between filter changes
    #[serde(default = "default_thirty_secs")]
    pub logs_secs: u64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            metrics_secs: default_metrics_secs(),
            system_secs: default_two_secs(),
            network_secs: default_two_secs(),
            ports_secs: default_thirty_secs(),
            performance_secs: default_five_secs(),
            bottlenecks_secs: default_thirty_secs(),
            recommendations_secs: default_recommendations_secs(),
            processes_secs: default_five_secs(),
            alerts_secs: default_thirty_secs(),
            logs_secs: default_thirty_secs(),
        }
    }
}

impl IntervalConfig {
    /// Seconds for a task name, `None` for an unknown task
    pub fn secs(&self, task: &str) -> Option<u64> {
        let secs = match task {
            panels::TASK_METRICS => self.metrics_secs,
            panels::TASK_SYSTEM => self.system_secs,
            panels::TASK_NETWORK => self.network_secs,
            panels::TASK_PORTS => self.ports_secs,
            panels::TASK_PERFORMANCE => self.performance_secs,
            panels::TASK_BOTTLENECKS => self.bottlenecks_secs,
            panels::TASK_RECOMMENDATIONS => self.recommendations_secs,
            panels::TASK_PROCESSES => self.processes_secs,
            panels::TASK_ALERTS => self.alerts_secs,
            panels::TASK_LOGS => self.logs_secs,
            _ => return None,
        };
        Some(secs)
    }
}

/// Points kept per chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferConfig {
    #[serde(default = "default_metrics_points")]
    pub metrics_points: usize,
    #[serde(default = "default_system_points")]
    pub system_points: usize,
    #[serde(default = "default_network_points")]
    pub network_points: usize,
    #[serde(default = "default_performance_points")]
    pub performance_points: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            metrics_points: default_metrics_points(),
            system_points: default_system_points(),
            network_points: default_network_points(),
            performance_points: default_performance_points(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogViewConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for LogViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Main Vigil configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub intervals: IntervalConfig,

    #[serde(default)]
    pub buffers: BufferConfig,

    #[serde(default)]
    pub logs: LogViewConfig,
}

impl Config {
    /// `$XDG_CONFIG_HOME/vigil/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vigil").join("config.toml"))
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. `explicit` (must exist)
    /// 2. The default path, if present
    /// 3. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    warn!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Serialize the effective configuration
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject values that would stall or break the console
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.request_timeout_secs must be greater than zero".into(),
            ));
        }
        for task in panels::ALL_TASKS {
            if self.intervals.secs(task) == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "intervals.{}_secs must be greater than zero",
                    task
                )));
            }
        }
        let buffers = [
            ("metrics_points", self.buffers.metrics_points),
            ("system_points", self.buffers.system_points),
            ("network_points", self.buffers.network_points),
            ("performance_points", self.buffers.performance_points),
        ];
        if let Some((name, _)) = buffers.iter().find(|(_, points)| *points == 0) {
            return Err(ConfigError::Invalid(format!(
                "buffers.{} must be greater than zero",
                name
            )));
        }
        if self.logs.page_size == 0 {
            return Err(ConfigError::Invalid("logs.page_size must be greater than zero".into()));
        }
        Ok(())
    }

    /// Replace the API base URL (command-line override)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Poll interval for a task; unknown tasks fall back to 30s
    pub fn interval(&self, task: &str) -> Duration {
        Duration::from_secs(self.intervals.secs(task).unwrap_or_else(default_thirty_secs))
    }
}
