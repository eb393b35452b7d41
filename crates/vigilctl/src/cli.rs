//! Command-line definition for vigilctl

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vigil_common::actions::ReportFormat;

// Version is embedded at build time
pub const VERSION: &str = env!("VIGIL_VERSION");

#[derive(Parser, Debug)]
#[command(name = "vigilctl")]
#[command(about = "Vigil - live telemetry console", long_about = None)]
#[command(version = VERSION)]
pub struct Cli {
    /// Config file (default: ~/.config/vigil/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Telemetry API base URL, overrides the config file
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Live dashboard (default)
    Dashboard,

    /// Fetch one poll task's endpoint once and print the JSON
    Snapshot {
        /// Task name (metrics, system, network, ports, performance, ...)
        task: String,
    },

    /// Download collected metrics as CSV
    ExportCsv {
        /// Output file (default: metrics_<timestamp>.csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Run a network speed test on the server
    SpeedTest,

    /// Download the performance analysis as PDF
    PerformanceReport {
        /// Output file (default: performance_report_<timestamp>.pdf)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Stop a process on the monitored host
    StopProcess {
        pid: u32,
    },

    /// Manage generated reports
    #[command(subcommand)]
    Reports(ReportCommand),

    /// Alert settings and history
    #[command(subcommand)]
    Alerts(AlertCommand),

    /// Print the effective configuration
    Config,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ReportCommand {
    /// List generated reports
    List,

    /// Generate a report for a date range
    Generate {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: chrono::NaiveDate,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: chrono::NaiveDate,

        /// Report type
        #[arg(long = "type", default_value = "daily")]
        kind: String,
    },

    /// Download a report
    Download {
        id: String,

        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,

        /// Output file (default: report_<id>.<format>)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Delete a report
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum AlertCommand {
    /// Show current thresholds and channels
    Settings,

    /// Change thresholds or channels; unspecified values are kept
    Set {
        #[arg(long)]
        cpu: Option<f64>,
        #[arg(long)]
        memory: Option<f64>,
        #[arg(long)]
        disk: Option<f64>,
        #[arg(long)]
        email: Option<bool>,
        #[arg(long)]
        slack: Option<bool>,
    },

    /// Send a test alert
    Test,

    /// Show recent alerts
    History,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Excel,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ReportFormat::Csv,
            FormatArg::Excel => ReportFormat::Excel,
        }
    }
}

impl Cli {
    /// The command to run; no subcommand means the dashboard
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Dashboard)
    }
}
