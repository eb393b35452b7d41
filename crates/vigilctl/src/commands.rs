//! One-shot commands - each issues its request(s), prints, and exits

use crate::cli::{AlertCommand, ReportCommand};
use anyhow::{bail, Context, Result};
use chrono::Local;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use vigil_common::actions::{ConsoleActions, ReportFormat};
use vigil_common::api::AlertSettings;
use vigil_common::panels::{task_request, ALL_TASKS};
use vigil_common::{Config, HttpTelemetryClient, TelemetrySource};

fn client(config: &Config) -> Result<HttpTelemetryClient> {
    HttpTelemetryClient::new(&config.api.base_url, config.request_timeout())
        .with_context(|| format!("creating client for {}", config.api.base_url))
}

fn actions(config: &Config) -> Result<ConsoleActions> {
    Ok(ConsoleActions::new(client(config)?))
}

fn ok(message: impl std::fmt::Display) {
    println!("{} {}", "[OK]".green(), message);
}

fn header(title: &str) {
    println!();
    println!("  {}", title.bold());
    println!("{}", "-".repeat(60));
}

/// `report_<id>.<ext>` in the current directory; anything outside
/// `[A-Za-z0-9_.-]` in the id becomes `_`, so the name never leaves it
pub fn report_file_name(id: &str, ext: &str) -> PathBuf {
    let id: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    // Collapse dot runs so "../" cannot survive as a parent reference
    let id = id
        .split('.')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".");
    PathBuf::from(format!("report_{}.{}", id, ext))
}

/// `<prefix>_<YYYYmmdd_HHMMSS>.<ext>` in the current directory
pub fn default_output(prefix: &str, ext: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}_{}.{}",
        prefix,
        Local::now().format("%Y%m%d_%H%M%S"),
        ext
    ))
}

fn save(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    ok(format!("Saved {} bytes to {}", bytes.len(), path.display()));
    Ok(())
}

/// Fetch one task's endpoint and print the raw JSON
pub async fn snapshot(config: &Config, task: &str) -> Result<()> {
    let Some(request) = task_request(task, config.logs.page_size) else {
        bail!(
            "unknown task '{}' (expected one of: {})",
            task,
            ALL_TASKS.join(", ")
        );
    };
    let value = client(config)?
        .fetch(&request)
        .await
        .with_context(|| format!("fetching {}", request.path()))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub async fn export_csv(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let body = actions(config)?.export_csv().await.context("exporting metrics")?;
    let path = output.unwrap_or_else(|| default_output("metrics", "csv"));
    save(&path, &body)
}

pub async fn speed_test(config: &Config) -> Result<()> {
    println!("{}", "Running speed test, this can take a while...".dimmed());
    let result = actions(config)?.speed_test().await.context("speed test")?;
    header("Speed Test");
    println!("  Download  {:>10.2} Mbps", result.download);
    println!("  Upload    {:>10.2} Mbps", result.upload);
    println!("  Ping      {:>10.1} ms", result.ping);
    Ok(())
}

pub async fn performance_report(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let body = actions(config)?
        .performance_report()
        .await
        .context("downloading performance report")?;
    let path = output.unwrap_or_else(|| default_output("performance_report", "pdf"));
    save(&path, &body)
}

pub async fn stop_process(config: &Config, pid: u32) -> Result<()> {
    actions(config)?
        .stop_process(pid)
        .await
        .with_context(|| format!("stopping process {}", pid))?;
    ok(format!("Stop requested for process {}", pid));
    Ok(())
}

pub async fn reports(config: &Config, command: &ReportCommand) -> Result<()> {
    let actions = actions(config)?;
    match command {
        ReportCommand::List => {
            let reports = actions.list_reports().await.context("listing reports")?;
            header("Reports");
            if reports.is_empty() {
                println!("  {}", "No reports".dimmed());
            }
            for report in reports {
                println!("  {:<28} {:<12} {}", report.id.cyan(), report.date, report.title);
            }
        }
        ReportCommand::Generate { start, end, kind } => {
            let message = actions
                .generate_report(*start, *end, kind)
                .await
                .context("generating report")?;
            ok(message.unwrap_or_else(|| format!("{} report generated", kind)));
        }
        ReportCommand::Download { id, format, output } => {
            let format = ReportFormat::from(*format);
            let body = actions
                .download_report(id, format)
                .await
                .with_context(|| format!("downloading report {}", id))?;
            let ext = match format {
                ReportFormat::Csv => "csv",
                ReportFormat::Excel => "xlsx",
            };
            let path = output.clone().unwrap_or_else(|| report_file_name(id, ext));
            save(&path, &body)?;
        }
        ReportCommand::Delete { id } => {
            actions
                .delete_report(id)
                .await
                .with_context(|| format!("deleting report {}", id))?;
            ok(format!("Deleted report {}", id));
        }
    }
    Ok(())
}

/// Overlay the flags that were given onto the current settings
pub fn merge_alert_settings(
    mut current: AlertSettings,
    cpu: Option<f64>,
    memory: Option<f64>,
    disk: Option<f64>,
    email: Option<bool>,
    slack: Option<bool>,
) -> Result<AlertSettings> {
    for (name, value) in [("cpu", cpu), ("memory", memory), ("disk", disk)] {
        if let Some(v) = value {
            if !(0.0..=100.0).contains(&v) {
                bail!("{} threshold must be between 0 and 100, got {}", name, v);
            }
        }
    }
    current.cpu_threshold = cpu.unwrap_or(current.cpu_threshold);
    current.memory_threshold = memory.unwrap_or(current.memory_threshold);
    current.disk_threshold = disk.unwrap_or(current.disk_threshold);
    current.email_enabled = email.unwrap_or(current.email_enabled);
    current.slack_enabled = slack.unwrap_or(current.slack_enabled);
    Ok(current)
}

fn print_alert_settings(settings: &AlertSettings) {
    let on_off = |enabled: bool| if enabled { "on" } else { "off" };
    header("Alert Settings");
    println!("  CPU threshold     {:>6.1}%", settings.cpu_threshold);
    println!("  Memory threshold  {:>6.1}%", settings.memory_threshold);
    println!("  Disk threshold    {:>6.1}%", settings.disk_threshold);
    println!("  Email             {}", on_off(settings.email_enabled));
    println!("  Slack             {}", on_off(settings.slack_enabled));
}

pub async fn alerts(config: &Config, command: &AlertCommand) -> Result<()> {
    let actions = actions(config)?;
    match command {
        AlertCommand::Settings => {
            let settings = actions.alert_settings().await.context("loading alert settings")?;
            print_alert_settings(&settings);
        }
        AlertCommand::Set {
            cpu,
            memory,
            disk,
            email,
            slack,
        } => {
            let current = actions.alert_settings().await.context("loading alert settings")?;
            let updated = merge_alert_settings(current, *cpu, *memory, *disk, *email, *slack)?;
            actions
                .save_alert_settings(&updated)
                .await
                .context("saving alert settings")?;
            ok("Alert settings saved");
            print_alert_settings(&updated);
        }
        AlertCommand::Test => {
            actions.send_test_alert().await.context("sending test alert")?;
            ok("Test alert sent");
        }
        AlertCommand::History => {
            let history = actions.alert_history().await.context("loading alert history")?;
            header("Alert History");
            if history.is_empty() {
                println!("  {}", "No alerts".dimmed());
            }
            for alert in history {
                let level = match alert.level.to_ascii_lowercase().as_str() {
                    "critical" | "error" => alert.level.bright_red().to_string(),
                    "warning" => alert.level.yellow().to_string(),
                    _ => alert.level.cyan().to_string(),
                };
                println!("  {}  {:<10} {}", alert.timestamp.dimmed(), level, alert.message);
            }
        }
    }
    Ok(())
}

/// Print the effective configuration as TOML
pub fn show_config(config: &Config) -> Result<()> {
    if let Some(path) = Config::default_path() {
        println!("{}", format!("# default location: {}", path.display()).dimmed());
    }
    print!("{}", config.to_toml().context("serializing config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AlertSettings {
        AlertSettings {
            cpu_threshold: 80.0,
            memory_threshold: 85.0,
            disk_threshold: 90.0,
            email_enabled: false,
            slack_enabled: true,
        }
    }

    #[test]
    fn test_merge_keeps_unspecified_values() {
        let merged =
            merge_alert_settings(settings(), Some(70.0), None, None, Some(true), None).unwrap();
        assert_eq!(merged.cpu_threshold, 70.0);
        assert_eq!(merged.memory_threshold, 85.0);
        assert!(merged.email_enabled);
        assert!(merged.slack_enabled);
    }

    #[test]
    fn test_merge_rejects_out_of_range_threshold() {
        let err =
            merge_alert_settings(settings(), None, None, Some(120.0), None, None).unwrap_err();
        assert!(err.to_string().contains("disk"));
    }

    #[test]
    fn test_default_output_name() {
        let path = default_output("metrics", "csv");
        let name = path.to_string_lossy();
        assert!(name.starts_with("metrics_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "metrics_20240228_091500.csv".len());
    }

    #[test]
    fn test_report_file_name_stays_in_current_dir() {
        assert_eq!(
            report_file_name("report_20240228", "csv"),
            PathBuf::from("report_report_20240228.csv")
        );
        let name = report_file_name("../../etc/passwd", "xlsx");
        assert_eq!(name, PathBuf::from("report__._etc_passwd.xlsx"));
        assert_eq!(name.components().count(), 1);
        assert_eq!(
            report_file_name("q1 final?#", "csv"),
            PathBuf::from("report_q1_final__.csv")
        );
    }
}
