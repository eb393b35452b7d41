//! Command-line parsing tests.
//!
//! Tests verify:
//! - No subcommand means the dashboard
//! - Global flags work before and after the subcommand
//! - Report and alert subcommands parse their arguments

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use vigilctl::cli::{AlertCommand, Cli, Commands, FormatArg, ReportCommand};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("vigilctl").chain(args.iter().copied())).unwrap()
}

#[test]
fn no_subcommand_is_dashboard() {
    let cli = parse(&[]);
    assert_eq!(cli.command(), &Commands::Dashboard);
    assert!(cli.url.is_none());
}

#[test]
fn global_flags_anywhere() {
    let cli = parse(&["--url", "http://10.0.0.5:5001", "snapshot", "metrics"]);
    assert_eq!(cli.url.as_deref(), Some("http://10.0.0.5:5001"));
    assert_eq!(
        cli.command(),
        &Commands::Snapshot {
            task: "metrics".into()
        }
    );

    let cli = parse(&["speed-test", "--config", "/tmp/vigil.toml"]);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/vigil.toml")));
}

#[test]
fn report_generate_parses_dates() {
    let cli = parse(&[
        "reports", "generate", "--start", "2024-02-01", "--end", "2024-02-28", "--type", "weekly",
    ]);
    assert_eq!(
        cli.command(),
        &Commands::Reports(ReportCommand::Generate {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            kind: "weekly".into(),
        })
    );

    let bad = Cli::try_parse_from([
        "vigilctl",
        "reports",
        "generate",
        "--start",
        "02/01/2024",
        "--end",
        "2024-02-28",
    ]);
    assert!(bad.is_err());
}

#[test]
fn report_download_defaults_to_csv() {
    let cli = parse(&["reports", "download", "report_20240228"]);
    assert_eq!(
        cli.command(),
        &Commands::Reports(ReportCommand::Download {
            id: "report_20240228".into(),
            format: FormatArg::Csv,
            output: None,
        })
    );
}

#[test]
fn alert_set_partial_flags() {
    let cli = parse(&["alerts", "set", "--cpu", "75", "--slack", "false"]);
    assert_eq!(
        cli.command(),
        &Commands::Alerts(AlertCommand::Set {
            cpu: Some(75.0),
            memory: None,
            disk: None,
            email: None,
            slack: Some(false),
        })
    );
}

#[test]
fn stop_process_requires_numeric_pid() {
    assert_eq!(parse(&["stop-process", "42"]).command(), &Commands::StopProcess { pid: 42 });
    assert!(Cli::try_parse_from(["vigilctl", "stop-process", "nginx"]).is_err());
}
