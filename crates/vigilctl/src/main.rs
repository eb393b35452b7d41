//! Vigil Control - CLI and live dashboard for the telemetry API

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::{debug, error};
use vigil_common::Config;

use vigilctl::cli::{Cli, Commands};
use vigilctl::logging::{self, LogMode};
use vigilctl::{commands, errors, tui};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mode = match cli.command() {
        Commands::Dashboard => LogMode::Dashboard,
        _ => LogMode::Command,
    };
    if let Some(path) = logging::init(mode) {
        debug!(path = %path.display(), "Logging to file");
    }

    if let Err(e) = run(&cli).await {
        error!(error = %format!("{:#}", e), "Command failed");
        eprintln!("{} {:#}", "[ERROR]".bright_red(), e);
        std::process::exit(errors::exit_code(&e));
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.url {
        config = config.with_base_url(url.clone());
        config.validate()?;
    }

    match cli.command() {
        Commands::Dashboard => tui::run(&config).await,
        Commands::Snapshot { task } => commands::snapshot(&config, task).await,
        Commands::ExportCsv { output } => commands::export_csv(&config, output.clone()).await,
        Commands::SpeedTest => commands::speed_test(&config).await,
        Commands::PerformanceReport { output } => {
            commands::performance_report(&config, output.clone()).await
        }
        Commands::StopProcess { pid } => commands::stop_process(&config, *pid).await,
        Commands::Reports(command) => commands::reports(&config, command).await,
        Commands::Alerts(command) => commands::alerts(&config, command).await,
        Commands::Config => commands::show_config(&config),
    }
}
