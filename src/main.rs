//! Test Report Sync - Main entry point.
//!
//! Loads the Cucumber report, then syncs it into the configured test plan and run.
//!
//! Usage:
//!   report-sync --pat <token> [--config azure-config.json] [--report reports/cucumberJS]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use secrecy::SecretString;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use report_sync_lib::config::{Config, defaults, vars};
use report_sync_lib::services::{AzureClient, ReportSource, load_scenarios, run_sync};

/// Exit code for configuration or report errors (nothing was synced).
const EXIT_FATAL: u8 = 1;
/// Exit code when at least one sync step failed.
const EXIT_PARTIAL: u8 = 2;

#[derive(Parser)]
#[command(name = "report-sync")]
#[command(version)]
#[command(about = "Sync Cucumber report results into Azure DevOps test plans and runs", long_about = None)]
struct Cli {
    /// Personal access token for the test-management service
    #[arg(long, env = vars::ACCESS_TOKEN, hide_env_values = true)]
    pat: String,

    /// JSON config file ({organizationUrl, planId, suiteId, runName}); environment if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cucumber JSON report file, or a directory whose first file is the report
    #[arg(short, long, env = vars::REPORT_PATH, default_value = defaults::REPORT_DIR)]
    report: PathBuf,
}

/// Log filter from `RUST_LOG`-style directives, defaulting to INFO when none are given.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(directives.as_deref()))
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    };
    let config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Provide --config <file> or set the environment variables:");
            error!("  - {}", vars::ORGANIZATION_URL);
            error!("  - {} and {}", vars::PLAN_ID, vars::SUITE_ID);
            error!("  - {}", vars::RUN_NAME);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    // Parse the report before touching the remote service
    let scenarios = match load_scenarios(&ReportSource::Path(cli.report.clone())) {
        Ok(scenarios) => scenarios,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    let access_token = SecretString::from(cli.pat);
    let client = match AzureClient::new(&config, &access_token) {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    let summary = run_sync(&client, &config, &scenarios).await;

    if summary.is_success() {
        info!("Sync complete");
        ExitCode::SUCCESS
    } else {
        error!("Sync finished with failed steps");
        ExitCode::from(EXIT_PARTIAL)
    }
}
