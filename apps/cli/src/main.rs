//! Suppressor command line: deletes policy suppressions through the platform API.

#![forbid(unsafe_code)]

mod cli_config;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use suppressor_application::{DeletionStatus, PurgeReport, PurgeRequest, PurgeService};
use suppressor_core::{AppError, AppResult};
use suppressor_infrastructure::HttpSuppressionGateway;
use tracing::{debug, error, info};

use crate::cli_config::{Cli, CliConfig};
use crate::logging::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _logging = init_logging(cli.debug, cli.log_file.as_path())?;

    info!(limit = %cli.limit, log_file = %cli.log_file.display(), "suppressor started");
    debug!("debug logging enabled");

    match run(&cli).await {
        Ok(report) => {
            for line in render_report(&report) {
                println!("{line}");
            }
            info!(
                count_before = report.count_before,
                count_after = report.count_after,
                deleted = report.deleted_count(),
                failed = report.failed_count(),
                "suppressor finished"
            );
            Ok(())
        }
        Err(error) => {
            error!(error = %error, "suppressor aborted");
            Err(error)
        }
    }
}

async fn run(cli: &Cli) -> AppResult<PurgeReport> {
    let config = CliConfig::load()?;
    let request = PurgeRequest::new(config.credentials, cli.limit.as_str())?;

    let http_client = build_http_client(config.http_timeout)?;
    info!(api_url = %config.api_url, "using platform api");
    let gateway = HttpSuppressionGateway::new(http_client, config.api_url);
    let service = PurgeService::new(Arc::new(gateway));

    let plan = service.prepare(&request).await?;
    println!("{}", before_line(plan.count_before()));

    service.execute(plan).await
}

fn build_http_client(timeout: Option<Duration>) -> AppResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))
}

fn before_line(count_before: usize) -> String {
    format!("Number of suppressions before deletion: {count_before}")
}

fn render_report(report: &PurgeReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Number of suppressions after deletion: {}",
            report.count_after
        ),
        format!(
            "Deleted {} of {} selected suppressions (limit: {}, failed: {})",
            report.deleted_count(),
            report.outcomes.len(),
            report.limit,
            report.failed_count()
        ),
    ];

    for failure in report.failures() {
        if let DeletionStatus::Failed { reason } = &failure.status {
            lines.push(format!(
                "  failed: policy {} suppression {}: {reason}",
                failure.policy_id, failure.suppression_id
            ));
        }
    }

    lines
}
