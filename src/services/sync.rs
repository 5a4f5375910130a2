//! Sync orchestration.
//!
//! Runs the sync steps in strict order against the same scenario list. A step that
//! fails is logged and recorded, and the steps after it still run: partial
//! synchronization is a valid end state.

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::SyncResult;
use crate::models::{ScenarioResult, StepOutcome, StepReport, SyncStep, SyncSummary};

use super::azure_client::AzureClient;
use super::{test_plan, test_run};

/// Run every sync step in order and collect their outcomes.
pub async fn run_sync(
    client: &AzureClient,
    config: &Config,
    scenarios: &[ScenarioResult],
) -> SyncSummary {
    info!(
        "Syncing {} scenario(s) to plan {} / suite {} / run '{}'",
        scenarios.len(),
        config.plan_id,
        config.suite_id,
        config.run_name
    );

    let mut summary = SyncSummary::default();

    let result = test_plan::reset_suite(client, config).await;
    record(&mut summary, SyncStep::ResetSuite, result);

    let result = test_run::update_run_errors(client, config, scenarios).await;
    record(&mut summary, SyncStep::RunErrors, result);

    let result = test_run::upload_screenshots(client, config, scenarios).await;
    record(&mut summary, SyncStep::Screenshots, result);

    let result = test_plan::update_suite_outcomes(client, config, scenarios).await;
    record(&mut summary, SyncStep::SuiteOutcomes, result);

    summary
}

fn record(summary: &mut SyncSummary, step: SyncStep, result: SyncResult<StepReport>) {
    match &result {
        Ok(report) if report.failed > 0 => warn!(
            "Step {} finished with failures: queued={}, updated={}, skipped={}, failed={}",
            step, report.queued, report.updated, report.skipped, report.failed
        ),
        Ok(report) => info!(
            "Step {} finished: queued={}, updated={}, skipped={}",
            step, report.queued, report.updated, report.skipped
        ),
        Err(e) => error!("Step {} failed: {}", step, e),
    }

    summary.steps.push(StepOutcome { step, result });
}
