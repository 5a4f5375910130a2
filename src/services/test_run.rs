//! Test run operations.
//!
//! Resolves the configured run, patches error messages onto its results and
//! uploads failure screenshots as result attachments.

use tracing::{error, info};

use crate::config::Config;
use crate::error::{SyncError, SyncResult};
use crate::models::{
    AttachmentRequest, ListResponse, ResultErrorUpdate, Run, RunResult, ScenarioResult,
    StepReport, SyncStep,
};

use super::azure_client::{AzureClient, acknowledged_count};

const RUNS_PATH: &str = "test/runs?api-version=6.0";

fn run_results_path(run_id: u64) -> String {
    format!("test/runs/{}/results?api-version=6.0", run_id)
}

fn run_results_update_path(run_id: u64) -> String {
    format!("test/runs/{}/results?api-version=5.0", run_id)
}

fn attachment_path(run_id: u64, result_id: u64) -> String {
    format!(
        "test/runs/{}/results/{}/attachments?api-version=5.1-preview.1",
        run_id, result_id
    )
}

/// Pick the last run in listing order whose name equals `run_name`.
pub fn select_run_id(runs: &[Run], run_name: &str) -> SyncResult<u64> {
    runs.iter()
        .rev()
        .find(|run| run.name == run_name)
        .map(|run| run.id)
        .ok_or_else(|| SyncError::NoMatchingRun(run_name.to_string()))
}

/// Resolve the ID of the most recently listed run with the configured name.
pub async fn resolve_run_id(client: &AzureClient, config: &Config) -> SyncResult<u64> {
    let runs: ListResponse<Run> = client.get(RUNS_PATH).await?;
    let run_id = select_run_id(&runs.value, &config.run_name)?;

    info!("Resolved run '{}' to ID {}", config.run_name, run_id);
    Ok(run_id)
}

/// Fetch all results of a run.
pub async fn fetch_run_results(client: &AzureClient, run_id: u64) -> SyncResult<Vec<RunResult>> {
    let list: ListResponse<RunResult> = client.get(&run_results_path(run_id)).await?;
    Ok(list.value)
}

/// Build error message updates for run results whose test case name matches a
/// scenario carrying an error message.
pub fn build_error_batch(
    results: &[RunResult],
    scenarios: &[ScenarioResult],
) -> Vec<ResultErrorUpdate> {
    let mut batch = Vec::new();

    for result in results {
        for scenario in scenarios {
            if result.test_case.name != scenario.name {
                continue;
            }
            if let Some(message) = scenario.error_message() {
                batch.push(ResultErrorUpdate {
                    id: result.id,
                    error_message: message.to_string(),
                });
            }
        }
    }

    batch
}

/// A screenshot destined for one run result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotUpload<'a> {
    pub result_id: u64,
    pub stream: &'a str,
}

/// Pair run results with the screenshots of same-named scenarios.
pub fn build_screenshot_uploads<'a>(
    results: &[RunResult],
    scenarios: &'a [ScenarioResult],
) -> Vec<ScreenshotUpload<'a>> {
    let mut uploads = Vec::new();

    for result in results {
        for scenario in scenarios {
            if result.test_case.name != scenario.name {
                continue;
            }
            if let Some(stream) = scenario.screenshot() {
                uploads.push(ScreenshotUpload {
                    result_id: result.id,
                    stream,
                });
            }
        }
    }

    uploads
}

/// Number of run results that received no entry at all.
fn unmatched_results(results: &[RunResult], matched: impl Fn(u64) -> bool) -> usize {
    results.iter().filter(|r| !matched(r.id)).count()
}

/// Patch error messages of failed scenarios onto the run's results in one call.
pub async fn update_run_errors(
    client: &AzureClient,
    config: &Config,
    scenarios: &[ScenarioResult],
) -> SyncResult<StepReport> {
    let run_id = resolve_run_id(client, config).await?;
    let results = fetch_run_results(client, run_id).await?;
    let batch = build_error_batch(&results, scenarios);

    let mut report = StepReport::new(SyncStep::RunErrors);
    report.queued = batch.len();
    report.skipped = unmatched_results(&results, |id| batch.iter().any(|b| b.id == id));

    let response = client
        .patch(&run_results_update_path(run_id), &batch)
        .await?;
    report.updated = acknowledged_count(&response, batch.len());

    info!(
        "Error messages in \"{}\" Test Point(s) in Run {} were updated",
        report.updated, run_id
    );

    Ok(report)
}

/// Upload each scenario screenshot to its run result, one request at a time.
///
/// A failed upload is logged and counted; later uploads still run.
pub async fn upload_screenshots(
    client: &AzureClient,
    config: &Config,
    scenarios: &[ScenarioResult],
) -> SyncResult<StepReport> {
    let run_id = resolve_run_id(client, config).await?;
    let results = fetch_run_results(client, run_id).await?;
    let uploads = build_screenshot_uploads(&results, scenarios);

    let mut report = StepReport::new(SyncStep::Screenshots);
    report.queued = uploads.len();
    report.skipped = unmatched_results(&results, |id| uploads.iter().any(|u| u.result_id == id));

    for upload in &uploads {
        let body = AttachmentRequest::screenshot(upload.stream);
        match client
            .post(&attachment_path(run_id, upload.result_id), &body)
            .await
        {
            Ok(_) => report.updated += 1,
            Err(e) => {
                error!(
                    "Failed to upload screenshot for result {} in Run {}: {}",
                    upload.result_id, run_id, e
                );
                report.failed += 1;
            }
        }
    }

    info!(
        "Uploaded {} of {} screenshot(s) to Run {}",
        report.updated, report.queued, run_id
    );

    Ok(report)
}
