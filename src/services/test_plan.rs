//! Test plan suite operations.
//!
//! Resets every test point in the configured suite to active, and publishes
//! scenario outcomes onto the matching points.

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::SyncResult;
use crate::models::{
    ListResponse, PointActivation, PointOutcome, PointOutcomeUpdate, ScenarioResult, StepReport,
    SyncStep, TestPoint,
};

use super::azure_client::{AzureClient, acknowledged_count};

/// Relative path of the suite's test point collection.
pub fn test_points_path(config: &Config) -> String {
    format!(
        "testplan/Plans/{}/Suites/{}/TestPoint",
        config.plan_id, config.suite_id
    )
}

/// Relative path of the batched test point update.
pub fn test_points_update_path(config: &Config) -> String {
    format!(
        "{}?includePointDetails=true&returnIdentityRef=true&api-version=6.0",
        test_points_path(config)
    )
}

/// Fetch all test points in the configured suite.
pub async fn fetch_test_points(client: &AzureClient, config: &Config) -> SyncResult<Vec<TestPoint>> {
    let list: ListResponse<TestPoint> = client.get(&test_points_path(config)).await?;

    if list.value.is_empty() {
        warn!("Suite {} does not have Test Points", config.suite_id);
    }

    Ok(list.value)
}

/// Fetch test points, continuing with an empty list if the fetch fails.
async fn fetch_test_points_or_empty(client: &AzureClient, config: &Config) -> Vec<TestPoint> {
    match fetch_test_points(client, config).await {
        Ok(points) => points,
        Err(e) => {
            error!(
                "Failed to load Test Points of Suite {}: {}",
                config.suite_id, e
            );
            Vec::new()
        }
    }
}

/// Build the batch that marks every point active.
pub fn build_activation_batch(points: &[TestPoint]) -> Vec<PointActivation> {
    points
        .iter()
        .map(|point| PointActivation {
            id: point.id,
            is_active: true,
        })
        .collect()
}

/// Build outcome updates for points with a matching scenario.
///
/// Returns the updates plus the case IDs of points that have no scenario.
/// When several scenarios share a case ID, the first one in report order wins.
pub fn build_outcome_batch(
    points: &[TestPoint],
    scenarios: &[ScenarioResult],
) -> (Vec<PointOutcomeUpdate>, Vec<u64>) {
    let mut updates = Vec::new();
    let mut missing = Vec::new();

    for point in points {
        let case_id = point.test_case_reference.id;
        match scenarios.iter().find(|s| s.case_id() == Some(case_id)) {
            Some(scenario) => updates.push(PointOutcomeUpdate {
                id: point.id,
                results: PointOutcome {
                    outcome: scenario.status,
                },
            }),
            None => missing.push(case_id),
        }
    }

    (updates, missing)
}

/// Mark every test point of the suite active in one batched call.
pub async fn reset_suite(client: &AzureClient, config: &Config) -> SyncResult<StepReport> {
    let points = fetch_test_points_or_empty(client, config).await;
    let batch = build_activation_batch(&points);

    let mut report = StepReport::new(SyncStep::ResetSuite);
    report.queued = batch.len();

    let response = client
        .patch(&test_points_update_path(config), &batch)
        .await?;
    report.updated = acknowledged_count(&response, batch.len());

    info!(
        "Reset \"{}\" Test Point(s) in Suite {} to Active",
        report.updated, config.suite_id
    );

    Ok(report)
}

/// Publish scenario outcomes onto the suite's test points in one batched call.
pub async fn update_suite_outcomes(
    client: &AzureClient,
    config: &Config,
    scenarios: &[ScenarioResult],
) -> SyncResult<StepReport> {
    let points = fetch_test_points_or_empty(client, config).await;
    let (batch, missing) = build_outcome_batch(&points, scenarios);

    for case_id in &missing {
        warn!(
            "@C{} case does not have the result. Probably, it does not exist in report.",
            case_id
        );
    }

    let mut report = StepReport::new(SyncStep::SuiteOutcomes);
    report.queued = batch.len();
    report.skipped = missing.len();
    report.missing_case_ids = missing;

    let response = client
        .patch(&test_points_update_path(config), &batch)
        .await?;
    report.updated = acknowledged_count(&response, batch.len());

    info!("Statuses in Suite {} were updated", config.suite_id);

    Ok(report)
}
