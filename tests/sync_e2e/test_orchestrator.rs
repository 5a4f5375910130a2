//! E2E tests: full sync ordering and best-effort semantics.

use report_sync_lib::error::SyncError;
use report_sync_lib::models::SyncStep;
use report_sync_lib::services::run_sync;

use super::mock_azure_devops::MockAzureDevOps;
use super::test_helpers::*;

/// (1) A full sync runs every step in order and succeeds.
#[actix_rt::test]
async fn test_full_sync_runs_steps_in_order() {
    let mock = start_seeded_mock().await;
    let config = test_config(&mock);
    let client = test_client(&config);
    let scenarios = fixture_scenarios();

    let summary = run_sync(&client, &config, &scenarios).await;

    assert!(summary.is_success());
    let steps: Vec<_> = summary.steps.iter().map(|o| o.step).collect();
    assert_eq!(
        steps,
        vec![
            SyncStep::ResetSuite,
            SyncStep::RunErrors,
            SyncStep::Screenshots,
            SyncStep::SuiteOutcomes
        ]
    );

    // Mutating calls hit the service in step order.
    let writes: Vec<_> = mock
        .requests()
        .into_iter()
        .filter(|r| r.method != "GET")
        .map(|r| (r.method, r.path))
        .collect();
    assert_eq!(
        writes,
        vec![
            (
                "PATCH".to_string(),
                "/testplan/Plans/7/Suites/8/TestPoint".to_string()
            ),
            (
                "PATCH".to_string(),
                format!("/test/runs/{}/results", LATEST_RUN_ID)
            ),
            (
                "POST".to_string(),
                format!(
                    "/test/runs/{}/results/{}/attachments",
                    LATEST_RUN_ID, CHECKOUT_RESULT_ID
                )
            ),
            (
                "PATCH".to_string(),
                "/testplan/Plans/7/Suites/8/TestPoint".to_string()
            ),
        ]
    );

    let outcomes = summary.step(SyncStep::SuiteOutcomes).unwrap();
    let report = outcomes.result.as_ref().unwrap();
    assert_eq!(report.missing_case_ids, vec![789]);
}

/// (2) A missing run fails the run steps only; suite steps still complete.
#[actix_rt::test]
async fn test_missing_run_leaves_partial_sync() {
    let mock = start_seeded_mock().await;
    let mut config = test_config(&mock);
    config.run_name = "Does not exist".to_string();
    let client = test_client(&config);
    let scenarios = fixture_scenarios();

    let summary = run_sync(&client, &config, &scenarios).await;

    assert!(!summary.is_success());
    assert!(summary.step(SyncStep::ResetSuite).unwrap().result.is_ok());
    assert!(matches!(
        summary.step(SyncStep::RunErrors).unwrap().result,
        Err(SyncError::NoMatchingRun(_))
    ));
    assert!(matches!(
        summary.step(SyncStep::Screenshots).unwrap().result,
        Err(SyncError::NoMatchingRun(_))
    ));

    let outcomes = summary.step(SyncStep::SuiteOutcomes).unwrap();
    assert_eq!(outcomes.result.as_ref().unwrap().queued, 2);
    assert_eq!(mock.requests_to("PATCH", "/TestPoint").len(), 2);
}

/// (3) A failed suite reset does not prevent the remaining steps.
#[actix_rt::test]
async fn test_failed_reset_does_not_abort_sync() {
    let mut state = seeded_state();
    state.point_update_status = Some(503);
    let mock = MockAzureDevOps::start(state).await;
    let config = test_config(&mock);
    let client = test_client(&config);
    let scenarios = fixture_scenarios();

    let summary = run_sync(&client, &config, &scenarios).await;

    assert_eq!(summary.steps.len(), 4);
    assert!(matches!(
        summary.step(SyncStep::ResetSuite).unwrap().result,
        Err(SyncError::UnexpectedStatus { status: 503, .. })
    ));
    assert!(summary.step(SyncStep::RunErrors).unwrap().result.is_ok());
    assert!(summary.step(SyncStep::Screenshots).unwrap().result.is_ok());
    assert!(summary.step(SyncStep::SuiteOutcomes).unwrap().result.is_err());
    assert_eq!(mock.requests_to("POST", "/attachments").len(), 1);
}
