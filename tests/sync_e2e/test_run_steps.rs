//! E2E tests: run resolution, error message and screenshot steps.

use report_sync_lib::error::SyncError;
use report_sync_lib::services::test_run::{
    resolve_run_id, update_run_errors, upload_screenshots,
};
use serde_json::json;

use super::test_helpers::*;

/// (1) The last run in listing order with the configured name wins.
#[actix_rt::test]
async fn test_resolve_run_id_takes_latest_listed() {
    let mock = start_seeded_mock().await;
    let config = test_config(&mock);
    let client = test_client(&config);

    let run_id = resolve_run_id(&client, &config).await.unwrap();

    assert_eq!(run_id, LATEST_RUN_ID);
    let gets = mock.requests_to("GET", "/test/runs");
    assert_eq!(gets.len(), 1);
    assert_eq!(gets[0].query, "api-version=6.0");
}

/// (2) No run with the configured name is a typed error, and nothing is patched.
#[actix_rt::test]
async fn test_missing_run_is_typed_error() {
    let mock = start_seeded_mock().await;
    let mut config = test_config(&mock);
    config.run_name = "Weekly regression".to_string();
    let client = test_client(&config);
    let scenarios = fixture_scenarios();

    let err = update_run_errors(&client, &config, &scenarios)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::NoMatchingRun(ref name) if name == "Weekly regression"));

    let err = upload_screenshots(&client, &config, &scenarios)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::NoMatchingRun(_)));

    assert!(mock.requests_to("PATCH", "/results").is_empty());
    assert!(mock.requests_to("POST", "/attachments").is_empty());
}

/// (3) Only the failed scenario's error message is patched onto its run result.
#[actix_rt::test]
async fn test_update_run_errors_round_trip() {
    let mock = start_seeded_mock().await;
    let config = test_config(&mock);
    let client = test_client(&config);
    let scenarios = fixture_scenarios();

    let report = update_run_errors(&client, &config, &scenarios)
        .await
        .unwrap();

    assert_eq!(report.queued, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.skipped, 1);

    let patches = mock.requests_to("PATCH", &format!("/test/runs/{}/results", LATEST_RUN_ID));
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].query, "api-version=5.0");
    assert_eq!(
        patches[0].body,
        json!([{"id": CHECKOUT_RESULT_ID, "errorMessage": "assertion error"}])
    );
}

/// (4) Exactly one attachment upload, to the failed scenario's result.
#[actix_rt::test]
async fn test_upload_screenshots_round_trip() {
    let mock = start_seeded_mock().await;
    let config = test_config(&mock);
    let client = test_client(&config);
    let scenarios = fixture_scenarios();

    let report = upload_screenshots(&client, &config, &scenarios)
        .await
        .unwrap();

    assert_eq!(report.queued, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 0);

    let posts = mock.requests_to("POST", "/attachments");
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].path,
        format!(
            "/test/runs/{}/results/{}/attachments",
            LATEST_RUN_ID, CHECKOUT_RESULT_ID
        )
    );
    assert_eq!(posts[0].query, "api-version=5.1-preview.1");
    assert_eq!(
        posts[0].body,
        json!({
            "fileName": "screenshot.png",
            "comment": "Test attachment upload",
            "attachmentType": "GeneralAttachment",
            "stream": "abc123"
        })
    );
}

/// (5) A rejected upload is counted and later uploads still run, in order.
#[actix_rt::test]
async fn test_failed_upload_does_not_stop_later_uploads() {
    let mock = start_seeded_mock().await;
    mock.set_failing_attachment(LOGIN_RESULT_ID);
    let config = test_config(&mock);
    let client = test_client(&config);

    let mut scenarios = fixture_scenarios();
    scenarios[0].screenshot = Some("login-shot".to_string());

    let report = upload_screenshots(&client, &config, &scenarios)
        .await
        .unwrap();

    assert_eq!(report.queued, 2);
    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 1);

    let posts = mock.requests_to("POST", "/attachments");
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].body["stream"], "login-shot");
    assert_eq!(posts[1].body["stream"], "abc123");
}
