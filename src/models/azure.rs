//! Remote test-management entities and request bodies.
//!
//! Field names follow the Azure DevOps REST contract (camelCase on the wire).

use serde::{Deserialize, Serialize};

use super::ScenarioStatus;

/// Fixed attachment file name for uploaded screenshots.
pub const SCREENSHOT_FILE_NAME: &str = "screenshot.png";
/// Fixed attachment comment for uploaded screenshots.
pub const SCREENSHOT_COMMENT: &str = "Test attachment upload";
/// Fixed attachment type for uploaded screenshots.
pub const SCREENSHOT_ATTACHMENT_TYPE: &str = "GeneralAttachment";

/// Envelope of every list endpoint: `{"count": n, "value": [...]}`; only `value` is read.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// Test point: one test case's inclusion in a suite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPoint {
    pub id: u64,
    pub test_case_reference: TestCaseReference,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Reference from a test point to its test case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCaseReference {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Test run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Run {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// Result record of one test case within a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub id: u64,
    pub test_case: RunTestCase,
}

/// Test case summary embedded in a run result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunTestCase {
    #[serde(default)]
    pub name: String,
}

/// Batch entry marking a test point active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointActivation {
    pub id: u64,
    pub is_active: bool,
}

/// Batch entry setting a test point's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointOutcomeUpdate {
    pub id: u64,
    pub results: PointOutcome,
}

/// Outcome payload of a test point update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointOutcome {
    pub outcome: ScenarioStatus,
}

/// Batch entry patching a run result's error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultErrorUpdate {
    pub id: u64,
    pub error_message: String,
}

/// Attachment upload body for a single run result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRequest {
    pub file_name: String,
    pub comment: String,
    pub attachment_type: String,
    /// Base64 file content
    pub stream: String,
}

impl AttachmentRequest {
    /// Screenshot attachment with the fixed name, comment and type.
    pub fn screenshot(stream: &str) -> Self {
        AttachmentRequest {
            file_name: SCREENSHOT_FILE_NAME.to_string(),
            comment: SCREENSHOT_COMMENT.to_string(),
            attachment_type: SCREENSHOT_ATTACHMENT_TYPE.to_string(),
            stream: stream.to_string(),
        }
    }
}
