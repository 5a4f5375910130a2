//! Scenario result model representing one parsed Cucumber scenario.

use serde::{Deserialize, Serialize};

/// Scenario outcome as reported to the test plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
}

impl ScenarioStatus {
    /// Convert to the outcome string used by the remote service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one scenario extracted from the local report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioResult {
    /// External test case ID (first tag with its prefix stripped)
    pub id: String,
    /// Scenario name, matched against run result test case names
    pub name: String,
    /// Failed if any step failed
    pub status: ScenarioStatus,
    /// Base64 screenshot data from the first embedding, if any
    pub screenshot: Option<String>,
    /// Error message of the last failed step, if any
    pub error_message: Option<String>,
}

impl ScenarioResult {
    /// Numeric form of the case ID, used to match test points.
    pub fn case_id(&self) -> Option<u64> {
        self.id.trim().parse().ok()
    }

    /// Error message, if present and non-empty.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref().filter(|m| !m.is_empty())
    }

    /// Screenshot payload, if present and non-empty.
    pub fn screenshot(&self) -> Option<&str> {
        self.screenshot.as_deref().filter(|s| !s.is_empty())
    }
}
