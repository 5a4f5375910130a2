//! Cucumber JSON report extraction service.
//!
//! This module handles reading a Cucumber JSON report (as produced by cucumber-js
//! with the `json` formatter) and reducing each scenario to a [`ScenarioResult`].

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::models::{ScenarioResult, ScenarioStatus};

/// Number of leading characters stripped from a tag to get the case ID (`@C123` → `123`).
const TAG_PREFIX_LEN: usize = 2;

/// Step status that marks a scenario as failed.
const FAILED_STATUS: &str = "failed";

// ============================================================================
// Cucumber JSON Schema Structs
// ============================================================================

/// A feature entry at the top level of the report array.
#[derive(Debug, Deserialize)]
pub struct CucumberFeature {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub elements: Vec<CucumberElement>,
}

/// A scenario (or background) inside a feature.
#[derive(Debug, Deserialize)]
pub struct CucumberElement {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<CucumberTag>,
    #[serde(default)]
    pub steps: Vec<CucumberStep>,
}

/// A tag such as `@C123`.
#[derive(Debug, Deserialize)]
pub struct CucumberTag {
    pub name: String,
}

/// A single step and its execution result.
#[derive(Debug, Deserialize)]
pub struct CucumberStep {
    #[serde(default)]
    pub result: Option<CucumberStepResult>,
    #[serde(default)]
    pub embeddings: Vec<CucumberEmbedding>,
}

/// Execution result of a step.
#[derive(Debug, Deserialize)]
pub struct CucumberStepResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Attachment embedded in a step (screenshots are base64 `data`).
#[derive(Debug, Deserialize)]
pub struct CucumberEmbedding {
    #[serde(default)]
    pub data: String,
}

impl CucumberStep {
    fn is_failed(&self) -> bool {
        self.result
            .as_ref()
            .is_some_and(|r| r.status == FAILED_STATUS)
    }
}

// ============================================================================
// Report Sources
// ============================================================================

/// Where the report is read from.
#[derive(Debug, Clone)]
pub enum ReportSource {
    /// A report file, or a directory whose first file (by name) is the report
    Path(PathBuf),
    /// Raw report content
    Bytes(Vec<u8>),
}

/// Load and parse scenario results from a report source.
pub fn load_scenarios(source: &ReportSource) -> SyncResult<Vec<ScenarioResult>> {
    match source {
        ReportSource::Path(path) => {
            let file = resolve_report_file(path)?;
            info!("Loading Cucumber report from {}", file.display());

            let data = std::fs::read(&file).map_err(|e| {
                SyncError::Report(format!("Failed to read {}: {}", file.display(), e))
            })?;
            extract_scenarios_from_bytes(&data)
        }
        ReportSource::Bytes(data) => extract_scenarios_from_bytes(data),
    }
}

/// Resolve a path to the report file.
///
/// A directory must contain at least one regular file; the first in name order is used.
pub fn resolve_report_file(path: &Path) -> SyncResult<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    let entries = std::fs::read_dir(path).map_err(|e| {
        SyncError::Report(format!(
            "Failed to read report directory {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.len() > 1 {
        debug!(
            "Report directory {} holds {} files, using the first",
            path.display(),
            files.len()
        );
    }

    files.into_iter().next().ok_or_else(|| {
        SyncError::Report(format!("Report directory {} is empty", path.display()))
    })
}

// ============================================================================
// Extraction Logic
// ============================================================================

/// Extract scenario results from raw report bytes.
pub fn extract_scenarios_from_bytes(data: &[u8]) -> SyncResult<Vec<ScenarioResult>> {
    let features: Vec<CucumberFeature> = serde_json::from_slice(data)
        .map_err(|e| SyncError::Report(format!("Failed to parse Cucumber JSON: {}", e)))?;

    extract_scenarios(features)
}

/// Extract scenario results from the first feature of a parsed report.
pub fn extract_scenarios(features: Vec<CucumberFeature>) -> SyncResult<Vec<ScenarioResult>> {
    let feature = features
        .into_iter()
        .next()
        .ok_or_else(|| SyncError::Report("Report contains no features".to_string()))?;

    let scenarios = feature
        .elements
        .iter()
        .map(scenario_from_element)
        .collect::<SyncResult<Vec<_>>>()?;

    let failed = scenarios
        .iter()
        .filter(|s| s.status == ScenarioStatus::Failed)
        .count();
    info!(
        "Parsed feature '{}': {} scenarios, {} failed",
        feature.name,
        scenarios.len(),
        failed
    );

    Ok(scenarios)
}

/// Reduce one report element to a scenario result.
fn scenario_from_element(element: &CucumberElement) -> SyncResult<ScenarioResult> {
    let tag = element.tags.first().ok_or_else(|| {
        SyncError::Report(format!("Scenario '{}' has no tags", element.name))
    })?;
    let id = case_id_from_tag(&tag.name);
    if id.is_empty() {
        warn!(
            "Scenario '{}' has tag '{}' with no case ID; it will not match any test point",
            element.name, tag.name
        );
    }

    // Last failure wins.
    let error_message = element
        .steps
        .iter()
        .filter(|step| step.is_failed())
        .filter_map(|step| step.result.as_ref())
        .last()
        .and_then(|r| r.error_message.clone());

    let status = if element.steps.iter().any(CucumberStep::is_failed) {
        ScenarioStatus::Failed
    } else {
        ScenarioStatus::Passed
    };

    // First embedding wins, regardless of step status.
    let screenshot = element
        .steps
        .iter()
        .find_map(|step| step.embeddings.first())
        .map(|embedding| embedding.data.clone());

    Ok(ScenarioResult {
        id,
        name: element.name.clone(),
        status,
        screenshot,
        error_message,
    })
}

/// Strip the fixed tag prefix; empty if the tag is too short to carry an ID.
fn case_id_from_tag(tag: &str) -> String {
    tag.chars().skip(TAG_PREFIX_LEN).collect()
}
