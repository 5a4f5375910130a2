//! Per-step sync reports.

use crate::error::SyncResult;

/// One step of the sync workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    ResetSuite,
    RunErrors,
    Screenshots,
    SuiteOutcomes,
}

impl SyncStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResetSuite => "reset-suite",
            Self::RunErrors => "run-errors",
            Self::Screenshots => "screenshots",
            Self::SuiteOutcomes => "suite-outcomes",
        }
    }
}

impl std::fmt::Display for SyncStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Counts produced by a completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: SyncStep,
    /// Items sent to the remote service
    pub queued: usize,
    /// Items the remote service acknowledged
    pub updated: usize,
    /// Local or remote items with no counterpart
    pub skipped: usize,
    /// Individual items whose remote call failed
    pub failed: usize,
    /// Test case IDs of suite points with no scenario in the report
    pub missing_case_ids: Vec<u64>,
}

impl StepReport {
    pub fn new(step: SyncStep) -> Self {
        StepReport {
            step,
            queued: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            missing_case_ids: Vec::new(),
        }
    }
}

/// Outcome of one step; a failed step does not stop the ones after it.
#[derive(Debug)]
pub struct StepOutcome {
    pub step: SyncStep,
    pub result: SyncResult<StepReport>,
}

impl StepOutcome {
    /// True if the step errored or any of its items failed.
    pub fn is_failure(&self) -> bool {
        match &self.result {
            Ok(report) => report.failed > 0,
            Err(_) => true,
        }
    }
}

/// Ordered outcomes of a full sync.
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub steps: Vec<StepOutcome>,
}

impl SyncSummary {
    /// True if every step completed without item failures.
    pub fn is_success(&self) -> bool {
        !self.steps.iter().any(StepOutcome::is_failure)
    }

    /// Outcome of a given step, if it ran.
    pub fn step(&self, step: SyncStep) -> Option<&StepOutcome> {
        self.steps.iter().find(|o| o.step == step)
    }
}
