//! Domain models for report sync.

pub mod azure;
pub mod scenario;
pub mod sync_report;

// Re-export commonly used types
pub use azure::{
    AttachmentRequest, ListResponse, PointActivation, PointOutcome, PointOutcomeUpdate,
    ResultErrorUpdate, Run, RunResult, RunTestCase, TestCaseReference, TestPoint,
};
pub use scenario::{ScenarioResult, ScenarioStatus};
pub use sync_report::{StepOutcome, StepReport, SyncStep, SyncSummary};
