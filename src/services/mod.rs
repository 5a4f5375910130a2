//! Sync services.

pub mod azure_client;
pub mod cucumber_extraction;
pub mod sync;
pub mod test_plan;
pub mod test_run;

pub use azure_client::AzureClient;
pub use cucumber_extraction::{ReportSource, load_scenarios};
pub use sync::run_sync;
