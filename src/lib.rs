//! Test Report Sync library.
//!
//! This library provides the core functionality for syncing a local Cucumber
//! report into Azure DevOps test plans and runs, including report extraction,
//! the authenticated API client and the individual sync steps.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
