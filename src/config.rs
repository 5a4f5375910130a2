//! Sync configuration loaded from environment variables or a JSON config file.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Principal name paired with the access token for Basic authentication.
pub const AUTH_PRINCIPAL: &str = "PAT";

/// Environment variable names.
pub mod vars {
    pub const ORGANIZATION_URL: &str = "AZURE_ORGANIZATION_URL";
    pub const PLAN_ID: &str = "AZURE_PLAN_ID";
    pub const SUITE_ID: &str = "AZURE_SUITE_ID";
    pub const RUN_NAME: &str = "AZURE_RUN_NAME";
    pub const ACCESS_TOKEN: &str = "AZURE_PAT";
    pub const REPORT_PATH: &str = "REPORT_SYNC_REPORT_PATH";
}

/// Default values.
pub mod defaults {
    /// Directory holding the Cucumber JSON report.
    pub const REPORT_DIR: &str = "reports/cucumberJS";
    /// Per-request timeout for every remote call.
    pub const REQUEST_TIMEOUT_SECS: u64 = 100;
}

/// Target of a sync: which organization, plan, suite and run to update.
///
/// Built once at startup and handed by reference to every sync step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Organization/project API base, e.g. `https://dev.azure.com/org/project/_apis/`
    pub organization_url: String,
    /// Test plan ID
    pub plan_id: u64,
    /// Test suite ID within the plan
    pub suite_id: u64,
    /// Name of the test run whose results are updated
    pub run_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AZURE_ORGANIZATION_URL`: API base URL - REQUIRED
    /// - `AZURE_PLAN_ID`: Test plan ID - REQUIRED
    /// - `AZURE_SUITE_ID`: Test suite ID - REQUIRED
    /// - `AZURE_RUN_NAME`: Test run name - REQUIRED
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let organization_url = lookup(vars::ORGANIZATION_URL)
            .ok_or(ConfigError::MissingEnvVar(vars::ORGANIZATION_URL))?;

        let plan_id = lookup(vars::PLAN_ID)
            .ok_or(ConfigError::MissingEnvVar(vars::PLAN_ID))?
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("AZURE_PLAN_ID must be a valid number"))?;

        let suite_id = lookup(vars::SUITE_ID)
            .ok_or(ConfigError::MissingEnvVar(vars::SUITE_ID))?
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("AZURE_SUITE_ID must be a valid number"))?;

        let run_name = lookup(vars::RUN_NAME).ok_or(ConfigError::MissingEnvVar(vars::RUN_NAME))?;

        let config = Config {
            organization_url,
            plan_id,
            suite_id,
            run_name,
        };
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a JSON file shaped like
    /// `{"organizationUrl": ..., "planId": ..., "suiteId": ..., "runName": ...}`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.organization_url.starts_with("http://")
            || self.organization_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue(
                "organization URL must start with http:// or https://",
            ));
        }

        if self.run_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue("run name must not be empty"));
        }

        Ok(())
    }

    /// Resolve a relative API path against the organization URL.
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.organization_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Failed to read config file {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("Failed to parse config file: {0}")]
    Parse(String),
}
