//! Domain error types for report sync.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

/// Sync-level errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Report file missing, unreadable or malformed
    #[error("Report error: {0}")]
    Report(String),

    /// Transport-level HTTP failure (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Remote resource not found (carries the server-provided message)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote call returned a non-success status other than 404
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Remote response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No run in the listing carries the configured name
    #[error("No run named '{0}' found")]
    NoMatchingRun(String),
}

/// Convenience type alias for Results with SyncError.
pub type SyncResult<T> = Result<T, SyncError>;

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Http(err.to_string())
    }
}
