//! Error types for the Meta platform client.

use thiserror::Error;

/// Errors from the ad platform client.
#[derive(Debug, Error)]
pub enum MetaError {
    /// No access token was configured.
    #[error("Meta access token not configured")]
    AccessTokenNotConfigured,

    /// The platform rejected the request.
    ///
    /// Carries the platform's error message verbatim so it can be recorded
    /// into the proposal's outcome unchanged.
    #[error("Meta API error (status {status}): {message}")]
    ApiRequestFailed {
        /// HTTP status code from the Graph API.
        status: u16,
        /// The platform's error message.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Meta API request timed out after {timeout_secs}s")]
    Timeout {
        /// The timeout that was exceeded.
        timeout_secs: u64,
    },

    /// The response body could not be interpreted.
    #[error("Invalid Meta API response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Client configuration problem.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for platform operations.
pub type MetaResult<T> = Result<T, MetaError>;
