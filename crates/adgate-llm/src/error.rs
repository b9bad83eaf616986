//! LLM-related error types.

use thiserror::Error;

/// Errors that can occur with LLM operations.
///
/// All variants are surfaced to the caller as retryable: a failed model
/// call aborts the current loop but leaves any proposals created earlier
/// in the request intact.
#[derive(Debug, Error)]
pub enum LlmError {
    /// API key not configured.
    #[error("API key not configured for {provider}")]
    ApiKeyNotConfigured {
        /// Provider name.
        provider: String,
    },

    /// API request failed.
    #[error("API request failed: {0}")]
    ApiRequestFailed(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, retry after {retry_after_secs} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The request exceeded its deadline.
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The configured deadline.
        timeout_secs: u64,
    },

    /// Invalid response from the API.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Streaming error.
    #[error("Streaming error: {0}")]
    StreamingError(String),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;
