//! Configuration error types.

use thiserror::Error;

/// Errors from loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`crate::Settings`].
    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        /// Path that failed.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A field failed validation.
    #[error("Invalid config field {field}: {message}")]
    ValidationError {
        /// Dotted field path.
        field: String,
        /// What was wrong with it.
        message: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
