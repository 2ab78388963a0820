//! Typed errors raised by the provider layer itself
//!
//! Provider and back-end operations return [`anyhow::Result`] so that a
//! back-end failure reaches the caller exactly as it was raised. The
//! [`ProviderError`] enum covers the failures this crate originates:
//! unparsable sort orders, configuration problems, and a convenience variant
//! back-end authors can use for their own failures.
//!
//! # Example
//!
//! ```rust
//! use backend_provider::core::error::ProviderError;
//!
//! let err = ProviderError::backend("crm", "connection reset");
//! assert_eq!(err.error_code(), "BACKEND_ERROR");
//! assert_eq!(err.to_string(), "crm back end failed: connection reset");
//! ```

use thiserror::Error;

/// Errors originated by the provider layer
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A sort order could not be parsed from its text form
    #[error("Invalid sort order '{value}': {message}")]
    InvalidSortOrder { value: String, message: String },

    /// Configuration could not be parsed
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ConfigParse {
        file: Option<String>,
        message: String,
    },

    /// Configuration file could not be read
    #[error("Failed to read config file '{path}': {message}")]
    ConfigIo { path: String, message: String },

    /// A back end failed to answer a query
    #[error("{backend} back end failed: {message}")]
    Backend { backend: String, message: String },
}

impl ProviderError {
    /// Shorthand for [`ProviderError::Backend`]
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ProviderError::InvalidSortOrder { .. } => "INVALID_SORT_ORDER",
            ProviderError::ConfigParse { .. } => "CONFIG_PARSE_ERROR",
            ProviderError::ConfigIo { .. } => "CONFIG_IO_ERROR",
            ProviderError::Backend { .. } => "BACKEND_ERROR",
        }
    }
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}
