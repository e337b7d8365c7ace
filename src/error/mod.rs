//! Error types for the Vogon client.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all client operations.
#[derive(Error, Debug)]
pub enum VogonError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl VogonError {
    /// Create an API error from a status code and body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) => ErrorCategory::TransientNetwork,
            Self::Authentication(_) | Self::AuthorizationDenied(_) => ErrorCategory::Authorization,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authorization,
                408 | 429 => ErrorCategory::TransientNetwork,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::Io(_) | Self::InvalidState(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether retrying the same call later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::TransientNetwork | ErrorCategory::Server
        )
    }

    /// Suggest a recovery action for the caller to surface.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::TransientNetwork | ErrorCategory::Server => {
                RecoverySuggestion::RetryLater
            }
            ErrorCategory::Authorization => RecoverySuggestion::Reauthorize,
            ErrorCategory::Validation => RecoverySuggestion::FixInput,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            _ => RecoverySuggestion::ReportBug,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, VogonError>;
