use thiserror::Error;

use crate::error::VogonError;

/// Errors raised by the credential store and the device-code relay.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::de::Error> for AuthError {
    fn from(error: toml::de::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::ser::Error> for AuthError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<AuthError> for VogonError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::AccessDenied(description) => VogonError::AuthorizationDenied(description),
            AuthError::InvalidState(message) => VogonError::InvalidState(message),
            AuthError::Network(source) => VogonError::Network(source),
            other => VogonError::Authentication(other.to_string()),
        }
    }
}
