//! Error types for the DevHub cache

use thiserror::Error;

/// Result type alias for cache and orchestration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The resource kind has no RPC function for the requested operation
    #[error("{kind} does not support {operation}")]
    Unsupported {
        kind: &'static str,
        operation: &'static str,
    },

    /// Caller-supplied input the request cannot be built from
    #[error("Invalid input: {0}")]
    Input(String),
}

impl Error {
    /// HTTP-like status code for RPC failures that callers branch on.
    ///
    /// Returns `None` for errors that have no status equivalent (network,
    /// configuration, local I/O).
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api(api) => api.status_code(),
            _ => None,
        }
    }

    /// True when the backend reported that the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(ApiError::NotFound(_)))
    }
}

/// RPC-related errors, categorised so callers can pattern-match on them
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Raised by RPC clients that reject a malformed request. The cache
    /// layer never produces this itself.
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::NotFound(_) => Some(404),
            ApiError::ServerError(_) => Some(500),
            ApiError::Validation(_) => Some(400),
            ApiError::Network(_) | ApiError::InvalidResponse(_) => None,
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
