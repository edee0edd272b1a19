//! Error types for the farm

use thiserror::Error;

/// Outcome of a failed call against the game backend.
///
/// Decided once at the transport boundary; callers never inspect raw
/// status codes or response shapes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// 401/403. The session is dead and the account run must stop.
    #[error("unauthorized (status {status}), init data must be refreshed")]
    Unauthorized { status: u16 },

    /// 400. Usually a stale catalog or payload the server no longer accepts.
    #[error("invalid request for {path}: {detail}")]
    BadRequest { path: String, detail: String },

    /// 429 that outlived every retry.
    #[error("rate limited on {path}")]
    RateLimited { path: String },

    #[error("request to {path} failed (status {status:?}): {detail}")]
    Transport {
        path: String,
        status: Option<u16>,
        detail: String,
    },

    #[error("unexpected response shape from {path}: {detail}")]
    Decode { path: String, detail: String },
}

impl ApiError {
    /// Whether the error ends the whole account run
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// HTTP status attached to the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status } => Some(*status),
            ApiError::BadRequest { .. } => Some(400),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::Transport { status, .. } => *status,
            ApiError::Decode { .. } => None,
        }
    }
}

/// Error thrown when a static catalog cannot be used
#[derive(Debug, Error)]
#[error("Catalog '{name}' is invalid: {reason}")]
pub struct CatalogError {
    pub name: String,
    pub reason: String,
}

/// General farm error type
#[derive(Debug, Error)]
pub enum FarmError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FarmError>;
