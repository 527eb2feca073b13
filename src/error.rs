//! Error types for the teamsync CLI

use std::time::Duration;
use thiserror::Error;

/// Result type alias for teamsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

/// Remote API errors, classified once at the client boundary.
///
/// The reconciliation engine matches only on these variants: `NotFound` is
/// the expected "entity absent" signal, `Forbidden` is recoverable for team
/// deletion only, and everything else is fatal for the run.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Check that GITHUB_TOKEN is set and valid.")]
    Unauthorized,

    #[error("Access denied. The token lacks permission for this operation.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration errors. Always fatal, never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("GITHUB_TOKEN is not set. Export a token with org admin scope.")]
    MissingToken,

    #[error("No organization given. Pass --org or set GITHUB_REPOSITORY.")]
    MissingOrg,

    #[error("Team '{team}': invalid privacy '{value}' (expected 'closed' or 'secret')")]
    InvalidPrivacy { team: String, value: String },

    #[error(
        "Team '{team}': invalid role '{value}' for user '{username}' \
         (expected 'member' or 'maintainer')"
    )]
    InvalidRole {
        team: String,
        username: String,
        value: String,
    },

    #[error(
        "Team '{team}': invalid permission '{value}' for repository '{repo}' \
         (expected one of pull, triage, push, maintain, admin)"
    )]
    InvalidPermission {
        team: String,
        repo: String,
        value: String,
    },

    #[error("Teams '{first}' and '{second}' both normalize to slug '{slug}'")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("Team '{team}': duplicate {kind} '{value}'")]
    Duplicate {
        team: String,
        kind: &'static str,
        value: String,
    },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
