//! Error types for directory operations.
//!
//! Each variant names one cause. The import engines collapse all of them into
//! a coarse per-row outcome, but the cause is still logged.

use thiserror::Error;

use crate::collection::{Collection, Query};

/// Result alias for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The search succeeded but no row matched.
    #[error("no {collection} matched {query}")]
    NotFound { collection: Collection, query: Query },

    /// The request never produced a response (connect, timeout, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote answered with a status the operation does not accept.
    #[error("server returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// A success status whose body lacks the expected envelope.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// A success status whose body reports `"status": "error"`.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The client could not be built from its configuration.
    #[error("invalid directory configuration: {0}")]
    InvalidConfig(String),
}

impl DirectoryError {
    /// Whether this error means "searched fine, nothing there".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for DirectoryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Transport(format!("request timed out: {e}"))
        } else if e.is_connect() {
            Self::Transport(format!("connection failed: {e}"))
        } else {
            Self::Transport(e.to_string())
        }
    }
}
