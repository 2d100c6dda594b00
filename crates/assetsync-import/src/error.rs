//! Run-level error types.
//!
//! These abort a run. Everything that goes wrong with a single row is an
//! outcome instead (see [`crate::outcome`]).

use thiserror::Error;

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input header lacks one or more template columns.
    #[error("Missing required headers: {0}")]
    MissingHeaders(String),
}
