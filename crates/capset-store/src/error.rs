//! Error types for record store operations.

use thiserror::Error;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required parameter was missing or empty.
    #[error("invalid argument: {what}")]
    InvalidArgument { what: String },

    /// A unique lookup matched no rows.
    #[error("no {container} record matched {criteria}")]
    NotFound { container: String, criteria: String },

    /// A unique lookup matched more than one row.
    #[error("ambiguous result: {matched} {container} records matched {criteria}")]
    AmbiguousResult {
        container: String,
        criteria: String,
        matched: usize,
    },

    /// The backend failed to serve the request.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Convenience type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
