//! Error types for bundle operations.

use capset_types::RecordId;
use thiserror::Error;

/// Errors that can occur during bundle operations.
#[derive(Debug, Error)]
pub enum BundleError {
    /// A required parameter was missing or empty.
    #[error("invalid argument: {what}")]
    InvalidArgument { what: String },

    /// The referenced bundle does not exist.
    #[error("unknown bundle: {id}")]
    UnknownBundle { id: RecordId },

    /// An entry write was attempted with no active bundle.
    #[error("no active bundle in session")]
    NoActiveBundle,

    /// The backend failed to serve the request.
    #[error("bundle backend error: {0}")]
    Backend(String),
}

/// Convenience type alias for bundle operations.
pub type BundleResult<T> = std::result::Result<T, BundleError>;
