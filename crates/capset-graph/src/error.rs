//! Error types for capture and traversal operations.

use capset_store::StoreError;
use thiserror::Error;

/// Errors that can occur during capture-graph traversal.
///
/// A traversal error aborts the enclosing traversal call. Optional related
/// records that turn out to be absent are logged as warnings instead and
/// never surface here.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A required parameter was missing or empty. Raised before any lookup.
    #[error("invalid argument: {what}")]
    InvalidArgument { what: String },

    /// No strategy with this name is registered in the rule set.
    #[error("unknown traversal strategy: {name}")]
    UnknownStrategy { name: String },

    /// A store lookup failed, including unique-lookup `NotFound` and
    /// `AmbiguousResult` contract violations.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for traversal operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;
