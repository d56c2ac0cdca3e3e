//! Error types for the high-level API.

use capset_bundle::BundleError;
use capset_graph::GraphError;
use thiserror::Error;

use crate::builder::BuilderState;

/// Errors surfaced by [`CaptureBuilder`](crate::CaptureBuilder).
#[derive(Debug, Error)]
pub enum SdkError {
    /// A required parameter was missing or empty. Raised before any lookup.
    #[error("invalid argument: {what}")]
    InvalidArgument { what: String },

    /// The operation is not legal in the builder's current state.
    ///
    /// `&mut self` on the builder already rules out overlapping calls from
    /// safe callers; this variant covers re-entrant misuse through interior
    /// calls while a commit is in flight.
    #[error("operation not legal while builder is {state:?}")]
    State { state: BuilderState },

    /// A traversal failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A bundle operation failed outside the per-entry write loop.
    #[error(transparent)]
    Bundle(#[from] BundleError),
}

/// Convenience type alias for builder operations.
pub type SdkResult<T> = std::result::Result<T, SdkError>;
