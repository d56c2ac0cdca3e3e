//! High-level CapSet API.
//!
//! [`CaptureBuilder`] ties the ports together: it runs traversal strategies
//! against the record store, accumulates identities in a capture set, and
//! commits the set into a named bundle with guaranteed active-bundle
//! restoration.

pub mod builder;
pub mod commit;
pub mod error;

pub use builder::{BuilderState, CaptureBuilder};
pub use commit::{CommitResult, EntryOutcome, EntryRecord, SkipReason};
pub use error::{SdkError, SdkResult};
