//! Bundle manager and scope resolver ports for CapSet.
//!
//! A bundle is the named deployment container captured records are flushed
//! into. The host platform keeps one *active* bundle per session as global
//! state; this crate models that state behind the [`BundleManager`] trait so
//! the commit orchestrator can treat switch/restore as an injected
//! dependency and tests can assert the pairing.

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{BundleError, BundleResult};
pub use memory::{FixedScopeResolver, InMemoryBundleManager};
pub use traits::{BundleManager, ScopeResolver};
pub use types::Bundle;
