//! Foundation types for CapSet.
//!
//! This crate provides the identity and scope types used throughout the
//! CapSet system. Every other CapSet crate depends on `capset-types`.
//!
//! # Key Types
//!
//! - [`RecordId`] — Opaque record identifier assigned by the host store
//! - [`ObjectRef`] — (identifier, container) pair naming a capturable record
//! - [`ScopeName`] — Logical application scope with sentinel normalization

pub mod record;
pub mod scope;

pub use record::{ObjectRef, RecordId};
pub use scope::{ScopeName, GLOBAL_SCOPE, NO_SCOPE_SENTINEL};
