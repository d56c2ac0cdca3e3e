//! Record store port for CapSet.
//!
//! The host platform's record store is an external collaborator: this crate
//! defines the [`RecordStore`] trait the capture engine traverses against,
//! the [`Record`] row type with named field access, and an in-memory
//! backend for tests and embedding.

pub mod error;
pub mod memory;
pub mod record;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRecordStore;
pub use record::{Filter, Record};
pub use traits::RecordStore;
