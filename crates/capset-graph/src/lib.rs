//! Capture core for CapSet: identity deduplication and rule-driven traversal.
//!
//! The engine expands a root record into its related-record closure by
//! interpreting named [`Strategy`] step sequences against a [`RecordStore`],
//! feeding every discovered identity into a [`CaptureSet`]. Per-container
//! expansion is declared as [`TraversalRule`] rows in a [`RuleSet`] rather
//! than per-entity code paths; one generic interpreter serves every
//! container kind.
//!
//! [`RecordStore`]: capset_store::RecordStore

pub mod capture;
pub mod error;
pub mod rules;
pub mod strategy;
pub mod traverse;

pub use capture::CaptureSet;
pub use error::{GraphError, GraphResult};
pub use rules::{Cardinality, RuleSet, RuleSetBuilder, TraversalRule};
pub use strategy::{BranchArm, FilterSpec, Step, Strategy, ValueSource};
pub use traverse::Traversal;
