//! Traversal strategies: named, ordered sequences of capture steps.
//!
//! A [`Strategy`] is the declarative unit of traversal. Composite entities
//! ("a table and everything that defines its form") are ordered step
//! sequences; there are no per-entity imperative code paths.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a query filter takes its comparison value from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ValueSource {
    /// A fixed literal value.
    Literal(Value),
    /// The root record's identifier.
    RootId,
    /// A named field read from the root record's row.
    RootField(String),
}

/// A filter whose value is resolved against the traversal root at run time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    pub source: ValueSource,
}

impl FilterSpec {
    /// Filter `field` against a literal value.
    pub fn literal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            source: ValueSource::Literal(value.into()),
        }
    }

    /// Filter `field` against the root record's identifier.
    pub fn root_id(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            source: ValueSource::RootId,
        }
    }

    /// Filter `field` against a field read from the root row.
    pub fn root_field(field: impl Into<String>, root_field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            source: ValueSource::RootField(root_field.into()),
        }
    }
}

/// One arm of a conditional branch: steps taken when the discriminant
/// field equals `value`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchArm {
    pub value: String,
    pub steps: Vec<Step>,
}

impl BranchArm {
    pub fn new(value: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            value: value.into(),
            steps,
        }
    }
}

/// A single capture step interpreted against the traversal root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Capture the root itself.
    Direct,

    /// Enumerate matching rows and capture each.
    QueryChildren {
        container: String,
        filters: Vec<FilterSpec>,
    },

    /// Enumerate matching rows, capture each, then re-run the named
    /// strategy with each row as the new root. A row whose identifier is
    /// already on the active recursion path is skipped, not re-expanded.
    QueryAndRecurse {
        container: String,
        filters: Vec<FilterSpec>,
        strategy: String,
    },

    /// Fetch exactly one matching row and capture it.
    ///
    /// Zero matches fail with `NotFound` unless `optional`, in which case
    /// the absence is logged as a partial-capture warning. More than one
    /// match always fails with `AmbiguousResult`.
    UniqueLookup {
        container: String,
        filters: Vec<FilterSpec>,
        optional: bool,
    },

    /// Dispatch on a discriminant field read from the root row.
    ///
    /// The first arm whose value equals the field runs; otherwise the
    /// `default` steps run (an empty default is a no-op).
    ConditionalBranch {
        discriminant: String,
        arms: Vec<BranchArm>,
        default: Vec<Step>,
    },

    /// Expand every [`TraversalRule`] registered for the root's container.
    ///
    /// This is how composite strategies stay bound to the fixed rule table
    /// instead of restating per-container relations inline.
    ///
    /// [`TraversalRule`]: crate::rules::TraversalRule
    ApplyRules,
}

/// A named, ordered sequence of capture steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Strategy {
    /// Create an empty strategy.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Builder-style step append.
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}
