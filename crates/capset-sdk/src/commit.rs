//! Commit result types.
//!
//! Every capture-set entry yields a typed per-entry outcome instead of a
//! swallowed exception: the commit loop never aborts on one bad entry, and
//! callers can see exactly which entries were skipped and why.

use serde::{Deserialize, Serialize};

use capset_bundle::Bundle;
use capset_types::ObjectRef;

/// Why a capture-set entry was skipped during commit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The record no longer exists in the store.
    MissingSource,
    /// Re-resolving the record failed.
    ResolveFailed(String),
    /// The bundle manager refused the entry write.
    WriteFailed(String),
}

/// Outcome of writing one capture-set entry into the bundle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EntryOutcome {
    Written,
    Skipped(SkipReason),
}

/// One capture-set entry and what happened to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub reference: ObjectRef,
    pub outcome: EntryOutcome,
}

/// Result of a commit operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitResult {
    /// The bundle the capture set was flushed into.
    pub bundle: Bundle,
    /// Per-entry outcomes, one per capture-set entry attempted.
    pub entries: Vec<EntryRecord>,
    /// Set when restoring the pre-commit active bundle failed. The writes
    /// themselves still happened; the session is left on the target bundle.
    pub restore_failed: bool,
}

impl CommitResult {
    pub(crate) fn new(bundle: Bundle) -> Self {
        Self {
            bundle,
            entries: Vec::new(),
            restore_failed: false,
        }
    }

    /// Number of entries attempted.
    pub fn attempted(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries written into the bundle.
    pub fn written(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == EntryOutcome::Written)
            .count()
    }

    /// Number of entries skipped.
    pub fn skipped(&self) -> usize {
        self.attempted() - self.written()
    }

    /// `true` when every entry was written and restoration succeeded.
    pub fn is_clean(&self) -> bool {
        self.skipped() == 0 && !self.restore_failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capset_types::ScopeName;

    #[test]
    fn counts_partition_attempted() {
        let mut result = CommitResult::new(Bundle::new("b1", ScopeName::global(), "r1"));
        result.entries.push(EntryRecord {
            reference: ObjectRef::new("x1", "t1"),
            outcome: EntryOutcome::Written,
        });
        result.entries.push(EntryRecord {
            reference: ObjectRef::new("x2", "t1"),
            outcome: EntryOutcome::Skipped(SkipReason::MissingSource),
        });

        assert_eq!(result.attempted(), 2);
        assert_eq!(result.written(), 1);
        assert_eq!(result.skipped(), 1);
        assert!(!result.is_clean());
    }

    #[test]
    fn clean_commit() {
        let mut result = CommitResult::new(Bundle::new("b1", ScopeName::global(), "r1"));
        result.entries.push(EntryRecord {
            reference: ObjectRef::new("x1", "t1"),
            outcome: EntryOutcome::Written,
        });
        assert!(result.is_clean());

        result.restore_failed = true;
        assert!(!result.is_clean());
    }
}
