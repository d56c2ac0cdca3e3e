//! The identity-deduplication core.
//!
//! [`CaptureSet`] is the accumulator every traversal feeds into: a map from
//! record identifier to container name, with at most one entry per
//! identifier. It grows monotonically during a capture session and is
//! cleared only by the commit orchestrator's flush-and-reset.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use capset_types::{ObjectRef, RecordId};

/// Deduplicating set of captured record identities.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CaptureSet {
    /// identifier -> container of every captured record.
    entries: HashMap<RecordId, String>,
    /// Running count of unique insertions, for diagnostics.
    unique: usize,
}

impl CaptureSet {
    /// Create an empty capture set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reference if its identifier is not already present.
    ///
    /// Returns whether an insertion occurred. An empty identifier is a
    /// silent no-op: intermediate lookups can hand back malformed refs and
    /// the write path must absorb them without failing.
    pub fn record(&mut self, reference: &ObjectRef) -> bool {
        if reference.id.is_empty() {
            return false;
        }
        match self.entries.entry(reference.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(reference.container.clone());
                self.unique += 1;
                debug!(captured = %reference, total = self.unique, "captured record");
                true
            }
        }
    }

    /// Number of unique records captured.
    pub fn count(&self) -> usize {
        self.unique
    }

    /// Returns `true` if nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the identifier has been captured.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.entries.contains_key(id)
    }

    /// Container name recorded for an identifier.
    pub fn container_of(&self, id: &RecordId) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Iterate over all captured identities.
    pub fn refs(&self) -> impl Iterator<Item = ObjectRef> + '_ {
        self.entries.iter().map(|(id, container)| ObjectRef {
            id: id.clone(),
            container: container.clone(),
        })
    }

    /// Flush-and-reset: remove every entry and reset the unique counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.unique = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Test 1: recording the same identifier twice is idempotent ----
    #[test]
    fn record_is_idempotent() {
        let mut set = CaptureSet::new();
        assert!(set.record(&ObjectRef::new("x1", "t1")));
        assert!(!set.record(&ObjectRef::new("x1", "t1")));
        assert_eq!(set.count(), 1);
    }

    // ---- Test 2: empty identifier is a silent no-op ----
    #[test]
    fn empty_identifier_is_silent_noop() {
        let mut set = CaptureSet::new();
        assert!(!set.record(&ObjectRef::new("", "t1")));
        assert_eq!(set.count(), 0);
        assert!(set.is_empty());
    }

    // ---- Test 3: distinct identifiers accumulate ----
    #[test]
    fn distinct_identifiers_accumulate() {
        let mut set = CaptureSet::new();
        set.record(&ObjectRef::new("x1", "t1"));
        set.record(&ObjectRef::new("x2", "t1"));
        set.record(&ObjectRef::new("x3", "t2"));
        assert_eq!(set.count(), 3);
        assert!(set.contains(&RecordId::new("x2")));
        assert_eq!(set.container_of(&RecordId::new("x3")), Some("t2"));
    }

    // ---- Test 4: same identifier in another container stays a no-op ----
    #[test]
    fn identifier_wins_over_container() {
        // Identity is the identifier alone; the first container sticks.
        let mut set = CaptureSet::new();
        assert!(set.record(&ObjectRef::new("x1", "t1")));
        assert!(!set.record(&ObjectRef::new("x1", "t2")));
        assert_eq!(set.container_of(&RecordId::new("x1")), Some("t1"));
    }

    // ---- Test 5: clear resets entries and counter ----
    #[test]
    fn clear_resets_everything() {
        let mut set = CaptureSet::new();
        set.record(&ObjectRef::new("x1", "t1"));
        set.record(&ObjectRef::new("x2", "t1"));
        set.clear();
        assert_eq!(set.count(), 0);
        assert!(set.is_empty());
        // Re-recording after clear counts again.
        assert!(set.record(&ObjectRef::new("x1", "t1")));
        assert_eq!(set.count(), 1);
    }

    // ---- Test 6: refs round-trips identities ----
    #[test]
    fn refs_iterates_identities() {
        let mut set = CaptureSet::new();
        set.record(&ObjectRef::new("x1", "t1"));
        set.record(&ObjectRef::new("x2", "t2"));
        let mut refs: Vec<ObjectRef> = set.refs().collect();
        refs.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(
            refs,
            vec![ObjectRef::new("x1", "t1"), ObjectRef::new("x2", "t2")]
        );
    }
}
