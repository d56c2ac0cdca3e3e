//! In-memory record store for testing and embedding.
//!
//! [`InMemoryRecordStore`] holds rows in a `HashMap` keyed by container,
//! protected by a `RwLock`. It implements the full [`RecordStore`] trait
//! and is the backend the capture-engine tests run against.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use capset_types::RecordId;

use crate::error::{StoreError, StoreResult};
use crate::record::{Filter, Record};
use crate::traits::RecordStore;

/// An in-memory implementation of [`RecordStore`].
///
/// All data lives in a `HashMap` behind a `RwLock`. Data is lost when the
/// store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    containers: RwLock<HashMap<String, Vec<Record>>>,
}

impl InMemoryRecordStore {
    /// Create a new empty record store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, replacing any existing row with the same identifier
    /// in the same container.
    pub fn insert(&self, record: Record) {
        let mut containers = self.containers.write().expect("lock poisoned");
        let rows = containers.entry(record.container.clone()).or_default();
        rows.retain(|r| r.id != record.id);
        debug!(container = %record.container, id = %record.id, "inserted row");
        rows.push(record);
    }

    /// Remove a row by container and identifier. Returns `true` if a row
    /// was removed.
    pub fn remove(&self, container: &str, id: &RecordId) -> bool {
        let mut containers = self.containers.write().expect("lock poisoned");
        match containers.get_mut(container) {
            Some(rows) => {
                let before = rows.len();
                rows.retain(|r| &r.id != id);
                let removed = rows.len() != before;
                if removed {
                    debug!(container, id = %id, "removed row");
                }
                removed
            }
            None => false,
        }
    }

    /// Total number of rows across all containers.
    pub fn len(&self) -> usize {
        self.containers
            .read()
            .expect("lock poisoned")
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Returns `true` if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, container: &str, id: &RecordId) -> StoreResult<Option<Record>> {
        let containers = self
            .containers
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(containers
            .get(container)
            .and_then(|rows| rows.iter().find(|r| &r.id == id))
            .cloned())
    }

    fn query(&self, container: &str, filters: &[Filter]) -> StoreResult<Vec<Record>> {
        let containers = self
            .containers
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(containers
            .get(container)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.matches(filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seed_store() -> InMemoryRecordStore {
        let store = InMemoryRecordStore::new();
        store.insert(
            Record::new("widget", "w1")
                .with_field("name", "alpha")
                .with_field("active", true),
        );
        store.insert(
            Record::new("widget", "w2")
                .with_field("name", "beta")
                .with_field("active", true),
        );
        store.insert(
            Record::new("widget", "w3")
                .with_field("name", "gamma")
                .with_field("active", false),
        );
        store
    }

    // ---- Test 1: get by identifier ----
    #[test]
    fn get_existing_row() {
        let store = seed_store();
        let row = store.get("widget", &RecordId::new("w2")).unwrap().unwrap();
        assert_eq!(row.field_str("name"), Some("beta"));
    }

    // ---- Test 2: get unknown identifier returns None ----
    #[test]
    fn get_unknown_row_returns_none() {
        let store = seed_store();
        assert!(store.get("widget", &RecordId::new("nope")).unwrap().is_none());
        assert!(store.get("gadget", &RecordId::new("w1")).unwrap().is_none());
    }

    // ---- Test 3: query AND-combines filters ----
    #[test]
    fn query_filters_and_combine() {
        let store = seed_store();
        let active = store.query("widget", &[Filter::eq("active", true)]).unwrap();
        assert_eq!(active.len(), 2);

        let narrowed = store
            .query(
                "widget",
                &[Filter::eq("active", true), Filter::eq("name", "beta")],
            )
            .unwrap();
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].id, RecordId::new("w2"));
    }

    // ---- Test 4: empty filter list enumerates the container ----
    #[test]
    fn query_no_filters_enumerates_all() {
        let store = seed_store();
        assert_eq!(store.query("widget", &[]).unwrap().len(), 3);
        assert!(store.query("gadget", &[]).unwrap().is_empty());
    }

    // ---- Test 5: find_unique happy path ----
    #[test]
    fn find_unique_single_match() {
        let store = seed_store();
        let row = store
            .find_unique("widget", &[Filter::eq("name", "gamma")])
            .unwrap();
        assert_eq!(row.id, RecordId::new("w3"));
    }

    // ---- Test 6: find_unique with zero matches ----
    #[test]
    fn find_unique_zero_matches_is_not_found() {
        let store = seed_store();
        let err = store
            .find_unique("widget", &[Filter::eq("name", "delta")])
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    // ---- Test 7: find_unique with two matches ----
    #[test]
    fn find_unique_two_matches_is_ambiguous() {
        let store = seed_store();
        let err = store
            .find_unique("widget", &[Filter::eq("active", true)])
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::AmbiguousResult { matched: 2, .. }
        ));
    }

    // ---- Test 8: insert replaces by identifier ----
    #[test]
    fn insert_replaces_same_id() {
        let store = seed_store();
        store.insert(Record::new("widget", "w1").with_field("name", json!("renamed")));
        assert_eq!(store.len(), 3);
        let row = store.get("widget", &RecordId::new("w1")).unwrap().unwrap();
        assert_eq!(row.field_str("name"), Some("renamed"));
    }

    // ---- Test 9: remove ----
    #[test]
    fn remove_row() {
        let store = seed_store();
        assert!(store.remove("widget", &RecordId::new("w1")));
        assert!(!store.remove("widget", &RecordId::new("w1")));
        assert_eq!(store.len(), 2);
    }
}
