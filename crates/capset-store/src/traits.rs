use capset_types::RecordId;

use crate::error::{StoreError, StoreResult};
use crate::record::{describe_filters, Filter, Record};

/// Read-only boundary to the host platform's record store.
///
/// All implementations must satisfy these invariants:
/// - Lookups never mutate store state; the capture engine is read-only.
/// - `get` returns `Ok(None)` for an unknown identifier, never an error.
/// - `query` AND-combines its filters; an empty filter list enumerates the
///   whole container.
/// - Backend failures are propagated, never silently ignored.
pub trait RecordStore: Send + Sync {
    /// Fetch a single row by container and identifier.
    ///
    /// Returns `Ok(None)` if the row does not exist.
    fn get(&self, container: &str, id: &RecordId) -> StoreResult<Option<Record>>;

    /// Enumerate rows in `container` matching every filter.
    fn query(&self, container: &str, filters: &[Filter]) -> StoreResult<Vec<Record>>;

    /// Fetch exactly one row matching the filters.
    ///
    /// Fails with [`StoreError::NotFound`] on zero matches and
    /// [`StoreError::AmbiguousResult`] on more than one.
    fn find_unique(&self, container: &str, filters: &[Filter]) -> StoreResult<Record> {
        let mut rows = self.query(container, filters)?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            0 => Err(StoreError::NotFound {
                container: container.to_string(),
                criteria: describe_filters(filters),
            }),
            n => Err(StoreError::AmbiguousResult {
                container: container.to_string(),
                criteria: describe_filters(filters),
                matched: n,
            }),
        }
    }
}
