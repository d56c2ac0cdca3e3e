use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned to a record by the host store.
///
/// The engine never interprets the identifier beyond equality and
/// emptiness. Identical identifiers always name the same record, making
/// captured records deduplicatable by value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a raw identifier string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The empty identifier. Represents "no record".
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns `true` if this identifier is empty.
    ///
    /// Malformed intermediate lookups produce empty identifiers; the
    /// capture path treats them as silent no-ops.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for RecordId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a capturable unit: record identifier plus the container
/// (table / record kind) it lives in.
///
/// Equality is by value on both fields, never by reference.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Host-store identifier of the record.
    pub id: RecordId,
    /// Name of the container the record belongs to.
    pub container: String,
}

impl ObjectRef {
    /// Create a reference from an identifier and container name.
    pub fn new(id: impl Into<RecordId>, container: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            container: container.into(),
        }
    }

    /// Returns `true` if the identifier is empty (nothing to capture).
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({}:{})", self.container, self.id)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.container, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_equality_by_value() {
        let a = RecordId::new("abc123");
        let b = RecordId::from("abc123");
        assert_eq!(a, b);
    }

    #[test]
    fn empty_record_id() {
        assert!(RecordId::empty().is_empty());
        assert!(!RecordId::new("x").is_empty());
    }

    #[test]
    fn object_ref_equality_by_value() {
        let a = ObjectRef::new("x1", "t1");
        let b = ObjectRef::new("x1", "t1");
        let c = ObjectRef::new("x1", "t2");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn object_ref_display() {
        let r = ObjectRef::new("x1", "t1");
        assert_eq!(r.to_string(), "t1:x1");
    }
}
