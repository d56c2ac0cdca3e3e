use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use capset_types::{ObjectRef, RecordId};

/// A single row from the record store.
///
/// Fields carry their stored value; reference fields additionally carry a
/// dereferenced display label in a separate channel, mirroring the host
/// store's value/display split.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Container the row belongs to.
    pub container: String,
    /// Host-store identifier of the row.
    pub id: RecordId,
    /// Named field values.
    fields: BTreeMap<String, Value>,
    /// Dereferenced display labels for reference fields.
    displays: BTreeMap<String, String>,
}

impl Record {
    /// Create a row with no fields.
    pub fn new(container: impl Into<String>, id: impl Into<RecordId>) -> Self {
        Self {
            container: container.into(),
            id: id.into(),
            fields: BTreeMap::new(),
            displays: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder-style display label for a reference field.
    pub fn with_display(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.displays.insert(name.into(), label.into());
        self
    }

    /// The stored value of a field, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The stored value of a field as a string slice.
    ///
    /// Returns `None` for absent fields and for non-string values.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// The dereferenced display label of a reference field, falling back
    /// to the stored value for plain fields.
    pub fn display(&self, name: &str) -> Option<&str> {
        self.displays
            .get(name)
            .map(String::as_str)
            .or_else(|| self.field_str(name))
    }

    /// The identity of this row.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            id: self.id.clone(),
            container: self.container.clone(),
        }
    }

    /// Whether every filter matches this row (AND-combined).
    pub fn matches(&self, filters: &[Filter]) -> bool {
        filters
            .iter()
            .all(|f| self.fields.get(&f.field) == Some(&f.value))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({}:{})", self.container, self.id)
    }
}

/// A single `field = value` predicate. Queries AND-combine their filters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    /// Create an equality predicate.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Render filters for error messages: `field=value, field=value`.
pub(crate) fn describe_filters(filters: &[Filter]) -> String {
    if filters.is_empty() {
        return "<no filters>".to_string();
    }
    filters
        .iter()
        .map(|f| format!("{}={}", f.field, f.value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_access() {
        let row = Record::new("t1", "x1")
            .with_field("name", "widget")
            .with_field("order", json!(100));
        assert_eq!(row.field_str("name"), Some("widget"));
        assert_eq!(row.field("order"), Some(&json!(100)));
        assert!(row.field("missing").is_none());
    }

    #[test]
    fn display_falls_back_to_value() {
        let row = Record::new("t1", "x1")
            .with_field("parent", "p9")
            .with_display("parent", "Parent Widget")
            .with_field("name", "widget");
        assert_eq!(row.display("parent"), Some("Parent Widget"));
        assert_eq!(row.display("name"), Some("widget"));
    }

    #[test]
    fn filters_and_combine() {
        let row = Record::new("t1", "x1")
            .with_field("kind", "a")
            .with_field("active", true);
        assert!(row.matches(&[Filter::eq("kind", "a")]));
        assert!(row.matches(&[Filter::eq("kind", "a"), Filter::eq("active", true)]));
        assert!(!row.matches(&[Filter::eq("kind", "a"), Filter::eq("active", false)]));
    }

    #[test]
    fn object_ref_identity() {
        let row = Record::new("t1", "x1");
        assert_eq!(row.object_ref(), ObjectRef::new("x1", "t1"));
    }
}
