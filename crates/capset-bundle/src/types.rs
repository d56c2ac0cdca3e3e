use std::fmt;

use serde::{Deserialize, Serialize};

use capset_types::{RecordId, ScopeName};

/// A named deployment bundle within a scope.
///
/// Bundles are records in the host store themselves, so they carry a
/// [`RecordId`]. The (scope, name) pair is the lookup key; the id is what
/// the session's active-bundle slot points at.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: RecordId,
    pub scope: ScopeName,
    pub name: String,
}

impl Bundle {
    pub fn new(id: impl Into<RecordId>, scope: ScopeName, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scope,
            name: name.into(),
        }
    }
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bundle({}/{} -> {})", self.scope, self.name, self.id)
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.name)
    }
}
