use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel the host platform returns when the caller has no scope.
pub const NO_SCOPE_SENTINEL: &str = "rhino.global";

/// Canonical label for the unscoped ("global") application scope.
pub const GLOBAL_SCOPE: &str = "global";

/// Logical application scope a bundle belongs to.
///
/// The host reports "no scope" with a sentinel value; [`ScopeName::normalize`]
/// maps it (and the empty string) to the canonical [`GLOBAL_SCOPE`] label so
/// bundle lookups are stable regardless of which form the resolver returns.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeName(String);

impl ScopeName {
    /// The canonical global scope.
    pub fn global() -> Self {
        Self(GLOBAL_SCOPE.to_string())
    }

    /// Normalize a raw scope label from the host.
    ///
    /// The no-scope sentinel and the empty string both map to
    /// [`GLOBAL_SCOPE`]; anything else is taken verbatim.
    pub fn normalize(raw: &str) -> Self {
        if raw.is_empty() || raw == NO_SCOPE_SENTINEL {
            Self::global()
        } else {
            Self(raw.to_string())
        }
    }

    /// The normalized scope label.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the global scope.
    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_SCOPE
    }
}

impl fmt::Debug for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeName({})", self.0)
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_normalizes_to_global() {
        let scope = ScopeName::normalize(NO_SCOPE_SENTINEL);
        assert!(scope.is_global());
        assert_eq!(scope.as_str(), "global");
    }

    #[test]
    fn empty_normalizes_to_global() {
        assert!(ScopeName::normalize("").is_global());
    }

    #[test]
    fn named_scope_passes_through() {
        let scope = ScopeName::normalize("x_acme_tools");
        assert!(!scope.is_global());
        assert_eq!(scope.as_str(), "x_acme_tools");
    }
}
