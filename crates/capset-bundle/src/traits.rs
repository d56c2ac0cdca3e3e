use capset_store::Record;
use capset_types::{RecordId, ScopeName};

use crate::error::{BundleError, BundleResult};
use crate::types::Bundle;

/// Boundary to the host platform's bundle manager.
///
/// The "active bundle" is session-global state on the host side: every
/// entry write lands in whichever bundle is active at that moment. The
/// commit orchestrator treats switch/restore as a critical section; if a
/// concurrent actor in the same session also switches bundles mid-commit,
/// behavior is undefined and is the caller's responsibility to avoid.
pub trait BundleManager: Send + Sync {
    /// Look up a bundle by scope and name.
    ///
    /// Returns `Ok(None)` if no such bundle exists.
    fn get(&self, scope: &ScopeName, name: &str) -> BundleResult<Option<Bundle>>;

    /// Create a bundle with the given scope and name.
    fn create(&self, scope: &ScopeName, name: &str) -> BundleResult<Bundle>;

    /// The currently active bundle id, if any.
    fn active(&self) -> BundleResult<Option<RecordId>>;

    /// Switch the session's active bundle.
    ///
    /// Fails with [`BundleError::UnknownBundle`] if the id does not name
    /// an existing bundle.
    fn set_active(&self, id: &RecordId) -> BundleResult<()>;

    /// Leave the session with no active bundle.
    ///
    /// Used to restore the pre-commit state when no bundle was active.
    fn clear_active(&self) -> BundleResult<()>;

    /// Write a row into the currently active bundle.
    ///
    /// On the host platform this cascades into platform-defined child
    /// capture; that side effect is opaque to this engine.
    fn write_entry(&self, record: &Record) -> BundleResult<()>;

    /// Look up a bundle, creating it if absent.
    fn get_or_create(&self, scope: &ScopeName, name: &str) -> BundleResult<Bundle> {
        if name.is_empty() {
            return Err(BundleError::InvalidArgument {
                what: "bundle name must not be empty".to_string(),
            });
        }
        match self.get(scope, name)? {
            Some(bundle) => Ok(bundle),
            None => self.create(scope, name),
        }
    }
}

/// Boundary to the host platform's scope resolution.
pub trait ScopeResolver: Send + Sync {
    /// The caller's current scope label exactly as the host reports it,
    /// sentinel included.
    fn current_scope_raw(&self) -> String;

    /// The caller's current scope, normalized.
    ///
    /// The host's "no scope" sentinel and the empty string both map to the
    /// canonical global label.
    fn current_scope(&self) -> ScopeName {
        ScopeName::normalize(&self.current_scope_raw())
    }
}
