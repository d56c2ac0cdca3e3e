//! In-memory bundle manager and scope resolver for tests and embedding.
//!
//! [`InMemoryBundleManager`] keeps every active-bundle switch in a log so
//! tests can assert that commit pairs each switch with a restore. Entry
//! writes record the row's identity only; the host platform's cascading
//! child capture is out of scope here.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use capset_store::Record;
use capset_types::{ObjectRef, RecordId, ScopeName, NO_SCOPE_SENTINEL};

use crate::error::{BundleError, BundleResult};
use crate::traits::{BundleManager, ScopeResolver};
use crate::types::Bundle;

/// An in-memory implementation of [`BundleManager`].
#[derive(Debug, Default)]
pub struct InMemoryBundleManager {
    bundles: RwLock<Vec<Bundle>>,
    active: RwLock<Option<RecordId>>,
    switch_log: RwLock<Vec<RecordId>>,
    entries: RwLock<HashMap<RecordId, Vec<ObjectRef>>>,
    refuse_switch_to: RwLock<Option<RecordId>>,
    next_id: AtomicU64,
}

impl InMemoryBundleManager {
    /// Create a new empty bundle manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `set_active` target in call order.
    pub fn switches(&self) -> Vec<RecordId> {
        self.switch_log.read().expect("lock poisoned").clone()
    }

    /// Identities written into the given bundle, in write order.
    pub fn entries(&self, bundle: &RecordId) -> Vec<ObjectRef> {
        self.entries
            .read()
            .expect("lock poisoned")
            .get(bundle)
            .cloned()
            .unwrap_or_default()
    }

    /// Test hook: make the next and all later switches to `id` fail.
    ///
    /// Used to exercise the failed-restore path of the commit orchestrator.
    pub fn refuse_switch_to(&self, id: RecordId) {
        *self.refuse_switch_to.write().expect("lock poisoned") = Some(id);
    }
}

impl BundleManager for InMemoryBundleManager {
    fn get(&self, scope: &ScopeName, name: &str) -> BundleResult<Option<Bundle>> {
        let bundles = self
            .bundles
            .read()
            .map_err(|e| BundleError::Backend(format!("lock poisoned: {e}")))?;
        Ok(bundles
            .iter()
            .find(|b| &b.scope == scope && b.name == name)
            .cloned())
    }

    fn create(&self, scope: &ScopeName, name: &str) -> BundleResult<Bundle> {
        let seq = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let bundle = Bundle::new(format!("bundle-{seq}"), scope.clone(), name);
        tracing::debug!(bundle = %bundle, "created bundle");
        self.bundles
            .write()
            .map_err(|e| BundleError::Backend(format!("lock poisoned: {e}")))?
            .push(bundle.clone());
        Ok(bundle)
    }

    fn active(&self) -> BundleResult<Option<RecordId>> {
        let active = self
            .active
            .read()
            .map_err(|e| BundleError::Backend(format!("lock poisoned: {e}")))?;
        Ok(active.clone())
    }

    fn set_active(&self, id: &RecordId) -> BundleResult<()> {
        if let Some(refused) = self
            .refuse_switch_to
            .read()
            .expect("lock poisoned")
            .as_ref()
        {
            if refused == id {
                return Err(BundleError::Backend(format!("switch to {id} refused")));
            }
        }

        let known = self
            .bundles
            .read()
            .map_err(|e| BundleError::Backend(format!("lock poisoned: {e}")))?
            .iter()
            .any(|b| &b.id == id);
        if !known {
            return Err(BundleError::UnknownBundle { id: id.clone() });
        }

        self.switch_log
            .write()
            .expect("lock poisoned")
            .push(id.clone());
        *self
            .active
            .write()
            .map_err(|e| BundleError::Backend(format!("lock poisoned: {e}")))? = Some(id.clone());
        Ok(())
    }

    fn clear_active(&self) -> BundleResult<()> {
        *self
            .active
            .write()
            .map_err(|e| BundleError::Backend(format!("lock poisoned: {e}")))? = None;
        Ok(())
    }

    fn write_entry(&self, record: &Record) -> BundleResult<()> {
        let active = self.active()?.ok_or(BundleError::NoActiveBundle)?;
        self.entries
            .write()
            .map_err(|e| BundleError::Backend(format!("lock poisoned: {e}")))?
            .entry(active)
            .or_default()
            .push(record.object_ref());
        Ok(())
    }
}

/// A [`ScopeResolver`] that reports a fixed scope label.
///
/// Defaults to the host's no-scope sentinel, which normalizes to "global".
#[derive(Clone, Debug)]
pub struct FixedScopeResolver {
    raw: String,
}

impl FixedScopeResolver {
    /// Resolver reporting the given raw label.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Resolver reporting the no-scope sentinel.
    pub fn unscoped() -> Self {
        Self::new(NO_SCOPE_SENTINEL)
    }
}

impl ScopeResolver for FixedScopeResolver {
    fn current_scope_raw(&self) -> String {
        self.raw.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Test 1: get-or-create is lazy ----
    #[test]
    fn get_or_create_creates_once() {
        let mgr = InMemoryBundleManager::new();
        let scope = ScopeName::global();

        assert!(mgr.get(&scope, "release-1").unwrap().is_none());
        let b1 = mgr.get_or_create(&scope, "release-1").unwrap();
        let b2 = mgr.get_or_create(&scope, "release-1").unwrap();
        assert_eq!(b1, b2);
    }

    // ---- Test 2: empty bundle name is rejected ----
    #[test]
    fn get_or_create_rejects_empty_name() {
        let mgr = InMemoryBundleManager::new();
        let err = mgr.get_or_create(&ScopeName::global(), "").unwrap_err();
        assert!(matches!(err, BundleError::InvalidArgument { .. }));
    }

    // ---- Test 3: same name in different scopes is two bundles ----
    #[test]
    fn scopes_partition_bundles() {
        let mgr = InMemoryBundleManager::new();
        let global = mgr.get_or_create(&ScopeName::global(), "release").unwrap();
        let scoped = mgr
            .get_or_create(&ScopeName::normalize("x_acme"), "release")
            .unwrap();
        assert_ne!(global.id, scoped.id);
    }

    // ---- Test 4: switch log records every set_active ----
    #[test]
    fn switch_log_records_targets() {
        let mgr = InMemoryBundleManager::new();
        let scope = ScopeName::global();
        let a = mgr.create(&scope, "a").unwrap();
        let b = mgr.create(&scope, "b").unwrap();

        mgr.set_active(&a.id).unwrap();
        mgr.set_active(&b.id).unwrap();
        mgr.set_active(&a.id).unwrap();

        assert_eq!(mgr.switches(), vec![a.id.clone(), b.id, a.id.clone()]);
        assert_eq!(mgr.active().unwrap(), Some(a.id));
    }

    // ---- Test 5: switching to an unknown bundle fails ----
    #[test]
    fn switch_to_unknown_bundle_fails() {
        let mgr = InMemoryBundleManager::new();
        let err = mgr.set_active(&RecordId::new("ghost")).unwrap_err();
        assert!(matches!(err, BundleError::UnknownBundle { .. }));
        assert!(mgr.active().unwrap().is_none());
    }

    // ---- Test 6: entry writes land in the active bundle ----
    #[test]
    fn write_entry_targets_active_bundle() {
        let mgr = InMemoryBundleManager::new();
        let scope = ScopeName::global();
        let a = mgr.create(&scope, "a").unwrap();
        let b = mgr.create(&scope, "b").unwrap();

        mgr.set_active(&a.id).unwrap();
        mgr.write_entry(&Record::new("t1", "x1")).unwrap();
        mgr.set_active(&b.id).unwrap();
        mgr.write_entry(&Record::new("t1", "x2")).unwrap();

        assert_eq!(mgr.entries(&a.id), vec![ObjectRef::new("x1", "t1")]);
        assert_eq!(mgr.entries(&b.id), vec![ObjectRef::new("x2", "t1")]);
    }

    // ---- Test 7: entry write with no active bundle fails ----
    #[test]
    fn write_entry_without_active_bundle_fails() {
        let mgr = InMemoryBundleManager::new();
        let err = mgr.write_entry(&Record::new("t1", "x1")).unwrap_err();
        assert!(matches!(err, BundleError::NoActiveBundle));
    }

    // ---- Test 8: refused switch leaves active unchanged ----
    #[test]
    fn refused_switch_fails_and_keeps_active() {
        let mgr = InMemoryBundleManager::new();
        let scope = ScopeName::global();
        let a = mgr.create(&scope, "a").unwrap();
        let b = mgr.create(&scope, "b").unwrap();

        mgr.set_active(&a.id).unwrap();
        mgr.refuse_switch_to(b.id.clone());
        assert!(mgr.set_active(&b.id).is_err());
        assert_eq!(mgr.active().unwrap(), Some(a.id));
    }

    // ---- Test 9: clear_active leaves no active bundle ----
    #[test]
    fn clear_active_resets_session() {
        let mgr = InMemoryBundleManager::new();
        let a = mgr.create(&ScopeName::global(), "a").unwrap();
        mgr.set_active(&a.id).unwrap();
        mgr.clear_active().unwrap();
        assert!(mgr.active().unwrap().is_none());
    }

    // ---- Test 10: fixed resolver normalization ----
    #[test]
    fn fixed_resolver_normalizes_sentinel() {
        assert!(FixedScopeResolver::unscoped().current_scope().is_global());
        assert_eq!(
            FixedScopeResolver::new("x_acme").current_scope().as_str(),
            "x_acme"
        );
    }
}
