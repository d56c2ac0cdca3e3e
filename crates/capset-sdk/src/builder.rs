//! The capture builder: traversal, accumulation, and commit orchestration.

use std::sync::Arc;

use tracing::{debug, warn};

use capset_bundle::{BundleManager, ScopeResolver};
use capset_graph::{CaptureSet, RuleSet, Traversal};
use capset_store::RecordStore;
use capset_types::{ObjectRef, RecordId};

use crate::commit::{CommitResult, EntryOutcome, EntryRecord, SkipReason};
use crate::error::{SdkError, SdkResult};

/// Lifecycle state of a [`CaptureBuilder`].
///
/// Idle → Capturing on the first recorded entry, Capturing → Committing on
/// commit entry, and back to Idle on commit exit whether the commit
/// succeeded or failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderState {
    Idle,
    Capturing,
    Committing,
}

/// Builds a capture set against a record store and flushes it into a
/// named bundle.
///
/// The record store, bundle manager, and scope resolver are injected
/// collaborators. The builder is single-threaded and synchronous; the
/// active-bundle switch during commit is session-global state, so callers
/// must not switch bundles concurrently from the same session.
pub struct CaptureBuilder<S, B, R> {
    store: Arc<S>,
    bundles: Arc<B>,
    scopes: R,
    rules: RuleSet,
    set: CaptureSet,
    state: BuilderState,
}

impl<S, B, R> CaptureBuilder<S, B, R>
where
    S: RecordStore,
    B: BundleManager,
    R: ScopeResolver,
{
    /// Create a builder with an empty capture set.
    pub fn new(store: Arc<S>, bundles: Arc<B>, scopes: R, rules: RuleSet) -> Self {
        Self {
            store,
            bundles,
            scopes,
            rules,
            set: CaptureSet::new(),
            state: BuilderState::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Number of unique records captured so far.
    pub fn count(&self) -> usize {
        self.set.count()
    }

    /// The accumulated capture set.
    pub fn capture_set(&self) -> &CaptureSet {
        &self.set
    }

    /// Record a single identity into the capture set.
    ///
    /// Returns whether an insertion occurred. An empty identifier is a
    /// silent no-op, never an error.
    pub fn record(&mut self, reference: &ObjectRef) -> bool {
        let inserted = self.set.record(reference);
        if inserted && self.state == BuilderState::Idle {
            self.state = BuilderState::Capturing;
        }
        inserted
    }

    /// Run a named traversal strategy from `root`, feeding every
    /// discovered identity into the capture set.
    ///
    /// A traversal failure aborts this call only; identities recorded
    /// before the failure stay in the set.
    pub fn begin_traversal(&mut self, strategy: &str, root: &ObjectRef) -> SdkResult<()> {
        if self.state == BuilderState::Committing {
            return Err(SdkError::State { state: self.state });
        }

        let traversal = Traversal::new(self.store.as_ref(), &self.rules);
        let outcome = traversal.run(strategy, root, &mut self.set);
        if !self.set.is_empty() {
            self.state = BuilderState::Capturing;
        }
        outcome.map_err(SdkError::from)
    }

    /// Flush the capture set into the named bundle in the caller's scope.
    ///
    /// The bundle is created lazily if absent. Every entry is re-resolved
    /// and written under the target bundle; a failure for one entry is
    /// reported in the result and never aborts the loop. On every exit
    /// path after the commit proper starts, the capture set is cleared
    /// and the pre-commit active bundle is restored; a failed restore is
    /// flagged on the result, not raised.
    ///
    /// An empty bundle name fails fast with `InvalidArgument` and leaves
    /// the capture set intact.
    pub fn commit(&mut self, bundle_name: &str) -> SdkResult<CommitResult> {
        if bundle_name.trim().is_empty() {
            return Err(SdkError::InvalidArgument {
                what: "bundle name must not be empty".to_string(),
            });
        }
        if self.state == BuilderState::Committing {
            return Err(SdkError::State { state: self.state });
        }

        self.state = BuilderState::Committing;
        let outcome = self.commit_inner(bundle_name);
        // Flush-and-reset on success or failure, never a partial clear.
        self.set.clear();
        self.state = BuilderState::Idle;
        outcome
    }

    fn commit_inner(&self, bundle_name: &str) -> SdkResult<CommitResult> {
        let scope = self.scopes.current_scope();
        let bundle = self.bundles.get_or_create(&scope, bundle_name)?;

        let previous = self.bundles.active()?;
        self.bundles.set_active(&bundle.id)?;
        let guard = SwitchGuard {
            bundles: self.bundles.as_ref(),
            previous,
            armed: true,
        };

        let mut result = CommitResult::new(bundle);
        let entries: Vec<ObjectRef> = self.set.refs().collect();
        debug!(
            bundle = %result.bundle,
            entries = entries.len(),
            "committing capture set"
        );

        for reference in entries {
            let outcome = self.write_entry(&reference);
            if let EntryOutcome::Skipped(reason) = &outcome {
                warn!(entry = %reference, ?reason, "skipped capture entry");
            }
            result.entries.push(EntryRecord { reference, outcome });
        }

        result.restore_failed = !guard.restore();
        Ok(result)
    }

    /// Re-resolve one capture-set entry and write it into the active
    /// bundle. Infallible by construction: every failure becomes a typed
    /// skip.
    fn write_entry(&self, reference: &ObjectRef) -> EntryOutcome {
        match self.store.get(&reference.container, &reference.id) {
            Ok(Some(row)) => match self.bundles.write_entry(&row) {
                Ok(()) => EntryOutcome::Written,
                Err(e) => EntryOutcome::Skipped(SkipReason::WriteFailed(e.to_string())),
            },
            Ok(None) => EntryOutcome::Skipped(SkipReason::MissingSource),
            Err(e) => EntryOutcome::Skipped(SkipReason::ResolveFailed(e.to_string())),
        }
    }
}

/// Restores the pre-commit active bundle.
///
/// `restore` reports whether restoration succeeded; the `Drop` arm is the
/// panic-safety net and restores best-effort.
struct SwitchGuard<'a, B: BundleManager + ?Sized> {
    bundles: &'a B,
    previous: Option<RecordId>,
    armed: bool,
}

impl<B: BundleManager + ?Sized> SwitchGuard<'_, B> {
    fn restore(mut self) -> bool {
        self.armed = false;
        Self::do_restore(self.bundles, self.previous.as_ref())
    }

    fn do_restore(bundles: &B, previous: Option<&RecordId>) -> bool {
        let outcome = match previous {
            Some(prev) => bundles.set_active(prev),
            None => bundles.clear_active(),
        };
        match outcome {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to restore pre-commit active bundle");
                false
            }
        }
    }
}

impl<B: BundleManager + ?Sized> Drop for SwitchGuard<'_, B> {
    fn drop(&mut self) {
        if self.armed {
            let _ = Self::do_restore(self.bundles, self.previous.as_ref());
        }
    }
}
