//! The generic strategy interpreter.
//!
//! [`Traversal`] executes a named strategy's steps against a record store,
//! feeding every discovered identity into a [`CaptureSet`]. Recursive
//! strategies carry the active recursion path as a stack; a row whose
//! identifier is already on the path is skipped rather than re-expanded,
//! so cyclic data terminates.

use serde_json::Value;
use tracing::{debug, warn};

use capset_store::{Filter, Record, RecordStore, StoreError};
use capset_types::{ObjectRef, RecordId};

use crate::capture::CaptureSet;
use crate::error::{GraphError, GraphResult};
use crate::rules::RuleSet;
use crate::strategy::{FilterSpec, Step, Strategy, ValueSource};

/// Interprets traversal strategies against a record store and rule set.
pub struct Traversal<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    rules: &'a RuleSet,
}

impl<'a, S: RecordStore + ?Sized> Traversal<'a, S> {
    /// Create an interpreter over the given store and rule table.
    pub fn new(store: &'a S, rules: &'a RuleSet) -> Self {
        Self { store, rules }
    }

    /// Run the named strategy from `root`, accumulating into `set`.
    ///
    /// Fails fast with [`GraphError::InvalidArgument`] before any lookup if
    /// the root is missing its identifier or container. Store contract
    /// violations (`NotFound`, `AmbiguousResult`) abort the whole call;
    /// the capture set keeps whatever was recorded before the failure.
    pub fn run(
        &self,
        strategy_name: &str,
        root: &ObjectRef,
        set: &mut CaptureSet,
    ) -> GraphResult<()> {
        if root.id.is_empty() {
            return Err(GraphError::InvalidArgument {
                what: "traversal root identifier must not be empty".to_string(),
            });
        }
        if root.container.is_empty() {
            return Err(GraphError::InvalidArgument {
                what: "traversal root container must not be empty".to_string(),
            });
        }

        let strategy = self.rules.strategy(strategy_name)?;
        debug!(strategy = strategy_name, root = %root, "begin traversal");
        let mut path = Vec::new();
        self.run_strategy(strategy, root, set, &mut path)
    }

    fn run_strategy(
        &self,
        strategy: &Strategy,
        root: &ObjectRef,
        set: &mut CaptureSet,
        path: &mut Vec<RecordId>,
    ) -> GraphResult<()> {
        if path.contains(&root.id) {
            debug!(root = %root, "already on recursion path, skipping re-expansion");
            return Ok(());
        }

        path.push(root.id.clone());
        let outcome = strategy
            .steps
            .iter()
            .try_for_each(|step| self.run_step(step, root, set, path));
        path.pop();
        outcome
    }

    fn run_step(
        &self,
        step: &Step,
        root: &ObjectRef,
        set: &mut CaptureSet,
        path: &mut Vec<RecordId>,
    ) -> GraphResult<()> {
        match step {
            Step::Direct => {
                set.record(root);
                Ok(())
            }

            Step::QueryChildren { container, filters } => {
                let filters = self.resolve_filters(filters, root)?;
                for row in self.store.query(container, &filters)? {
                    set.record(&row.object_ref());
                }
                Ok(())
            }

            Step::QueryAndRecurse {
                container,
                filters,
                strategy,
            } => {
                let child_strategy = self.rules.strategy(strategy)?;
                let filters = self.resolve_filters(filters, root)?;
                for row in self.store.query(container, &filters)? {
                    let child = row.object_ref();
                    set.record(&child);
                    self.run_strategy(child_strategy, &child, set, path)?;
                }
                Ok(())
            }

            Step::UniqueLookup {
                container,
                filters,
                optional,
            } => {
                let filters = self.resolve_filters(filters, root)?;
                match self.store.find_unique(container, &filters) {
                    Ok(row) => {
                        set.record(&row.object_ref());
                        Ok(())
                    }
                    Err(StoreError::NotFound { .. }) if *optional => {
                        warn!(
                            container = container.as_str(),
                            root = %root,
                            "optional related record absent, continuing capture"
                        );
                        Ok(())
                    }
                    Err(e) => Err(e.into()),
                }
            }

            Step::ConditionalBranch {
                discriminant,
                arms,
                default,
            } => {
                let row = self.root_row(root)?;
                let value = row.field_str(discriminant).unwrap_or_default();
                let steps = arms
                    .iter()
                    .find(|arm| arm.value == value)
                    .map(|arm| arm.steps.as_slice())
                    .unwrap_or(default.as_slice());
                steps
                    .iter()
                    .try_for_each(|s| self.run_step(s, root, set, path))
            }

            Step::ApplyRules => self
                .rules
                .expansion_steps(&root.container)
                .iter()
                .try_for_each(|s| self.run_step(s, root, set, path)),
        }
    }

    /// Resolve filter specs into concrete store filters for this root.
    ///
    /// `RootField` sources require the root row; a missing root row
    /// surfaces as `NotFound`. A field absent from the row filters as
    /// `null`, which matches nothing stored.
    fn resolve_filters(&self, specs: &[FilterSpec], root: &ObjectRef) -> GraphResult<Vec<Filter>> {
        let mut filters = Vec::with_capacity(specs.len());
        for spec in specs {
            let value = match &spec.source {
                ValueSource::Literal(value) => value.clone(),
                ValueSource::RootId => Value::String(root.id.as_str().to_string()),
                ValueSource::RootField(name) => {
                    let row = self.root_row(root)?;
                    row.field(name).cloned().unwrap_or(Value::Null)
                }
            };
            filters.push(Filter {
                field: spec.field.clone(),
                value,
            });
        }
        Ok(filters)
    }

    fn root_row(&self, root: &ObjectRef) -> GraphResult<Record> {
        self.store
            .get(&root.container, &root.id)?
            .ok_or_else(|| {
                StoreError::NotFound {
                    container: root.container.clone(),
                    criteria: format!("id={}", root.id),
                }
                .into()
            })
    }
}
