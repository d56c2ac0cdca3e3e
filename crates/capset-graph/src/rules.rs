//! The data-driven traversal rule table.
//!
//! Each [`TraversalRule`] row declares how one container kind expands into
//! a related container kind: rows in `target_container` whose
//! `relation_field` points back at the source record. The rule table plus
//! the generic interpreter replace what would otherwise be one hand-written
//! capture function per container kind.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::strategy::{FilterSpec, Step, Strategy};

/// How many related rows a rule expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// Exactly one related row (a required one, unless `optional`).
    One,
    /// Zero or more related rows.
    Many,
}

/// Declarative description of one relation edge in the record graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraversalRule {
    /// Container kind this rule expands.
    pub source_container: String,
    /// Field on target rows referencing the source record's identifier.
    pub relation_field: String,
    /// Container kind of the related rows.
    pub target_container: String,
    /// Whether the relation is one-to-one or one-to-many.
    pub cardinality: Cardinality,
    /// For `One` relations: absence is a logged warning, not a failure.
    pub optional: bool,
}

impl TraversalRule {
    /// A one-to-many relation edge.
    pub fn many(
        source_container: impl Into<String>,
        relation_field: impl Into<String>,
        target_container: impl Into<String>,
    ) -> Self {
        Self {
            source_container: source_container.into(),
            relation_field: relation_field.into(),
            target_container: target_container.into(),
            cardinality: Cardinality::Many,
            optional: false,
        }
    }

    /// A required one-to-one relation edge.
    pub fn one(
        source_container: impl Into<String>,
        relation_field: impl Into<String>,
        target_container: impl Into<String>,
    ) -> Self {
        Self {
            source_container: source_container.into(),
            relation_field: relation_field.into(),
            target_container: target_container.into(),
            cardinality: Cardinality::One,
            optional: false,
        }
    }

    /// Mark a `One` relation as tolerable when absent.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Compile this rule row into the step the interpreter runs.
    pub fn to_step(&self) -> Step {
        let filters = vec![FilterSpec::root_id(&self.relation_field)];
        match self.cardinality {
            Cardinality::Many => Step::QueryChildren {
                container: self.target_container.clone(),
                filters,
            },
            Cardinality::One => Step::UniqueLookup {
                container: self.target_container.clone(),
                filters,
                optional: self.optional,
            },
        }
    }
}

/// The fixed rule table plus the strategy registry, keyed by name.
///
/// Built once per embedding application via [`RuleSet::builder`]; the
/// traversal engine only ever reads it.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: HashMap<String, Vec<TraversalRule>>,
    strategies: HashMap<String, Strategy>,
}

impl RuleSet {
    /// Start building a rule set.
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// All rule rows registered for a source container.
    pub fn rules_for(&self, container: &str) -> &[TraversalRule] {
        self.rules.get(container).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Steps compiled from every rule registered for a source container.
    pub fn expansion_steps(&self, container: &str) -> Vec<Step> {
        self.rules_for(container)
            .iter()
            .map(TraversalRule::to_step)
            .collect()
    }

    /// Look up a registered strategy by name.
    pub fn strategy(&self, name: &str) -> GraphResult<&Strategy> {
        self.strategies
            .get(name)
            .ok_or_else(|| GraphError::UnknownStrategy {
                name: name.to_string(),
            })
    }

    /// Number of registered strategies.
    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }
}

/// Builder for [`RuleSet`].
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: HashMap<String, Vec<TraversalRule>>,
    strategies: HashMap<String, Strategy>,
}

impl RuleSetBuilder {
    /// Add a rule row, keyed by its source container.
    pub fn rule(mut self, rule: TraversalRule) -> Self {
        self.rules
            .entry(rule.source_container.clone())
            .or_default()
            .push(rule);
        self
    }

    /// Register a named strategy, replacing any previous one of that name.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategies.insert(strategy.name.clone(), strategy);
        self
    }

    /// Finish building.
    pub fn build(self) -> RuleSet {
        RuleSet {
            rules: self.rules,
            strategies: self.strategies,
        }
    }
}
