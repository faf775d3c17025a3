// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Match engine for classification rules.
//!
//! Each supported target kind has a [`Matcher`] that knows two things about the
//! kind: how to turn criteria into a list-time [`ListFilter`] and how to evaluate
//! the full criteria against one object. Matchers are looked up through a
//! [`MatcherRegistry`] keyed by [`TargetKind`], so supporting a new kind is one
//! registration.
//!
//! Evaluation short-circuits on the first failing criterion. The returned
//! [`MatchOutcome`] lists the identifiers of every check that passed, in
//! evaluation order, for diagnostics.
//!
//! # Example
//!
//! ```rust
//! use autolabeller::crd::{MatchCriteria, PodMatchCriteria, TargetKind};
//! use autolabeller::matching::MatcherRegistry;
//! use autolabeller::target::TargetObject;
//! use k8s_openapi::api::core::v1::{Container, Pod, PodSpec};
//!
//! let registry = MatcherRegistry::default();
//! let matcher = registry.get(TargetKind::Pod).unwrap();
//!
//! let criteria = MatchCriteria {
//!     pod_match: Some(PodMatchCriteria {
//!         images: vec!["nginx:*".to_string()],
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//! let pod = TargetObject::Pod(Pod {
//!     spec: Some(PodSpec {
//!         containers: vec![Container {
//!             name: "web".to_string(),
//!             image: Some("nginx:1.25".to_string()),
//!             ..Default::default()
//!         }],
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! });
//!
//! let outcome = matcher.evaluate(Some(&criteria), &pod);
//! assert!(outcome.matched);
//! assert_eq!(outcome.matched_fields, vec!["podMatch.images:nginx:1.25"]);
//! ```

pub mod deployment;
pub mod node;
pub mod pod;
pub mod wildcard;

use crate::crd::{CommonMatchCriteria, MatchCriteria, TargetKind};
use crate::filter::{common_pushdown, ListFilter};
use crate::target::TargetObject;
use std::collections::BTreeMap;

pub use deployment::DeploymentMatcher;
pub use node::NodeMatcher;
pub use pod::PodMatcher;

/// Result of evaluating a rule's criteria against one object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub matched: bool,
    /// Identifiers of the checks that passed, in evaluation order.
    pub matched_fields: Vec<String>,
}

/// Accumulates passed checks while a matcher walks the criteria.
#[derive(Debug, Default)]
pub(crate) struct FieldTrail {
    fields: Vec<String>,
}

impl FieldTrail {
    pub(crate) fn pass(&mut self, field: impl Into<String>) {
        self.fields.push(field.into());
    }

    pub(crate) fn reject(self) -> MatchOutcome {
        MatchOutcome {
            matched: false,
            matched_fields: self.fields,
        }
    }

    pub(crate) fn accept(self) -> MatchOutcome {
        MatchOutcome {
            matched: true,
            matched_fields: self.fields,
        }
    }
}

/// Per-kind criteria evaluation and list-time filter construction.
pub trait Matcher: Send + Sync {
    /// The target kind this matcher handles.
    fn kind(&self) -> TargetKind;

    /// Whether the kind is cluster-scoped (namespace criteria do not apply).
    fn cluster_scoped(&self) -> bool {
        false
    }

    /// Build the list-time filter for `criteria`.
    ///
    /// The filter must never exclude an object that [`Matcher::evaluate`] accepts.
    fn pushdown(&self, criteria: Option<&MatchCriteria>) -> ListFilter {
        common_pushdown(criteria, self.kind(), self.cluster_scoped())
    }

    /// Evaluate the full criteria against one object.
    ///
    /// Absent criteria match unconditionally with an empty field list. An object
    /// of another kind never matches.
    fn evaluate(&self, criteria: Option<&MatchCriteria>, object: &TargetObject) -> MatchOutcome;
}

/// Check `commonMatch` against an object: namespace, name, labels, annotations.
///
/// Returns `false` on the first failing check.
pub(crate) fn check_common(
    common: &CommonMatchCriteria,
    object: &TargetObject,
    cluster_scoped: bool,
    trail: &mut FieldTrail,
) -> bool {
    if !cluster_scoped {
        if let Some(namespace) = common.namespace.as_deref().filter(|ns| !ns.is_empty()) {
            if object.namespace() != Some(namespace) {
                return false;
            }
            trail.pass("commonMatch.namespace");
        }
    }

    if let Some(name) = common.name.as_deref().filter(|n| !n.is_empty()) {
        if object.name() != name {
            return false;
        }
        trail.pass("commonMatch.name");
    }

    if !check_map_subset(&common.labels, object.labels(), "commonMatch.labels", trail) {
        return false;
    }

    check_map_subset(
        &common.annotations,
        object.annotations(),
        "commonMatch.annotations",
        trail,
    )
}

/// Every `wanted` entry must be present in `actual` with the same value.
/// Each passing key is recorded as `<field>[<key>]`.
pub(crate) fn check_map_subset(
    wanted: &BTreeMap<String, String>,
    actual: Option<&BTreeMap<String, String>>,
    field: &str,
    trail: &mut FieldTrail,
) -> bool {
    for (key, value) in wanted {
        if actual.and_then(|a| a.get(key)) != Some(value) {
            return false;
        }
        trail.pass(format!("{field}[{key}]"));
    }
    true
}

/// Matchers keyed by target kind.
pub struct MatcherRegistry {
    matchers: BTreeMap<TargetKind, Box<dyn Matcher>>,
}

impl MatcherRegistry {
    /// A registry with no matchers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            matchers: BTreeMap::new(),
        }
    }

    /// Register a matcher, replacing and returning any previous one for its kind.
    pub fn register(&mut self, matcher: Box<dyn Matcher>) -> Option<Box<dyn Matcher>> {
        self.matchers.insert(matcher.kind(), matcher)
    }

    #[must_use]
    pub fn get(&self, kind: TargetKind) -> Option<&dyn Matcher> {
        self.matchers.get(&kind).map(AsRef::as_ref)
    }

    /// Kinds with a registered matcher, in enum order.
    pub fn kinds(&self) -> impl Iterator<Item = TargetKind> + '_ {
        self.matchers.keys().copied()
    }
}

impl Default for MatcherRegistry {
    /// Pod, Node and Deployment matchers.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PodMatcher));
        registry.register(Box::new(NodeMatcher));
        registry.register(Box::new(DeploymentMatcher));
        registry
    }
}

impl std::fmt::Debug for MatcherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}
