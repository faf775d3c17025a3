// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Node matcher.
//!
//! Nodes are cluster-scoped, so `commonMatch.namespace` is never applied. The
//! `archLabels` and `osLabels` criteria are pushed down as label requirements on
//! `kubernetes.io/arch` and `kubernetes.io/os`; everything else is evaluated in
//! memory.

use super::{check_common, FieldTrail, MatchOutcome, Matcher};
use crate::constants::{NODE_ARCH_LABEL, NODE_OS_LABEL};
use crate::crd::{MatchCriteria, NodeMatchCriteria, TargetKind};
use crate::filter::{common_pushdown, ListFilter};
use crate::target::TargetObject;
use k8s_openapi::api::core::v1::{Node, Taint};
use std::collections::BTreeSet;

/// Evaluates `commonMatch` and `nodeMatch` against nodes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeMatcher;

impl Matcher for NodeMatcher {
    fn kind(&self) -> TargetKind {
        TargetKind::Node
    }

    fn cluster_scoped(&self) -> bool {
        true
    }

    fn pushdown(&self, criteria: Option<&MatchCriteria>) -> ListFilter {
        let mut filter = common_pushdown(criteria, self.kind(), self.cluster_scoped());
        if let Some(node_match) = criteria.and_then(|c| c.node_match.as_ref()) {
            filter.require_any_of(NODE_ARCH_LABEL, &node_match.arch_labels);
            filter.require_any_of(NODE_OS_LABEL, &node_match.os_labels);
        }
        filter
    }

    fn evaluate(&self, criteria: Option<&MatchCriteria>, object: &TargetObject) -> MatchOutcome {
        let mut trail = FieldTrail::default();
        let TargetObject::Node(node) = object else {
            return trail.reject();
        };
        let Some(criteria) = criteria else {
            return trail.accept();
        };

        if let Some(common) = &criteria.common_match {
            if !check_common(common, object, true, &mut trail) {
                return trail.reject();
            }
        }

        if let Some(node_match) = &criteria.node_match {
            if !check_node(node_match, node, object, &mut trail) {
                return trail.reject();
            }
        }

        trail.accept()
    }
}

/// Render a taint as `key=value:effect`. A taint without a value renders as
/// `key=:effect`.
#[must_use]
pub fn taint_string(taint: &Taint) -> String {
    format!(
        "{}={}:{}",
        taint.key,
        taint.value.as_deref().unwrap_or_default(),
        taint.effect
    )
}

fn check_node(
    criteria: &NodeMatchCriteria,
    node: &Node,
    object: &TargetObject,
    trail: &mut FieldTrail,
) -> bool {
    let label_checks = [
        ("nodeMatch.archLabels", NODE_ARCH_LABEL, &criteria.arch_labels),
        ("nodeMatch.osLabels", NODE_OS_LABEL, &criteria.os_labels),
    ];
    for (field, label, accepted) in label_checks {
        if accepted.is_empty() {
            continue;
        }
        let Some(value) = object
            .label(label)
            .and_then(|actual| accepted.iter().find(|want| *want == actual))
        else {
            return false;
        };
        trail.pass(format!("{field}:{value}"));
    }

    if !criteria.taints.is_empty() {
        let present: BTreeSet<String> = node
            .spec
            .as_ref()
            .and_then(|s| s.taints.as_ref())
            .map(|taints| taints.iter().map(taint_string).collect())
            .unwrap_or_default();
        for wanted in &criteria.taints {
            if !present.contains(wanted) {
                return false;
            }
            trail.pass(format!("nodeMatch.taints:{wanted}"));
        }
    }

    let node_info = node.status.as_ref().and_then(|s| s.node_info.as_ref());

    if let Some(kernel) = criteria.kernel_version.as_deref().filter(|k| !k.is_empty()) {
        if !node_info.is_some_and(|info| info.kernel_version.contains(kernel)) {
            return false;
        }
        trail.pass("nodeMatch.kernelVersion");
    }

    if let Some(runtime) = criteria
        .container_runtime
        .as_deref()
        .filter(|r| !r.is_empty())
    {
        if !node_info.is_some_and(|info| info.container_runtime_version.contains(runtime)) {
            return false;
        }
        trail.pass("nodeMatch.containerRuntime");
    }

    true
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod node_tests;
