// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pod matcher.

use super::wildcard::wildcard_match;
use super::{check_common, check_map_subset, FieldTrail, MatchOutcome, Matcher};
use crate::crd::{MatchCriteria, PodMatchCriteria, TargetKind};
use crate::quantity::{parse_quantity, QuantityExpr};
use crate::target::TargetObject;
use k8s_openapi::api::core::v1::{Container, Pod};
use tracing::debug;

/// Evaluates `commonMatch` and `podMatch` against pods.
#[derive(Clone, Copy, Debug, Default)]
pub struct PodMatcher;

impl Matcher for PodMatcher {
    fn kind(&self) -> TargetKind {
        TargetKind::Pod
    }

    fn evaluate(&self, criteria: Option<&MatchCriteria>, object: &TargetObject) -> MatchOutcome {
        let mut trail = FieldTrail::default();
        let TargetObject::Pod(pod) = object else {
            return trail.reject();
        };
        let Some(criteria) = criteria else {
            return trail.accept();
        };

        if let Some(common) = &criteria.common_match {
            if !check_common(common, object, false, &mut trail) {
                return trail.reject();
            }
        }

        if let Some(pod_match) = &criteria.pod_match {
            if !check_pod(pod_match, pod, &mut trail) {
                return trail.reject();
            }
        }

        trail.accept()
    }
}

fn check_pod(criteria: &PodMatchCriteria, pod: &Pod, trail: &mut FieldTrail) -> bool {
    let spec = pod.spec.as_ref();

    if let Some(host_network) = criteria.host_network {
        if spec.and_then(|s| s.host_network).unwrap_or(false) != host_network {
            return false;
        }
        trail.pass("podMatch.hostNetwork");
    }

    if let Some(account) = criteria.service_account.as_deref().filter(|a| !a.is_empty()) {
        if spec.and_then(|s| s.service_account_name.as_deref()) != Some(account) {
            return false;
        }
        trail.pass("podMatch.serviceAccount");
    }

    if !check_map_subset(
        &criteria.node_selector,
        spec.and_then(|s| s.node_selector.as_ref()),
        "podMatch.nodeSelector",
        trail,
    ) {
        return false;
    }

    if let Some(policy) = criteria.restart_policy.as_deref().filter(|p| !p.is_empty()) {
        if spec.and_then(|s| s.restart_policy.as_deref()) != Some(policy) {
            return false;
        }
        trail.pass("podMatch.restartPolicy");
    }

    let containers: &[Container] = spec.map(|s| s.containers.as_slice()).unwrap_or_default();

    if !criteria.images.is_empty() {
        let matched_image = containers
            .iter()
            .filter_map(|c| c.image.as_deref())
            .find(|image| {
                criteria
                    .images
                    .iter()
                    .any(|pattern| wildcard_match(pattern, image))
            });
        let Some(image) = matched_image else {
            return false;
        };
        trail.pass(format!("podMatch.images:{image}"));
    }

    let resource_checks = [
        ("podMatch.cpuRequests", &criteria.cpu_requests, Side::Requests, "cpu"),
        ("podMatch.memoryRequests", &criteria.memory_requests, Side::Requests, "memory"),
        ("podMatch.cpuLimits", &criteria.cpu_limits, Side::Limits, "cpu"),
        ("podMatch.memoryLimits", &criteria.memory_limits, Side::Limits, "memory"),
    ];
    for (field, expression, side, resource) in resource_checks {
        let Some(expression) = expression.as_deref().filter(|e| !e.is_empty()) else {
            continue;
        };
        if !check_resource_total(expression, containers, side, resource) {
            return false;
        }
        trail.pass(field);
    }

    true
}

#[derive(Clone, Copy)]
enum Side {
    Requests,
    Limits,
}

/// Compare the sum of one resource across containers with an `[op]quantity`
/// expression. Containers without the value contribute zero; an expression or
/// container value that does not parse fails the check.
fn check_resource_total(expression: &str, containers: &[Container], side: Side, resource: &str) -> bool {
    let expr = match QuantityExpr::parse(expression) {
        Ok(expr) => expr,
        Err(e) => {
            debug!("Ignoring unparseable resource expression '{expression}': {e}");
            return false;
        }
    };

    let mut total: i128 = 0;
    for container in containers {
        let Some(resources) = container.resources.as_ref() else {
            continue;
        };
        let values = match side {
            Side::Requests => resources.requests.as_ref(),
            Side::Limits => resources.limits.as_ref(),
        };
        let Some(quantity) = values.and_then(|v| v.get(resource)) else {
            continue;
        };
        match parse_quantity(&quantity.0) {
            Ok(nanos) => total = total.saturating_add(nanos),
            Err(e) => {
                debug!(
                    "Container {} has unparseable {resource} quantity '{}': {e}",
                    container.name, quantity.0
                );
                return false;
            }
        }
    }

    expr.matches(total)
}

#[cfg(test)]
#[path = "pod_tests.rs"]
mod pod_tests;
