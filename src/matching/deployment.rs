// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Deployment matcher.

use super::{check_common, FieldTrail, MatchOutcome, Matcher};
use crate::constants::DEFAULT_DEPLOYMENT_REPLICAS;
use crate::crd::{DeploymentMatchCriteria, MatchCriteria, TargetKind};
use crate::target::TargetObject;
use k8s_openapi::api::apps::v1::Deployment;

/// Evaluates `commonMatch` and `deploymentMatch` against deployments.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeploymentMatcher;

impl Matcher for DeploymentMatcher {
    fn kind(&self) -> TargetKind {
        TargetKind::Deployment
    }

    fn evaluate(&self, criteria: Option<&MatchCriteria>, object: &TargetObject) -> MatchOutcome {
        let mut trail = FieldTrail::default();
        let TargetObject::Deployment(deployment) = object else {
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

        if let Some(deployment_match) = &criteria.deployment_match {
            if !check_deployment(deployment_match, deployment, &mut trail) {
                return trail.reject();
            }
        }

        trail.accept()
    }
}

fn check_deployment(
    criteria: &DeploymentMatchCriteria,
    deployment: &Deployment,
    trail: &mut FieldTrail,
) -> bool {
    let spec = deployment.spec.as_ref();

    // Compared as strings so "03" never equals 3
    if let Some(replicas) = criteria.replicas.as_deref().filter(|r| !r.is_empty()) {
        let desired = spec
            .and_then(|s| s.replicas)
            .unwrap_or(DEFAULT_DEPLOYMENT_REPLICAS);
        if desired.to_string() != replicas {
            return false;
        }
        trail.pass("deploymentMatch.replicas");
    }

    if let Some(strategy) = criteria.strategy.as_deref().filter(|s| !s.is_empty()) {
        let actual = spec
            .and_then(|s| s.strategy.as_ref())
            .and_then(|s| s.type_.as_deref());
        if actual != Some(strategy) {
            return false;
        }
        trail.pass("deploymentMatch.strategy");
    }

    if let Some(policy) = criteria
        .image_pull_policy
        .as_deref()
        .filter(|p| !p.is_empty())
    {
        let any_container = spec
            .and_then(|s| s.template.spec.as_ref())
            .is_some_and(|pod_spec| {
                pod_spec
                    .containers
                    .iter()
                    .any(|c| c.image_pull_policy.as_deref() == Some(policy))
            });
        if !any_container {
            return false;
        }
        trail.pass("deploymentMatch.imagePullPolicy");
    }

    true
}

#[cfg(test)]
#[path = "deployment_tests.rs"]
mod deployment_tests;
