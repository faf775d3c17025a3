// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `deployment.rs`

#[cfg(test)]
mod tests {
    use super::super::DeploymentMatcher;
    use crate::crd::{DeploymentMatchCriteria, MatchCriteria};
    use crate::matching::Matcher;
    use crate::target::TargetObject;
    use crate::test_support::{deployment, pod_object};

    fn deployment_criteria(
        replicas: Option<&str>,
        strategy: Option<&str>,
        pull_policy: Option<&str>,
    ) -> MatchCriteria {
        MatchCriteria {
            deployment_match: Some(DeploymentMatchCriteria {
                replicas: replicas.map(ToString::to_string),
                strategy: strategy.map(ToString::to_string),
                image_pull_policy: pull_policy.map(ToString::to_string),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_all_deployment_fields_match() {
        let api = TargetObject::Deployment(deployment(
            "apps",
            "api",
            Some(3),
            Some("RollingUpdate"),
            &["IfNotPresent", "Always"],
        ));
        let criteria = deployment_criteria(Some("3"), Some("RollingUpdate"), Some("Always"));

        let outcome = DeploymentMatcher.evaluate(Some(&criteria), &api);
        assert!(outcome.matched);
        assert_eq!(
            outcome.matched_fields,
            vec![
                "deploymentMatch.replicas",
                "deploymentMatch.strategy",
                "deploymentMatch.imagePullPolicy",
            ]
        );
    }

    #[test]
    fn test_unset_replicas_default_to_one() {
        let api = TargetObject::Deployment(deployment("apps", "api", None, None, &[]));

        assert!(DeploymentMatcher
            .evaluate(Some(&deployment_criteria(Some("1"), None, None)), &api)
            .matched);
        assert!(!DeploymentMatcher
            .evaluate(Some(&deployment_criteria(Some("2"), None, None)), &api)
            .matched);
    }

    #[test]
    fn test_replicas_compare_as_strings() {
        let api = TargetObject::Deployment(deployment("apps", "api", Some(3), None, &[]));
        assert!(!DeploymentMatcher
            .evaluate(Some(&deployment_criteria(Some("03"), None, None)), &api)
            .matched);
    }

    #[test]
    fn test_strategy_mismatch() {
        let api = TargetObject::Deployment(deployment("apps", "api", Some(1), Some("Recreate"), &[]));
        let outcome = DeploymentMatcher.evaluate(
            Some(&deployment_criteria(Some("1"), Some("RollingUpdate"), None)),
            &api,
        );
        assert!(!outcome.matched);
        assert_eq!(outcome.matched_fields, vec!["deploymentMatch.replicas"]);
    }

    #[test]
    fn test_pull_policy_requires_one_container() {
        let api = TargetObject::Deployment(deployment("apps", "api", None, None, &["IfNotPresent"]));
        assert!(!DeploymentMatcher
            .evaluate(Some(&deployment_criteria(None, None, Some("Never"))), &api)
            .matched);
    }

    #[test]
    fn test_non_deployment_object_never_matches() {
        let web = pod_object("apps", "api-0", &[], &["api:1"]);
        assert!(!DeploymentMatcher.evaluate(None, &web).matched);
    }
}
