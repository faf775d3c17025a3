// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `crd.rs`

#[cfg(test)]
mod tests {
    use crate::crd::*;
    use kube::{CustomResourceExt, Resource};
    use std::collections::BTreeMap;

    #[test]
    fn test_spec_defaults_from_minimal_yaml() {
        let spec: ClassificationRuleSpec = serde_yaml::from_str("{}").unwrap();

        assert_eq!(spec.target_kind, TargetKind::Pod);
        assert_eq!(spec.conflict_policy, ConflictPolicy::Merge);
        assert!(!spec.suspend);
        assert!(spec.match_criteria.is_none());
        assert!(spec.labels.is_empty());
        assert!(spec.refresh_interval.is_none());
    }

    #[test]
    fn test_spec_parses_full_node_rule() {
        let yaml = r#"
targetKind: Node
match:
  commonMatch:
    labels:
      pool: gpu
  nodeMatch:
    archLabels: ["amd64", "arm64"]
    osLabels: ["linux"]
    taints: ["gpu=true:NoSchedule"]
    kernelVersion: "6.1"
    containerRuntime: containerd
labels:
  hardware-class: accelerated
conflictPolicy: Ignore
suspend: true
refreshInterval: 5m
"#;
        let spec: ClassificationRuleSpec = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(spec.target_kind, TargetKind::Node);
        assert_eq!(spec.conflict_policy, ConflictPolicy::Ignore);
        assert!(spec.suspend);
        assert_eq!(spec.refresh_interval.as_deref(), Some("5m"));

        let criteria = spec.match_criteria.unwrap();
        let node = criteria.node_match.unwrap();
        assert_eq!(node.arch_labels, vec!["amd64", "arm64"]);
        assert_eq!(node.os_labels, vec!["linux"]);
        assert_eq!(node.taints, vec!["gpu=true:NoSchedule"]);
        assert_eq!(node.kernel_version.as_deref(), Some("6.1"));
        assert_eq!(node.container_runtime.as_deref(), Some("containerd"));
        assert_eq!(
            criteria.common_match.unwrap().labels.get("pool"),
            Some(&"gpu".to_string())
        );
    }

    #[test]
    fn test_spec_parses_pod_criteria() {
        let yaml = r#"
targetKind: Pod
match:
  podMatch:
    images: ["nginx:*"]
    hostNetwork: false
    serviceAccount: web
    restartPolicy: Always
    cpuRequests: ">=500m"
    nodeSelector:
      disktype: ssd
labels:
  tier: web
"#;
        let spec: ClassificationRuleSpec = serde_yaml::from_str(yaml).unwrap();
        let pod = spec.match_criteria.unwrap().pod_match.unwrap();

        assert_eq!(pod.images, vec!["nginx:*"]);
        assert_eq!(pod.host_network, Some(false));
        assert_eq!(pod.service_account.as_deref(), Some("web"));
        assert_eq!(pod.restart_policy.as_deref(), Some("Always"));
        assert_eq!(pod.cpu_requests.as_deref(), Some(">=500m"));
        assert_eq!(pod.node_selector.get("disktype"), Some(&"ssd".to_string()));
    }

    #[test]
    fn test_unknown_target_kind_is_rejected() {
        let result: Result<ClassificationRuleSpec, _> =
            serde_yaml::from_str("targetKind: ConfigMap");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_conflict_policy_is_rejected() {
        let result: Result<ClassificationRuleSpec, _> =
            serde_yaml::from_str("conflictPolicy: Replace");
        assert!(result.is_err());
    }

    #[test]
    fn test_match_field_serializes_as_match() {
        let spec = ClassificationRuleSpec {
            target_kind: TargetKind::Deployment,
            match_criteria: Some(MatchCriteria {
                deployment_match: Some(DeploymentMatchCriteria {
                    replicas: Some("3".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            labels: BTreeMap::from([("scale".to_string(), "medium".to_string())]),
            conflict_policy: ConflictPolicy::Error,
            suspend: false,
            refresh_interval: None,
        };

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["targetKind"], "Deployment");
        assert_eq!(value["conflictPolicy"], "Error");
        assert_eq!(value["match"]["deploymentMatch"]["replicas"], "3");
        assert!(value.get("refreshInterval").is_none());
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let status = ClassificationRuleStatus {
            conditions: vec![Condition {
                r#type: "Ready".to_string(),
                status: "True".to_string(),
                reason: Some("Applied".to_string()),
                message: None,
                observed_generation: Some(2),
                last_transition_time: Some("2025-01-01T00:00:00+00:00".to_string()),
            }],
            matched_resources_count: 4,
            observed_generation: Some(2),
            ..Default::default()
        };

        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["matchedResourcesCount"], 4);
        assert_eq!(value["observedGeneration"], 2);
        assert_eq!(value["conditions"][0]["type"], "Ready");
        assert_eq!(value["conditions"][0]["observedGeneration"], 2);
        assert!(value["conditions"][0].get("lastTransitionTime").is_some());
        assert!(value.get("lastError").is_none());
    }

    #[test]
    fn test_target_kind_display() {
        assert_eq!(TargetKind::Pod.to_string(), "Pod");
        assert_eq!(TargetKind::CronJob.to_string(), "CronJob");
        assert_eq!(TargetKind::StatefulSet.as_str(), "StatefulSet");
    }

    #[test]
    fn test_crd_metadata() {
        let crd = ClassificationRule::crd();

        assert_eq!(
            crd.metadata.name.as_deref(),
            Some("classificationrules.autolabeller.firestoned.io")
        );
        assert_eq!(crd.spec.group, crate::constants::API_GROUP);
        assert_eq!(crd.spec.names.kind, crate::constants::KIND_CLASSIFICATION_RULE);
        assert_eq!(crd.spec.scope, "Namespaced");
        assert_eq!(crd.spec.versions[0].name, crate::constants::API_VERSION);
        assert_eq!(
            ClassificationRule::api_version(&()),
            crate::constants::API_GROUP_VERSION
        );
    }
}
