// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions (CRDs) for label classification.
//!
//! This module defines the [`ClassificationRule`] custom resource and the typed
//! match-criteria tree it carries.
//!
//! # Resource Types
//!
//! - [`ClassificationRule`] - Selects resources of one kind and applies labels to them
//!
//! # Match Criteria
//!
//! - [`MatchCriteria`] - Root of the criteria tree
//! - [`CommonMatchCriteria`] - Namespace, name, labels and annotations (all kinds)
//! - [`PodMatchCriteria`] - Pod-only criteria
//! - [`NodeMatchCriteria`] - Node-only criteria
//! - [`DeploymentMatchCriteria`] - Deployment-only criteria
//!
//! # Example: Labelling nginx pods
//!
//! ```rust,no_run
//! use autolabeller::crd::{
//!     ClassificationRuleSpec, ConflictPolicy, MatchCriteria, PodMatchCriteria, TargetKind,
//! };
//! use std::collections::BTreeMap;
//!
//! let spec = ClassificationRuleSpec {
//!     target_kind: TargetKind::Pod,
//!     match_criteria: Some(MatchCriteria {
//!         pod_match: Some(PodMatchCriteria {
//!             images: vec!["nginx:*".to_string()],
//!             ..Default::default()
//!         }),
//!         ..Default::default()
//!     }),
//!     labels: BTreeMap::from([("tier".to_string(), "web".to_string())]),
//!     conflict_policy: ConflictPolicy::Merge,
//!     suspend: false,
//!     refresh_interval: Some("5m".to_string()),
//! };
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kubernetes resource kinds a rule may target.
///
/// The full set is accepted by the schema, but only kinds with a registered
/// matcher (Pod, Node, Deployment) are reconciled; the rest report
/// `Ready=False/UnsupportedTarget`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum TargetKind {
    #[default]
    Pod,
    Node,
    Namespace,
    Service,
    Deployment,
    StatefulSet,
    DaemonSet,
    ReplicaSet,
    Job,
    CronJob,
}

impl TargetKind {
    /// The Kubernetes `kind` string for this target.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pod => "Pod",
            Self::Node => "Node",
            Self::Namespace => "Namespace",
            Self::Service => "Service",
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
            Self::DaemonSet => "DaemonSet",
            Self::ReplicaSet => "ReplicaSet",
            Self::Job => "Job",
            Self::CronJob => "CronJob",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rule label is reconciled against an existing label with the same key
/// and a different value.
///
/// - `Merge` (default) and `Overwrite`: the rule value wins. The two policies
///   behave identically today; `Overwrite` signals intent to own the full label set.
/// - `Ignore`: the existing value is kept; only absent keys are added.
/// - `Error`: nothing is written to the object and a conflict is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConflictPolicy {
    Overwrite,
    #[default]
    Merge,
    Ignore,
    Error,
}

/// Criteria shared by every target kind. All specified fields are AND-ed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommonMatchCriteria {
    /// Label key/value pairs that must all be present on the resource.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Annotation key/value pairs that must all be present on the resource.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Namespace the resource must live in. Ignored for cluster-scoped kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Exact resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Pod-specific match criteria.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PodMatchCriteria {
    /// Container image patterns. A pod matches if any container image matches any
    /// pattern. Patterns support `*` (any run of characters) and `?` (one character).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,

    /// Total CPU requests across containers, with an optional comparison operator
    /// (e.g. `">1"`, `"<=500m"`). A bare quantity means equality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_requests: Option<String>,

    /// Total memory requests across containers (e.g. `">1Gi"`, `"<=512Mi"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_requests: Option<String>,

    /// Total CPU limits across containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_limits: Option<String>,

    /// Total memory limits across containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limits: Option<String>,

    /// Node selector entries that must all be present in the pod's `nodeSelector`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,

    /// Exact `serviceAccountName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,

    /// Required `hostNetwork` setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_network: Option<bool>,

    /// Exact restart policy (`Always`, `OnFailure`, `Never`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<String>,
}

/// Node-specific match criteria.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeMatchCriteria {
    /// Accepted values of the `kubernetes.io/arch` label (any of).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arch_labels: Vec<String>,

    /// Accepted values of the `kubernetes.io/os` label (any of).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub os_labels: Vec<String>,

    /// Taints in `key=value:effect` form. The node must carry every listed taint.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<String>,

    /// Substring of `status.nodeInfo.kernelVersion`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_version: Option<String>,

    /// Substring of `status.nodeInfo.containerRuntimeVersion` (e.g. `containerd`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_runtime: Option<String>,
}

/// Deployment-specific match criteria.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentMatchCriteria {
    /// Desired replica count, compared as a string (unset replicas count as 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<String>,

    /// Update strategy type (`RollingUpdate`, `Recreate`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Image pull policy used by at least one container in the pod template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<String>,
}

/// Root of the match-criteria tree.
///
/// Only the kind-specific section matching the rule's `targetKind` is evaluated;
/// other sections are ignored and reported through a `Degraded` condition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_match: Option<CommonMatchCriteria>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_match: Option<PodMatchCriteria>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_match: Option<NodeMatchCriteria>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_match: Option<DeploymentMatchCriteria>,
}

/// Condition represents an observation of a rule's current state.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition: Ready, Degraded or Suspended.
    pub r#type: String,

    /// Status of the condition: True, False, or Unknown.
    pub status: String,

    /// Brief CamelCase reason for the condition's last transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message indicating details about the transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Rule generation this condition was computed from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Last time the condition transitioned from one status to another (RFC3339 format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

/// `ClassificationRule` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRuleStatus {
    /// One entry per condition type, in first-seen order.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// When the status was last written by a completed cycle (RFC3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reconciled: Option<String>,

    /// Resources that satisfied the rule's criteria in the last completed cycle.
    #[serde(default)]
    pub matched_resources_count: i32,

    /// Matched resources whose labels were changed in the last completed cycle.
    #[serde(default)]
    pub updated_resources_count: i32,

    /// Matched resources that could not be labelled in the last completed cycle.
    #[serde(default)]
    pub failed_resources_count: i32,

    /// Most recent error encountered while applying the rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

/// `ClassificationRule` selects resources of one kind and labels every match.
///
/// Each rule is reconciled independently: candidates are listed (narrowed by
/// namespace and label selectors where possible), evaluated in memory against the
/// full criteria, and matched objects receive the rule's labels under its
/// conflict policy. The rule is re-evaluated every `refreshInterval`.
///
/// # Example
///
/// ```yaml
/// apiVersion: autolabeller.firestoned.io/v1alpha1
/// kind: ClassificationRule
/// metadata:
///   name: arm-nodes
///   namespace: autolabeller-system
/// spec:
///   targetKind: Node
///   match:
///     nodeMatch:
///       archLabels: ["arm64"]
///   labels:
///     hardware-class: arm
///   conflictPolicy: Merge
///   refreshInterval: 5m
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "autolabeller.firestoned.io",
    version = "v1alpha1",
    kind = "ClassificationRule",
    namespaced,
    shortname = "crule",
    doc = "ClassificationRule evaluates match criteria against Pods, Nodes or Deployments and applies labels to every matching resource.",
    printcolumn = r#"{"name":"Target","type":"string","jsonPath":".spec.targetKind"}"#,
    printcolumn = r#"{"name":"Matched","type":"integer","jsonPath":".status.matchedResourcesCount"}"#,
    printcolumn = r#"{"name":"Suspended","type":"boolean","jsonPath":".spec.suspend"}"#,
    printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#
)]
#[kube(status = "ClassificationRuleStatus")]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRuleSpec {
    /// Kind of resource this rule applies to.
    #[serde(default)]
    pub target_kind: TargetKind,

    /// Match criteria. When absent every resource of `targetKind` matches.
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_criteria: Option<MatchCriteria>,

    /// Labels applied to every matching resource.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// How to treat rule labels that already exist on a resource with another value.
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,

    /// Stop applying this rule until cleared.
    #[serde(default)]
    pub suspend: bool,

    /// How often the rule is re-evaluated (e.g. `"30s"`, `"5m"`, `"1h"`). Defaults to 30s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<String>,
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;
