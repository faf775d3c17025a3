// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Builders for Kubernetes objects shared by unit tests.

use crate::target::TargetObject;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStrategy};
use k8s_openapi::api::core::v1::{
    Container, Node, NodeSpec, NodeStatus, NodeSystemInfo, Pod, PodSpec, PodTemplateSpec, Taint,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde_json::Value;
use std::collections::BTreeMap;

pub fn label_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn meta(namespace: Option<&str>, name: &str, labels: &[(&str, &str)]) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: namespace.map(ToString::to_string),
        labels: if labels.is_empty() {
            None
        } else {
            Some(label_map(labels))
        },
        ..Default::default()
    }
}

fn container(index: usize, image: &str) -> Container {
    Container {
        name: format!("c{index}"),
        image: Some(image.to_string()),
        ..Default::default()
    }
}

/// A pod with one container per image.
pub fn pod(namespace: &str, name: &str, labels: &[(&str, &str)], images: &[&str]) -> Pod {
    Pod {
        metadata: meta(Some(namespace), name, labels),
        spec: Some(PodSpec {
            containers: images
                .iter()
                .enumerate()
                .map(|(i, image)| container(i, image))
                .collect(),
            ..Default::default()
        }),
        status: None,
    }
}

/// A node with the given labels and `(key, value, effect)` taints.
pub fn node(name: &str, labels: &[(&str, &str)], taints: &[(&str, Option<&str>, &str)]) -> Node {
    Node {
        metadata: meta(None, name, labels),
        spec: Some(NodeSpec {
            taints: if taints.is_empty() {
                None
            } else {
                Some(
                    taints
                        .iter()
                        .map(|(key, value, effect)| Taint {
                            key: (*key).to_string(),
                            value: value.map(ToString::to_string),
                            effect: (*effect).to_string(),
                            time_added: None,
                        })
                        .collect(),
                )
            },
            ..Default::default()
        }),
        status: None,
    }
}

/// Attach kernel and container runtime versions to a node.
pub fn with_node_info(mut node: Node, kernel: &str, runtime: &str) -> Node {
    node.status = Some(NodeStatus {
        node_info: Some(NodeSystemInfo {
            kernel_version: kernel.to_string(),
            container_runtime_version: runtime.to_string(),
            ..Default::default()
        }),
        ..Default::default()
    });
    node
}

/// A deployment with one container per pull policy.
pub fn deployment(
    namespace: &str,
    name: &str,
    replicas: Option<i32>,
    strategy: Option<&str>,
    pull_policies: &[&str],
) -> Deployment {
    Deployment {
        metadata: meta(Some(namespace), name, &[]),
        spec: Some(DeploymentSpec {
            replicas,
            strategy: strategy.map(|s| DeploymentStrategy {
                type_: Some(s.to_string()),
                rolling_update: None,
            }),
            template: PodTemplateSpec {
                metadata: None,
                spec: Some(PodSpec {
                    containers: pull_policies
                        .iter()
                        .enumerate()
                        .map(|(i, policy)| Container {
                            name: format!("c{i}"),
                            image: Some("app:1".to_string()),
                            image_pull_policy: Some((*policy).to_string()),
                            ..Default::default()
                        })
                        .collect(),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        status: None,
    }
}

pub fn pod_object(namespace: &str, name: &str, labels: &[(&str, &str)], images: &[&str]) -> TargetObject {
    TargetObject::Pod(pod(namespace, name, labels, images))
}

/// Apply a JSON merge patch (RFC 7386) the way the API server does for
/// `Patch::Merge`: `null` removes a key, objects merge recursively, anything
/// else replaces.
pub fn apply_merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_fields) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }
    if let Value::Object(target_fields) = target {
        for (key, value) in patch_fields {
            if value.is_null() {
                target_fields.remove(key);
            } else {
                apply_merge_patch(
                    target_fields.entry(key.clone()).or_insert(Value::Null),
                    value,
                );
            }
        }
    }
}
