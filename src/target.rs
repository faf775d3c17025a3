// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Snapshots of the cluster resources a rule can label.
//!
//! [`TargetObject`] wraps the typed Kubernetes object for each supported target
//! kind so the matcher, the label applier and the cluster adapter can all work
//! through one value regardless of kind.

use crate::crd::TargetKind;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Node, Pod};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;
use std::collections::BTreeMap;

/// A listed resource of a supported target kind.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetObject {
    Pod(Pod),
    Node(Node),
    Deployment(Deployment),
}

impl TargetObject {
    /// The target kind of the wrapped object.
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::Pod(_) => TargetKind::Pod,
            Self::Node(_) => TargetKind::Node,
            Self::Deployment(_) => TargetKind::Deployment,
        }
    }

    #[must_use]
    pub fn meta(&self) -> &ObjectMeta {
        match self {
            Self::Pod(pod) => pod.meta(),
            Self::Node(node) => node.meta(),
            Self::Deployment(deployment) => deployment.meta(),
        }
    }

    pub fn meta_mut(&mut self) -> &mut ObjectMeta {
        match self {
            Self::Pod(pod) => pod.meta_mut(),
            Self::Node(node) => node.meta_mut(),
            Self::Deployment(deployment) => deployment.meta_mut(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.meta().name.as_deref().unwrap_or_default()
    }

    /// Namespace of the object, `None` for cluster-scoped objects.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.meta().namespace.as_deref()
    }

    /// Current labels, `None` when the object has no label map at all.
    #[must_use]
    pub fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.meta().labels.as_ref()
    }

    #[must_use]
    pub fn annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.meta().annotations.as_ref()
    }

    /// Value of a single label, if present.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels()
            .and_then(|labels| labels.get(key))
            .map(String::as_str)
    }

    /// Replace the object's label map.
    pub fn set_labels(&mut self, labels: BTreeMap<String, String>) {
        self.meta_mut().labels = Some(labels);
    }

    /// `namespace/name` for namespaced objects, `name` for cluster-scoped ones.
    #[must_use]
    pub fn display_key(&self) -> String {
        match self.namespace() {
            Some(namespace) => format!("{namespace}/{}", self.name()),
            None => self.name().to_string(),
        }
    }
}

impl From<Pod> for TargetObject {
    fn from(pod: Pod) -> Self {
        Self::Pod(pod)
    }
}

impl From<Node> for TargetObject {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<Deployment> for TargetObject {
    fn from(deployment: Deployment) -> Self {
        Self::Deployment(deployment)
    }
}
