// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cluster access used by the reconciliation cycle.
//!
//! The cycle talks to the cluster only through four narrow traits: read a rule,
//! list candidates of a kind, persist a label change on one object, and persist
//! a rule's status. [`KubeCluster`] implements all four over a `kube::Client`;
//! tests substitute an in-memory implementation.

use crate::crd::{ClassificationRule, ClassificationRuleStatus, TargetKind};
use crate::errors::UpdateError;
use crate::filter::ListFilter;
use crate::target::TargetObject;
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{Patch, PatchParams, PostParams};
use kube::core::NamespaceResourceScope;
use kube::{Api, Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Debug;
use tracing::debug;

/// Reads `ClassificationRule` resources.
#[async_trait]
pub trait RuleFetcher: Send + Sync {
    /// Fetch a rule. `Ok(None)` means the rule no longer exists.
    async fn get_rule(&self, namespace: &str, name: &str) -> Result<Option<ClassificationRule>>;
}

/// Lists candidate resources of a target kind.
#[async_trait]
pub trait ResourceLister: Send + Sync {
    /// List objects of `kind`, honouring the filter's namespace and label requirements.
    async fn list(&self, kind: TargetKind, filter: &ListFilter) -> Result<Vec<TargetObject>>;
}

/// Persists label changes on a single resource.
#[async_trait]
pub trait ResourceMutator: Send + Sync {
    /// Write the object back with its new labels.
    ///
    /// The write carries the object's `resourceVersion`, so a concurrent change
    /// fails with [`UpdateError::Conflict`] instead of being overwritten.
    async fn update(&self, object: &TargetObject) -> Result<(), UpdateError>;
}

/// Persists a rule's status subresource.
#[async_trait]
pub trait StatusWriter: Send + Sync {
    async fn write_status(
        &self,
        rule: &ClassificationRule,
        status: &ClassificationRuleStatus,
    ) -> Result<()>;
}

/// Everything the reconciliation cycle needs from the cluster.
pub trait ClusterApi: RuleFetcher + ResourceLister + ResourceMutator + StatusWriter {}

impl<T> ClusterApi for T where T: RuleFetcher + ResourceLister + ResourceMutator + StatusWriter {}

/// Optional status fields that a cycle may clear.
const CLEARABLE_STATUS_FIELDS: [&str; 3] = ["lastError", "lastReconciled", "observedGeneration"];

/// Build the merge-patch body for a status write.
///
/// Unset optional fields are sent as `null` so the merge patch removes any
/// stored value instead of leaving it in place.
///
/// # Errors
///
/// Returns an error if the status cannot be serialized.
pub fn status_patch(status: &ClassificationRuleStatus) -> Result<Value> {
    let mut body = serde_json::to_value(status).context("serialize ClassificationRule status")?;
    if let Value::Object(fields) = &mut body {
        for field in CLEARABLE_STATUS_FIELDS {
            fields.entry(field).or_insert(Value::Null);
        }
    }
    Ok(json!({ "status": body }))
}

/// [`ClusterApi`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Namespaced API when a namespace is given, cluster-wide otherwise.
    fn api<K>(&self, namespace: Option<&str>) -> Api<K>
    where
        K: Resource<DynamicType = (), Scope = NamespaceResourceScope>,
    {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }

    async fn list_typed<K>(&self, api: Api<K>, filter: &ListFilter) -> Result<Vec<K>>
    where
        K: Resource + Clone + DeserializeOwned + Debug,
    {
        let params = filter.list_params();
        debug!(
            "Listing with label selector {:?}",
            params.label_selector.as_deref()
        );
        Ok(api.list(&params).await?.items)
    }

    async fn replace_typed<K>(
        &self,
        api: Api<K>,
        object: &K,
        kind: TargetKind,
        key: String,
    ) -> Result<(), UpdateError>
    where
        K: Resource + Clone + DeserializeOwned + Serialize + Debug,
    {
        match api
            .replace(&object.name_any(), &PostParams::default(), object)
            .await
        {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(status)) if status.code == 409 => Err(UpdateError::Conflict {
                kind,
                object: key,
            }),
            Err(kube::Error::Api(status)) if status.code == 404 => Err(UpdateError::NotFound {
                kind,
                object: key,
            }),
            Err(e) => Err(UpdateError::Api {
                kind,
                object: key,
                reason: e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl RuleFetcher for KubeCluster {
    async fn get_rule(&self, namespace: &str, name: &str) -> Result<Option<ClassificationRule>> {
        let api: Api<ClassificationRule> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name)
            .await
            .with_context(|| format!("GET ClassificationRule {namespace}/{name}"))
    }
}

#[async_trait]
impl ResourceLister for KubeCluster {
    async fn list(&self, kind: TargetKind, filter: &ListFilter) -> Result<Vec<TargetObject>> {
        let namespace = filter.namespace.as_deref();
        let objects = match kind {
            TargetKind::Pod => self
                .list_typed(self.api::<Pod>(namespace), filter)
                .await?
                .into_iter()
                .map(TargetObject::from)
                .collect(),
            TargetKind::Node => self
                .list_typed(Api::<Node>::all(self.client.clone()), filter)
                .await?
                .into_iter()
                .map(TargetObject::from)
                .collect(),
            TargetKind::Deployment => self
                .list_typed(self.api::<Deployment>(namespace), filter)
                .await?
                .into_iter()
                .map(TargetObject::from)
                .collect(),
            other => anyhow::bail!("listing {other} resources is not supported"),
        };
        Ok(objects)
    }
}

#[async_trait]
impl ResourceMutator for KubeCluster {
    async fn update(&self, object: &TargetObject) -> Result<(), UpdateError> {
        let key = object.display_key();
        let namespace = object.namespace();
        match object {
            TargetObject::Pod(pod) => {
                self.replace_typed(self.api::<Pod>(namespace), pod, TargetKind::Pod, key)
                    .await
            }
            TargetObject::Node(node) => {
                self.replace_typed(
                    Api::<Node>::all(self.client.clone()),
                    node,
                    TargetKind::Node,
                    key,
                )
                .await
            }
            TargetObject::Deployment(deployment) => {
                self.replace_typed(
                    self.api::<Deployment>(namespace),
                    deployment,
                    TargetKind::Deployment,
                    key,
                )
                .await
            }
        }
    }
}

#[async_trait]
impl StatusWriter for KubeCluster {
    async fn write_status(
        &self,
        rule: &ClassificationRule,
        status: &ClassificationRuleStatus,
    ) -> Result<()> {
        let namespace = rule.namespace().unwrap_or_default();
        let name = rule.name_any();
        let api: Api<ClassificationRule> = Api::namespaced(self.client.clone(), &namespace);

        let patch = status_patch(status)?;
        api.patch_status(&name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .with_context(|| format!("PATCH ClassificationRule {namespace}/{name} status"))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod cluster_tests;
