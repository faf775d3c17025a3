// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for the `ClassificationRule` controller.
//!
//! The controller receives an `Arc<Context>` holding:
//! - the cluster access used by every reconciliation cycle
//! - the matcher registry that decides which target kinds are supported
//!
//! Rules never share mutable state through the context, so cycles for
//! different rules can run concurrently.

use crate::cluster::{ClusterApi, KubeCluster};
use crate::matching::MatcherRegistry;
use kube::Client;
use std::sync::Arc;

/// Shared context passed to the controller.
#[derive(Clone)]
pub struct Context {
    /// Rule, resource and status access
    pub cluster: Arc<dyn ClusterApi>,

    /// Matchers keyed by target kind
    pub registry: Arc<MatcherRegistry>,
}

impl Context {
    /// Context backed by the API server with the built-in matchers.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_cluster(Arc::new(KubeCluster::new(client)), MatcherRegistry::default())
    }

    /// Context over any cluster implementation and registry.
    #[must_use]
    pub fn with_cluster(cluster: Arc<dyn ClusterApi>, registry: MatcherRegistry) -> Self {
        Self {
            cluster,
            registry: Arc::new(registry),
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
