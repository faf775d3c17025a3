// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # Autolabeller - Rule-Driven Label Classification for Kubernetes
//!
//! Autolabeller is a Kubernetes operator that applies labels to Pods, Nodes and
//! Deployments selected by `ClassificationRule` custom resources.
//!
//! ## Overview
//!
//! Each rule names a target kind, match criteria and a set of labels. A
//! reconciliation cycle:
//!
//! - narrows the candidate list with namespace and label selectors the API server understands
//! - evaluates the full criteria in memory against every candidate
//! - merges the rule's labels into each match under the rule's conflict policy
//! - reports counts and conditions on the rule's status
//!
//! ## Modules
//!
//! - [`crd`] - `ClassificationRule` custom resource and its match criteria
//! - [`filter`] - List-time pushdown filters
//! - [`matching`] - Per-kind matchers and the matcher registry
//! - [`labels`] - Conflict-policy aware label merging
//! - [`reconcilers`] - The reconciliation cycle and status condition tracking
//! - [`cluster`] - Cluster access traits and the `kube` implementation
//!
//! ## Example
//!
//! ```rust
//! use autolabeller::crd::{MatchCriteria, NodeMatchCriteria, TargetKind};
//! use autolabeller::matching::{Matcher, MatcherRegistry};
//!
//! let criteria = MatchCriteria {
//!     node_match: Some(NodeMatchCriteria {
//!         arch_labels: vec!["arm64".to_string()],
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let registry = MatcherRegistry::default();
//! let matcher = registry.get(TargetKind::Node).unwrap();
//! let filter = matcher.pushdown(Some(&criteria));
//! assert_eq!(filter.label_selector().as_deref(), Some("kubernetes.io/arch=arm64"));
//! ```

pub mod cluster;
pub mod config;
pub mod constants;
pub mod context;
pub mod crd;
pub mod duration;
pub mod errors;
pub mod filter;
pub mod labels;
pub mod matching;
pub mod metrics;
pub mod quantity;
pub mod reconcilers;
pub mod status_reasons;
pub mod target;

#[cfg(test)]
pub(crate) mod test_support;
