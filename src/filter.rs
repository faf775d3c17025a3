// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pushdown filters for listing candidate resources.
//!
//! A [`ListFilter`] carries the constraints from a rule's criteria that the API
//! server can evaluate at list time: a namespace scope plus exact-equality and
//! set-membership label requirements. Pushdown only ever narrows the candidate
//! set to a superset of the true matches; every pushed-down criterion is checked
//! again in memory by the matcher.
//!
//! # Example
//!
//! ```rust
//! use autolabeller::filter::{LabelRequirement, ListFilter};
//!
//! let filter = ListFilter {
//!     namespace: None,
//!     requirements: vec![
//!         LabelRequirement::Equals {
//!             key: "team".to_string(),
//!             value: "payments".to_string(),
//!         },
//!         LabelRequirement::In {
//!             key: "kubernetes.io/arch".to_string(),
//!             values: vec!["amd64".to_string(), "arm64".to_string()],
//!         },
//!     ],
//!     warnings: vec![],
//! };
//!
//! assert_eq!(
//!     filter.label_selector().as_deref(),
//!     Some("team=payments,kubernetes.io/arch in (amd64,arm64)")
//! );
//! ```

use crate::crd::{MatchCriteria, TargetKind};
use crate::status_reasons::{REASON_CRITERIA_IGNORED, REASON_NAMESPACE_IGNORED};
use crate::target::TargetObject;
use kube::api::ListParams;
use std::collections::BTreeMap;
use std::fmt;

/// One label-selector requirement that the API server can evaluate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelRequirement {
    /// `key=value`
    Equals { key: String, value: String },
    /// `key in (v1,v2,...)`
    In { key: String, values: Vec<String> },
}

impl LabelRequirement {
    /// Evaluate the requirement against a label map, the way the API server would.
    #[must_use]
    pub fn matches(&self, labels: Option<&BTreeMap<String, String>>) -> bool {
        match self {
            Self::Equals { key, value } => {
                labels.and_then(|l| l.get(key)).is_some_and(|v| v == value)
            }
            Self::In { key, values } => labels
                .and_then(|l| l.get(key))
                .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
        }
    }
}

impl fmt::Display for LabelRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { key, value } => write!(f, "{key}={value}"),
            Self::In { key, values } => write!(f, "{key} in ({})", values.join(",")),
        }
    }
}

/// A criterion that was supplied but has no effect for the rule's target kind.
///
/// Warnings surface as a `Degraded` condition on the rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterWarning {
    pub reason: &'static str,
    pub message: String,
}

/// Listing constraints derived from a rule's criteria.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Restrict the list to one namespace. Always `None` for cluster-scoped kinds.
    pub namespace: Option<String>,
    /// Label requirements, AND-ed.
    pub requirements: Vec<LabelRequirement>,
    /// Criteria that were ignored while building the filter.
    pub warnings: Vec<FilterWarning>,
}

impl ListFilter {
    /// Render the requirements as a Kubernetes label selector string.
    ///
    /// Returns `None` when there are no requirements.
    #[must_use]
    pub fn label_selector(&self) -> Option<String> {
        if self.requirements.is_empty() {
            return None;
        }

        Some(
            self.requirements
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        )
    }

    /// `ListParams` carrying the label selector.
    #[must_use]
    pub fn list_params(&self) -> ListParams {
        let params = ListParams::default();
        if let Some(selector) = self.label_selector() {
            params.labels(&selector)
        } else {
            params
        }
    }

    /// Whether an object would be returned by a list call using this filter.
    #[must_use]
    pub fn admits(&self, object: &TargetObject) -> bool {
        if let Some(namespace) = &self.namespace {
            if object.namespace() != Some(namespace.as_str()) {
                return false;
            }
        }

        self.requirements
            .iter()
            .all(|requirement| requirement.matches(object.labels()))
    }

    /// Add an `Equals` requirement for one value or an `In` requirement for several.
    pub fn require_any_of(&mut self, key: &str, values: &[String]) {
        match values {
            [] => {}
            [value] => self.requirements.push(LabelRequirement::Equals {
                key: key.to_string(),
                value: value.clone(),
            }),
            _ => self.requirements.push(LabelRequirement::In {
                key: key.to_string(),
                values: values.to_vec(),
            }),
        }
    }
}

/// Build the part of the filter shared by every target kind.
///
/// - A non-empty `commonMatch.namespace` scopes the list, unless the kind is
///   cluster-scoped, in which case it is dropped with a warning.
/// - Every `commonMatch.labels` entry becomes an equality requirement.
/// - Kind-specific sections that do not belong to `kind` produce warnings.
#[must_use]
pub fn common_pushdown(
    criteria: Option<&MatchCriteria>,
    kind: TargetKind,
    cluster_scoped: bool,
) -> ListFilter {
    let mut filter = ListFilter::default();
    let Some(criteria) = criteria else {
        return filter;
    };

    if let Some(common) = &criteria.common_match {
        if let Some(namespace) = common.namespace.as_deref().filter(|ns| !ns.is_empty()) {
            if cluster_scoped {
                filter.warnings.push(FilterWarning {
                    reason: REASON_NAMESPACE_IGNORED,
                    message: format!(
                        "commonMatch.namespace is ignored for this target kind ({kind} is cluster-scoped)"
                    ),
                });
            } else {
                filter.namespace = Some(namespace.to_string());
            }
        }

        for (key, value) in &common.labels {
            filter.requirements.push(LabelRequirement::Equals {
                key: key.clone(),
                value: value.clone(),
            });
        }
    }

    let sections = [
        ("podMatch", TargetKind::Pod, criteria.pod_match.is_some()),
        ("nodeMatch", TargetKind::Node, criteria.node_match.is_some()),
        (
            "deploymentMatch",
            TargetKind::Deployment,
            criteria.deployment_match.is_some(),
        ),
    ];
    for (section, owner, present) in sections {
        if present && owner != kind {
            filter.warnings.push(FilterWarning {
                reason: REASON_CRITERIA_IGNORED,
                message: format!("{section} is ignored for targetKind {kind}"),
            });
        }
    }

    filter
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod filter_tests;
