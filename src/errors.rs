// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for rule reconciliation.
//!
//! This module provides specialized error types for:
//! - Cycle-level failures that propagate to the controller (fetch, list, status write)
//! - Per-object failures that are recorded in status and never abort a cycle
//!   (label updates, conflict-policy violations)
//! - Configuration errors in rule fields (refresh interval, resource quantities)

use crate::crd::TargetKind;
use thiserror::Error;

/// Errors that abort a reconciliation cycle.
///
/// Only these reach the controller's error policy, which requeues the rule with
/// backoff. Per-object failures are folded into status instead.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The rule could not be read from the API server.
    #[error("Failed to fetch ClassificationRule {namespace}/{name}: {cause:#}")]
    Fetch {
        namespace: String,
        name: String,
        cause: anyhow::Error,
    },

    /// Listing candidate resources failed.
    #[error("Failed to list {kind} resources for rule {rule}: {cause:#}")]
    List {
        kind: TargetKind,
        rule: String,
        cause: anyhow::Error,
    },

    /// Persisting the rule status failed.
    #[error("Failed to write status for rule {rule}: {cause:#}")]
    StatusWrite { rule: String, cause: anyhow::Error },
}

impl ReconcileError {
    /// Short category used as a metrics label.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch_error",
            Self::List { .. } => "list_error",
            Self::StatusWrite { .. } => "status_error",
        }
    }
}

/// Failure to persist a label change on a single resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// The object changed between list and update (optimistic concurrency).
    #[error("{kind} {object} was modified concurrently (HTTP 409)")]
    Conflict { kind: TargetKind, object: String },

    /// The object was deleted between list and update.
    #[error("{kind} {object} no longer exists (HTTP 404)")]
    NotFound { kind: TargetKind, object: String },

    /// Any other API failure.
    #[error("Failed to update {kind} {object}: {reason}")]
    Api {
        kind: TargetKind,
        object: String,
        reason: String,
    },
}

/// One rule label that collides with an existing, different label value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelConflict {
    pub key: String,
    pub existing: String,
    pub desired: String,
}

/// Raised by the `Error` conflict policy. No labels are written when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("label conflict on {}", describe_conflicts(.conflicts))]
pub struct LabelConflictError {
    pub conflicts: Vec<LabelConflict>,
}

fn describe_conflicts(conflicts: &[LabelConflict]) -> String {
    conflicts
        .iter()
        .map(|c| {
            format!(
                "'{}' (has '{}', rule wants '{}')",
                c.key, c.existing, c.desired
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors parsing a Go-style duration string such as `refreshInterval`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("duration string cannot be empty")]
    Empty,

    #[error("invalid duration '{0}'")]
    Invalid(String),

    #[error("missing unit in duration '{0}'")]
    MissingUnit(String),

    #[error("unknown unit '{unit}' in duration '{input}' (use ns, us, ms, s, m or h)")]
    UnknownUnit { unit: String, input: String },

    #[error("duration '{0}' is out of range")]
    Overflow(String),

    #[error("duration '{0}' must be greater than zero")]
    NonPositive(String),
}

/// Errors parsing a Kubernetes resource quantity or a comparison expression over one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantity cannot be empty")]
    Empty,

    #[error("invalid quantity '{0}'")]
    Invalid(String),

    #[error("unknown suffix '{suffix}' in quantity '{input}'")]
    UnknownSuffix { suffix: String, input: String },

    #[error("quantity '{0}' is out of range")]
    Overflow(String),
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
