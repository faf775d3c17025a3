// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Standard Kubernetes status condition types and reasons for `ClassificationRule`.
//!
//! Reasons are programmatic identifiers in CamelCase that explain why a condition has
//! a particular status. Each condition type appears at most once in
//! `status.conditions`.
//!
//! # Example Status
//!
//! ```yaml
//! status:
//!   conditions:
//!     - type: Ready
//!       status: "True"
//!       reason: Applied
//!       message: "Matched 3 Pod(s); labels updated on 1, 0 failed"
//!     - type: Degraded
//!       status: "True"
//!       reason: NamespaceIgnored
//!       message: "commonMatch.namespace is ignored for this target kind (Node is cluster-scoped)"
//! ```

// ============================================================================
// Condition Types
// ============================================================================

/// Overall health of the rule: did the last cycle list and apply successfully.
pub const CONDITION_TYPE_READY: &str = "Ready";

/// The rule is operating with a problem that does not stop it from applying labels.
pub const CONDITION_TYPE_DEGRADED: &str = "Degraded";

/// The rule is suspended and will not apply labels.
pub const CONDITION_TYPE_SUSPENDED: &str = "Suspended";

// ============================================================================
// Condition Status Values
// ============================================================================

pub const CONDITION_STATUS_TRUE: &str = "True";
pub const CONDITION_STATUS_FALSE: &str = "False";
pub const CONDITION_STATUS_UNKNOWN: &str = "Unknown";

// ============================================================================
// Ready Reasons
// ============================================================================

/// All candidates were evaluated and labels applied where needed.
pub const REASON_APPLIED: &str = "Applied";

/// Listing candidate resources failed. The cycle aborted and will be retried with backoff.
pub const REASON_LIST_FAILED: &str = "ListFailed";

/// The rule targets a kind with no registered matcher.
///
/// The rule stays in this state until its `targetKind` is edited.
pub const REASON_UNSUPPORTED_TARGET: &str = "UnsupportedTarget";

// ============================================================================
// Degraded Reasons
// ============================================================================

/// `refreshInterval` is not a valid positive duration.
///
/// The rule is NOT requeued periodically while in this state; it only re-runs
/// when the rule itself (or something watched) changes.
pub const REASON_INVALID_REFRESH_INTERVAL: &str = "InvalidRefreshInterval";

/// At least one matched resource could not be updated.
pub const REASON_UPDATE_FAILED: &str = "UpdateFailed";

/// At least one matched resource had a conflicting label under the `Error` conflict policy.
pub const REASON_LABEL_CONFLICT: &str = "LabelConflict";

/// `commonMatch.namespace` was supplied for a cluster-scoped target kind.
pub const REASON_NAMESPACE_IGNORED: &str = "NamespaceIgnored";

/// A kind-specific criteria section does not belong to the rule's target kind.
pub const REASON_CRITERIA_IGNORED: &str = "CriteriaIgnored";

/// A previously degraded rule completed a clean cycle.
pub const REASON_RECONCILE_SUCCEEDED: &str = "ReconcileSucceeded";

// ============================================================================
// Suspended Reasons
// ============================================================================

/// `spec.suspend` is true.
pub const REASON_RULE_SUSPENDED: &str = "RuleSuspended";

/// `spec.suspend` was cleared and the rule is active again.
pub const REASON_RULE_ACTIVE: &str = "RuleActive";
