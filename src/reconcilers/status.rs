// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Status condition helpers for `ClassificationRule` resources.
//!
//! Conditions follow the standard Kubernetes shape:
//! - `type`: the aspect being reported (`Ready`, `Degraded`, `Suspended`)
//! - `status`: `"True"`, `"False"` or `"Unknown"`
//! - `reason`: a programmatic identifier (CamelCase)
//! - `message`: a human-readable explanation
//! - `observedGeneration`: the rule generation the condition was computed from
//! - `lastTransitionTime`: RFC3339 timestamp of the last status change
//!
//! There is exactly one entry per condition type. Updating a type replaces the
//! entry in place; a new type is appended.
//!
//! # Example
//!
//! ```rust
//! use autolabeller::reconcilers::status::update_condition_in_memory;
//!
//! let mut conditions = Vec::new();
//! update_condition_in_memory(&mut conditions, "Ready", "True", "Applied", "Matched 2 Pod(s)", Some(3));
//! update_condition_in_memory(&mut conditions, "Suspended", "False", "RuleActive", "", Some(3));
//! update_condition_in_memory(&mut conditions, "Ready", "False", "ListFailed", "timeout", Some(3));
//!
//! assert_eq!(conditions.len(), 2);
//! assert_eq!(conditions[0].r#type, "Ready");
//! assert_eq!(conditions[0].reason.as_deref(), Some("ListFailed"));
//! ```

use crate::cluster::StatusWriter;
use crate::crd::{ClassificationRule, ClassificationRuleStatus, Condition};
use crate::status_reasons::CONDITION_STATUS_FALSE;
use anyhow::Result;
use chrono::Utc;
use kube::ResourceExt;
use tracing::{debug, info};

/// Create a new condition stamped with the current time.
///
/// # Example
///
/// ```rust
/// # use autolabeller::reconcilers::status::create_condition;
/// let condition = create_condition("Ready", "True", "Applied", "Matched 3 Node(s)", Some(1));
/// assert_eq!(condition.r#type, "Ready");
/// assert_eq!(condition.observed_generation, Some(1));
/// ```
#[must_use]
pub fn create_condition(
    condition_type: &str,
    status: &str,
    reason: &str,
    message: &str,
    observed_generation: Option<i64>,
) -> Condition {
    Condition {
        r#type: condition_type.to_string(),
        status: status.to_string(),
        reason: Some(reason.to_string()),
        message: Some(message.to_string()),
        observed_generation,
        last_transition_time: Some(Utc::now().to_rfc3339()),
    }
}

/// Find a condition by type.
#[must_use]
pub fn find_condition<'a>(
    conditions: &'a [Condition],
    condition_type: &str,
) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.r#type == condition_type)
}

/// Update or add a condition in a conditions list (in-memory, no API call).
///
/// An existing entry of the same type is replaced in place. Its
/// `lastTransitionTime` is kept unless the status value changes. Every write
/// stamps `observed_generation`.
pub fn update_condition_in_memory(
    conditions: &mut Vec<Condition>,
    condition_type: &str,
    status: &str,
    reason: &str,
    message: &str,
    observed_generation: Option<i64>,
) {
    if let Some(existing) = conditions.iter_mut().find(|c| c.r#type == condition_type) {
        let last_transition_time = if existing.status == status {
            existing
                .last_transition_time
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339())
        } else {
            Utc::now().to_rfc3339()
        };

        existing.status = status.to_string();
        existing.reason = Some(reason.to_string());
        existing.message = Some(message.to_string());
        existing.observed_generation = observed_generation;
        existing.last_transition_time = Some(last_transition_time);
    } else {
        conditions.push(create_condition(
            condition_type,
            status,
            reason,
            message,
            observed_generation,
        ));
    }
}

/// Compare two condition lists, ignoring `lastTransitionTime`.
#[must_use]
pub fn conditions_equal(current: &[Condition], new: &[Condition]) -> bool {
    if current.len() != new.len() {
        return false;
    }

    new.iter().all(|new_cond| {
        find_condition(current, &new_cond.r#type).is_some_and(|curr_cond| {
            curr_cond.status == new_cond.status
                && curr_cond.reason == new_cond.reason
                && curr_cond.message == new_cond.message
                && curr_cond.observed_generation == new_cond.observed_generation
        })
    })
}

/// Collects status changes for one `ClassificationRule` during a cycle and
/// persists them in a single write.
///
/// Writes are skipped when nothing but timestamps changed, so a rule's own
/// status update does not retrigger its watch in a loop.
///
/// # Example
///
/// ```rust,ignore
/// use autolabeller::reconcilers::status::RuleStatusUpdater;
///
/// let mut updater = RuleStatusUpdater::new(&rule);
/// updater.set_condition("Ready", "True", "Applied", "Matched 3 Pod(s)");
/// updater.set_counts(3, 1, 0);
/// updater.mark_reconciled();
/// updater.apply(cluster.as_ref(), &rule).await?;
/// ```
pub struct RuleStatusUpdater {
    namespace: String,
    name: String,
    generation: Option<i64>,
    current_status: Option<ClassificationRuleStatus>,
    new_status: ClassificationRuleStatus,
}

impl RuleStatusUpdater {
    /// Start from the rule's current status, or an empty one.
    #[must_use]
    pub fn new(rule: &ClassificationRule) -> Self {
        let current_status = rule.status.clone();
        let new_status = current_status.clone().unwrap_or_default();

        Self {
            namespace: rule.namespace().unwrap_or_default(),
            name: rule.name_any(),
            generation: rule.metadata.generation,
            current_status,
            new_status,
        }
    }

    /// Update or add a condition stamped with the rule's generation.
    pub fn set_condition(
        &mut self,
        condition_type: &str,
        status: &str,
        reason: &str,
        message: &str,
    ) {
        info!(
            "ClassificationRule {}/{} condition {}={} ({}): {}",
            self.namespace, self.name, condition_type, status, reason, message
        );
        update_condition_in_memory(
            &mut self.new_status.conditions,
            condition_type,
            status,
            reason,
            message,
            self.generation,
        );
    }

    /// Set a condition to `False` if it is present. Absent conditions stay absent.
    pub fn clear_condition(&mut self, condition_type: &str, reason: &str, message: &str) {
        if find_condition(&self.new_status.conditions, condition_type).is_some() {
            self.set_condition(condition_type, CONDITION_STATUS_FALSE, reason, message);
        }
    }

    pub fn set_counts(&mut self, matched: i32, updated: i32, failed: i32) {
        self.new_status.matched_resources_count = matched;
        self.new_status.updated_resources_count = updated;
        self.new_status.failed_resources_count = failed;
    }

    pub fn set_last_error(&mut self, error: Option<String>) {
        self.new_status.last_error = error;
    }

    /// Record that the rule's current generation has been processed.
    pub fn set_observed_generation(&mut self) {
        self.new_status.observed_generation = self.generation;
    }

    /// Stamp `lastReconciled` with the current time.
    pub fn mark_reconciled(&mut self) {
        self.new_status.last_reconciled = Some(Utc::now().to_rfc3339());
    }

    /// Whether the collected status differs semantically from the current one.
    ///
    /// `lastReconciled` and transition times are not compared.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        match &self.current_status {
            None => true,
            Some(current) => {
                current.matched_resources_count != self.new_status.matched_resources_count
                    || current.updated_resources_count != self.new_status.updated_resources_count
                    || current.failed_resources_count != self.new_status.failed_resources_count
                    || current.last_error != self.new_status.last_error
                    || current.observed_generation != self.new_status.observed_generation
                    || !conditions_equal(&current.conditions, &self.new_status.conditions)
            }
        }
    }

    /// The status that [`RuleStatusUpdater::apply`] would write.
    #[must_use]
    pub fn status(&self) -> &ClassificationRuleStatus {
        &self.new_status
    }

    /// Persist the collected status in one write, or skip it if nothing changed.
    ///
    /// Returns whether a write was made.
    ///
    /// # Errors
    ///
    /// Returns an error if the status writer fails.
    pub async fn apply<W>(&self, writer: &W, rule: &ClassificationRule) -> Result<bool>
    where
        W: StatusWriter + ?Sized,
    {
        if !self.has_changes() {
            debug!(
                "ClassificationRule {}/{} status unchanged, skipping update",
                self.namespace, self.name
            );
            return Ok(false);
        }

        writer.write_status(rule, &self.new_status).await?;

        debug!(
            "Updated ClassificationRule {}/{} status: {} condition(s), {} matched",
            self.namespace,
            self.name,
            self.new_status.conditions.len(),
            self.new_status.matched_resources_count
        );

        Ok(true)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
