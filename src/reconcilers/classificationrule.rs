// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `ClassificationRule` reconciliation.
//!
//! One cycle for one rule:
//!
//! 1. **Fetch** the rule. A missing rule ends the cycle quietly.
//! 2. **Suspend check**. A suspended rule reports `Suspended=True` and is not requeued.
//! 3. **Resolve** the matcher for `targetKind`. Kinds without one report
//!    `Ready=False/UnsupportedTarget` and are not requeued.
//! 4. **List** candidates through the pushdown filter. A list failure reports
//!    `Ready=False/ListFailed` and is returned to the controller for backoff.
//! 5. **Match and apply** labels object by object. Per-object failures are
//!    counted and reported but never abort the cycle.
//! 6. **Report** counts and conditions in one status write.
//! 7. **Schedule** the next cycle after `refreshInterval`. An invalid interval
//!    reports `Degraded=True/InvalidRefreshInterval` and stops periodic requeues.

use crate::cluster::ClusterApi;
use crate::crd::ClassificationRule;
use crate::duration::parse_refresh_interval;
use crate::errors::ReconcileError;
use crate::labels::apply_labels;
use crate::matching::{Matcher, MatcherRegistry};
use crate::metrics;
use crate::reconcilers::status::RuleStatusUpdater;
use crate::status_reasons::{
    CONDITION_STATUS_FALSE, CONDITION_STATUS_TRUE, CONDITION_TYPE_DEGRADED,
    CONDITION_TYPE_READY, CONDITION_TYPE_SUSPENDED, REASON_APPLIED,
    REASON_INVALID_REFRESH_INTERVAL, REASON_LABEL_CONFLICT, REASON_LIST_FAILED,
    REASON_RECONCILE_SUCCEEDED, REASON_RULE_ACTIVE, REASON_RULE_SUSPENDED,
    REASON_UNSUPPORTED_TARGET, REASON_UPDATE_FAILED,
};
use crate::target::TargetObject;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Per-object errors listed individually in the `Degraded` message before the
/// rest are summarised.
const MAX_REPORTED_OBJECT_ERRORS: usize = 5;

/// Where a cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CyclePhase {
    /// The rule no longer exists.
    Deleted,
    /// The rule is suspended.
    Suspended,
    /// No matcher is registered for the rule's target kind.
    Unsupported,
    /// Labels were applied and the next cycle is scheduled.
    Applied,
    /// Labels were applied but the refresh interval is invalid, so nothing is scheduled.
    Stalled,
}

/// Result of one reconciliation cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub phase: CyclePhase,
    /// When to run the next cycle. `None` leaves the rule to watch events only.
    pub requeue_after: Option<Duration>,
    pub matched: i32,
    pub updated: i32,
    pub failed: i32,
}

impl ReconcileOutcome {
    fn idle(phase: CyclePhase) -> Self {
        Self {
            phase,
            requeue_after: None,
            matched: 0,
            updated: 0,
            failed: 0,
        }
    }
}

/// A problem that turns into a `Degraded=True` condition.
struct DegradedEntry {
    reason: &'static str,
    message: String,
}

/// Counters and errors collected while applying labels.
#[derive(Default)]
struct ApplyTally {
    matched: i32,
    updated: i32,
    failed: i32,
    object_errors: Vec<DegradedEntry>,
}

/// Run one reconciliation cycle for the rule `namespace/name`.
///
/// # Errors
///
/// Returns an error if the rule cannot be fetched, candidates cannot be listed,
/// or the status write fails. Per-object label failures are reported in the
/// rule's status instead.
pub async fn reconcile_classificationrule<C>(
    cluster: &C,
    registry: &MatcherRegistry,
    namespace: &str,
    name: &str,
) -> Result<ReconcileOutcome, ReconcileError>
where
    C: ClusterApi + ?Sized,
{
    let rule_key = format!("{namespace}/{name}");

    let Some(rule) = cluster
        .get_rule(namespace, name)
        .await
        .map_err(|cause| ReconcileError::Fetch {
            namespace: namespace.to_string(),
            name: name.to_string(),
            cause,
        })?
    else {
        info!("ClassificationRule {rule_key} not found, assuming it was deleted");
        metrics::forget_rule(namespace, name);
        return Ok(ReconcileOutcome::idle(CyclePhase::Deleted));
    };

    let target_kind = rule.spec.target_kind;
    info!("Reconciling ClassificationRule: {rule_key} (targetKind: {target_kind})");

    let mut status = RuleStatusUpdater::new(&rule);

    if rule.spec.suspend {
        status.set_condition(
            CONDITION_TYPE_SUSPENDED,
            CONDITION_STATUS_TRUE,
            REASON_RULE_SUSPENDED,
            "Rule is suspended",
        );
        write_status(cluster, &status, &rule, &rule_key).await?;
        info!("ClassificationRule {rule_key} is suspended, not scheduling a refresh");
        return Ok(ReconcileOutcome::idle(CyclePhase::Suspended));
    }
    status.clear_condition(CONDITION_TYPE_SUSPENDED, REASON_RULE_ACTIVE, "Rule is active");

    let Some(matcher) = registry.get(target_kind) else {
        status.set_condition(
            CONDITION_TYPE_READY,
            CONDITION_STATUS_FALSE,
            REASON_UNSUPPORTED_TARGET,
            &format!("No matcher is registered for targetKind {target_kind}"),
        );
        status.set_observed_generation();
        write_status(cluster, &status, &rule, &rule_key).await?;
        warn!("ClassificationRule {rule_key} targets unsupported kind {target_kind}");
        return Ok(ReconcileOutcome::idle(CyclePhase::Unsupported));
    };

    let criteria = rule.spec.match_criteria.as_ref();
    let filter = matcher.pushdown(criteria);
    debug!(
        "ClassificationRule {rule_key} list filter: namespace={:?}, selector={:?}",
        filter.namespace,
        filter.label_selector()
    );

    let candidates = match cluster.list(target_kind, &filter).await {
        Ok(candidates) => candidates,
        Err(cause) => {
            error!("Failed to list {target_kind} resources for ClassificationRule {rule_key}: {cause:#}");
            status.set_condition(
                CONDITION_TYPE_READY,
                CONDITION_STATUS_FALSE,
                REASON_LIST_FAILED,
                &format!("Failed to list {target_kind} resources: {cause:#}"),
            );
            status.set_last_error(Some(format!("{cause:#}")));
            if let Err(e) = status.apply(cluster, &rule).await {
                warn!("Failed to record list failure on ClassificationRule {rule_key}: {e:#}");
            }
            return Err(ReconcileError::List {
                kind: target_kind,
                rule: rule_key,
                cause,
            });
        }
    };
    debug!(
        "ClassificationRule {rule_key}: {} {target_kind} candidate(s) listed",
        candidates.len()
    );

    let tally = apply_rule(cluster, matcher, &rule, candidates, &rule_key).await;

    let interval = parse_refresh_interval(rule.spec.refresh_interval.as_deref());

    let mut degraded: Vec<DegradedEntry> = filter
        .warnings
        .iter()
        .map(|w| DegradedEntry {
            reason: w.reason,
            message: w.message.clone(),
        })
        .collect();
    let mut last_error = tally.object_errors.last().map(|e| e.message.clone());
    degraded.extend(summarize_object_errors(tally.object_errors));
    if let Err(e) = &interval {
        let message = format!("RefreshInterval must be a valid duration (e.g. 30s, 5m): {e}");
        warn!("ClassificationRule {rule_key}: {message}");
        last_error.get_or_insert_with(|| message.clone());
        degraded.push(DegradedEntry {
            reason: REASON_INVALID_REFRESH_INTERVAL,
            message,
        });
    }

    status.set_counts(tally.matched, tally.updated, tally.failed);
    status.set_observed_generation();
    status.mark_reconciled();
    status.set_last_error(last_error);
    status.set_condition(
        CONDITION_TYPE_READY,
        CONDITION_STATUS_TRUE,
        REASON_APPLIED,
        &format!(
            "Matched {} {target_kind}(s); labels updated on {}, {} failed",
            tally.matched, tally.updated, tally.failed
        ),
    );
    match degraded.last() {
        Some(last) => {
            let reason = last.reason;
            let message = degraded
                .iter()
                .map(|d| d.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            status.set_condition(CONDITION_TYPE_DEGRADED, CONDITION_STATUS_TRUE, reason, &message);
        }
        None => status.clear_condition(
            CONDITION_TYPE_DEGRADED,
            REASON_RECONCILE_SUCCEEDED,
            "Last cycle completed without errors",
        ),
    }
    write_status(cluster, &status, &rule, &rule_key).await?;

    metrics::record_matched_resources(namespace, name, tally.matched);
    info!(
        "ClassificationRule {rule_key} applied: {} matched, {} updated, {} failed",
        tally.matched, tally.updated, tally.failed
    );

    let (phase, requeue_after) = match interval {
        Ok(interval) => (CyclePhase::Applied, Some(interval)),
        Err(_) => (CyclePhase::Stalled, None),
    };

    Ok(ReconcileOutcome {
        phase,
        requeue_after,
        matched: tally.matched,
        updated: tally.updated,
        failed: tally.failed,
    })
}

/// Evaluate every candidate and write labels to the ones that match.
async fn apply_rule<C>(
    cluster: &C,
    matcher: &dyn Matcher,
    rule: &ClassificationRule,
    candidates: Vec<TargetObject>,
    rule_key: &str,
) -> ApplyTally
where
    C: ClusterApi + ?Sized,
{
    let kind = matcher.kind();
    let criteria = rule.spec.match_criteria.as_ref();
    let mut tally = ApplyTally::default();

    for mut object in candidates {
        let object_key = object.display_key();
        let outcome = matcher.evaluate(criteria, &object);
        if !outcome.matched {
            debug!("{kind} {object_key} does not match ClassificationRule {rule_key}");
            continue;
        }
        tally.matched += 1;

        let application =
            match apply_labels(object.labels(), &rule.spec.labels, rule.spec.conflict_policy) {
                Ok(application) => application,
                Err(conflict) => {
                    warn!("{kind} {object_key} not labelled by ClassificationRule {rule_key}: {conflict}");
                    metrics::record_object_error(kind.as_str(), "label_conflict");
                    tally.failed += 1;
                    tally.object_errors.push(DegradedEntry {
                        reason: REASON_LABEL_CONFLICT,
                        message: format!("{kind} {object_key}: {conflict}"),
                    });
                    continue;
                }
            };

        if !application.changed {
            debug!("{kind} {object_key} already carries the labels of ClassificationRule {rule_key}");
            continue;
        }

        object.set_labels(application.labels);
        match cluster.update(&object).await {
            Ok(()) => {
                tally.updated += 1;
                metrics::record_labels_applied(kind.as_str());
                info!(
                    "Labelled {kind} {object_key} for ClassificationRule {rule_key} (added: {:?}, overwritten: {:?}, matched on: {:?})",
                    application.added, application.overwritten, outcome.matched_fields
                );
            }
            Err(e) => {
                warn!("Failed to label {kind} {object_key} for ClassificationRule {rule_key}: {e}");
                metrics::record_object_error(kind.as_str(), "update_failed");
                tally.failed += 1;
                tally.object_errors.push(DegradedEntry {
                    reason: REASON_UPDATE_FAILED,
                    message: e.to_string(),
                });
            }
        }
    }

    tally
}

/// Keep the first few per-object errors verbatim and fold the rest into a count.
fn summarize_object_errors(errors: Vec<DegradedEntry>) -> Vec<DegradedEntry> {
    let total = errors.len();
    if total <= MAX_REPORTED_OBJECT_ERRORS {
        return errors;
    }

    let last_reason = errors[total - 1].reason;
    let mut kept: Vec<DegradedEntry> = errors.into_iter().take(MAX_REPORTED_OBJECT_ERRORS).collect();
    kept.push(DegradedEntry {
        reason: last_reason,
        message: format!(
            "{} more object error(s) not shown",
            total - MAX_REPORTED_OBJECT_ERRORS
        ),
    });
    kept
}

async fn write_status<C>(
    cluster: &C,
    status: &RuleStatusUpdater,
    rule: &ClassificationRule,
    rule_key: &str,
) -> Result<(), ReconcileError>
where
    C: ClusterApi + ?Sized,
{
    status
        .apply(cluster, rule)
        .await
        .map(|_| ())
        .map_err(|cause| ReconcileError::StatusWrite {
            rule: rule_key.to_string(),
            cause,
        })
}

#[cfg(test)]
#[path = "classificationrule_tests.rs"]
mod classificationrule_tests;
