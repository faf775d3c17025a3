// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the autolabeller controller.
//!
//! All metrics use the namespace prefix `autolabeller_firestoned_io_`
//! (prometheus-safe version of "autolabeller.firestoned.io").
//!
//! # Metrics Categories
//!
//! - **Reconciliation Metrics** - Cycles, their outcomes, durations and requeues
//! - **Labelling Metrics** - Matched resources per rule, labels written, per-object failures
//! - **Error Metrics** - Cycle-level failures by category
//!
//! # Example
//!
//! ```rust,no_run
//! use autolabeller::metrics::record_reconciliation_success;
//!
//! record_reconciliation_success("ClassificationRule", std::time::Duration::from_millis(40));
//! ```

use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all autolabeller metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "autolabeller_firestoned_io";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Reconciliation Metrics
// ============================================================================

/// Total number of reconciliations by resource type and status
///
/// Labels:
/// - `resource_type`: Kind of resource reconciled (`ClassificationRule`)
/// - `status`: Outcome (`success`, `error`, `requeue`)
pub static RECONCILIATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reconciliations_total"),
        "Total number of reconciliations by resource type and status",
    );
    let counter = CounterVec::new(opts, &["resource_type", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciliations in seconds
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconciliation_duration_seconds"),
        "Duration of reconciliations in seconds by resource type",
    )
    .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["resource_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// Total number of requeue operations
///
/// Labels:
/// - `resource_type`: Kind of resource
/// - `reason`: Reason for requeue (`refresh_interval`, `error`)
pub static REQUEUE_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_requeues_total"),
        "Total number of requeue operations by resource type and reason",
    );
    let counter = CounterVec::new(opts, &["resource_type", "reason"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Labelling Metrics
// ============================================================================

/// Resources matched by each rule in its last completed cycle
///
/// Labels:
/// - `namespace`: Rule namespace
/// - `rule`: Rule name
///
/// The series is removed when the rule is deleted.
pub static RULE_MATCHED_RESOURCES: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_rule_matched_resources"),
        "Resources matched by a rule in its last completed cycle",
    );
    let gauge = GaugeVec::new(opts, &["namespace", "rule"]).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

/// Total number of resources whose labels were changed
///
/// Labels:
/// - `target_kind`: Kind of resource labelled
pub static LABELS_APPLIED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_labels_applied_total"),
        "Total number of resources whose labels were changed by target kind",
    );
    let counter = CounterVec::new(opts, &["target_kind"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Total number of per-object failures
///
/// Labels:
/// - `target_kind`: Kind of resource
/// - `error_type`: `update_failed` or `label_conflict`
pub static OBJECT_ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_object_errors_total"),
        "Total number of per-object labelling failures by target kind and error type",
    );
    let counter = CounterVec::new(opts, &["target_kind", "error_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of cycle-level errors by resource type and error category
///
/// Labels:
/// - `resource_type`: Kind of resource
/// - `error_type`: `fetch_error`, `list_error` or `status_error`
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of errors by resource type and error category",
    );
    let counter = CounterVec::new(opts, &["resource_type", "error_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful reconciliation
pub fn record_reconciliation_success(resource_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "success"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
}

/// Record a failed reconciliation and its error category
pub fn record_reconciliation_error(resource_type: &str, error_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "error"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
    ERRORS_TOTAL
        .with_label_values(&[resource_type, error_type])
        .inc();
}

/// Record a reconciliation requeue
///
/// # Arguments
/// * `resource_type` - The kind of resource reconciled
/// * `reason` - Reason for requeue (e.g., `refresh_interval`, `error`)
pub fn record_reconciliation_requeue(resource_type: &str, reason: &str) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "requeue"])
        .inc();
    REQUEUE_TOTAL
        .with_label_values(&[resource_type, reason])
        .inc();
}

/// Record the number of resources a rule matched
pub fn record_matched_resources(namespace: &str, rule: &str, matched: i32) {
    RULE_MATCHED_RESOURCES
        .with_label_values(&[namespace, rule])
        .set(f64::from(matched));
}

/// Drop the per-rule series of a deleted rule
pub fn forget_rule(namespace: &str, rule: &str) {
    // Not found just means the rule never completed a cycle.
    let _ = RULE_MATCHED_RESOURCES.remove_label_values(&[namespace, rule]);
}

/// Record a resource whose labels were changed
pub fn record_labels_applied(target_kind: &str) {
    LABELS_APPLIED_TOTAL.with_label_values(&[target_kind]).inc();
}

/// Record a per-object failure
pub fn record_object_error(target_kind: &str, error_type: &str) {
    OBJECT_ERRORS_TOTAL
        .with_label_values(&[target_kind, error_type])
        .inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_reconciliation_success() {
        let resource_type = "TestRuleSuccess";
        record_reconciliation_success(resource_type, Duration::from_millis(500));

        let counter = RECONCILIATION_TOTAL.with_label_values(&[resource_type, "success"]);
        assert!(counter.get() > 0.0);

        let histogram = RECONCILIATION_DURATION_SECONDS.with_label_values(&[resource_type]);
        assert!(histogram.get_sample_count() > 0);
    }

    #[test]
    fn test_record_reconciliation_error() {
        let resource_type = "TestRuleError";
        record_reconciliation_error(resource_type, "list_error", Duration::from_millis(250));

        let counter = RECONCILIATION_TOTAL.with_label_values(&[resource_type, "error"]);
        assert!(counter.get() > 0.0);

        let errors = ERRORS_TOTAL.with_label_values(&[resource_type, "list_error"]);
        assert!(errors.get() > 0.0);
    }

    #[test]
    fn test_record_matched_resources_sets_gauge() {
        record_matched_resources("infra", "gauge-test", 7);
        let gauge = RULE_MATCHED_RESOURCES.with_label_values(&["infra", "gauge-test"]);
        assert!((gauge.get() - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_forget_rule_removes_gauge_series() {
        record_matched_resources("infra", "forget-test", 3);
        forget_rule("infra", "forget-test");

        assert!(RULE_MATCHED_RESOURCES
            .remove_label_values(&["infra", "forget-test"])
            .is_err());
        // Forgetting an unknown rule is a no-op.
        forget_rule("infra", "never-recorded");
    }

    #[test]
    fn test_gather_metrics() {
        record_reconciliation_success("GatherTest", Duration::from_millis(100));
        record_labels_applied("GatherTestKind");

        let metrics_text = gather_metrics().expect("Gathering metrics should succeed");
        assert!(
            metrics_text.contains("autolabeller_firestoned_io"),
            "Metrics should contain namespace prefix"
        );
        assert!(metrics_text.contains("reconciliations_total"));
        assert!(metrics_text.contains("labels_applied_total"));
    }
}
