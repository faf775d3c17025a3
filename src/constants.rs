// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Autolabeller operator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for the Autolabeller CRDs
pub const API_GROUP: &str = "autolabeller.firestoned.io";

/// API version for the Autolabeller CRDs
pub const API_VERSION: &str = "v1alpha1";

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "autolabeller.firestoned.io/v1alpha1";

/// Kind name for `ClassificationRule` resource
pub const KIND_CLASSIFICATION_RULE: &str = "ClassificationRule";

// ============================================================================
// Well-Known Node Labels
// ============================================================================

/// Node label carrying the CPU architecture (e.g., `amd64`, `arm64`)
pub const NODE_ARCH_LABEL: &str = "kubernetes.io/arch";

/// Node label carrying the operating system (e.g., `linux`, `windows`)
pub const NODE_OS_LABEL: &str = "kubernetes.io/os";

// ============================================================================
// Rule Defaults
// ============================================================================

/// Refresh interval applied when a rule does not set `refreshInterval`
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// Replica count assumed for a Deployment whose `spec.replicas` is unset
pub const DEFAULT_DEPLOYMENT_REPLICAS: i32 = 1;

// ============================================================================
// Controller Error Handling Constants
// ============================================================================

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Default number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Default bind address for the Prometheus metrics HTTP server
pub const METRICS_SERVER_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Path for the liveness probe endpoint
pub const HEALTH_CHECK_PATH: &str = "/healthz";
