// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Controller configuration.
//!
//! Every option can be given on the command line or through an environment
//! variable, so the same binary runs unchanged from a Deployment manifest.

use crate::constants::{METRICS_SERVER_BIND_ADDRESS, TOKIO_WORKER_THREADS};
use clap::{Parser, ValueEnum};

/// Log output format.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "autolabeller")]
#[command(author, version, about = "Applies labels to Pods, Nodes and Deployments selected by ClassificationRules")]
pub struct ControllerConfig {
    /// Address the metrics and health server listens on
    #[arg(
        long,
        env = "AUTOLABELLER_METRICS_BIND_ADDRESS",
        default_value = METRICS_SERVER_BIND_ADDRESS
    )]
    pub metrics_bind_address: String,

    /// Only watch ClassificationRules in this namespace. Cluster-wide when unset.
    #[arg(long, env = "AUTOLABELLER_WATCH_NAMESPACE")]
    pub watch_namespace: Option<String>,

    /// Tokio worker threads
    #[arg(long, env = "AUTOLABELLER_WORKER_THREADS", default_value_t = TOKIO_WORKER_THREADS)]
    pub worker_threads: usize,

    /// Log output format
    #[arg(long, env = "RUST_LOG_FORMAT", value_enum, ignore_case = true, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
