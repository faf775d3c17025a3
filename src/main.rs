// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context as _, Result};
use autolabeller::{
    config::{ControllerConfig, LogFormat},
    constants::{
        ERROR_REQUEUE_DURATION_SECS, HEALTH_CHECK_PATH, KIND_CLASSIFICATION_RULE,
        METRICS_SERVER_PATH,
    },
    context::Context,
    crd::ClassificationRule,
    errors::ReconcileError,
    metrics,
    reconcilers::reconcile_classificationrule,
};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use clap::Parser;
use futures::StreamExt;
use kube::{
    runtime::{controller::Action, watcher::Config, Controller},
    Api, Client, ResourceExt,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    let config = ControllerConfig::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads.max(1))
        .thread_name("autolabeller-controller")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: ControllerConfig) -> Result<()> {
    // Respects RUST_LOG if set, otherwise defaults to INFO level.
    // Output format comes from --log-format / RUST_LOG_FORMAT.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!("Starting Autolabeller Controller");
    debug!("Configuration: {:?}", config);

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    let context = Arc::new(Context::new(client.clone()));
    debug!("Controller context created: {:?}", context);

    // Neither task should ever exit. If one does, log it and exit the process.
    tokio::select! {
        result = run_classificationrule_controller(client, context, config.watch_namespace) => {
            error!("CRITICAL: ClassificationRule controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("ClassificationRule controller exited unexpectedly without error")
        }
        result = run_metrics_server(config.metrics_bind_address) => {
            error!("CRITICAL: metrics server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("metrics server exited unexpectedly without error")
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping");
            Ok(())
        }
    }
}

/// Run the `ClassificationRule` controller
async fn run_classificationrule_controller(
    client: Client,
    context: Arc<Context>,
    watch_namespace: Option<String>,
) -> Result<()> {
    let api = match watch_namespace.as_deref() {
        Some(namespace) => {
            info!("Starting ClassificationRule controller (namespace: {namespace})");
            Api::<ClassificationRule>::namespaced(client, namespace)
        }
        None => {
            info!("Starting ClassificationRule controller (all namespaces)");
            Api::<ClassificationRule>::all(client)
        }
    };

    Controller::new(api, Config::default())
        .run(reconcile_classificationrule_wrapper, error_policy, context)
        .for_each(|result| {
            if let Err(e) = result {
                debug!("ClassificationRule controller event error: {e}");
            }
            futures::future::ready(())
        })
        .await;

    Ok(())
}

/// Run one cycle and translate its outcome into a controller action.
async fn reconcile_classificationrule_wrapper(
    rule: Arc<ClassificationRule>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();
    let namespace = rule.namespace().unwrap_or_default();
    let name = rule.name_any();

    match reconcile_classificationrule(ctx.cluster.as_ref(), &ctx.registry, &namespace, &name)
        .await
    {
        Ok(outcome) => {
            metrics::record_reconciliation_success(KIND_CLASSIFICATION_RULE, start.elapsed());
            match outcome.requeue_after {
                Some(interval) => {
                    metrics::record_reconciliation_requeue(
                        KIND_CLASSIFICATION_RULE,
                        "refresh_interval",
                    );
                    Ok(Action::requeue(interval))
                }
                None => {
                    debug!(
                        "ClassificationRule {namespace}/{name} ended in {:?}, waiting for changes",
                        outcome.phase
                    );
                    Ok(Action::await_change())
                }
            }
        }
        Err(e) => {
            error!("Failed to reconcile ClassificationRule {namespace}/{name}: {e}");
            metrics::record_reconciliation_error(
                KIND_CLASSIFICATION_RULE,
                e.category(),
                start.elapsed(),
            );
            Err(e)
        }
    }
}

/// Requeue failed cycles after a fixed delay.
fn error_policy(rule: Arc<ClassificationRule>, error: &ReconcileError, _ctx: Arc<Context>) -> Action {
    warn!(
        "Requeueing ClassificationRule {}/{} in {}s after error: {}",
        rule.namespace().unwrap_or_default(),
        rule.name_any(),
        ERROR_REQUEUE_DURATION_SECS,
        error
    );
    metrics::record_reconciliation_requeue(KIND_CLASSIFICATION_RULE, "error");
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_DURATION_SECS))
}

/// Serve Prometheus metrics and the health probe.
async fn run_metrics_server(bind_address: String) -> Result<()> {
    let app = Router::new()
        .route(METRICS_SERVER_PATH, get(metrics_handler))
        .route(HEALTH_CHECK_PATH, get(|| async { "ok" }));

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind metrics server to {bind_address}"))?;
    info!("Metrics server listening on {bind_address}{METRICS_SERVER_PATH}");

    axum::serve(listener, app)
        .await
        .context("metrics server failed")?;

    Ok(())
}

async fn metrics_handler() -> impl IntoResponse {
    match metrics::gather_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Failed to encode metrics: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {e}"),
            )
        }
    }
}
