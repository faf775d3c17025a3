// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes reconciliation for `ClassificationRule` resources.
//!
//! Autolabeller follows the standard Kubernetes controller pattern:
//!
//! 1. **Watch** - Rule changes trigger a cycle through the kube-runtime controller
//! 2. **Reconcile** - Candidates are listed, matched and labelled
//! 3. **Status** - Counts and conditions are written back to the rule
//! 4. **Requeue** - The rule is re-evaluated every `refreshInterval`
//!
//! # Available Reconcilers
//!
//! - [`reconcile_classificationrule`] - Runs one cycle for one rule
//!
//! # Example: Running a Cycle
//!
//! ```rust,no_run
//! use autolabeller::context::Context;
//! use autolabeller::reconcilers::reconcile_classificationrule;
//!
//! async fn run_once(ctx: &Context) -> anyhow::Result<()> {
//!     let outcome = reconcile_classificationrule(
//!         ctx.cluster.as_ref(),
//!         &ctx.registry,
//!         "autolabeller-system",
//!         "arm-nodes",
//!     )
//!     .await?;
//!     println!("next cycle in {:?}", outcome.requeue_after);
//!     Ok(())
//! }
//! ```

pub mod classificationrule;
pub mod status;

pub use classificationrule::{reconcile_classificationrule, CyclePhase, ReconcileOutcome};
