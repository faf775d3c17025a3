// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Label application under a conflict policy.
//!
//! [`apply_labels`] merges a rule's labels into an object's current labels. A
//! key that exists with a different value is a conflict, resolved by the rule's
//! [`ConflictPolicy`]:
//!
//! | Policy      | Conflicting key              | Absent key |
//! |-------------|------------------------------|------------|
//! | `Merge`     | rule value written           | added      |
//! | `Overwrite` | rule value written           | added      |
//! | `Ignore`    | existing value kept          | added      |
//! | `Error`     | nothing written, error       | (nothing)  |
//!
//! Labels not named by the rule are never touched.

use crate::crd::ConflictPolicy;
use crate::errors::{LabelConflict, LabelConflictError};
use std::collections::BTreeMap;

/// Result of applying a rule's labels to one object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelApplication {
    /// The object's full label set after application.
    pub labels: BTreeMap<String, String>,
    /// Whether any label value differs from the input.
    pub changed: bool,
    /// Keys that were absent and have been added.
    pub added: Vec<String>,
    /// Keys whose existing value was replaced by the rule value.
    pub overwritten: Vec<String>,
    /// Conflicting keys left untouched under the `Ignore` policy.
    pub kept: Vec<String>,
}

/// Merge `desired` into `existing` under `policy`.
///
/// Applying the same labels twice yields `changed == false` the second time.
///
/// # Examples
///
/// ```
/// use autolabeller::crd::ConflictPolicy;
/// use autolabeller::labels::apply_labels;
/// use std::collections::BTreeMap;
///
/// let existing = BTreeMap::from([("env".to_string(), "staging".to_string())]);
/// let desired = BTreeMap::from([
///     ("env".to_string(), "prod".to_string()),
///     ("tier".to_string(), "x".to_string()),
/// ]);
///
/// let ignored = apply_labels(Some(&existing), &desired, ConflictPolicy::Ignore).unwrap();
/// assert_eq!(ignored.labels["env"], "staging");
/// assert_eq!(ignored.labels["tier"], "x");
/// assert!(ignored.changed);
///
/// assert!(apply_labels(Some(&existing), &desired, ConflictPolicy::Error).is_err());
/// ```
///
/// # Errors
///
/// Returns [`LabelConflictError`] listing every conflicting key when `policy` is
/// [`ConflictPolicy::Error`] and at least one conflict exists.
pub fn apply_labels(
    existing: Option<&BTreeMap<String, String>>,
    desired: &BTreeMap<String, String>,
    policy: ConflictPolicy,
) -> Result<LabelApplication, LabelConflictError> {
    let mut application = LabelApplication {
        labels: existing.cloned().unwrap_or_default(),
        ..Default::default()
    };

    if policy == ConflictPolicy::Error {
        let conflicts: Vec<LabelConflict> = desired
            .iter()
            .filter_map(|(key, value)| {
                application
                    .labels
                    .get(key)
                    .filter(|current| *current != value)
                    .map(|current| LabelConflict {
                        key: key.clone(),
                        existing: current.clone(),
                        desired: value.clone(),
                    })
            })
            .collect();
        if !conflicts.is_empty() {
            return Err(LabelConflictError { conflicts });
        }
    }

    for (key, value) in desired {
        match application.labels.get(key) {
            Some(current) if current == value => {}
            Some(_) if policy == ConflictPolicy::Ignore => application.kept.push(key.clone()),
            Some(_) => {
                application.labels.insert(key.clone(), value.clone());
                application.overwritten.push(key.clone());
            }
            None => {
                application.labels.insert(key.clone(), value.clone());
                application.added.push(key.clone());
            }
        }
    }

    application.changed = !application.added.is_empty() || !application.overwritten.is_empty();
    Ok(application)
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod labels_tests;
