// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `labels.rs`

#[cfg(test)]
mod tests {
    use super::super::apply_labels;
    use crate::crd::ConflictPolicy;
    use crate::errors::LabelConflict;
    use crate::test_support::label_map;

    const ALL_POLICIES: [ConflictPolicy; 4] = [
        ConflictPolicy::Merge,
        ConflictPolicy::Overwrite,
        ConflictPolicy::Ignore,
        ConflictPolicy::Error,
    ];

    #[test]
    fn test_merge_and_overwrite_replace_conflicting_value() {
        let existing = label_map(&[("env", "staging")]);
        let desired = label_map(&[("env", "prod"), ("tier", "x")]);

        for policy in [ConflictPolicy::Merge, ConflictPolicy::Overwrite] {
            let result = apply_labels(Some(&existing), &desired, policy).unwrap();
            assert_eq!(result.labels, label_map(&[("env", "prod"), ("tier", "x")]));
            assert!(result.changed, "{policy:?} should report a change");
            assert_eq!(result.added, vec!["tier"]);
            assert_eq!(result.overwritten, vec!["env"]);
        }
    }

    #[test]
    fn test_ignore_keeps_existing_value_and_adds_absent_keys() {
        let existing = label_map(&[("env", "staging")]);
        let desired = label_map(&[("env", "prod"), ("tier", "x")]);

        let result = apply_labels(Some(&existing), &desired, ConflictPolicy::Ignore).unwrap();
        assert_eq!(result.labels, label_map(&[("env", "staging"), ("tier", "x")]));
        assert!(result.changed);
        assert_eq!(result.kept, vec!["env"]);
    }

    #[test]
    fn test_ignore_with_only_conflicts_is_unchanged() {
        let existing = label_map(&[("env", "staging")]);
        let desired = label_map(&[("env", "prod")]);

        let result = apply_labels(Some(&existing), &desired, ConflictPolicy::Ignore).unwrap();
        assert_eq!(result.labels, existing);
        assert!(!result.changed);
    }

    #[test]
    fn test_error_policy_reports_conflicts_without_mutation() {
        let existing = label_map(&[("env", "staging")]);
        let desired = label_map(&[("env", "prod"), ("tier", "x")]);

        let err = apply_labels(Some(&existing), &desired, ConflictPolicy::Error).unwrap_err();
        assert_eq!(
            err.conflicts,
            vec![LabelConflict {
                key: "env".to_string(),
                existing: "staging".to_string(),
                desired: "prod".to_string(),
            }]
        );
    }

    #[test]
    fn test_error_policy_without_conflict_applies() {
        let existing = label_map(&[("env", "prod")]);
        let desired = label_map(&[("env", "prod"), ("tier", "x")]);

        let result = apply_labels(Some(&existing), &desired, ConflictPolicy::Error).unwrap();
        assert_eq!(result.labels, label_map(&[("env", "prod"), ("tier", "x")]));
        assert!(result.changed);
    }

    #[test]
    fn test_absent_label_map_is_treated_as_empty() {
        let desired = label_map(&[("tier", "x")]);

        for policy in ALL_POLICIES {
            let result = apply_labels(None, &desired, policy).unwrap();
            assert_eq!(result.labels, desired);
            assert!(result.changed);
        }
    }

    #[test]
    fn test_application_is_idempotent() {
        let existing = label_map(&[("env", "staging"), ("owner", "sre")]);
        let desired = label_map(&[("env", "prod"), ("tier", "x")]);

        for policy in [
            ConflictPolicy::Merge,
            ConflictPolicy::Overwrite,
            ConflictPolicy::Ignore,
        ] {
            let first = apply_labels(Some(&existing), &desired, policy).unwrap();
            let second = apply_labels(Some(&first.labels), &desired, policy).unwrap();

            assert!(!second.changed, "{policy:?} second application must be a no-op");
            assert_eq!(first.labels, second.labels);
        }
    }

    #[test]
    fn test_unrelated_labels_are_preserved() {
        let existing = label_map(&[("owner", "sre")]);
        let desired = label_map(&[("tier", "x")]);

        let result = apply_labels(Some(&existing), &desired, ConflictPolicy::Overwrite).unwrap();
        assert_eq!(result.labels["owner"], "sre");
    }

    #[test]
    fn test_empty_rule_labels_never_change_anything() {
        let existing = label_map(&[("owner", "sre")]);

        for policy in ALL_POLICIES {
            let result = apply_labels(Some(&existing), &label_map(&[]), policy).unwrap();
            assert!(!result.changed);
            assert_eq!(result.labels, existing);
        }
    }
}
