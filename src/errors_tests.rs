// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for error types.

#[cfg(test)]
mod tests {
    use crate::crd::TargetKind;
    use crate::errors::*;

    #[test]
    fn test_list_error_includes_kind_and_cause() {
        let error = ReconcileError::List {
            kind: TargetKind::Node,
            rule: "infra/arm-nodes".to_string(),
            cause: anyhow::anyhow!("connection refused"),
        };

        assert_eq!(
            error.to_string(),
            "Failed to list Node resources for rule infra/arm-nodes: connection refused"
        );
        assert_eq!(error.category(), "list_error");
    }

    #[test]
    fn test_fetch_error_renders_cause_chain() {
        let cause = anyhow::anyhow!("timeout").context("GET classificationrules/web");
        let error = ReconcileError::Fetch {
            namespace: "default".to_string(),
            name: "web".to_string(),
            cause,
        };

        assert_eq!(
            error.to_string(),
            "Failed to fetch ClassificationRule default/web: GET classificationrules/web: timeout"
        );
        assert_eq!(error.category(), "fetch_error");
    }

    #[test]
    fn test_update_conflict_error() {
        let error = UpdateError::Conflict {
            kind: TargetKind::Pod,
            object: "default/web-0".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Pod default/web-0 was modified concurrently (HTTP 409)"
        );
    }

    #[test]
    fn test_update_api_error() {
        let error = UpdateError::Api {
            kind: TargetKind::Deployment,
            object: "apps/api".to_string(),
            reason: "forbidden".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Failed to update Deployment apps/api: forbidden"
        );
    }

    #[test]
    fn test_label_conflict_error_lists_every_key() {
        let error = LabelConflictError {
            conflicts: vec![
                LabelConflict {
                    key: "env".to_string(),
                    existing: "staging".to_string(),
                    desired: "prod".to_string(),
                },
                LabelConflict {
                    key: "team".to_string(),
                    existing: "a".to_string(),
                    desired: "b".to_string(),
                },
            ],
        };

        assert_eq!(
            error.to_string(),
            "label conflict on 'env' (has 'staging', rule wants 'prod'), 'team' (has 'a', rule wants 'b')"
        );
    }

    #[test]
    fn test_duration_errors() {
        assert_eq!(
            DurationError::Empty.to_string(),
            "duration string cannot be empty"
        );
        assert_eq!(
            DurationError::UnknownUnit {
                unit: "x".to_string(),
                input: "10x".to_string()
            }
            .to_string(),
            "unknown unit 'x' in duration '10x' (use ns, us, ms, s, m or h)"
        );
        assert_eq!(
            DurationError::NonPositive("0s".to_string()).to_string(),
            "duration '0s' must be greater than zero"
        );
    }
}
