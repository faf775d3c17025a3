// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `config.rs`

#[cfg(test)]
mod tests {
    use crate::config::{ControllerConfig, LogFormat};
    use clap::Parser;

    #[test]
    fn test_explicit_flags() {
        let config = ControllerConfig::try_parse_from([
            "autolabeller",
            "--metrics-bind-address",
            "127.0.0.1:9090",
            "--watch-namespace",
            "autolabeller-system",
            "--worker-threads",
            "2",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(config.metrics_bind_address, "127.0.0.1:9090");
        assert_eq!(config.watch_namespace.as_deref(), Some("autolabeller-system"));
        assert_eq!(config.worker_threads, 2);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_log_format_is_case_insensitive() {
        let config =
            ControllerConfig::try_parse_from(["autolabeller", "--log-format", "JSON"]).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let result = ControllerConfig::try_parse_from(["autolabeller", "--log-format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_numeric_worker_threads() {
        let result = ControllerConfig::try_parse_from(["autolabeller", "--worker-threads", "many"]);
        assert!(result.is_err());
    }
}
