// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `wildcard.rs`

#[cfg(test)]
mod tests {
    use super::super::wildcard_match;

    #[test]
    fn test_exact_pattern() {
        assert!(wildcard_match("busybox", "busybox"));
        assert!(!wildcard_match("busybox", "busybox:latest"));
        assert!(!wildcard_match("redis", "nginx:1.25"));
    }

    #[test]
    fn test_star_matches_any_run() {
        assert!(wildcard_match("nginx:*", "nginx:1.25"));
        assert!(wildcard_match("nginx:*", "nginx:"));
        assert!(wildcard_match("*", ""));
        assert!(wildcard_match("*", "anything/at:all"));
        assert!(wildcard_match("*nginx*", "docker.io/library/nginx:1.25"));
        assert!(!wildcard_match("nginx:*", "redis:7"));
    }

    #[test]
    fn test_question_mark_matches_one_character() {
        assert!(wildcard_match("redis:?", "redis:7"));
        assert!(!wildcard_match("redis:?", "redis:"));
        assert!(!wildcard_match("redis:?", "redis:7.2"));
    }

    #[test]
    fn test_star_backtracks() {
        assert!(wildcard_match("*:1.*-alpine", "registry/app:1.4-rc:1.5-alpine"));
        assert!(wildcard_match("a*b*c", "aXXbYYbZZc"));
        assert!(!wildcard_match("a*b*c", "aXXbYYbZZ"));
    }

    #[test]
    fn test_empty_pattern_only_matches_empty_value() {
        assert!(wildcard_match("", ""));
        assert!(!wildcard_match("", "nginx"));
    }
}
