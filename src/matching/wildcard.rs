// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Glob-style matching for image patterns.
//!
//! `*` matches any run of characters (including none) and `?` matches exactly one
//! character. Every other character matches itself. A pattern without wildcards
//! is an exact comparison.

/// Whether `value` matches the glob `pattern` in full.
///
/// # Examples
///
/// ```
/// use autolabeller::matching::wildcard::wildcard_match;
///
/// assert!(wildcard_match("nginx:*", "nginx:1.25"));
/// assert!(wildcard_match("*/nginx:1.2?", "docker.io/library/nginx:1.25"));
/// assert!(!wildcard_match("nginx", "nginx:1.25"));
/// ```
#[must_use]
pub fn wildcard_match(pattern: &str, value: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let value: Vec<char> = value.chars().collect();

    let (mut p, mut v) = (0, 0);
    // Position of the last `*` seen and the value index it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, v));
                p += 1;
            }
            Some(&c) if c == '?' || c == value[v] => {
                p += 1;
                v += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    v = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}

#[cfg(test)]
#[path = "wildcard_tests.rs"]
mod wildcard_tests;
