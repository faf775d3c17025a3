// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Duration parsing for Go-style duration strings.
//!
//! Parses `refreshInterval` values such as `"30s"`, `"5m"`, `"1h30m"` or `"1.5h"`
//! into a Rust `std::time::Duration`. A rule's refresh interval must be strictly
//! positive.

use std::time::Duration;

use crate::constants::DEFAULT_REFRESH_INTERVAL_SECS;
use crate::errors::DurationError;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Largest duration Go can represent (`math.MaxInt64` nanoseconds).
const MAX_NANOS: u128 = i64::MAX as u128;

/// Parse a Go-style duration string into a Rust `Duration`.
///
/// The string is a sequence of decimal numbers, each with an optional fraction
/// and a unit suffix. Supported units:
/// - `ns`, `us` (or `µs`), `ms`
/// - `s`, `m`, `h`
///
/// # Examples
///
/// ```
/// use autolabeller::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
/// assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
///
/// assert!(parse_duration("").is_err());
/// assert!(parse_duration("10").is_err());  // Missing unit
/// assert!(parse_duration("10x").is_err()); // Unknown unit
/// assert!(parse_duration("0s").is_err());  // Not positive
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The string is empty or not made of number+unit pairs
/// - A unit is missing or unknown
/// - The total exceeds the representable range
/// - The total is zero or negative
pub fn parse_duration(duration_str: &str) -> Result<Duration, DurationError> {
    if duration_str.is_empty() {
        return Err(DurationError::Empty);
    }

    let (negative, mut rest) = match duration_str.as_bytes()[0] {
        b'-' => (true, &duration_str[1..]),
        b'+' => (false, &duration_str[1..]),
        _ => (false, duration_str),
    };

    if rest == "0" {
        return Err(DurationError::NonPositive(duration_str.to_string()));
    }
    if rest.is_empty() {
        return Err(DurationError::Invalid(duration_str.to_string()));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        // Number part: digits with at most one decimal point
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| DurationError::MissingUnit(duration_str.to_string()))?;
        let (number, tail) = rest.split_at(number_end);

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(DurationError::Invalid(duration_str.to_string()));
        }

        // Unit part: everything up to the next number
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);

        let unit_nanos = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SECOND,
            "m" => NANOS_PER_MINUTE,
            "h" => NANOS_PER_HOUR,
            _ => {
                return Err(DurationError::UnknownUnit {
                    unit: unit.to_string(),
                    input: duration_str.to_string(),
                })
            }
        };

        let component = component_nanos(whole, fraction, unit_nanos)
            .ok_or_else(|| DurationError::Overflow(duration_str.to_string()))?;
        total = total
            .checked_add(component)
            .filter(|t| *t <= MAX_NANOS)
            .ok_or_else(|| DurationError::Overflow(duration_str.to_string()))?;

        rest = next;
    }

    if negative || total == 0 {
        return Err(DurationError::NonPositive(duration_str.to_string()));
    }

    let nanos =
        u64::try_from(total).map_err(|_| DurationError::Overflow(duration_str.to_string()))?;
    Ok(Duration::from_nanos(nanos))
}

/// Nanoseconds for one `<whole>.<fraction><unit>` component. Sub-nanosecond
/// precision is truncated.
fn component_nanos(whole: &str, fraction: &str, unit_nanos: u128) -> Option<u128> {
    let whole_value: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let mut nanos = whole_value.checked_mul(unit_nanos)?;

    // Digits beyond nanosecond resolution of an hour cannot contribute
    let fraction = &fraction[..fraction.len().min(20)];
    if !fraction.is_empty() {
        let fraction_value: u128 = fraction.parse().ok()?;
        let scale = 10u128.checked_pow(u32::try_from(fraction.len()).ok()?)?;
        nanos = nanos.checked_add(fraction_value.checked_mul(unit_nanos)? / scale)?;
    }

    Some(nanos)
}

/// Resolve a rule's `refreshInterval`, applying the 30s default when unset or empty.
///
/// # Errors
///
/// Returns the [`parse_duration`] error for a set but invalid interval.
pub fn parse_refresh_interval(refresh_interval: Option<&str>) -> Result<Duration, DurationError> {
    match refresh_interval {
        None | Some("") => Ok(Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS)),
        Some(value) => parse_duration(value),
    }
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod duration_tests;
