// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes resource quantities and comparison expressions over them.
//!
//! Quantities (`"500m"`, `"2"`, `"512Mi"`, `"1e3"`) are parsed into exact integer
//! nano-units so that sums across containers compare without rounding error.
//! Expressions prefix a quantity with an operator: `">1"`, `"<=512Mi"`,
//! `"==250m"`, `"!=0"`. A bare quantity means equality.

use crate::errors::QuantityError;

const NANO: i128 = 1;
const MICRO: i128 = 1_000;
const MILLI: i128 = 1_000_000;
const UNIT: i128 = 1_000_000_000;

/// Comparison operator of a [`QuantityExpr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

/// A parsed `[op]quantity` expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantityExpr {
    pub op: CompareOp,
    /// Right-hand side in nano-units.
    pub nanos: i128,
}

impl QuantityExpr {
    /// Parse an expression such as `">=500m"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity part is empty or malformed.
    pub fn parse(expr: &str) -> Result<Self, QuantityError> {
        let expr = expr.trim();
        let (op, quantity) = [
            (">=", CompareOp::Ge),
            ("<=", CompareOp::Le),
            ("==", CompareOp::Eq),
            ("!=", CompareOp::Ne),
            (">", CompareOp::Gt),
            ("<", CompareOp::Lt),
            ("=", CompareOp::Eq),
        ]
        .iter()
        .find_map(|(prefix, op)| expr.strip_prefix(prefix).map(|rest| (*op, rest)))
        .unwrap_or((CompareOp::Eq, expr));

        Ok(Self {
            op,
            nanos: parse_quantity(quantity.trim())?,
        })
    }

    /// Whether `actual` (in nano-units) satisfies this expression.
    #[must_use]
    pub fn matches(&self, actual: i128) -> bool {
        match self.op {
            CompareOp::Gt => actual > self.nanos,
            CompareOp::Ge => actual >= self.nanos,
            CompareOp::Lt => actual < self.nanos,
            CompareOp::Le => actual <= self.nanos,
            CompareOp::Eq => actual == self.nanos,
            CompareOp::Ne => actual != self.nanos,
        }
    }
}

/// Parse a Kubernetes quantity into nano-units.
///
/// Supports decimal SI suffixes (`n`, `u`, `m`, `k`, `M`, `G`, `T`, `P`, `E`),
/// binary suffixes (`Ki` .. `Ei`) and decimal exponents (`1e3`, `5E-3`).
/// Precision below one nano-unit is truncated.
///
/// # Errors
///
/// Returns an error if the value is empty, malformed, uses an unknown suffix,
/// or does not fit in the supported range.
pub fn parse_quantity(input: &str) -> Result<i128, QuantityError> {
    if input.is_empty() {
        return Err(QuantityError::Empty);
    }

    let (negative, body) = match input.as_bytes()[0] {
        b'-' => (true, &input[1..]),
        b'+' => (false, &input[1..]),
        _ => (false, input),
    };

    let number_end = body
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(body.len());
    let (number, suffix) = body.split_at(number_end);
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
        return Err(QuantityError::Invalid(input.to_string()));
    }

    let overflow = || QuantityError::Overflow(input.to_string());
    let multiplier = suffix_multiplier(suffix).ok_or_else(|| QuantityError::UnknownSuffix {
        suffix: suffix.to_string(),
        input: input.to_string(),
    })?;

    let whole_value: i128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let mut nanos = whole_value.checked_mul(multiplier.scale).ok_or_else(overflow)?;

    let fraction = &fraction[..fraction.len().min(30)];
    if !fraction.is_empty() {
        let fraction_value: i128 = fraction.parse().map_err(|_| overflow())?;
        let digits = u32::try_from(fraction.len()).map_err(|_| overflow())?;
        let fraction_scale = 10i128.checked_pow(digits).ok_or_else(overflow)?;
        let part = fraction_value
            .checked_mul(multiplier.scale)
            .ok_or_else(overflow)?
            / fraction_scale;
        nanos = nanos.checked_add(part).ok_or_else(overflow)?;
    }

    nanos = nanos / multiplier.divisor;
    Ok(if negative { -nanos } else { nanos })
}

/// `value * scale / divisor` converts a suffixed number into nano-units.
struct Multiplier {
    scale: i128,
    divisor: i128,
}

fn suffix_multiplier(suffix: &str) -> Option<Multiplier> {
    let scale = match suffix {
        "n" => NANO,
        "u" => MICRO,
        "m" => MILLI,
        "" => UNIT,
        "k" => UNIT * 1_000,
        "M" => UNIT * 1_000_000,
        "G" => UNIT * 1_000_000_000,
        "T" => UNIT * 1_000_000_000_000,
        "P" => UNIT * 1_000_000_000_000_000,
        "E" => UNIT * 1_000_000_000_000_000_000,
        "Ki" => UNIT << 10,
        "Mi" => UNIT << 20,
        "Gi" => UNIT << 30,
        "Ti" => UNIT << 40,
        "Pi" => UNIT << 50,
        "Ei" => UNIT << 60,
        _ => return exponent_multiplier(suffix),
    };
    Some(Multiplier { scale, divisor: 1 })
}

/// `e3`, `E-3`, `e+6` style decimal exponents.
fn exponent_multiplier(suffix: &str) -> Option<Multiplier> {
    let exponent: i32 = suffix
        .strip_prefix('e')
        .or_else(|| suffix.strip_prefix('E'))?
        .parse()
        .ok()?;
    // Nano-units are 10^9 per unit, so the effective power is exponent + 9
    let power = exponent.checked_add(9)?;
    if power >= 0 {
        Some(Multiplier {
            scale: 10i128.checked_pow(u32::try_from(power).ok()?)?,
            divisor: 1,
        })
    } else {
        Some(Multiplier {
            scale: 1,
            divisor: 10i128.checked_pow(power.unsigned_abs())?,
        })
    }
}

#[cfg(test)]
#[path = "quantity_tests.rs"]
mod quantity_tests;
