// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for resource quantity parsing and comparison expressions.

#[cfg(test)]
mod tests {
    use super::super::{parse_quantity, CompareOp, QuantityExpr};
    use crate::errors::QuantityError;

    const UNIT: i128 = 1_000_000_000;

    #[test]
    fn test_parse_plain_and_milli_cpu() {
        assert_eq!(parse_quantity("2").unwrap(), 2 * UNIT);
        assert_eq!(parse_quantity("500m").unwrap(), UNIT / 2);
        assert_eq!(parse_quantity("0.5").unwrap(), UNIT / 2);
        assert_eq!(parse_quantity("250m").unwrap(), parse_quantity("0.25").unwrap());
    }

    #[test]
    fn test_parse_binary_and_decimal_memory() {
        assert_eq!(parse_quantity("1Ki").unwrap(), 1024 * UNIT);
        assert_eq!(parse_quantity("512Mi").unwrap(), 512 * 1024 * 1024 * UNIT);
        assert_eq!(parse_quantity("1G").unwrap(), 1_000_000_000 * UNIT);
        assert_eq!(parse_quantity("1.5Gi").unwrap(), 1_610_612_736 * UNIT);
    }

    #[test]
    fn test_parse_exponent_notation() {
        assert_eq!(parse_quantity("1e3").unwrap(), 1000 * UNIT);
        assert_eq!(parse_quantity("5E-3").unwrap(), parse_quantity("5m").unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed_values() {
        assert_eq!(parse_quantity(""), Err(QuantityError::Empty));
        assert_eq!(
            parse_quantity("abc"),
            Err(QuantityError::Invalid("abc".to_string()))
        );
        assert_eq!(
            parse_quantity("10Xi"),
            Err(QuantityError::UnknownSuffix {
                suffix: "Xi".to_string(),
                input: "10Xi".to_string()
            })
        );
        assert!(matches!(
            parse_quantity("1.2.3"),
            Err(QuantityError::Invalid(_))
        ));
    }

    #[test]
    fn test_expression_operators() {
        let expr = QuantityExpr::parse(">=500m").unwrap();
        assert_eq!(expr.op, CompareOp::Ge);
        assert!(expr.matches(UNIT / 2));
        assert!(expr.matches(UNIT));
        assert!(!expr.matches(UNIT / 4));

        assert!(QuantityExpr::parse(">1").unwrap().matches(2 * UNIT));
        assert!(!QuantityExpr::parse(">1").unwrap().matches(UNIT));
        assert!(QuantityExpr::parse("<1Gi").unwrap().matches(512 * 1024 * 1024 * UNIT));
        assert!(QuantityExpr::parse("<=1").unwrap().matches(UNIT));
        assert!(QuantityExpr::parse("!=0").unwrap().matches(UNIT));
        assert!(!QuantityExpr::parse("!=0").unwrap().matches(0));
    }

    #[test]
    fn test_expression_equality_forms() {
        for raw in ["250m", "=250m", "==250m", " == 250m "] {
            let expr = QuantityExpr::parse(raw).unwrap();
            assert_eq!(expr.op, CompareOp::Eq, "{raw} should parse as equality");
            assert!(expr.matches(UNIT / 4), "{raw} should match 250m");
        }
    }

    #[test]
    fn test_expression_without_quantity_is_rejected() {
        assert_eq!(QuantityExpr::parse(">="), Err(QuantityError::Empty));
        assert!(QuantityExpr::parse(">lots").is_err());
    }
}
