//! Small shared helpers

use rust_decimal::Decimal;

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Format a monetary amount with exactly two decimal places ("125.00").
///
/// All money columns are stored as decimal strings, so this is the single
/// place where the canonical storage format is produced.
pub fn format_amount(amount: Decimal) -> String {
    let mut v = amount;
    v.rescale(2);
    v.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_amount_two_decimals() {
        assert_eq!(format_amount(Decimal::from_str("125").unwrap()), "125.00");
        assert_eq!(format_amount(Decimal::from_str("125.5").unwrap()), "125.50");
        assert_eq!(format_amount(Decimal::from_str("0").unwrap()), "0.00");
    }

    #[test]
    fn test_format_amount_rounds_extra_precision() {
        // rescale rounds midpoints away from zero
        assert_eq!(
            format_amount(Decimal::from_str("10.005").unwrap()),
            "10.01"
        );
        assert_eq!(
            format_amount(Decimal::from_str("10.015").unwrap()),
            "10.02"
        );
        assert_eq!(
            format_amount(Decimal::from_str("10.004").unwrap()),
            "10.00"
        );
    }

    #[test]
    fn test_format_amount_exact_multiplication() {
        // 12.50 * 10 must come out exact, not 124.99999...
        let unit = Decimal::from_str("12.50").unwrap();
        let qty = Decimal::from_str("10").unwrap();
        assert_eq!(format_amount(unit * qty), "125.00");
    }

    #[test]
    fn test_now_millis_monotonic_enough() {
        let a = now_millis();
        let b = now_millis();
        assert!(b >= a);
        assert!(a > 1_600_000_000_000); // after Sep 2020
    }
}
