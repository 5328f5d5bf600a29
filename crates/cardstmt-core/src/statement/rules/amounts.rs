//! Amount normalization for statement totals.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Remove thousands separators, leaving a plain decimal numeral.
///
/// No rounding and no currency handling: `1,15,250.00` becomes `115250.00`.
pub fn strip_separators(amount: &str) -> String {
    amount.chars().filter(|c| *c != ',').collect()
}

/// Parse a statement amount (with or without separators) as a decimal.
pub fn parse_amount(amount: &str) -> Option<Decimal> {
    Decimal::from_str(&strip_separators(amount.trim())).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_separators() {
        assert_eq!(strip_separators("12,345.67"), "12345.67");
        assert_eq!(strip_separators("1,15,250.00"), "115250.00");
        assert_eq!(strip_separators("980.50"), "980.50");
    }

    #[test]
    fn test_strip_separators_keeps_scale() {
        assert_eq!(strip_separators("1,000.00"), "1000.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("15,250.00"), Some(Decimal::new(1525000, 2)));
        assert_eq!(parse_amount(" 0.99 "), Some(Decimal::new(99, 2)));
        assert_eq!(parse_amount("N/A"), None);
    }
}
