//! Common regex patterns for statement field extraction.
//!
//! Patterns are applied to a single line that already contains an anchor
//! keyword, so they describe only the value shape.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Amounts: 15,250.00 / 1,15,250.00 / 980.50
    pub static ref AMOUNT: Regex = Regex::new(
        r"\d[\d,]*\.\d{2}\b"
    ).unwrap();

    // Dates: 05-Jan-2025 / 05 Jan 2025
    pub static ref DATE: Regex = Regex::new(
        r"(?i)\b\d{1,2}[-\s][a-z]{3}[-\s]\d{4}\b"
    ).unwrap();

    // Four-digit runs; the card suffix rule takes the last one
    pub static ref FOUR_DIGITS: Regex = Regex::new(
        r"\d{4}"
    ).unwrap();

    // Single date token inside a period: 01 Dec 2024 / 01-12-24 / 01/12/2024
    pub static ref PERIOD_DATE: Regex = Regex::new(
        r"(?i)\b\d{1,2}[-/\s](?:\d{1,2}|[a-z]{3})[-/\s]\d{2,4}\b"
    ).unwrap();

    // Periods: 01 Dec 2024-31 Dec 2024 / 01-Dec-2024 to 31-Dec-2024
    pub static ref DATE_RANGE: Regex = Regex::new(
        r"(?i)\b\d{1,2}[-/\s](?:\d{1,2}|[a-z]{3})[-/\s]\d{2,4}\s*(?:to|-)\s*\d{1,2}[-/\s](?:\d{1,2}|[a-z]{3})[-/\s]\d{2,4}\b"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_pattern() {
        assert_eq!(AMOUNT.find("Total Due: 12,345.67").unwrap().as_str(), "12,345.67");
        assert_eq!(AMOUNT.find("INR 1,15,250.00").unwrap().as_str(), "1,15,250.00");
        assert_eq!(AMOUNT.find("due 980.50 now").unwrap().as_str(), "980.50");
        assert!(AMOUNT.find("due 980").is_none());
        assert!(AMOUNT.find("due 980.5").is_none());
    }

    #[test]
    fn test_date_pattern() {
        assert_eq!(DATE.find("Due Date: 05-Jan-2025").unwrap().as_str(), "05-Jan-2025");
        assert_eq!(DATE.find("due date 5 feb 2025").unwrap().as_str(), "5 feb 2025");
        assert!(DATE.find("due date 05/01/2025").is_none());
    }

    #[test]
    fn test_date_range_pattern() {
        assert_eq!(
            DATE_RANGE
                .find("Statement Period: 01 Dec 2024-31 Dec 2024")
                .unwrap()
                .as_str(),
            "01 Dec 2024-31 Dec 2024"
        );
        assert_eq!(
            DATE_RANGE
                .find("statement period: 01-dec-2024 to 31-dec-2024")
                .unwrap()
                .as_str(),
            "01-dec-2024 to 31-dec-2024"
        );
        assert_eq!(
            DATE_RANGE
                .find("billing cycle 01/12/24 - 31/12/24")
                .unwrap()
                .as_str(),
            "01/12/24 - 31/12/24"
        );
        assert!(DATE_RANGE.find("statement date 15-Dec-2024").is_none());
    }
}
