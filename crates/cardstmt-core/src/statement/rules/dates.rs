//! Date parsing for statement fields.
//!
//! Extraction keeps dates as the raw matched text; these helpers turn that
//! text into calendar dates for callers that want typed values.

use chrono::NaiveDate;

use super::patterns::PERIOD_DATE;

/// Parse a due date such as `05-Jan-2025` or `5 jan 2025`.
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    parse_date_token(s)
}

/// Parse a statement period into its start and end dates.
pub fn parse_period(s: &str) -> Option<(NaiveDate, NaiveDate)> {
    let mut tokens = PERIOD_DATE.find_iter(s);
    let start = parse_date_token(tokens.next()?.as_str())?;
    let end = parse_date_token(tokens.next()?.as_str())?;
    Some((start, end))
}

fn parse_date_token(s: &str) -> Option<NaiveDate> {
    let normalized = s
        .split(|c: char| c == '-' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();

    let [day, month, year] = normalized.as_slice() else {
        return None;
    };

    let joined = format!("{} {} {}", day, month, year);
    let month_numeric = month.chars().all(|c| c.is_ascii_digit());
    let format = match (month_numeric, year.len()) {
        (false, 4) => "%d %b %Y",
        (false, 2) => "%d %b %y",
        (true, 4) => "%d %m %Y",
        (true, 2) => "%d %m %y",
        _ => return None,
    };

    NaiveDate::parse_from_str(&joined, format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_statement_date() {
        assert_eq!(parse_statement_date("05-Jan-2025"), Some(date(2025, 1, 5)));
        assert_eq!(parse_statement_date("05 JAN 2025"), Some(date(2025, 1, 5)));
        assert_eq!(parse_statement_date("5 feb 2025"), Some(date(2025, 2, 5)));
        assert_eq!(parse_statement_date("31-Feb-2025"), None);
        assert_eq!(parse_statement_date("garbage"), None);
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(
            parse_period("01 Dec 2024-31 Dec 2024"),
            Some((date(2024, 12, 1), date(2024, 12, 31)))
        );
        assert_eq!(
            parse_period("01-Nov-2024 to 30-Nov-2024"),
            Some((date(2024, 11, 1), date(2024, 11, 30)))
        );
        assert_eq!(
            parse_period("01/12/24 - 31/12/24"),
            Some((date(2024, 12, 1), date(2024, 12, 31)))
        );
        assert_eq!(parse_period("01 Dec 2024"), None);
    }
}
