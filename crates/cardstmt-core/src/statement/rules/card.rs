//! Card number suffix handling.

use super::patterns::FOUR_DIGITS;

/// Last four-digit run on a line.
///
/// Runs are non-overlapping, so a full number such as `4000123456789012`
/// splits into its four groups and a masked `XXXX-XXXX-XXXX-1234` keeps only
/// the visible one. Either way the final group is the card suffix.
pub fn last_four_digit_group(line: &str) -> Option<&str> {
    FOUR_DIGITS.find_iter(line).last().map(|m| m.as_str())
}
