//! Rule-based field extraction for card statements.

pub mod amounts;
pub mod anchors;
pub mod card;
pub mod dates;
pub mod issuer;
pub mod patterns;

pub use amounts::{parse_amount, strip_separators};
pub use anchors::{extract_field, find_anchor, split_lines, Line};
pub use card::last_four_digit_group;
pub use dates::{parse_period, parse_statement_date};
pub use issuer::identify_issuer;

use regex::Regex;

use crate::error::ConfigError;
use crate::models::config::ValueShape;

/// Compiled value pattern for one field.
#[derive(Debug, Clone)]
pub enum ValuePattern {
    Amount,
    Date,
    CardSuffix,
    DateRange,
    Custom(Regex),
}

impl ValuePattern {
    /// Compile a declarative shape. Only custom patterns can fail.
    pub fn compile(field: &str, shape: &ValueShape) -> Result<Self, ConfigError> {
        Ok(match shape {
            ValueShape::Amount => Self::Amount,
            ValueShape::Date => Self::Date,
            ValueShape::CardSuffix => Self::CardSuffix,
            ValueShape::DateRange => Self::DateRange,
            ValueShape::Pattern(source) => {
                let regex = Regex::new(source).map_err(|e| ConfigError::InvalidPattern {
                    field: field.to_string(),
                    reason: e.to_string(),
                })?;
                Self::Custom(regex)
            }
        })
    }

    /// Whether matched values are currency amounts.
    pub fn is_amount(&self) -> bool {
        matches!(self, Self::Amount)
    }

    /// Find the value on a line, trimmed. First match wins, except for card
    /// suffixes where the last four-digit group on the line is preferred.
    pub fn find(&self, line: &str) -> Option<String> {
        let value = match self {
            Self::Amount => patterns::AMOUNT.find(line)?.as_str(),
            Self::Date => patterns::DATE.find(line)?.as_str(),
            Self::DateRange => patterns::DATE_RANGE.find(line)?.as_str(),
            Self::CardSuffix => last_four_digit_group(line)?,
            Self::Custom(regex) => {
                let caps = regex.captures(line)?;
                caps.get(1).or_else(|| caps.get(0))?.as_str()
            }
        };
        Some(value.trim().to_string())
    }
}
