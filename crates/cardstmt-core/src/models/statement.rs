//! Statement extraction result models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::str::FromStr;

use super::config::{IssuerEntry, fields};
use crate::statement::rules::dates::{parse_period, parse_statement_date};

/// Placeholder written for fields that were not found.
pub const NOT_FOUND: &str = "N/A";

/// Issuer name reported when no registry entry matches.
pub const UNKNOWN_ISSUER: &str = "Unknown";

/// Outcome of issuer identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerMatch {
    /// Registry key that matched, if any.
    pub key: Option<String>,
    /// Display name, or `Unknown`.
    pub name: String,
    /// Logo URL or fallback asset.
    pub asset_ref: String,
}

impl IssuerMatch {
    pub fn known(entry: &IssuerEntry) -> Self {
        Self {
            key: Some(entry.key.clone()),
            name: entry.display_name.clone(),
            asset_ref: entry.asset_ref.clone(),
        }
    }

    pub fn unknown(asset_ref: impl Into<String>) -> Self {
        Self {
            key: None,
            name: UNKNOWN_ISSUER.to_string(),
            asset_ref: asset_ref.into(),
        }
    }

    pub fn is_known(&self) -> bool {
        self.key.is_some()
    }
}

/// A single extracted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub name: String,
    pub value: Option<String>,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }
}

/// Structured data extracted from one statement.
///
/// Serializes to a flat object: `issuer`, `assetRef`, one key per
/// configured field (`"N/A"` when absent) and `confidence`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub issuer: IssuerMatch,
    /// Field values in configured order.
    pub fields: Vec<FieldValue>,
}

impl ExtractionResult {
    /// Number of fields with a value.
    pub fn found(&self) -> usize {
        self.fields.iter().filter(|f| f.is_found()).count()
    }

    /// Number of configured fields.
    pub fn total(&self) -> usize {
        self.fields.len()
    }

    /// Confidence summary, e.g. `3/5 fields found`.
    pub fn confidence(&self) -> String {
        format!("{}/{} fields found", self.found(), self.total())
    }

    /// Fraction of configured fields that were found.
    pub fn confidence_ratio(&self) -> f32 {
        if self.fields.is_empty() {
            return 0.0;
        }
        self.found() as f32 / self.total() as f32
    }

    /// Raw value of a field, `None` when absent or not configured.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_deref())
    }

    /// Field value as it appears at the external boundary (`N/A` when absent).
    pub fn display(&self, name: &str) -> &str {
        self.field(name).unwrap_or(NOT_FOUND)
    }

    /// Parse an amount field as a decimal.
    pub fn amount(&self, name: &str) -> Option<Decimal> {
        self.field(name).and_then(|v| Decimal::from_str(v).ok())
    }

    /// Parsed payment due date.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.field(fields::DUE_DATE).and_then(parse_statement_date)
    }

    /// Parsed statement period bounds.
    pub fn statement_period(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.field(fields::STATEMENT_PERIOD).and_then(parse_period)
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 3))?;
        map.serialize_entry(fields::ISSUER, &self.issuer.name)?;
        map.serialize_entry(fields::ASSET_REF, &self.issuer.asset_ref)?;
        for field in &self.fields {
            map.serialize_entry(&field.name, field.value.as_deref().unwrap_or(NOT_FOUND))?;
        }
        map.serialize_entry(fields::CONFIDENCE, &self.confidence())?;
        map.end()
    }
}
