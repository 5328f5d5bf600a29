//! Configuration structures for statement extraction.
//!
//! The issuer registry and field specification are plain data. Defaults are
//! embedded here and can be replaced wholesale from a JSON file.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::ConfigError;

/// Field names used by the built-in field specification.
pub mod fields {
    pub const TOTAL_DUE: &str = "totalDue";
    pub const MINIMUM_DUE: &str = "minimumDue";
    pub const DUE_DATE: &str = "dueDate";
    pub const LAST_4_DIGITS: &str = "last4Digits";
    pub const STATEMENT_PERIOD: &str = "statementPeriod";

    /// Keys the serialized result emits alongside the fields.
    pub const ISSUER: &str = "issuer";
    pub const ASSET_REF: &str = "assetRef";
    pub const CONFIDENCE: &str = "confidence";

    pub const RESERVED: [&str; 3] = [ISSUER, ASSET_REF, CONFIDENCE];
}

/// Main configuration for the cardstmt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    /// Known issuers, in match priority order.
    pub issuers: IssuerRegistry,

    /// Fields to extract, in processing order.
    pub fields: FieldSpec,

    /// Extraction behaviour.
    pub extraction: ExtractionConfig,

    /// Document decoding configuration.
    pub decode: DecodeConfig,
}

impl StatementConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::Read(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check structural invariants of the registry and field specification.
    ///
    /// Custom regex patterns are compiled later, when an extractor is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.issuers.validate()?;
        self.fields.validate()
    }
}

/// A known statement issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerEntry {
    /// Token expected verbatim in statement text (matched case-insensitively).
    pub key: String,

    /// Name reported in the extraction result.
    pub display_name: String,

    /// Logo URL or other asset identifier.
    pub asset_ref: String,
}

impl IssuerEntry {
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        asset_ref: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            asset_ref: asset_ref.into(),
        }
    }
}

/// Ordered issuer registry. Earlier entries win when several keys match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuerRegistry {
    /// Issuer entries in priority order.
    pub entries: Vec<IssuerEntry>,

    /// Asset reported when no issuer matches.
    pub fallback_asset_ref: String,
}

impl IssuerRegistry {
    /// Create a registry with the default fallback asset.
    pub fn new(entries: Vec<IssuerEntry>) -> Self {
        Self {
            entries,
            fallback_asset_ref: default_fallback_asset(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.iter().any(|e| e.key.trim().is_empty()) {
            return Err(ConfigError::EmptyIssuerKey);
        }
        Ok(())
    }
}

impl Default for IssuerRegistry {
    fn default() -> Self {
        Self::new(vec![
            IssuerEntry::new("sbi card", "SBI", "https://i.imgur.com/Qv9p27j.png"),
            IssuerEntry::new("icici", "ICICI", "https://i.imgur.com/83p1J4g.png"),
            IssuerEntry::new("hdfc", "HDFC", "https://i.imgur.com/LTSaH6p.png"),
            IssuerEntry::new("indusind", "IndusInd", "https://i.imgur.com/G5l4h02.png"),
            IssuerEntry::new("kotak", "Kotak", "https://i.imgur.com/97y1t60.png"),
        ])
    }
}

fn default_fallback_asset() -> String {
    "https://via.placeholder.com/150?text=Bank".to_string()
}

/// Shape of the value captured for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// `12,345.67` - digits with optional separators and two decimals.
    Amount,
    /// `05-Jan-2025` or `05 Jan 2025`.
    Date,
    /// Four digits; the last four-digit group on the line is taken.
    CardSuffix,
    /// Two dates joined by `to` or a hyphen.
    DateRange,
    /// Custom regex. Capture group 1 is used when present.
    Pattern(String),
}

/// Extraction rule for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Output field name (e.g. `totalDue`).
    pub name: String,

    /// Lowercase anchor phrases, tried in order.
    pub keywords: Vec<String>,

    /// Shape of the value to capture on an anchored line.
    pub shape: ValueShape,
}

impl FieldRule {
    pub fn new(name: impl Into<String>, keywords: &[&str], shape: ValueShape) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            shape,
        }
    }
}

/// Ordered list of field rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSpec(pub Vec<FieldRule>);

impl FieldSpec {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self(rules)
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for rule in &self.0 {
            if fields::RESERVED.contains(&rule.name.as_str()) {
                return Err(ConfigError::ReservedField(rule.name.clone()));
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(ConfigError::DuplicateField(rule.name.clone()));
            }
            if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(ConfigError::NoKeywords(rule.name.clone()));
            }
        }
        Ok(())
    }
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self(vec![
            FieldRule::new(
                fields::TOTAL_DUE,
                &[
                    "total amount due",
                    "total due",
                    "amount due",
                    "new balance",
                    "statement balance",
                ],
                ValueShape::Amount,
            ),
            FieldRule::new(
                fields::MINIMUM_DUE,
                &["minimum amount due", "minimum due", "minimum payment due"],
                ValueShape::Amount,
            ),
            FieldRule::new(
                fields::DUE_DATE,
                &["payment due date", "due date"],
                ValueShape::Date,
            ),
            FieldRule::new(
                fields::LAST_4_DIGITS,
                &[
                    "card number ending",
                    "card ending",
                    "account number:",
                    "card no.",
                    "card number",
                    "xxxx-xxxx-xxxx",
                    "xxxx xxxx xxxx",
                ],
                ValueShape::CardSuffix,
            ),
            FieldRule::new(
                fields::STATEMENT_PERIOD,
                &[
                    "statement period",
                    "billing cycle",
                    "billing period",
                    "statement date",
                ],
                ValueShape::DateRange,
            ),
        ])
    }
}

/// Extraction behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Reject statements whose issuer is not in the registry.
    pub require_known_issuer: bool,
}

/// Document decoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Minimum non-whitespace characters for a document to count as text.
    pub min_text_length: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self { min_text_length: 20 }
    }
}
