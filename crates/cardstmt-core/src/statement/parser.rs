//! Statement parser combining issuer detection and per-field rules.

use tracing::{debug, info, warn};

use crate::decode::DocumentDecoder;
use crate::error::{ConfigError, Result, StatementError};
use crate::models::config::{FieldRule, IssuerRegistry, StatementConfig};
use crate::models::statement::ExtractionResult;

use super::finalize::{finalize, RawField};
use super::rules::{extract_field, identify_issuer, split_lines, ValuePattern};
use super::StatementParser;

/// A field rule with its value pattern compiled.
#[derive(Debug, Clone)]
struct CompiledField {
    name: String,
    keywords: Vec<String>,
    pattern: ValuePattern,
}

impl CompiledField {
    fn compile(rule: &FieldRule) -> std::result::Result<Self, ConfigError> {
        let keywords = rule
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Ok(Self {
            name: rule.name.clone(),
            keywords,
            pattern: ValuePattern::compile(&rule.name, &rule.shape)?,
        })
    }
}

/// Field extraction engine.
///
/// Immutable once built; a single instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct StatementExtractor {
    registry: IssuerRegistry,
    fields: Vec<CompiledField>,
    require_known_issuer: bool,
}

impl StatementExtractor {
    /// Build an extractor from configuration, compiling every field rule.
    pub fn new(config: &StatementConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let fields = config
            .fields
            .rules()
            .iter()
            .map(CompiledField::compile)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            "Built extractor with {} issuers and {} fields",
            config.issuers.entries.len(),
            fields.len()
        );

        Ok(Self {
            registry: config.issuers.clone(),
            fields,
            require_known_issuer: config.extraction.require_known_issuer,
        })
    }

    /// Reject statements from issuers outside the registry.
    pub fn with_required_issuer(mut self, required: bool) -> Self {
        self.require_known_issuer = required;
        self
    }

    /// Names of the configured fields, in processing order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Run the extraction pipeline on decoded text.
    ///
    /// Never fails: missing fields and unknown issuers are part of the result.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let issuer = identify_issuer(text, &self.registry);
        let lines = split_lines(text);

        let raw = self
            .fields
            .iter()
            .map(|field| {
                let value = extract_field(&lines, &field.keywords, &field.pattern);
                if value.is_none() {
                    debug!("Field {} not found", field.name);
                }
                RawField {
                    name: field.name.clone(),
                    value,
                    amount: field.pattern.is_amount(),
                }
            })
            .collect();

        let result = finalize(raw, issuer);

        debug!("Extracted {} from {} lines", result.confidence(), lines.len());

        result
    }

    /// Decode a document and extract its fields.
    ///
    /// A decode failure is terminal; no partial result is produced.
    pub fn parse_document(&self, decoder: &dyn DocumentDecoder, data: &[u8]) -> Result<ExtractionResult> {
        let text = decoder.decode(data)?;
        self.parse(&text)
    }
}

impl Default for StatementExtractor {
    fn default() -> Self {
        Self::new(&StatementConfig::default()).expect("built-in configuration is valid")
    }
}

impl StatementParser for StatementExtractor {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        info!("Parsing statement from {} characters of text", text.len());

        let result = self.extract(text);

        if !result.issuer.is_known() {
            if self.require_known_issuer {
                return Err(StatementError::UnsupportedIssuer);
            }
            warn!("No known issuer found in statement text");
        }

        info!(
            "Parsed {} statement: {}",
            result.issuer.name,
            result.confidence()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::PlainTextDecoder;
    use crate::error::DecodeError;
    use crate::models::config::{fields, FieldSpec, ValueShape};
    use pretty_assertions::assert_eq;

    const ICICI_STATEMENT: &str = r#"
        ICICI Bank Credit Card Statement
        Customer Name: A. Sample
        Payment Due Date 05-Jan-2025
        Total Amount Due INR 15,250.00
        Card Number ending 4321
    "#;

    fn four_field_config() -> StatementConfig {
        let defaults = FieldSpec::default();
        let keep = [
            fields::LAST_4_DIGITS,
            fields::STATEMENT_PERIOD,
            fields::DUE_DATE,
            fields::TOTAL_DUE,
        ];
        let rules = keep
            .iter()
            .filter_map(|name| defaults.rules().iter().find(|r| r.name == *name).cloned())
            .collect();

        StatementConfig {
            fields: FieldSpec::new(rules),
            ..StatementConfig::default()
        }
    }

    #[test]
    fn test_icici_end_to_end() {
        let extractor = StatementExtractor::new(&four_field_config()).unwrap();
        let result = extractor.parse(ICICI_STATEMENT).unwrap();

        assert_eq!(result.issuer.name, "ICICI");
        assert_eq!(result.field(fields::DUE_DATE), Some("05-Jan-2025"));
        assert_eq!(result.field(fields::TOTAL_DUE), Some("15250.00"));
        assert_eq!(result.field(fields::LAST_4_DIGITS), Some("4321"));
        assert_eq!(result.field(fields::STATEMENT_PERIOD), None);
        assert_eq!(result.confidence(), "3/4 fields found");
    }

    #[test]
    fn test_icici_single_line() {
        let text = "ICICI Bank ... Payment Due Date 05-Jan-2025 ... Total Amount Due INR 15,250.00 ... Card Number ending 4321";
        let extractor = StatementExtractor::new(&four_field_config()).unwrap();
        let result = extractor.extract(text);

        assert_eq!(result.field(fields::DUE_DATE), Some("05-Jan-2025"));
        assert_eq!(result.field(fields::TOTAL_DUE), Some("15250.00"));
        assert_eq!(result.field(fields::LAST_4_DIGITS), Some("4321"));
        assert_eq!(result.confidence(), "3/4 fields found");
    }

    #[test]
    fn test_default_fields_count_in_denominator() {
        let result = StatementExtractor::default().extract(ICICI_STATEMENT);
        assert_eq!(result.total(), 5);
        assert_eq!(result.confidence(), "3/5 fields found");
        assert_eq!(result.field(fields::MINIMUM_DUE), None);
    }

    #[test]
    fn test_full_hdfc_statement() {
        let text = "\
HDFC Bank Credit Cards Division
Account Number: 4000-1234-5678-9012
Statement Period: 01-Nov-2024 to 30-Nov-2024
Payment Due Date: 20-Dec-2024
Total Amount Due: 1,02,345.50
Minimum Amount Due: 5,117.00
";
        let result = StatementExtractor::default().extract(text);

        assert_eq!(result.issuer.name, "HDFC");
        assert_eq!(result.field(fields::LAST_4_DIGITS), Some("9012"));
        assert_eq!(
            result.field(fields::STATEMENT_PERIOD),
            Some("01-Nov-2024 to 30-Nov-2024")
        );
        assert_eq!(result.field(fields::DUE_DATE), Some("20-Dec-2024"));
        assert_eq!(result.field(fields::TOTAL_DUE), Some("102345.50"));
        assert_eq!(result.field(fields::MINIMUM_DUE), Some("5117.00"));
        assert_eq!(result.confidence(), "5/5 fields found");
    }

    #[test]
    fn test_thousands_separator_stripped() {
        let result = StatementExtractor::default().extract("total amount due 12,345.67");
        assert_eq!(result.field(fields::TOTAL_DUE), Some("12345.67"));
    }

    #[test]
    fn test_masked_card_uses_last_group() {
        let result =
            StatementExtractor::default().extract("Card Number ending XXXX-XXXX-XXXX-5678");
        assert_eq!(result.field(fields::LAST_4_DIGITS), Some("5678"));
    }

    #[test]
    fn test_unmasked_card_number_uses_final_group() {
        let result = StatementExtractor::default().extract("Card No. 4000123456789012");
        assert_eq!(result.field(fields::LAST_4_DIGITS), Some("9012"));
    }

    #[test]
    fn test_minimum_line_first_anchors_total_due() {
        // "amount due" is a total-due keyword and a substring of
        // "minimum amount due"; the earlier line wins.
        let text = "Minimum Amount Due: 500.00\nTotal Amount Due: 10,000.00";
        let result = StatementExtractor::default().extract(text);
        assert_eq!(result.field(fields::TOTAL_DUE), Some("500.00"));
        assert_eq!(result.field(fields::MINIMUM_DUE), Some("500.00"));

        let mut config = StatementConfig::default();
        config.fields.0[0].keywords.retain(|k| k != "amount due");
        let result = StatementExtractor::new(&config).unwrap().extract(text);
        assert_eq!(result.field(fields::TOTAL_DUE), Some("10000.00"));
    }

    #[test]
    fn test_unknown_issuer_still_extracts() {
        let result = StatementExtractor::default().extract("Acme Card\nTotal Due: 99.00");
        assert_eq!(result.issuer.name, "Unknown");
        assert_eq!(result.field(fields::TOTAL_DUE), Some("99.00"));
    }

    #[test]
    fn test_strict_issuer_mode() {
        let extractor = StatementExtractor::default().with_required_issuer(true);
        let err = extractor.parse("Acme Card\nTotal Due: 99.00").unwrap_err();
        assert!(matches!(err, StatementError::UnsupportedIssuer));
        assert!(extractor.parse(ICICI_STATEMENT).is_ok());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = StatementExtractor::default();
        assert_eq!(extractor.extract(ICICI_STATEMENT), extractor.extract(ICICI_STATEMENT));
    }

    #[test]
    fn test_custom_field_rule() {
        let mut config = StatementConfig::default();
        config.fields.0.push(FieldRule::new(
            "rewardPoints",
            &["reward points"],
            ValueShape::Pattern(r"(?i)points\D*(\d+)".to_string()),
        ));
        let extractor = StatementExtractor::new(&config).unwrap();
        let result = extractor.extract("Reward Points balance: 1520");

        assert_eq!(result.field("rewardPoints"), Some("1520"));
        assert_eq!(result.confidence(), "1/6 fields found");
        assert_eq!(extractor.field_names().last(), Some("rewardPoints"));
    }

    #[test]
    fn test_invalid_custom_pattern_fails_at_build() {
        let mut config = StatementConfig::default();
        config.fields.0.push(FieldRule::new(
            "broken",
            &["broken"],
            ValueShape::Pattern("[".to_string()),
        ));
        assert!(matches!(
            StatementExtractor::new(&config),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_reserved_field_name_fails_at_build() {
        let mut config = StatementConfig::default();
        config.fields.0.push(FieldRule::new(
            "issuer",
            &["issued by"],
            ValueShape::Pattern(r"by (\w+)".to_string()),
        ));
        assert!(matches!(
            StatementExtractor::new(&config),
            Err(ConfigError::ReservedField(name)) if name == "issuer"
        ));
    }

    #[test]
    fn test_decode_failure_is_terminal() {
        let extractor = StatementExtractor::default();
        let decoder = PlainTextDecoder::default();
        let err = extractor.parse_document(&decoder, &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, StatementError::Decode(DecodeError::InvalidUtf8)));
    }

    #[test]
    fn test_parse_document_plain_text() {
        let extractor = StatementExtractor::default();
        let decoder = PlainTextDecoder::default();
        let result = extractor
            .parse_document(&decoder, ICICI_STATEMENT.as_bytes())
            .unwrap();
        assert_eq!(result.issuer.name, "ICICI");
    }

    #[test]
    fn test_extractor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StatementExtractor>();
    }
}
