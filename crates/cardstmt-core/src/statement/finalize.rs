//! Value normalization and confidence scoring.

use crate::models::statement::{ExtractionResult, FieldValue, IssuerMatch};

use super::rules::strip_separators;

/// A field value as captured from the document, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub name: String,
    pub value: Option<String>,
    /// Whether the value is a currency amount.
    pub amount: bool,
}

/// Normalize raw values and assemble the result.
///
/// Amounts lose their thousands separators; every other value is kept as
/// matched. The confidence score is derived from the assembled fields.
pub fn finalize(raw: Vec<RawField>, issuer: IssuerMatch) -> ExtractionResult {
    let fields = raw
        .into_iter()
        .map(|field| {
            let value = if field.amount {
                field.value.map(|v| strip_separators(&v))
            } else {
                field.value
            };
            FieldValue::new(field.name, value)
        })
        .collect();

    ExtractionResult { issuer, fields }
}
