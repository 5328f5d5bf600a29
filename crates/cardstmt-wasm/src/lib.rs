//! WASM bindings for credit-card statement parsing.
//!
//! Text extraction happens on the JavaScript side (e.g. pdf.js); these
//! bindings run the field extraction on the resulting text.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use cardstmt_core::{StatementConfig, StatementParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract statement fields from text using the built-in configuration.
///
/// Returns a plain object: `{ issuer, assetRef, <fields>..., confidence }`.
#[wasm_bindgen]
pub fn extract_from_text(text: &str) -> Result<JsValue, JsValue> {
    let result = cardstmt_core::StatementExtractor::default().extract(text);
    to_js(&result)
}

/// Statement extractor class for browser use.
#[wasm_bindgen]
pub struct StatementExtractor {
    inner: cardstmt_core::StatementExtractor,
}

#[wasm_bindgen]
impl StatementExtractor {
    /// Create an extractor with the built-in issuer registry and fields.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: cardstmt_core::StatementExtractor::default(),
        }
    }

    /// Create an extractor from a JSON configuration document.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config_json: &str) -> Result<StatementExtractor, JsValue> {
        let inner = build_extractor(config_json).map_err(|e| js_error(&e))?;
        Ok(Self { inner })
    }

    /// Reject statements from issuers missing in the registry.
    #[wasm_bindgen(js_name = setRequireKnownIssuer)]
    pub fn set_require_known_issuer(&mut self, required: bool) {
        self.inner = std::mem::take(&mut self.inner).with_required_issuer(required);
    }

    /// Extract statement fields from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self
            .inner
            .parse(text)
            .map_err(|e| js_error(&e.user_message()))?;

        to_js(&result)
    }

    /// Confidence summary only, e.g. "3/5 fields found".
    #[wasm_bindgen]
    pub fn confidence(&self, text: &str) -> String {
        self.inner.extract(text).confidence()
    }
}

impl Default for StatementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn build_extractor(config_json: &str) -> Result<cardstmt_core::StatementExtractor, String> {
    let config: StatementConfig = serde_json::from_str(config_json).map_err(|e| e.to_string())?;
    cardstmt_core::StatementExtractor::new(&config).map_err(|e| e.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    // Plain objects rather than JS `Map`s for the flattened result.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| js_error(&e.to_string()))
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATEMENT: &str = "HDFC Bank\nPayment Due Date: 15-Feb-2025\nTotal Amount Due: 1,02,345.50\n";

    #[test]
    fn test_confidence() {
        let extractor = StatementExtractor::new();
        assert_eq!(extractor.confidence(STATEMENT), "2/5 fields found");
        assert_eq!(extractor.confidence(""), "0/5 fields found");
    }

    #[test]
    fn test_build_extractor_from_config() {
        let extractor = build_extractor(
            r#"{"fields":[{"name":"totalDue","keywords":["total amount due"],"shape":"amount"}]}"#,
        )
        .unwrap();
        assert_eq!(extractor.extract(STATEMENT).confidence(), "1/1 fields found");

        assert!(build_extractor("{not json").is_err());
        assert!(build_extractor(
            r#"{"fields":[{"name":"x","keywords":["x"],"shape":{"pattern":"(["}}]}"#
        )
        .is_err());
    }

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
