//! PDF text decoding using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{require_text, DocumentDecoder, Result};
use crate::error::DecodeError;

/// Decoder for text-based PDF statements.
///
/// Encrypted documents are opened with the empty password when possible
/// (common for bank statements); anything else encrypted is rejected.
#[derive(Debug, Clone)]
pub struct PdfTextDecoder {
    min_text_length: usize,
}

impl PdfTextDecoder {
    pub fn new(min_text_length: usize) -> Self {
        Self { min_text_length }
    }

    /// Load the document and return bytes pdf-extract can read.
    fn prepare(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut doc = Document::load_mem(data).map_err(|e| DecodeError::Parse(e.to_string()))?;

        let prepared = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(DecodeError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| DecodeError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(DecodeError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(prepared)
    }
}

impl Default for PdfTextDecoder {
    fn default() -> Self {
        Self::new(crate::models::config::DecodeConfig::default().min_text_length)
    }
}

impl DocumentDecoder for PdfTextDecoder {
    fn decode(&self, data: &[u8]) -> Result<String> {
        let prepared = self.prepare(data)?;

        // pdf-extract panics on some malformed content streams.
        let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&prepared))
            .map_err(|_| DecodeError::TextExtraction("text extraction aborted".to_string()))?
            .map_err(|e| DecodeError::TextExtraction(e.to_string()))?;

        debug!("Extracted {} characters of text from PDF", text.len());
        require_text(text, self.min_text_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_rejected() {
        let decoder = PdfTextDecoder::default();
        let err = decoder.decode(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, DecodeError::Parse(_)));
    }

    #[test]
    fn test_truncated_pdf_is_rejected() {
        let decoder = PdfTextDecoder::default();
        assert!(decoder.decode(b"%PDF-1.4\n1 0 obj\n<<").is_err());
    }
}
