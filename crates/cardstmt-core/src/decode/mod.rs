//! Document-to-text decoding.
//!
//! Decoders turn raw document bytes into a single text string. Anything that
//! cannot produce usable text is a [`DecodeError`]; the extractor never runs
//! on partial or garbled output.

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "pdf")]
pub use pdf::PdfTextDecoder;

use std::path::Path;

use tracing::debug;

use crate::error::DecodeError;
use crate::models::config::DecodeConfig;

/// Result type for decode operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Trait for document decoders.
pub trait DocumentDecoder: Send + Sync {
    /// Decode document bytes into text.
    fn decode(&self, data: &[u8]) -> Result<String>;
}

/// Kind of document, detected from a file name or content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Detect the kind from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "txt" | "text" => Ok(Self::Text),
            other => Err(DecodeError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                other.to_string()
            })),
        }
    }

    /// Detect the kind from leading bytes. Anything that is not a PDF is
    /// treated as text.
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(b"%PDF-") {
            Self::Pdf
        } else {
            Self::Text
        }
    }
}

/// Build the decoder for a document kind.
pub fn decoder_for(kind: DocumentKind, config: &DecodeConfig) -> Result<Box<dyn DocumentDecoder>> {
    match kind {
        #[cfg(feature = "pdf")]
        DocumentKind::Pdf => Ok(Box::new(PdfTextDecoder::new(config.min_text_length))),
        #[cfg(not(feature = "pdf"))]
        DocumentKind::Pdf => Err(DecodeError::UnsupportedFormat("pdf".to_string())),
        DocumentKind::Text => Ok(Box::new(PlainTextDecoder::new(config.min_text_length))),
    }
}

/// Build the decoder for a file, based on its extension.
pub fn decoder_for_path(path: &Path, config: &DecodeConfig) -> Result<Box<dyn DocumentDecoder>> {
    let kind = DocumentKind::from_path(path)?;
    debug!("Using {:?} decoder for {}", kind, path.display());
    decoder_for(kind, config)
}

/// Decoder for documents that are already plain UTF-8 text.
#[derive(Debug, Clone)]
pub struct PlainTextDecoder {
    min_text_length: usize,
}

impl PlainTextDecoder {
    pub fn new(min_text_length: usize) -> Self {
        Self { min_text_length }
    }
}

impl Default for PlainTextDecoder {
    fn default() -> Self {
        Self::new(DecodeConfig::default().min_text_length)
    }
}

impl DocumentDecoder for PlainTextDecoder {
    fn decode(&self, data: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(data).map_err(|_| DecodeError::InvalidUtf8)?;
        require_text(text.to_string(), self.min_text_length)
    }
}

/// Reject text with fewer than `min_len` non-whitespace characters.
pub(crate) fn require_text(text: String, min_len: usize) -> Result<String> {
    let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
    if meaningful == 0 || meaningful < min_len {
        debug!("Decoded text too short: {} characters", meaningful);
        return Err(DecodeError::NoText);
    }
    Ok(text)
}
