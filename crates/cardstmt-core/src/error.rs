//! Error types for the cardstmt-core library.

use thiserror::Error;

/// Main error type for the cardstmt library.
///
/// A field that cannot be found is never an error; it is reported as an
/// absent value in the extraction result. An unknown issuer is also not an
/// error unless strict issuer mode is enabled.
#[derive(Error, Debug)]
pub enum StatementError {
    /// The document could not be turned into text.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid issuer registry or field specification.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No configured issuer was recognized and strict issuer mode is on.
    #[error("Unsupported statement. Please upload a statement from a supported bank.")]
    UnsupportedIssuer,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StatementError {
    /// Human-readable message suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::Decode(_) => {
                "Failed to parse the document. It may be corrupted or protected.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Errors raised while converting document bytes to text.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Failed to open/parse the document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// The document is encrypted and cannot be opened with an empty password.
    #[error("document is encrypted")]
    Encrypted,

    /// The document has no pages.
    #[error("document has no pages")]
    NoPages,

    /// The text layer could not be read.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The document decoded but carries no usable text (e.g. a scan).
    #[error("document contains no extractable text")]
    NoText,

    /// Plain-text input was not valid UTF-8.
    #[error("document is not valid UTF-8 text")]
    InvalidUtf8,

    /// No decoder handles this kind of document.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Errors in the issuer registry or field specification.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Two field rules share a name.
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    /// A field name collides with a key of the serialized result.
    #[error("field name {0} is reserved")]
    ReservedField(String),

    /// A field rule has no anchor keywords.
    #[error("field {0} has no keywords")]
    NoKeywords(String),

    /// A custom value pattern failed to compile.
    #[error("invalid pattern for {field}: {reason}")]
    InvalidPattern { field: String, reason: String },

    /// An issuer entry has an empty key.
    #[error("issuer entry has an empty key")]
    EmptyIssuerKey,

    /// The configuration file could not be read or parsed.
    #[error("failed to read configuration: {0}")]
    Read(String),
}

/// Result type for the cardstmt library.
pub type Result<T> = std::result::Result<T, StatementError>;
