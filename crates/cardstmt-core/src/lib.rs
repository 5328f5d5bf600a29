//! Core library for credit-card statement parsing.
//!
//! This crate provides:
//! - Document decoding (text-based PDF and plain text)
//! - Issuer identification from statement text
//! - Keyword-anchored field extraction (amounts, due date, card suffix, period)
//! - Normalized results with a confidence summary

pub mod decode;
pub mod error;
pub mod models;
pub mod statement;

pub use decode::{decoder_for, decoder_for_path, DocumentDecoder, DocumentKind, PlainTextDecoder};
#[cfg(feature = "pdf")]
pub use decode::PdfTextDecoder;
pub use error::{ConfigError, DecodeError, Result, StatementError};
pub use models::config::{FieldRule, FieldSpec, IssuerEntry, IssuerRegistry, StatementConfig, ValueShape};
pub use models::statement::{ExtractionResult, FieldValue, IssuerMatch, NOT_FOUND, UNKNOWN_ISSUER};
pub use statement::{StatementExtractor, StatementParser};
