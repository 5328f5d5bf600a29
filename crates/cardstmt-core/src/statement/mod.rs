//! Statement field extraction module.

mod finalize;
mod parser;
pub mod rules;

pub use finalize::{finalize, RawField};
pub use parser::StatementExtractor;

use crate::error::Result;
use crate::models::statement::ExtractionResult;

/// Trait for statement parsing.
pub trait StatementParser {
    /// Parse a statement from decoded text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}
