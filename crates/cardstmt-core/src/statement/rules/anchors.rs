//! Keyword-anchored line scanning.

use tracing::trace;

use super::ValuePattern;

/// A document line with its lowercased form for anchor matching.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    /// Original text, used for value capture.
    pub text: &'a str,
    /// Lowercased text, used for keyword matching.
    pub lower: String,
}

/// Split document text into lines, preserving document order.
pub fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .map(|text| Line {
            text,
            lower: text.to_lowercase(),
        })
        .collect()
}

/// Return the first keyword (in configured order) contained in the line.
pub fn find_anchor<'k>(lower_line: &str, keywords: &'k [String]) -> Option<&'k str> {
    keywords
        .iter()
        .map(String::as_str)
        .find(|keyword| !keyword.is_empty() && lower_line.contains(keyword))
}

/// Extract a single field.
///
/// Lines are scanned in document order; the first anchored line whose value
/// pattern matches decides the field. A later line is never preferred, even
/// if it carries a higher-priority keyword.
pub fn extract_field(lines: &[Line<'_>], keywords: &[String], pattern: &ValuePattern) -> Option<String> {
    for (index, line) in lines.iter().enumerate() {
        let Some(keyword) = find_anchor(&line.lower, keywords) else {
            continue;
        };

        match pattern.find(line.text) {
            Some(value) => {
                trace!("line {}: anchor {:?} matched value {:?}", index + 1, keyword, value);
                return Some(value);
            }
            None => {
                trace!("line {}: anchor {:?} without a matching value", index + 1, keyword);
            }
        }
    }

    None
}
