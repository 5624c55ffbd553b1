use once_cell::sync::Lazy;
use regex::Regex;

// One or more blank (whitespace-only) lines between two line breaks.
static PARAGRAPH_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\r?\n\s*)+\r?\n").expect("separator pattern compiles"));

/// Splits a document into paragraphs on runs of blank lines.
///
/// Only the separator is consumed: whitespace at the end of a paragraph and
/// indentation at the start of the next one are kept.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_SEPARATOR.split(text).collect()
}
