//! Shared fixtures and helpers for integration tests.

pub mod fixtures;
pub mod url_corpus;

use odata::metadata::{DataModel, digest};
use odata::parser::{ParsedQuery, parse};

/// Digest a fixture, panicking with the digestion error on failure.
pub fn model(xml: &str) -> DataModel {
    digest(xml).unwrap_or_else(|e| panic!("fixture failed to digest: {e}"))
}

/// Parse a URL, panicking with the syntax error on failure.
pub fn parsed(url: &str) -> ParsedQuery {
    parse(url).unwrap_or_else(|e| panic!("failed to parse {url:?}: {e}"))
}

/// Byte offset just past the first occurrence of `needle`.
pub fn offset_after(text: &str, needle: &str) -> usize {
    text.find(needle)
        .map(|i| i + needle.len())
        .unwrap_or_else(|| panic!("{needle:?} not found in {text:?}"))
}
