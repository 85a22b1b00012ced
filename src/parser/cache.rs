//! Single-entry parse cache
//!
//! Editors ask for diagnostics, hover, completion and formatting against the
//! same text in quick succession. The cache keeps the most recent result so
//! those requests share one parse.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::parser::{ParseOptions, ParseResult, parse_with};

#[derive(Debug)]
struct Entry {
    text: String,
    options: ParseOptions,
    result: Arc<ParseResult>,
}

/// Remembers the last `(text, options)` pair and its parse result.
#[derive(Debug, Default)]
pub struct ParseCache {
    slot: Mutex<Option<Entry>>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text`, reusing the previous result when nothing changed.
    pub fn parse(&self, text: &str, options: &ParseOptions) -> Arc<ParseResult> {
        let mut slot = self.slot.lock();
        if let Some(entry) = slot.as_ref()
            && entry.text == text
            && entry.options == *options
        {
            trace!("parse cache hit");
            return Arc::clone(&entry.result);
        }

        let result = Arc::new(parse_with(text, options));
        *slot = Some(Entry {
            text: text.to_string(),
            options: options.clone(),
            result: Arc::clone(&result),
        });
        result
    }

    /// Drop the cached entry.
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}
