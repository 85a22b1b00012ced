//! Analysis configuration and connection profiles.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::base::constants::DEFAULT_DEBOUNCE_MS;
use crate::metadata::DigestOptions;
use crate::syntax::FormatOptions;

/// Settings shared by the analysis host and the debounced scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Quiet period after the last edit before a pass runs.
    pub debounce: Duration,
    /// Namespace URIs removed from metadata documents before digestion.
    pub strip_namespaces: Vec<String>,
    pub format: FormatOptions,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            strip_namespaces: Vec::new(),
            format: FormatOptions::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    pub fn digest_options(&self) -> DigestOptions {
        DigestOptions {
            strip_namespaces: self.strip_namespaces.clone(),
        }
    }
}

/// A named service connection. Its base URL keys the model cache and marks
/// where the resource path starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub base_url: String,
}

impl Profile {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}
