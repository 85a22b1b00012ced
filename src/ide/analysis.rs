//! AnalysisHost and Analysis: state management for editor features.
//!
//! The `AnalysisHost` owns the active profile, the injected model cache and
//! the single-slot parse cache. Diagnostics are async because they may have
//! to digest metadata first. Everything else works on an `Analysis`
//! snapshot that pairs one text with its parse and whatever model is
//! already cached.
//!
//! ## Usage
//!
//! ```ignore
//! let host = AnalysisHost::new(Arc::new(ModelCache::new(source)));
//! host.set_profile(Profile::new("northwind", "https://host/Northwind.svc"));
//!
//! let diagnostics = host.diagnostics(text, &cancel).await;
//! let analysis = host.analysis(text);
//! let items = analysis.completions(offset);
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::completion::{CompletionItem, completions_with};
use super::config::{AnalysisConfig, Profile};
use super::hover::{HoverResult, query_hover};
use super::signature::{SignatureHelp, signature_help};
use crate::metadata::{DataModel, MetadataError, MetadataSource, ModelCache};
use crate::parser::{ParseCache, ParseOptions, ParseResult};
use crate::semantic::{Diagnostic, analyze};
use crate::syntax::{FormattingRange, format_query, formatting_ranges};

/// Owns the mutable state for the editor layer.
pub struct AnalysisHost<S> {
    cache: Arc<ModelCache<S>>,
    parse_cache: ParseCache,
    profile: RwLock<Option<Profile>>,
    config: AnalysisConfig,
}

impl<S: MetadataSource> AnalysisHost<S> {
    /// Create a host around a shared model cache.
    pub fn new(cache: Arc<ModelCache<S>>) -> Self {
        Self::with_config(cache, AnalysisConfig::default())
    }

    pub fn with_config(cache: Arc<ModelCache<S>>, config: AnalysisConfig) -> Self {
        Self {
            cache,
            parse_cache: ParseCache::new(),
            profile: RwLock::new(None),
            config,
        }
    }

    /// Create a host with its own cache over `source`, digesting with the
    /// configured namespace stripping.
    pub fn from_source(source: S, config: AnalysisConfig) -> Self {
        let cache = ModelCache::with_options(source, config.digest_options());
        Self::with_config(Arc::new(cache), config)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn model_cache(&self) -> &Arc<ModelCache<S>> {
        &self.cache
    }

    pub fn profile(&self) -> Option<Profile> {
        self.profile.read().clone()
    }

    /// Make `profile` the active connection.
    pub fn set_profile(&self, profile: Profile) {
        debug!(profile = %profile.name, base_url = %profile.base_url, "profile selected");
        *self.profile.write() = Some(profile);
        self.parse_cache.clear();
    }

    /// Deselect the active profile and evict its model.
    pub fn remove_profile(&self) -> Option<Profile> {
        let removed = self.profile.write().take();
        if let Some(profile) = &removed {
            self.cache.clear_cache(Some(&profile.base_url));
        }
        self.parse_cache.clear();
        removed
    }

    /// Parser options for the active profile.
    pub fn parse_options(&self) -> ParseOptions {
        match self.profile.read().as_ref() {
            Some(profile) => ParseOptions::with_service_root(profile.base_url.as_str()),
            None => ParseOptions::default(),
        }
    }

    /// Parse through the single-slot cache.
    pub fn parse(&self, text: &str) -> Arc<ParseResult> {
        self.parse_cache.parse(text, &self.parse_options())
    }

    /// The active profile's model, digesting it if needed.
    ///
    /// `Ok(None)` when no profile is selected.
    pub async fn model(&self, cancel: &CancellationToken) -> Result<Option<Arc<DataModel>>, MetadataError> {
        match self.profile() {
            Some(profile) => self.cache.get_model(&profile.base_url, cancel).await.map(Some),
            None => Ok(None),
        }
    }

    /// Digest the active profile's metadata again.
    pub async fn refresh_model(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<Arc<DataModel>>, MetadataError> {
        match self.profile() {
            Some(profile) => self.cache.refresh_model(&profile.base_url, cancel).await.map(Some),
            None => Ok(None),
        }
    }

    /// Syntax error or semantic warnings for `text`.
    ///
    /// A syntax error yields exactly one `Error` diagnostic. A model that
    /// cannot be loaded is logged and analysis proceeds without one. Returns
    /// `None` when cancelled.
    pub async fn diagnostics(&self, text: &str, cancel: &CancellationToken) -> Option<Vec<Diagnostic>> {
        let parsed = self.parse(text);
        let query = match parsed.as_ref() {
            Ok(query) => query,
            Err(err) => return Some(vec![Diagnostic::from(err)]),
        };

        let profile = self.profile();
        let model = match self.model(cancel).await {
            Ok(model) => model,
            Err(MetadataError::Cancelled) => return None,
            Err(err) => {
                warn!(error = %err, "metadata unavailable; skipping semantic checks");
                None
            }
        };
        if cancel.is_cancelled() {
            return None;
        }

        Some(analyze(
            query,
            model.as_deref(),
            profile.as_ref().map(|p| p.name.as_str()),
        ))
    }

    /// Snapshot for synchronous queries against `text`.
    pub fn analysis<'a>(&'a self, text: &'a str) -> Analysis<'a> {
        let options = self.parse_options();
        let model = self
            .profile
            .read()
            .as_ref()
            .and_then(|p| self.cache.peek(&p.base_url));
        Analysis {
            text,
            parsed: self.parse_cache.parse(text, &options),
            model,
            options,
            config: &self.config,
        }
    }
}

/// One text, its parse, and the model cached when the snapshot was taken.
pub struct Analysis<'a> {
    text: &'a str,
    parsed: Arc<ParseResult>,
    model: Option<Arc<DataModel>>,
    options: ParseOptions,
    config: &'a AnalysisConfig,
}

impl<'a> Analysis<'a> {
    pub fn parse_result(&self) -> &ParseResult {
        &self.parsed
    }

    pub fn model(&self) -> Option<&DataModel> {
        self.model.as_deref()
    }

    /// Diagnostics against the cached model only; never digests.
    pub fn diagnostics(&self, profile: Option<&str>) -> Vec<Diagnostic> {
        match self.parsed.as_ref() {
            Ok(query) => analyze(query, self.model(), profile),
            Err(err) => vec![Diagnostic::from(err)],
        }
    }

    pub fn completions(&self, offset: usize) -> Vec<CompletionItem> {
        completions_with(self.text, offset, self.model(), &self.options)
    }

    pub fn hover(&self, offset: usize) -> Option<HoverResult> {
        match self.parsed.as_ref() {
            Ok(query) => query_hover(query, offset, self.model()),
            Err(_) => None,
        }
    }

    pub fn signature_help(&self, offset: usize) -> Option<SignatureHelp> {
        signature_help(self.text, offset)
    }

    pub fn formatting_ranges(&self) -> Vec<FormattingRange> {
        match self.parsed.as_ref() {
            Ok(query) => formatting_ranges(query),
            Err(_) => Vec::new(),
        }
    }

    /// Reformatted text, or `None` when cancelled.
    pub fn format(&self, cancel: &CancellationToken) -> Option<String> {
        format_query(self.text, &self.config.format, &self.options, cancel)
    }
}
