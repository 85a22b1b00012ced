//! Per-endpoint model cache with single-flight digestion.
//!
//! Each endpoint owns a `tokio::sync::OnceCell`; concurrent requests for the
//! same endpoint wait on one digestion. Cancelling a request drops its
//! future without writing anything, and a refresh only replaces the cached
//! model once the new one is complete.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::digest::{DigestOptions, Digester};
use super::error::MetadataError;
use super::model::DataModel;
use super::source::{MetadataSource, normalize_endpoint};

type Slot = Arc<OnceCell<Arc<DataModel>>>;

/// Digested models keyed by endpoint base URL.
pub struct ModelCache<S> {
    source: S,
    digester: Digester,
    entries: Mutex<FxHashMap<String, Slot>>,
}

impl<S: MetadataSource> ModelCache<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, DigestOptions::default())
    }

    pub fn with_options(source: S, options: DigestOptions) -> Self {
        Self {
            source,
            digester: Digester::with_options(options),
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The cached model, digesting it on first use.
    pub async fn get_model(
        &self,
        endpoint: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<DataModel>, MetadataError> {
        let key = normalize_endpoint(endpoint);
        let slot = Arc::clone(self.entries.lock().entry(key.to_string()).or_default());
        if let Some(model) = slot.get() {
            return Ok(Arc::clone(model));
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(MetadataError::Cancelled),
            result = slot.get_or_try_init(|| self.load(key)) => result.map(Arc::clone),
        }
    }

    /// Digest the endpoint again. The previous model stays cached until the
    /// new one is ready, and stays cached if the refresh fails.
    pub async fn refresh_model(
        &self,
        endpoint: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<DataModel>, MetadataError> {
        let key = normalize_endpoint(endpoint);
        let model = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(MetadataError::Cancelled),
            result = self.load(key) => result?,
        };

        let slot = Arc::new(OnceCell::new_with(Some(Arc::clone(&model))));
        self.entries.lock().insert(key.to_string(), slot);
        debug!(endpoint = key, "refreshed metadata model");
        Ok(model)
    }

    /// Evict one endpoint, or everything when `endpoint` is `None`.
    pub fn clear_cache(&self, endpoint: Option<&str>) {
        let mut entries = self.entries.lock();
        match endpoint {
            Some(endpoint) => {
                entries.remove(normalize_endpoint(endpoint));
                debug!(endpoint, "evicted metadata model");
            }
            None => {
                entries.clear();
                debug!("cleared metadata cache");
            }
        }
    }

    /// The cached model if one is ready, without digesting.
    pub fn peek(&self, endpoint: &str) -> Option<Arc<DataModel>> {
        self.entries
            .lock()
            .get(normalize_endpoint(endpoint))
            .and_then(|slot| slot.get().cloned())
    }

    async fn load(&self, key: &str) -> Result<Arc<DataModel>, MetadataError> {
        let xml = match self.source.fetch(key).await? {
            Some(xml) if !xml.trim().is_empty() => xml,
            _ => return Err(MetadataError::empty(key)),
        };

        let digester = self.digester.clone();
        let model = tokio::task::spawn_blocking(move || digester.digest(&xml))
            .await
            .map_err(|e| MetadataError::source_failure(format!("digestion task failed: {e}")))??;

        debug!(endpoint = key, entity_types = model.entity_types.len(), "cached metadata model");
        Ok(Arc::new(model))
    }
}
