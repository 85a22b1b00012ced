//! Where metadata documents come from.
//!
//! Fetching over HTTP is the caller's business; the cache only needs the
//! already-retrieved XML for an endpoint.

use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::error::MetadataError;

/// Supplies the raw EDMX text for an endpoint base URL.
pub trait MetadataSource: Send + Sync {
    /// `Ok(None)` when the endpoint has no document.
    fn fetch(
        &self,
        endpoint: &str,
    ) -> impl Future<Output = Result<Option<String>, MetadataError>> + Send;
}

/// Endpoint keys ignore a trailing `/`.
pub fn normalize_endpoint(endpoint: &str) -> &str {
    endpoint.trim().trim_end_matches('/')
}

/// In-memory documents keyed by endpoint.
#[derive(Debug, Default)]
pub struct StaticSource {
    documents: RwLock<FxHashMap<String, String>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, endpoint: &str, xml: impl Into<String>) -> Self {
        self.insert(endpoint, xml);
        self
    }

    pub fn insert(&self, endpoint: &str, xml: impl Into<String>) {
        self.documents
            .write()
            .insert(normalize_endpoint(endpoint).to_string(), xml.into());
    }

    pub fn remove(&self, endpoint: &str) -> Option<String> {
        self.documents.write().remove(normalize_endpoint(endpoint))
    }
}

impl MetadataSource for StaticSource {
    async fn fetch(&self, endpoint: &str) -> Result<Option<String>, MetadataError> {
        Ok(self
            .documents
            .read()
            .get(normalize_endpoint(endpoint))
            .cloned())
    }
}

/// Documents stored on disk, one file per endpoint.
#[derive(Debug, Default)]
pub struct FileSource {
    paths: RwLock<FxHashMap<String, PathBuf>>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, endpoint: &str, path: impl Into<PathBuf>) {
        self.paths
            .write()
            .insert(normalize_endpoint(endpoint).to_string(), path.into());
    }

    pub fn unregister(&self, endpoint: &str) {
        self.paths.write().remove(normalize_endpoint(endpoint));
    }
}

impl MetadataSource for FileSource {
    async fn fetch(&self, endpoint: &str) -> Result<Option<String>, MetadataError> {
        let path = self.paths.read().get(normalize_endpoint(endpoint)).cloned();
        let Some(path) = path else {
            return Ok(None);
        };
        match tokio::fs::read_to_string(&path).await {
            Ok(xml) => Ok(Some(xml)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "metadata file missing");
                Ok(None)
            }
            Err(e) => Err(MetadataError::source_failure(format!(
                "{}: {e}",
                path.display()
            ))),
        }
    }
}
