#![allow(clippy::unwrap_used)]

//! Model cache behaviour under concurrency, cancellation and refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::helpers::fixtures::{ORDERS_ROOT, ORDERS_V2, ORDERS_V4};
use odata::metadata::{
    DigestionError, FileSource, MetadataError, MetadataSource, ModelCache, StaticSource,
};
use tokio_util::sync::CancellationToken;

/// Serves one document after a delay and counts fetches.
struct SlowSource {
    xml: String,
    delay: Duration,
    fetches: AtomicUsize,
}

impl SlowSource {
    fn new(xml: &str, delay: Duration) -> Self {
        Self {
            xml: xml.to_string(),
            delay,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl MetadataSource for SlowSource {
    async fn fetch(&self, _endpoint: &str) -> Result<Option<String>, MetadataError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(Some(self.xml.clone()))
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_share_one_digestion() {
    let cache = ModelCache::new(SlowSource::new(ORDERS_V4, Duration::from_secs(1)));
    let cancel = CancellationToken::new();
    let slashed = format!("{ORDERS_ROOT}/");

    let (a, b, c) = tokio::join!(
        cache.get_model(ORDERS_ROOT, &cancel),
        cache.get_model(ORDERS_ROOT, &cancel),
        cache.get_model(&slashed, &cancel),
    );
    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

    assert_eq!(cache.source().fetches(), 1);
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &c));

    let again = cache.get_model(ORDERS_ROOT, &cancel).await.unwrap();
    assert!(Arc::ptr_eq(&a, &again));
    assert_eq!(cache.source().fetches(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_request_caches_nothing() {
    let cache = Arc::new(ModelCache::new(SlowSource::new(
        ORDERS_V4,
        Duration::from_secs(10),
    )));
    let cancel = CancellationToken::new();

    let request = tokio::spawn({
        let cache = Arc::clone(&cache);
        let cancel = cancel.clone();
        async move { cache.get_model(ORDERS_ROOT, &cancel).await }
    });
    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.cancel();

    let result = request.await.unwrap();
    assert!(matches!(result, Err(MetadataError::Cancelled)));
    assert!(cache.peek(ORDERS_ROOT).is_none());

    let model = cache
        .get_model(ORDERS_ROOT, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(model.entity_types.len(), 2);
    assert_eq!(cache.source().fetches(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancelling_one_waiter_leaves_others_running() {
    let cache = ModelCache::new(SlowSource::new(ORDERS_V4, Duration::from_secs(1)));
    let cancelled = CancellationToken::new();
    cancelled.cancel();
    let live = CancellationToken::new();

    let (first, second) = tokio::join!(
        cache.get_model(ORDERS_ROOT, &cancelled),
        cache.get_model(ORDERS_ROOT, &live),
    );
    assert!(matches!(first, Err(MetadataError::Cancelled)));
    assert_eq!(second.unwrap().entity_types.len(), 2);
}

#[tokio::test]
async fn test_refresh_replaces_model_only_on_success() {
    let source = StaticSource::new().with_document(ORDERS_ROOT, ORDERS_V4);
    let cache = ModelCache::new(source);
    let cancel = CancellationToken::new();

    let first = cache.get_model(ORDERS_ROOT, &cancel).await.unwrap();
    cache.source().insert(ORDERS_ROOT, ORDERS_V2);
    let refreshed = cache.refresh_model(ORDERS_ROOT, &cancel).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &refreshed));
    assert_eq!(refreshed.version, odata::ODataVersion::V2);
    assert!(Arc::ptr_eq(&cache.peek(ORDERS_ROOT).unwrap(), &refreshed));

    cache.source().insert(ORDERS_ROOT, "<a></b>");
    let failed = cache.refresh_model(ORDERS_ROOT, &cancel).await;
    assert!(matches!(failed, Err(MetadataError::Digestion(DigestionError::Xml(_)))));
    assert!(Arc::ptr_eq(&cache.peek(ORDERS_ROOT).unwrap(), &refreshed));
}

#[tokio::test]
async fn test_empty_metadata_is_an_error_and_not_cached() {
    let source = StaticSource::new().with_document(ORDERS_ROOT, "   ");
    let cache = ModelCache::new(source);
    let cancel = CancellationToken::new();

    let err = cache.get_model(ORDERS_ROOT, &cancel).await.unwrap_err();
    assert!(matches!(err, MetadataError::EmptyMetadata { ref endpoint } if endpoint == ORDERS_ROOT));

    let err = cache.get_model("https://unknown.example.com/x.svc", &cancel).await.unwrap_err();
    assert!(matches!(err, MetadataError::EmptyMetadata { .. }));

    cache.source().insert(ORDERS_ROOT, ORDERS_V4);
    assert!(cache.get_model(ORDERS_ROOT, &cancel).await.is_ok());
}

#[tokio::test]
async fn test_clear_cache() {
    let other = "https://example.com/legacy.svc";
    let source = StaticSource::new()
        .with_document(ORDERS_ROOT, ORDERS_V4)
        .with_document(other, ORDERS_V2);
    let cache = ModelCache::new(source);
    let cancel = CancellationToken::new();
    cache.get_model(ORDERS_ROOT, &cancel).await.unwrap();
    cache.get_model(other, &cancel).await.unwrap();

    cache.clear_cache(Some(&format!("{ORDERS_ROOT}/")));
    assert!(cache.peek(ORDERS_ROOT).is_none());
    assert!(cache.peek(other).is_some());

    cache.clear_cache(None);
    assert!(cache.peek(other).is_none());
}

#[tokio::test]
async fn test_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.xml");
    std::fs::write(&path, ORDERS_V4).unwrap();

    let source = FileSource::new();
    source.register(ORDERS_ROOT, &path);
    source.register("https://example.com/gone.svc", dir.path().join("missing.xml"));
    let cache = ModelCache::new(source);
    let cancel = CancellationToken::new();

    let model = cache.get_model(ORDERS_ROOT, &cancel).await.unwrap();
    assert_eq!(model.container.name, "OrdersContainer");

    let err = cache
        .get_model("https://example.com/gone.svc", &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, MetadataError::EmptyMetadata { .. }));
}
