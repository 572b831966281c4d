use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// In-memory cache of directory snapshots
///
/// Each entry is an immutable `Arc<Vec<T>>`; a request ranks against whatever
/// snapshot it obtained, even if the entry is replaced meanwhile.
pub struct SnapshotCache<T> {
    inner: moka::future::Cache<String, Arc<Vec<T>>>,
}

impl<T> SnapshotCache<T>
where
    T: Send + Sync + 'static,
{
    /// Create a new snapshot cache
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let inner = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs.max(1)))
            .build();

        Self { inner }
    }

    /// Return the cached snapshot for `key`, running `load` on a miss.
    ///
    /// Concurrent misses on the same key share a single `load`; an error is
    /// handed to every waiter and nothing is cached.
    pub async fn get_or_load<F, E>(&self, key: &str, load: F) -> Result<Arc<Vec<T>>, Arc<E>>
    where
        F: Future<Output = Result<Vec<T>, E>>,
        E: Send + Sync + 'static,
    {
        self.inner
            .try_get_with(key.to_string(), async {
                tracing::trace!("Snapshot cache miss: {}", key);
                load.await.map(Arc::new)
            })
            .await
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for the facility snapshot
    pub fn facilities() -> &'static str {
        "facilities"
    }

    /// Key for the need snapshot (all statuses)
    pub fn needs() -> &'static str {
        "needs"
    }
}
