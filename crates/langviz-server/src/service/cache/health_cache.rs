//! Trace store health probe with a short-lived cache.
//!
//! The health endpoint may be polled frequently by load balancers and the
//! dashboard. Probe results are reused for a configurable duration so that
//! polling does not translate into one store round trip per request.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use axum::extract::FromRef;
use langviz_postgres::PgClient;
use tokio::sync::RwLock;

/// Tracing target for health probe operations.
const TRACING_TARGET_HEALTH: &str = "langviz_server::service::health";

/// Default cache duration for health checks.
const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(30);

/// Cached probe result and the time it was taken.
#[derive(Debug)]
struct HealthCacheEntry {
    is_healthy: AtomicBool,
    /// `None` until the first probe and after invalidation.
    last_check: RwLock<Option<Instant>>,
    cache_duration: Duration,
}

impl HealthCacheEntry {
    fn new(cache_duration: Duration) -> Self {
        Self {
            is_healthy: AtomicBool::new(false),
            last_check: RwLock::new(None),
            cache_duration,
        }
    }

    /// Returns the cached status, or runs `check_fn` if the entry expired.
    async fn get_or_update<F, Fut>(&self, check_fn: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = bool>,
    {
        let now = Instant::now();
        let last_check = { *self.last_check.read().await };

        if let Some(last_check) = last_check
            && now.duration_since(last_check) < self.cache_duration
        {
            return self.is_healthy.load(Ordering::Relaxed);
        }

        let healthy = check_fn().await;

        self.is_healthy.store(healthy, Ordering::Relaxed);
        *self.last_check.write().await = Some(now);

        healthy
    }

    fn get_cached(&self) -> bool {
        self.is_healthy.load(Ordering::Relaxed)
    }

    async fn invalidate(&self) {
        *self.last_check.write().await = None;
    }
}

/// Health probe for the trace store with a shared cache.
///
/// Clones share the same cache entry.
///
/// ```no_run
/// # use langviz_server::service::HealthCache;
/// # use std::time::Duration;
/// # async fn example() {
/// let health = HealthCache::with_cache_duration(Duration::from_secs(10));
///
/// // Fast read of the last probe result.
/// let cached = health.get_cached_health();
///
/// // Force the next call to `is_healthy` to probe the store.
/// health.invalidate().await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HealthCache {
    cache: Arc<HealthCacheEntry>,
}

impl HealthCache {
    /// Creates a cache with the default duration of 30 seconds.
    pub fn new() -> Self {
        Self::with_cache_duration(DEFAULT_CACHE_DURATION)
    }

    /// Creates a cache that reuses probe results for `cache_duration`.
    ///
    /// A zero duration probes the store on every call.
    pub fn with_cache_duration(cache_duration: Duration) -> Self {
        tracing::info!(
            target: TRACING_TARGET_HEALTH,
            cache_duration_secs = cache_duration.as_secs(),
            "health cache initialized"
        );

        Self {
            cache: Arc::new(HealthCacheEntry::new(cache_duration)),
        }
    }

    /// Returns whether the trace store answers a connectivity probe.
    ///
    /// Uses the cached result while it is fresh.
    pub async fn is_healthy<S>(&self, service_state: &S) -> bool
    where
        PgClient: FromRef<S>,
    {
        let pg_client = PgClient::from_ref(service_state);
        self.cache
            .get_or_update(|| Self::check_database(&pg_client))
            .await
    }

    /// Returns the last probe result without probing.
    ///
    /// `false` until the first probe completes.
    pub fn get_cached_health(&self) -> bool {
        self.cache.get_cached()
    }

    /// Forces the next [`HealthCache::is_healthy`] call to probe the store.
    pub async fn invalidate(&self) {
        self.cache.invalidate().await;

        tracing::debug!(
            target: TRACING_TARGET_HEALTH,
            "Health cache invalidated"
        );
    }

    #[tracing::instrument(skip_all, target = TRACING_TARGET_HEALTH)]
    async fn check_database(pg_client: &PgClient) -> bool {
        let start = Instant::now();
        let result = pg_client.ping().await;
        let pool_status = pg_client.pool_status();

        match result {
            Ok(()) => {
                tracing::debug!(
                    target: TRACING_TARGET_HEALTH,
                    duration_ms = start.elapsed().as_millis() as u64,
                    pool_size = pool_status.size,
                    pool_available = pool_status.available,
                    under_pressure = pool_status.is_under_pressure(),
                    "postgres health check passed"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET_HEALTH,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "postgres health check failed"
                );
                false
            }
        }
    }
}

impl Default for HealthCache {
    fn default() -> Self {
        Self::new()
    }
}
