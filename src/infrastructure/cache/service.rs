//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value accelerator for the redirect hot path.
///
/// Holds two projections per short code: the original URL (immutable once
/// cached) and a running click tally. Implementations must be thread-safe,
/// and [`LinkCache::incr_clicks`] must be an atomic increment-and-return;
/// a read-modify-write at the application layer loses updates under
/// concurrent hits.
///
/// URL reads and writes are fail-open: errors are logged and reported as
/// misses so a broken cache degrades the request to the durable store
/// instead of failing it. The tally increment is fail-closed so callers can
/// fall back to a direct durable increment and not lose the click.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process map
/// - [`crate::infrastructure::cache::NullCache`] - Always-miss, for disabled caching
#[async_trait]
pub trait LinkCache: Send + Sync {
    /// Retrieves the original URL for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss or backend error (fail-open)
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>>;

    /// Stores a URL mapping with no expiry.
    ///
    /// Eviction is an external cache-lifecycle concern; entries are never
    /// given a TTL by this service.
    async fn set_url(&self, code: &str, original_url: &str) -> CacheResult<()>;

    /// Seeds the click tally with the persisted count (set, not increment).
    ///
    /// Called once when an entry is populated on a cache miss.
    async fn seed_clicks(&self, code: &str, clicks: i64) -> CacheResult<()>;

    /// Atomically increments the click tally and returns the new value.
    ///
    /// # Errors
    ///
    /// Propagates backend failures so the caller can count the click
    /// durably instead.
    async fn incr_clicks(&self, code: &str) -> CacheResult<i64>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
