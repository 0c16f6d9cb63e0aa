//! Redirect resolution with a write-behind click-count cache.
//!
//! The hot path avoids a durable write per request: cache hits bump an
//! in-cache tally and only every [`FLUSH_INTERVAL`]-th hit writes the tally
//! back to the database. The persisted counter is therefore a lower bound
//! that lags the true total by at most one flush interval.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::LinkCache;
use crate::utils::url_rules::ensure_scheme;

/// Number of cache-path hits between write-backs of the click tally.
pub const FLUSH_INTERVAL: i64 = 10;

/// Resolves short codes to destination URLs and records clicks.
///
/// # Resolution Paths
///
/// - **Cache hit**: atomic tally increment; flush to the store at every
///   [`FLUSH_INTERVAL`]-th hit; no store read.
/// - **Cache miss**: store read (404 if absent), cache populate (URL set,
///   tally seeded with the persisted count), direct durable `clicks + 1`.
/// - **Cache down**: every request degrades to the miss path; the service
///   keeps answering from the store alone.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn LinkCache>,
}

impl RedirectService {
    /// Creates a new redirect service.
    pub fn new(links: Arc<dyn LinkRepository>, cache: Arc<dyn LinkCache>) -> Self {
        Self { links, cache }
    }

    /// Resolves a short code to its destination URL and records the click.
    ///
    /// The returned URL is scheme-normalized: stored values without an
    /// `http://`/`https://` prefix get `http://` prepended.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes. Store failures on
    /// the miss path are surfaced; cache failures are not.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        match self.cache.get_url(code).await {
            Ok(Some(url)) => {
                self.record_cached_click(code).await?;
                Ok(ensure_scheme(&url))
            }
            Ok(None) => self.resolve_from_store(code).await,
            Err(e) => {
                warn!("Cache lookup failed for {}: {}", code, e);
                self.resolve_from_store(code).await
            }
        }
    }

    /// Counts a click on the cache-hit path.
    ///
    /// On the flush boundary the tally is written back as the authoritative
    /// count; a failed write-back is retried implicitly at the next boundary
    /// since the tally keeps growing and the flush takes the maximum.
    async fn record_cached_click(&self, code: &str) -> Result<(), AppError> {
        match self.cache.incr_clicks(code).await {
            Ok(tally) => {
                if tally % FLUSH_INTERVAL == 0 {
                    debug!("Flushing click tally for {}: {}", code, tally);
                    if let Err(e) = self.links.flush_clicks(code, tally).await {
                        warn!("Click flush failed for {}: {}", code, e);
                    }
                }
                Ok(())
            }
            Err(e) => {
                // Tally unavailable; count the click durably so it is not lost.
                warn!("Cache increment failed for {}: {}", code, e);
                self.links.increment_clicks(code).await
            }
        }
    }

    /// Cache-miss path: read the store, populate the cache, count durably.
    async fn resolve_from_store(&self, code: &str) -> Result<String, AppError> {
        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Unknown code", json!({ "code": code })))?;

        // Populate before incrementing: the tally is seeded with the
        // pre-increment count, so hit-path tallies and the durable counter
        // converge at the next flush boundary.
        let _ = self.cache.set_url(code, &link.original_url).await;
        let _ = self.cache.seed_clicks(code, link.clicks).await;

        self.links.increment_clicks(code).await?;

        Ok(ensure_scheme(&link.original_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Link;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{CacheError, CacheResult, MemoryCache, NullCache};
    use async_trait::async_trait;
    use chrono::Utc;

    fn test_link(code: &str, url: &str, clicks: i64) -> Link {
        Link::new(1, code.to_string(), url.to_string(), clicks, None, Utc::now())
    }

    /// Cache whose every operation fails, for degraded-mode tests.
    struct BrokenCache;

    #[async_trait]
    impl LinkCache for BrokenCache {
        async fn get_url(&self, _code: &str) -> CacheResult<Option<String>> {
            Err(CacheError::ConnectionError("down".to_string()))
        }
        async fn set_url(&self, _code: &str, _url: &str) -> CacheResult<()> {
            Err(CacheError::ConnectionError("down".to_string()))
        }
        async fn seed_clicks(&self, _code: &str, _clicks: i64) -> CacheResult<()> {
            Err(CacheError::ConnectionError("down".to_string()))
        }
        async fn incr_clicks(&self, _code: &str) -> CacheResult<i64> {
            Err(CacheError::ConnectionError("down".to_string()))
        }
        async fn health_check(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_miss_populates_cache_and_counts_durably() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "https://example.com/x", 5))));
        repo.expect_increment_clicks()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(()));

        let cache = Arc::new(MemoryCache::new());
        let service = RedirectService::new(Arc::new(repo), cache.clone());

        let url = service.resolve("abc123").await.unwrap();
        assert_eq!(url, "https://example.com/x");

        // Entry established: URL cached, tally seeded with the persisted count.
        assert_eq!(
            cache.get_url("abc123").await.unwrap(),
            Some("https://example.com/x".to_string())
        );
        assert_eq!(cache.incr_clicks("abc123").await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_hit_does_not_touch_store_off_boundary() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(0);
        repo.expect_increment_clicks().times(0);
        repo.expect_flush_clicks().times(0);

        let cache = Arc::new(MemoryCache::new());
        cache.set_url("abc123", "https://example.com").await.unwrap();
        cache.seed_clicks("abc123", 3).await.unwrap();

        let service = RedirectService::new(Arc::new(repo), cache);

        let url = service.resolve("abc123").await.unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_flush_on_tenth_hit() {
        let mut repo = MockLinkRepository::new();
        repo.expect_flush_clicks()
            .withf(|code, tally| code == "abc123" && *tally == 10)
            .times(1)
            .returning(|_, _| Ok(()));

        let cache = Arc::new(MemoryCache::new());
        cache.set_url("abc123", "https://example.com").await.unwrap();
        cache.seed_clicks("abc123", 9).await.unwrap();

        let service = RedirectService::new(Arc::new(repo), cache);

        // Tenth hit: tally reaches 10 and is written back.
        service.resolve("abc123").await.unwrap();
    }

    #[tokio::test]
    async fn test_flush_failure_still_redirects() {
        let mut repo = MockLinkRepository::new();
        repo.expect_flush_clicks()
            .times(1)
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));

        let cache = Arc::new(MemoryCache::new());
        cache.set_url("abc123", "https://example.com").await.unwrap();
        cache.seed_clicks("abc123", 9).await.unwrap();

        let service = RedirectService::new(Arc::new(repo), cache);

        let url = service.resolve("abc123").await.unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let service = RedirectService::new(Arc::new(repo), Arc::new(MemoryCache::new()));

        let result = service.resolve("nope00").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_null_cache_degrades_to_store_path() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(3)
            .returning(|_| Ok(Some(test_link("abc123", "https://example.com", 0))));
        repo.expect_increment_clicks()
            .times(3)
            .returning(|_| Ok(()));

        let service = RedirectService::new(Arc::new(repo), Arc::new(NullCache::new()));

        for _ in 0..3 {
            service.resolve("abc123").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_broken_cache_degrades_to_store_path() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "https://example.com", 0))));
        repo.expect_increment_clicks()
            .times(1)
            .returning(|_| Ok(()));

        let service = RedirectService::new(Arc::new(repo), Arc::new(BrokenCache));

        let url = service.resolve("abc123").await.unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_failed_increment_counts_click_durably() {
        /// Hits on the URL key but refuses to increment.
        struct StuckTally(MemoryCache);

        #[async_trait]
        impl LinkCache for StuckTally {
            async fn get_url(&self, code: &str) -> CacheResult<Option<String>> {
                self.0.get_url(code).await
            }
            async fn set_url(&self, code: &str, url: &str) -> CacheResult<()> {
                self.0.set_url(code, url).await
            }
            async fn seed_clicks(&self, code: &str, clicks: i64) -> CacheResult<()> {
                self.0.seed_clicks(code, clicks).await
            }
            async fn incr_clicks(&self, _code: &str) -> CacheResult<i64> {
                Err(CacheError::OperationError("incr refused".to_string()))
            }
            async fn health_check(&self) -> bool {
                true
            }
        }

        let mut repo = MockLinkRepository::new();
        repo.expect_increment_clicks()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(()));

        let cache = StuckTally(MemoryCache::new());
        cache.0.set_url("abc123", "https://example.com").await.unwrap();

        let service = RedirectService::new(Arc::new(repo), Arc::new(cache));

        let url = service.resolve("abc123").await.unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_scheme_prepended_on_redirect() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(test_link("short1", "example.org", 0))));
        repo.expect_increment_clicks().times(1).returning(|_| Ok(()));

        let service = RedirectService::new(Arc::new(repo), Arc::new(MemoryCache::new()));

        let url = service.resolve("short1").await.unwrap();
        assert_eq!(url, "http://example.org");
    }
}
