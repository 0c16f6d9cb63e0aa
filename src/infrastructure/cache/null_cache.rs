//! No-op cache implementation for disabled caching.

use super::service::{CacheError, CacheResult, LinkCache};
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that never stores anything.
///
/// Every lookup is a miss, so each redirect takes the durable-store path
/// and increments the persisted counter directly. Used when Redis is not
/// configured or the connection fails at startup.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkCache for NullCache {
    async fn get_url(&self, _code: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_url(&self, _code: &str, _original_url: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn seed_clicks(&self, _code: &str, _clicks: i64) -> CacheResult<()> {
        Ok(())
    }

    async fn incr_clicks(&self, _code: &str) -> CacheResult<i64> {
        // Unreachable through the resolver (lookups never hit), kept honest
        // for any other caller.
        Err(CacheError::OperationError("caching disabled".to_string()))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
