//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, LinkCache};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache for fast URL lookups and the write-behind click tally.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection
/// reuse. URL operations are fail-open; the tally increment propagates
/// errors per the [`LinkCache`] contract.
pub struct RedisCache {
    client: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self { client: manager })
    }

    fn url_key(code: &str) -> String {
        format!("url:{code}")
    }

    fn clicks_key(code: &str) -> String {
        format!("clicks:{code}")
    }
}

#[async_trait]
impl LinkCache for RedisCache {
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>> {
        let key = Self::url_key(code);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(url)) => {
                debug!("Cache HIT: {} -> {}", code, url);
                Ok(Some(url))
            }
            Ok(None) => {
                debug!("Cache MISS: {}", code);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", code, e);
                Ok(None)
            }
        }
    }

    async fn set_url(&self, code: &str, original_url: &str) -> CacheResult<()> {
        let key = Self::url_key(code);
        let mut conn = self.client.clone();

        match conn.set::<_, _, ()>(&key, original_url).await {
            Ok(_) => {
                debug!("Cache SET: {} -> {}", code, original_url);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", code, e);
                Ok(())
            }
        }
    }

    async fn seed_clicks(&self, code: &str, clicks: i64) -> CacheResult<()> {
        let key = Self::clicks_key(code);
        let mut conn = self.client.clone();

        match conn.set::<_, _, ()>(&key, clicks).await {
            Ok(_) => {
                debug!("Cache SEED: {} = {}", code, clicks);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", code, e);
                Ok(())
            }
        }
    }

    async fn incr_clicks(&self, code: &str) -> CacheResult<i64> {
        let key = Self::clicks_key(code);
        let mut conn = self.client.clone();

        conn.incr::<_, _, i64>(&key, 1i64)
            .await
            .map_err(|e| CacheError::OperationError(format!("Redis INCR failed: {}", e)))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
