//! In-process cache implementation backed by a mutex-guarded map.

use super::service::{CacheResult, LinkCache};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Entry {
    url: Option<String>,
    clicks: i64,
}

/// A process-local [`LinkCache`] holding entries in a `HashMap`.
///
/// The lock makes the tally increment atomic with respect to concurrent
/// hits. Entries live until the process exits; there is no eviction, which
/// matches the no-expiry cache contract and keeps the implementation an
/// honest stand-in for the Redis backend in tests.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Creates an empty in-process cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkCache for MemoryCache {
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        Ok(entries.get(code).and_then(|e| e.url.clone()))
    }

    async fn set_url(&self, code: &str, original_url: &str) -> CacheResult<()> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.entry(code.to_string()).or_default().url = Some(original_url.to_string());
        Ok(())
    }

    async fn seed_clicks(&self, code: &str, clicks: i64) -> CacheResult<()> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.entry(code.to_string()).or_default().clicks = clicks;
        Ok(())
    }

    async fn incr_clicks(&self, code: &str) -> CacheResult<i64> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let entry = entries.entry(code.to_string()).or_default();
        entry.clicks += 1;
        Ok(entry.clicks)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
