//! Caching layer for fast redirect lookups and the write-behind click tally.
//!
//! Provides a [`LinkCache`] trait with three implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`MemoryCache`] - In-process map for tests and single-node setups
//! - [`NullCache`] - Always-miss implementation for disabled caching

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, LinkCache};
