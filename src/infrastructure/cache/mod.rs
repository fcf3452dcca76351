//! Lookup cache for fast redirects.
//!
//! Provides a [`CacheService`] trait with three implementations:
//! - [`RedisCache`] - Redis-backed cache shared between instances
//! - [`MemoryCache`] - In-process cache (moka)
//! - [`NullCache`] - No-op implementation for disabled caching

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
