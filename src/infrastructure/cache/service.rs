//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::entities::Link;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Lookup cache for links keyed by short code.
///
/// The cache is a pure accelerator: implementations are fail-open, and
/// callers always fall through to the store on a miss or an error.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - shared Redis cache
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process moka cache
/// - [`crate::infrastructure::cache::NullCache`] - caching disabled
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached link for a code.
    ///
    /// `Ok(None)` on a miss. Production implementations log backend errors
    /// and report them as a miss.
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<Link>>;

    /// Stores a link under its code. `ttl = None` uses the backend default.
    async fn set_link(
        &self,
        short_code: &str,
        link: &Link,
        ttl: Option<Duration>,
    ) -> CacheResult<()>;

    /// Removes a cached link. Called on delete and when a code is reused.
    async fn invalidate(&self, short_code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name used in logs and health output.
    fn backend(&self) -> &'static str;
}
