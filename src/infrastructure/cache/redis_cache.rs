//! Redis-backed link cache.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::Link;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "link:";

fn cache_key(code: &str) -> String {
    format!("{KEY_PREFIX}{code}")
}

/// Shared cache storing each [`Link`] as JSON under `link:<code>` with `SET EX`.
///
/// Fail-open: Redis and decoding errors are logged, lookups report a miss and
/// writes are skipped.
pub struct RedisCache {
    manager: ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    /// Opens a managed connection and checks it with `PING`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] for a malformed URL or an
    /// unreachable server.
    pub async fn connect(redis_url: &str, default_ttl: Duration) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::ConnectionError(format!("invalid Redis URL: {e}")))?;
        let mut manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::ConnectionError(e.to_string()))?;

        manager
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("PING failed: {e}")))?;
        info!(ttl_seconds = default_ttl.as_secs(), "Redis cache connected");

        Ok(Self {
            manager,
            default_ttl,
        })
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<Link>> {
        let mut conn = self.manager.clone();
        let payload = match conn.get::<_, Option<String>>(cache_key(short_code)).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(code = short_code, error = %e, "Redis lookup failed, treating as miss");
                return Ok(None);
            }
        };

        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(link) => Ok(Some(link)),
            Err(e) => {
                warn!(code = short_code, error = %e, "Ignoring undecodable cached link");
                Ok(None)
            }
        }
    }

    async fn set_link(
        &self,
        short_code: &str,
        link: &Link,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let payload = match serde_json::to_string(link) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(code = short_code, error = %e, "Could not encode link for Redis");
                return Ok(());
            }
        };
        let seconds = ttl.unwrap_or(self.default_ttl).as_secs().max(1);

        let mut conn = self.manager.clone();
        if let Err(e) = conn
            .set_ex::<_, _, ()>(cache_key(short_code), payload, seconds)
            .await
        {
            warn!(code = short_code, error = %e, "Redis store failed");
        } else {
            debug!(code = short_code, seconds, "Cached link");
        }
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let mut conn = self.manager.clone();
        if let Err(e) = conn.del::<_, ()>(cache_key(short_code)).await {
            warn!(code = short_code, error = %e, "Redis invalidation failed");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.manager.clone().ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
