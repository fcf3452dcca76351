//! In-process cache backed by `moka`.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::Link;
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedLink {
    link: Link,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, CachedLink> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedLink,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedLink,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded, per-process link cache.
///
/// Entries are evicted when their TTL elapses or when the cache is full.
/// Each process keeps its own copy, so invalidations are local.
pub struct MemoryCache {
    inner: Cache<String, CachedLink>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(max_capacity: u64, default_ttl: Duration) -> Self {
        debug!(max_capacity, ?default_ttl, "Using in-process cache");
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { inner, default_ttl }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<Link>> {
        Ok(self.inner.get(short_code).await.map(|cached| cached.link))
    }

    async fn set_link(
        &self,
        short_code: &str,
        link: &Link,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let cached = CachedLink {
            link: link.clone(),
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.inner.insert(short_code.to_string(), cached).await;
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.inner.invalidate(short_code).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
