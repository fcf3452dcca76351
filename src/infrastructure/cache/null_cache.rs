//! Cache backend used when caching is off.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::Link;
use async_trait::async_trait;
use std::time::Duration;

/// Stores nothing, so every resolution reaches the link store.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_link(&self, _: &str) -> CacheResult<Option<Link>> {
        Ok(None)
    }

    async fn set_link(&self, _: &str, _: &Link, _: Option<Duration>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "none"
    }
}
