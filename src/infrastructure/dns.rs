//! Host name resolution.

use async_trait::async_trait;
use std::io;
use std::net::IpAddr;

/// Resolves a host name to its addresses.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

/// Resolver backed by the operating system via `tokio::net::lookup_host`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

#[async_trait]
impl DnsResolver for SystemResolver {
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        let mut addresses: Vec<IpAddr> = tokio::net::lookup_host((host, 0))
            .await?
            .map(|addr| addr.ip())
            .collect();
        addresses.sort();
        addresses.dedup();
        Ok(addresses)
    }
}
