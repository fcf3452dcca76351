//! Periodic DNS verification of the short-link domain.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::domain::entities::{DomainCheck, DomainCheckStatus};
use crate::infrastructure::dns::DnsResolver;

/// Resolves the public short-link domain and keeps the latest result.
///
/// A check never fails: lookup errors become an `unresolved` record. There
/// is no retry beyond the next tick.
pub struct DomainCheckService {
    resolver: Arc<dyn DnsResolver>,
    domain: String,
    expected_ip: Option<IpAddr>,
    latest: RwLock<Option<DomainCheck>>,
}

impl DomainCheckService {
    pub fn new(
        resolver: Arc<dyn DnsResolver>,
        domain: impl Into<String>,
        expected_ip: Option<IpAddr>,
    ) -> Self {
        Self {
            resolver,
            domain: domain.into(),
            expected_ip,
            latest: RwLock::new(None),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Most recent check, or `None` before the first tick.
    pub fn latest(&self) -> Option<DomainCheck> {
        self.latest.read().clone()
    }

    /// Runs one check and stores its result.
    pub async fn check_now(&self) -> DomainCheck {
        let check = match self.resolver.lookup(&self.domain).await {
            Ok(addresses) if addresses.is_empty() => self.record(
                addresses,
                DomainCheckStatus::Unresolved,
                Some("No addresses returned".to_string()),
            ),
            Ok(addresses) => match self.expected_ip {
                Some(expected) if !addresses.contains(&expected) => {
                    let message = format!("Expected {expected}");
                    self.record(addresses, DomainCheckStatus::Mismatch, Some(message))
                }
                _ => self.record(addresses, DomainCheckStatus::Verified, None),
            },
            Err(e) => self.record(Vec::new(), DomainCheckStatus::Unresolved, Some(e.to_string())),
        };

        if check.is_verified() {
            info!(domain = %check.domain, addresses = ?check.addresses, "Domain check passed");
        } else {
            warn!(
                domain = %check.domain,
                status = ?check.status,
                message = check.message.as_deref().unwrap_or_default(),
                "Domain check failed"
            );
        }

        *self.latest.write() = Some(check.clone());
        check
    }

    fn record(
        &self,
        addresses: Vec<IpAddr>,
        status: DomainCheckStatus,
        message: Option<String>,
    ) -> DomainCheck {
        DomainCheck {
            domain: self.domain.clone(),
            addresses,
            status,
            message,
            checked_at: Utc::now(),
        }
    }

    /// Checks immediately, then once per `period`, forever.
    pub async fn run(self: Arc<Self>, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            self.check_now().await;
        }
    }
}
