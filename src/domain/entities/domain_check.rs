//! Result of a DNS check against the configured short-link domain.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainCheckStatus {
    /// The domain resolves (to the expected address, if one is configured).
    Verified,
    /// The domain resolves, but not to the expected address.
    Mismatch,
    /// The lookup failed or returned no addresses.
    Unresolved,
}

/// A status record written by each domain check tick.
#[derive(Debug, Clone, Serialize)]
pub struct DomainCheck {
    pub domain: String,
    pub addresses: Vec<IpAddr>,
    pub status: DomainCheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl DomainCheck {
    pub fn is_verified(&self) -> bool {
        self.status == DomainCheckStatus::Verified
    }
}
