//! Link entity representing a short code → target URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored short link.
///
/// Everything except `clicks` is fixed at creation. `clicks` is advanced
/// out-of-band by the click worker and never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub title: String,
    pub target_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        title: String,
        target_url: String,
        short_code: String,
        created_at: DateTime<Utc>,
        clicks: i64,
    ) -> Self {
        Self {
            id,
            title,
            target_url,
            short_code,
            created_at,
            clicks,
        }
    }
}

/// Input data for inserting a link. Values are expected to be validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub title: String,
    pub target_url: String,
    pub short_code: String,
}
