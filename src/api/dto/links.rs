//! DTOs for the link admin endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1, max = 2048))]
    pub url: String,

    /// Explicit short code. A random one is generated when absent.
    #[validate(length(max = 50))]
    pub slug: Option<String>,
}

/// Query string for `GET /api/links`.
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksQuery {
    pub sort: Option<String>,
    pub dir: Option<String>,
}

/// A link as returned by the admin API.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: i64,
    pub title: String,
    pub target_url: String,
    pub short_code: String,
    pub short_url: String,
    pub qr_code_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String, qr_code_url: String) -> Self {
        Self {
            id: link.id,
            title: link.title,
            target_url: link.target_url,
            short_code: link.short_code,
            short_url,
            qr_code_url,
            clicks: link.clicks,
            created_at: link.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub links: Vec<LinkResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteLinkResponse {
    pub id: i64,
    pub deleted: bool,
}
