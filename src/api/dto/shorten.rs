//! DTOs for the public shorten endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/v1/shorten`.
///
/// Fields are optional at the wire level so a missing `url` is reported as
/// a structured 400 instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ShortenRequest {
    pub url: Option<String>,
    pub title: Option<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
    pub qr_code_url: String,
}
