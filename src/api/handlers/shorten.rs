//! Handler for the public shorten endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Title given to links created without one.
pub const DEFAULT_TITLE: &str = "API Link";

/// Creates a short link for programmatic clients.
///
/// # Endpoint
///
/// `POST /api/v1/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/x", "title": "optional", "alias": "optional" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "code": "aB3dE9",
///   "short_url": "https://s.example.com/aB3dE9",
///   "qr_code_url": "https://quickchart.io/qr?text=https%3A%2F%2Fs.example.com%2FaB3dE9&size=150"
/// }
/// ```
///
/// # Errors
///
/// - `400` missing or invalid `url`, invalid `alias`, malformed body
/// - `409` alias already taken
/// - `500` storage failure
/// - `503` no free code could be generated
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(request) = payload.map_err(|e| {
        AppError::bad_request("Invalid JSON body", json!({ "reason": e.body_text() }))
    })?;

    let url = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::bad_request("URL is required", json!({ "field": "url" })))?;

    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    let link = state
        .link_service
        .create(title, url, request.alias.as_deref())
        .await?;

    let short_url = state.link_service.short_url(&link.short_code);
    let qr_code_url = state.link_service.qr_code_url(&short_url);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            code: link.short_code,
            short_url,
            qr_code_url,
        }),
    ))
}
