//! Fallback handler resolving short codes.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::application::services::Resolution;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}` (router fallback, so every unmatched path lands here)
///
/// # Request Flow
///
/// 1. Strip slashes and decline empty, reserved or malformed paths
/// 2. Look the code up in the cache, then the store
/// 3. Queue a click event without waiting for it
/// 4. Return `301 Moved Permanently`
///
/// Anything that does not resolve gets a bare `404` with no body, including
/// store failures.
pub async fn redirect_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::NOT_FOUND.into_response();
    }

    match state.redirect_service.resolve(uri.path()).await {
        Resolution::Found(link) => {
            state.redirect_service.record_click(&link);
            debug!(code = %link.short_code, target = %link.target_url, "Redirecting");
            (
                StatusCode::MOVED_PERMANENTLY,
                [(header::LOCATION, link.target_url)],
            )
                .into_response()
        }
        Resolution::Declined | Resolution::NotFound => StatusCode::NOT_FOUND.into_response(),
    }
}
