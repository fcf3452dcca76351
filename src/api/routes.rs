//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, domain_check_handler, get_link_handler,
    list_links_handler, shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Unauthenticated API routes, nested under `/api/v1`.
///
/// - `POST /shorten` - Create a short link, returns short and QR-code URLs
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/shorten", post(shorten_handler))
}

/// Admin routes, nested under `/api` behind Bearer authentication.
///
/// - `GET    /links`          - List links (`?sort=&dir=`)
/// - `POST   /links`          - Create a link
/// - `GET    /links/{id}`     - Fetch one link
/// - `DELETE /links/{id}`     - Delete a link
/// - `GET    /domain-check`   - Latest domain DNS check
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/links/{id}", get(get_link_handler).delete(delete_link_handler))
        .route("/domain-check", get(domain_check_handler))
}
