//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`            - Health check: store, cache, click queue (public)
//! - `POST /api/v1/shorten`    - Programmatic link creation (public, rate limited)
//! - `/api/*`                  - Link admin API (Bearer token required)
//! - everything else           - Short code resolution (router fallback)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Optional per-IP token bucket on the public API
//! - **Authentication** - Bearer token on the admin API
//!
//! Trailing-slash normalization wraps the router in `server.rs`.

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limit` - per-IP limit for the public API, `None` to disable;
///   requires the server to provide `ConnectInfo<SocketAddr>`
pub fn app_router(state: AppState, rate_limit: Option<RateLimit>) -> Router {
    let mut public_api = api::routes::public_routes();
    if let Some(layer) = rate_limit.and_then(rate_limit::layer) {
        public_api = public_api.layer(layer);
    }

    let admin_api = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", public_api)
        .nest("/api", admin_api)
        .fallback(redirect_handler)
        .with_state(state)
        .layer(tracing::layer())
}
