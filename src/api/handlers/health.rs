//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Store**: round trip to the link store
/// 2. **Cache**: backend ping (always ok when caching is disabled)
/// 3. **Click Queue**: channel open, current backlog
///
/// The latest domain DNS check is included when enabled but does not
/// affect the status code.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store = if state.link_service.health_check().await {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Store unreachable")
    };

    let backend = state.cache.backend();
    let cache = if state.cache.health_check().await {
        CheckStatus::ok(format!("Backend: {backend}"))
    } else {
        CheckStatus::error(format!("Backend {backend} unreachable"))
    };

    let (pending, capacity) = state.redirect_service.click_queue_status();
    let click_queue = if state.redirect_service.click_queue_closed() {
        CheckStatus::error("Click queue is closed")
    } else {
        CheckStatus::ok(format!("Pending: {pending}/{capacity}"))
    };

    let all_healthy = store.is_ok() && cache.is_ok() && click_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store,
            cache,
            click_queue,
            domain: state.domain_check.as_ref().and_then(|svc| svc.latest()),
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
