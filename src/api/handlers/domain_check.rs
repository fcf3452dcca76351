//! Handler exposing the latest domain DNS check.

use axum::{Json, extract::State};

use crate::domain::entities::DomainCheck;
use crate::state::AppState;

/// `GET /api/domain-check`
///
/// Returns the most recent check, or `null` when checks are disabled or
/// have not run yet.
pub async fn domain_check_handler(State(state): State<AppState>) -> Json<Option<DomainCheck>> {
    Json(state.domain_check.as_ref().and_then(|svc| svc.latest()))
}
