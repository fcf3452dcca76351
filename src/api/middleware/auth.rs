//! Bearer token authentication for the admin API.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;
use tracing::warn;

use crate::{error::AppError, state::AppState};

/// Requires `Authorization: Bearer <admin token>` on every request.
///
/// The token is verified by [`crate::application::services::AuthService`].
/// Failures return `401 Unauthorized` with `WWW-Authenticate: Bearer`.
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/links", get(list_links_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    if let Err(e) = st.auth_service.authenticate(&token) {
        warn!(path = %parts.uri.path(), "Rejected admin request");
        return Err(e);
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
