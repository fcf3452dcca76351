//! Handlers for the link admin endpoints.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::links::{
    CreateLinkRequest, DeleteLinkResponse, LinkListResponse, LinkResponse, ListLinksQuery,
};
use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;

fn to_response(state: &AppState, link: Link) -> LinkResponse {
    let short_url = state.link_service.short_url(&link.short_code);
    let qr_code_url = state.link_service.qr_code_url(&short_url);
    LinkResponse::new(link, short_url, qr_code_url)
}

/// Creates a link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "title": "Spring sale", "url": "https://example.com/sale", "slug": "spring" }
/// ```
///
/// `slug` is optional; a random 6-character code is generated without it.
///
/// # Errors
///
/// - `400` invalid title, URL or slug
/// - `409` slug already taken (nothing is written)
/// - `503` no free code could be generated
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(request) = payload.map_err(|e| {
        AppError::bad_request("Invalid JSON body", json!({ "reason": e.body_text() }))
    })?;
    request.validate()?;

    let link = state
        .link_service
        .create(&request.title, &request.url, request.slug.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, link))))
}

/// Lists all links.
///
/// # Endpoint
///
/// `GET /api/links?sort=<column>&dir=<asc|desc>`
///
/// `sort` accepts `title`, `short_code`, `target_url`, `clicks` or
/// `created_at`. Anything else falls back to newest first.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(query): Query<ListLinksQuery>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state
        .link_service
        .list(query.sort.as_deref(), query.dir.as_deref())
        .await?;

    let links: Vec<LinkResponse> = links.into_iter().map(|l| to_response(&state, l)).collect();

    Ok(Json(LinkListResponse {
        total: links.len(),
        links,
    }))
}

/// Fetches one link by id.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
///
/// # Errors
///
/// - `404` no link has this id
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get(id).await?;
    Ok(Json(to_response(&state, link)))
}

/// Deletes a link by id.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// Always `200`; `deleted` is `false` when the id did not exist.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteLinkResponse>, AppError> {
    let deleted = state.link_service.delete(id).await?;
    Ok(Json(DeleteLinkResponse { id, deleted }))
}
