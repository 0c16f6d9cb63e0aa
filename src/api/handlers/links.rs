//! Handlers for link ownership: claim and listings.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::links::{LinkListResponse, LinkResponse};
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Claims an unowned link for the authenticated caller.
///
/// # Endpoint
///
/// `POST /api/urls/{code}/claim`
///
/// Ownership is assigned at most once. Under concurrent claims exactly one
/// caller wins; the rest receive the conflict error.
///
/// # Errors
///
/// - 404 Not Found for an unknown code
/// - 400 Bad Request when the link already has an owner (the message
///   distinguishes "yours" from "someone else's")
pub async fn claim_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(code): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.claim_link(&code, user.id).await?;

    Ok(Json(LinkResponse::from_link(link, &state.base_url)))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/urls/my`
pub async fn my_links_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_my_links(user.id).await?;

    Ok(Json(LinkListResponse::from_links(links, &state.base_url)))
}

/// Lists ownerless links that are available to claim, newest first.
///
/// # Endpoint
///
/// `GET /api/urls/unclaimed`
pub async fn unclaimed_links_handler(
    State(state): State<AppState>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_unclaimed_links().await?;

    Ok(Json(LinkListResponse::from_links(links, &state.base_url)))
}
