//! Handler for link statistics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::links::LinkResponse;
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the stats record for a short link.
///
/// # Endpoint
///
/// `GET /api/urls/{code}/stats`
///
/// The click count is the persisted value, which may lag the live tally by
/// up to one flush interval.
///
/// # Errors
///
/// - 404 Not Found for an unknown code
/// - 403 Forbidden when a claimed link is viewed by anyone but its owner
pub async fn stats_handler(
    State(state): State<AppState>,
    identity: Option<Extension<CurrentUser>>,
    Path(code): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let viewer = identity.map(|Extension(user)| user.id);

    let link = state.stats_service.link_stats(&code, viewer).await?;

    Ok(Json(LinkResponse::from_link(link, &state.base_url)))
}
