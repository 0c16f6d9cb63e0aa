//! Handler for link shortening endpoint.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::links::{LinkResponse, ShortenRequest};
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a URL.
///
/// # Endpoint
///
/// `POST /api/urls/shorten`
///
/// # Identity
///
/// Anonymous callers create unclaimed links; an authenticated caller
/// becomes the owner of the new link.
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "custom_code": "my-link"     // optional
/// }
/// ```
///
/// # Errors
///
/// Returns 422 Unprocessable Entity for a malformed URL or code, and
/// 400 Bad Request when an explicit custom code is already taken.
pub async fn shorten_handler(
    State(state): State<AppState>,
    identity: Option<Extension<CurrentUser>>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let owner_id = identity.map(|Extension(user)| user.id);

    let link = state
        .link_service
        .create_link(payload.url, payload.custom_code, owner_id)
        .await?;

    Ok(Json(LinkResponse::from_link(link, &state.base_url)))
}
