//! Bearer token authentication middleware.
//!
//! Resolves the `Authorization: Bearer <token>` header to a [`CurrentUser`]
//! request extension. Two variants exist: [`require`] rejects requests
//! without a valid identity, [`optional`] passes them through so handlers
//! receive an explicit `Option<CurrentUser>`.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// The authenticated caller, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub username: String,
}

/// Authenticates the request and rejects it without a valid identity.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the Authorization header is missing or
/// malformed, or if the token is invalid, expired, or refers to a deleted
/// account.
pub async fn require(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Not authenticated",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    let user = st.auth_service.current_user(&token).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        username: user.username,
    });

    Ok(next.run(req).await)
}

/// Resolves an identity when a valid bearer token is present, and continues
/// anonymously otherwise.
pub async fn optional(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let identity = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => st.auth_service.current_user(&token).await.ok(),
        Err(_) => None,
    };

    let mut req = Request::from_parts(parts, body);

    if let Some(user) = identity {
        req.extensions_mut().insert(CurrentUser {
            id: user.id,
            email: user.email,
            username: user.username,
        });
    }

    next.run(req).await
}
