//! Handlers for registration, login, and identity.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::auth::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account and returns an access token.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// # Errors
///
/// - 422 Unprocessable Entity for invalid email/username/password shape
/// - 400 Bad Request when the email or username is already taken
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .register(payload.email, payload.username, &payload.password)
        .await?;

    let token = state.auth_service.issue_token(user.id)?;

    Ok(Json(AuthResponse::bearer(token, user)))
}

/// Exchanges email/password credentials for an access token.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Errors
///
/// Returns 401 Unauthorized with a single indistinct message for unknown
/// emails and wrong passwords alike.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .verify_credentials(&payload.email, &payload.password)
        .await?;

    let token = state.auth_service.issue_token(user.id)?;

    Ok(Json(AuthResponse::bearer(token, user)))
}

/// Returns the authenticated caller's profile.
///
/// # Endpoint
///
/// `GET /api/auth/me`
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserInfo>, AppError> {
    // The middleware has already validated the token; re-read the account
    // so the response reflects current data.
    let user = state
        .auth_service
        .current_user_by_id(user.id)
        .await?;

    Ok(Json(user.into()))
}
