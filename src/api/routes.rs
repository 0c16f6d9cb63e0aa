//! API route configuration.
//!
//! Routes are grouped by the identity they require; the authentication
//! middleware is layered on in [`crate::routes::app_router`].

use crate::api::handlers::{
    claim_handler, login_handler, me_handler, my_links_handler, register_handler, shorten_handler,
    stats_handler, unclaimed_links_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes that require an authenticated caller.
///
/// # Endpoints
///
/// - `GET  /auth/me`            - Current account profile
/// - `GET  /urls/my`            - Links owned by the caller
/// - `POST /urls/{code}/claim`  - Claim an unowned link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me_handler))
        .route("/urls/my", get(my_links_handler))
        .route("/urls/{code}/claim", post(claim_handler))
}

/// Routes where identity is optional and changes behavior when present.
///
/// # Endpoints
///
/// - `POST /urls/shorten`        - Create a link (owner set when authenticated)
/// - `GET  /urls/{code}/stats`   - Link stats (claimed links are owner-only)
pub fn optional_identity_routes() -> Router<AppState> {
    Router::new()
        .route("/urls/shorten", post(shorten_handler))
        .route("/urls/{code}/stats", get(stats_handler))
}

/// Routes open to anonymous callers.
///
/// # Endpoints
///
/// - `POST /auth/register`   - Create an account
/// - `POST /auth/login`      - Exchange credentials for a token
/// - `GET  /urls/unclaimed`  - Ownerless links available to claim
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/urls/unclaimed", get(unclaimed_links_handler))
}
