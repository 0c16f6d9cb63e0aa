//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code through the cache-first redirect service
/// 2. The service records the click (in-cache tally or durable increment)
/// 3. Return 307 Temporary Redirect to the scheme-normalized URL
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let url = state.redirect_service.resolve(&code).await?;

    Ok(Redirect::temporary(&url))
}
