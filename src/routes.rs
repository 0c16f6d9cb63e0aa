//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`   - Short link redirect (public, unthrottled hot path)
//! - `GET  /health`   - Health check: DB, cache (public)
//! - `/api/*`         - REST API (rate-limited; Bearer token where required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the API surface
//! - **Authentication** - Bearer token, required or optional per route group

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let api_protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require));

    let api_optional = api::routes::optional_identity_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::optional));

    let api_public = api::routes::public_routes().layer(rate_limit::secure_layer());

    let api_router = Router::new()
        .merge(api_protected)
        .merge(api_optional)
        .layer(rate_limit::layer())
        .merge(api_public);

    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}
