//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, service wiring, and Axum
//! server lifecycle.

use crate::application::services::{AuthService, LinkService, RedirectService, StatsService};
use crate::config::Config;
use crate::infrastructure::cache::{LinkCache, NullCache, RedisCache};
use crate::infrastructure::persistence::{PgLinkRepository, PgUserRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Redis cache (or NullCache fallback)
/// - Service layer and shared state
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let cache: Arc<dyn LinkCache> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let pool = Arc::new(pool);
    let link_repository: Arc<dyn crate::domain::repositories::LinkRepository> =
        Arc::new(PgLinkRepository::new(pool.clone()));
    let user_repository: Arc<dyn crate::domain::repositories::UserRepository> =
        Arc::new(PgUserRepository::new(pool));

    let state = AppState {
        link_service: Arc::new(LinkService::new(link_repository.clone())),
        redirect_service: Arc::new(RedirectService::new(link_repository.clone(), cache.clone())),
        stats_service: Arc::new(StatsService::new(link_repository)),
        auth_service: Arc::new(AuthService::new(
            user_repository,
            &config.jwt_secret,
            config.token_ttl_minutes,
        )),
        cache,
        base_url: config.base_url.clone(),
    };

    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
