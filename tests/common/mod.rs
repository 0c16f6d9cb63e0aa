#![allow(dead_code)]

//! Shared fixtures: in-memory repositories, state builders, and the test
//! router. The in-memory repositories mirror the PostgreSQL semantics the
//! handlers rely on (unique codes, conditional claim updates, GREATEST
//! flush), so the full HTTP surface runs without external services.

use async_trait::async_trait;
use axum::routing::get;
use axum::{Router, middleware};
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use linklet::api::handlers::{health_handler, redirect_handler};
use linklet::api::middleware::auth;
use linklet::application::services::{AuthService, LinkService, RedirectService, StatsService};
use linklet::domain::entities::{Link, NewLink, NewUser, User};
use linklet::domain::repositories::{LinkRepository, UserRepository};
use linklet::error::AppError;
use linklet::infrastructure::cache::{LinkCache, MemoryCache, NullCache};
use linklet::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_BASE_URL: &str = "http://short.test";

/// In-memory [`LinkRepository`] with the same conflict and claim semantics
/// as the PostgreSQL implementation.
#[derive(Default)]
pub struct MemoryLinkRepository {
    inner: Mutex<LinkTable>,
}

#[derive(Default)]
struct LinkTable {
    next_id: i64,
    rows: HashMap<String, Link>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a link's persisted click count directly, bypassing the service
    /// layer.
    pub fn clicks(&self, code: &str) -> Option<i64> {
        let table = self.inner.lock().unwrap();
        table.rows.get(code).map(|link| link.clicks)
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut table = self.inner.lock().unwrap();

        if table.rows.contains_key(&new_link.code) {
            return Err(AppError::conflict(
                "Short code already in use",
                json!({ "code": new_link.code }),
            ));
        }

        table.next_id += 1;
        let link = Link::new(
            table.next_id,
            new_link.code.clone(),
            new_link.original_url,
            0,
            new_link.owner_id,
            Utc::now(),
        );
        table.rows.insert(new_link.code, link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let table = self.inner.lock().unwrap();
        Ok(table.rows.get(code).cloned())
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        let mut table = self.inner.lock().unwrap();
        if let Some(link) = table.rows.get_mut(code) {
            link.clicks += 1;
        }
        Ok(())
    }

    async fn flush_clicks(&self, code: &str, tally: i64) -> Result<(), AppError> {
        let mut table = self.inner.lock().unwrap();
        if let Some(link) = table.rows.get_mut(code) {
            link.clicks = link.clicks.max(tally);
        }
        Ok(())
    }

    async fn claim(&self, code: &str, owner_id: i64) -> Result<Option<Link>, AppError> {
        let mut table = self.inner.lock().unwrap();
        match table.rows.get_mut(code) {
            Some(link) if link.owner_id.is_none() => {
                link.owner_id = Some(owner_id);
                Ok(Some(link.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let table = self.inner.lock().unwrap();
        let mut links: Vec<Link> = table
            .rows
            .values()
            .filter(|link| link.owner_id == Some(owner_id))
            .cloned()
            .collect();
        links.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(links)
    }

    async fn list_unclaimed(&self) -> Result<Vec<Link>, AppError> {
        let table = self.inner.lock().unwrap();
        let mut links: Vec<Link> = table
            .rows
            .values()
            .filter(|link| link.owner_id.is_none())
            .cloned()
            .collect();
        links.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(links)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let table = self.inner.lock().unwrap();
        Ok(table.rows.len() as i64)
    }
}

/// In-memory [`UserRepository`] with unique email and username checks.
#[derive(Default)]
pub struct MemoryUserRepository {
    inner: Mutex<UserTable>,
}

#[derive(Default)]
struct UserTable {
    next_id: i64,
    rows: Vec<User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut table = self.inner.lock().unwrap();

        if table.rows.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(
                "Email already registered",
                json!({ "email": new_user.email }),
            ));
        }
        if table.rows.iter().any(|u| u.username == new_user.username) {
            return Err(AppError::conflict(
                "Username already taken",
                json!({ "username": new_user.username }),
            ));
        }

        table.next_id += 1;
        let user = User {
            id: table.next_id,
            email: new_user.email,
            username: new_user.username,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        table.rows.push(user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let table = self.inner.lock().unwrap();
        Ok(table.rows.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let table = self.inner.lock().unwrap();
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }
}

/// A fully wired application state plus direct handles on its backends.
pub struct TestBackend {
    pub state: AppState,
    pub links: Arc<MemoryLinkRepository>,
    pub users: Arc<MemoryUserRepository>,
}

fn build_backend(cache: Arc<dyn LinkCache>) -> TestBackend {
    let links = Arc::new(MemoryLinkRepository::new());
    let users = Arc::new(MemoryUserRepository::new());

    let link_repo: Arc<dyn LinkRepository> = links.clone();
    let user_repo: Arc<dyn UserRepository> = users.clone();

    let state = AppState {
        link_service: Arc::new(LinkService::new(link_repo.clone())),
        redirect_service: Arc::new(RedirectService::new(link_repo.clone(), cache.clone())),
        stats_service: Arc::new(StatsService::new(link_repo)),
        auth_service: Arc::new(AuthService::new(user_repo, TEST_JWT_SECRET, 60)),
        cache,
        base_url: TEST_BASE_URL.to_string(),
    };

    TestBackend {
        state,
        links,
        users,
    }
}

/// Backend with an in-process cache on the redirect path.
pub fn test_backend() -> TestBackend {
    build_backend(Arc::new(MemoryCache::new()))
}

/// Backend with caching disabled: every redirect takes the store path.
pub fn test_backend_without_cache() -> TestBackend {
    build_backend(Arc::new(NullCache::new()))
}

/// The application router as served in production, minus rate limiting
/// (which needs a real socket peer address).
pub fn test_router(state: AppState) -> Router {
    let api_protected = linklet::api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require));

    let api_optional = linklet::api::routes::optional_identity_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::optional));

    let api_router = Router::new()
        .merge(api_protected)
        .merge(api_optional)
        .merge(linklet::api::routes::public_routes());

    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
}

/// Registers an account through the API and returns its bearer token.
pub async fn register_user(server: &axum_test::TestServer, email: &str, username: &str) -> String {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": email,
            "username": username,
            "password": "testpass123",
        }))
        .await;

    assert_eq!(response.status_code(), 200);

    response.json::<serde_json::Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Inserts a link directly through the repository, bypassing the API.
pub async fn seed_link(
    links: &Arc<MemoryLinkRepository>,
    code: &str,
    url: &str,
    owner_id: Option<i64>,
) -> Link {
    links
        .create(NewLink {
            code: code.to_string(),
            original_url: url.to_string(),
            owner_id,
        })
        .await
        .unwrap()
}
