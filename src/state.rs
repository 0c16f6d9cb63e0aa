//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, RedirectService, StatsService};
use crate::infrastructure::cache::LinkCache;

/// Application state shared across request handlers.
///
/// Cheap to clone; every field is an `Arc` or a small string.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub stats_service: Arc<StatsService>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn LinkCache>,
    /// Public base URL used to build short URLs in API responses.
    pub base_url: String,
}
