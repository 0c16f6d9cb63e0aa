//! Business logic services orchestrating domain operations.

mod auth_service;
mod link_service;
mod redirect_service;
mod stats_service;

pub use auth_service::AuthService;
pub use link_service::LinkService;
pub use redirect_service::{FLUSH_INTERVAL, RedirectService};
pub use stats_service::StatsService;
