//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// The unique constraint on the short code is the sole serialization point
/// for creation; the conditional update in [`LinkRepository::claim`] is the
/// sole serialization point for ownership.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Increments the persisted click counter by one.
    ///
    /// Used on the cache-miss path and as the degraded-mode fallback when the
    /// cache tally is unavailable.
    async fn increment_clicks(&self, code: &str) -> Result<(), AppError>;

    /// Writes a cache tally back as the authoritative click count.
    ///
    /// The persisted value never regresses: the update keeps the maximum of
    /// the current count and `tally`.
    async fn flush_clicks(&self, code: &str, tally: i64) -> Result<(), AppError>;

    /// Assigns an owner to an unclaimed link.
    ///
    /// Conditional update: only a link whose owner is currently null is
    /// updated, so concurrent claims resolve to exactly one winner.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` when the caller won the claim
    /// - `Ok(None)` when the code is unknown or the link is already owned
    async fn claim(&self, code: &str, owner_id: i64) -> Result<Option<Link>, AppError>;

    /// Lists links owned by a user, newest first.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError>;

    /// Lists ownerless links, newest first.
    async fn list_unclaimed(&self) -> Result<Vec<Link>, AppError>;

    /// Counts all links. Used by the health check as a liveness probe.
    async fn count(&self) -> Result<i64, AppError>;
}
