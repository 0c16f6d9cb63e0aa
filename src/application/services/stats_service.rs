//! Read-only link statistics with ownership checks.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Service for link statistics projections.
///
/// Click counts read here are a lower bound within the flush window: the
/// persisted value may lag the cache tally by up to the flush interval.
pub struct StatsService {
    links: Arc<dyn LinkRepository>,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(links: Arc<dyn LinkRepository>) -> Self {
        Self { links }
    }

    /// Returns the stats record for a short code.
    ///
    /// Stats for a claimed link are visible to its owner only; unclaimed
    /// links are public.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown code
    /// - [`AppError::Forbidden`] when a claimed link is viewed by anyone
    ///   but its owner
    pub async fn link_stats(&self, code: &str, viewer: Option<i64>) -> Result<Link, AppError> {
        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Unknown code", json!({ "code": code })))?;

        if let Some(owner_id) = link.owner_id {
            if viewer != Some(owner_id) {
                return Err(AppError::forbidden(
                    "Stats for this link are restricted to its owner",
                    json!({ "code": code }),
                ));
            }
        }

        Ok(link)
    }

    /// Total number of links. Doubles as a database liveness probe for the
    /// health endpoint.
    pub async fn total_links(&self) -> Result<i64, AppError> {
        self.links.count().await
    }
}
