//! Link creation, claiming, and listing.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_rules::validate_url;

/// Upper bound on generated-code attempts before giving up.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Service for creating, claiming, and listing short links.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(links: Arc<dyn LinkRepository>) -> Self {
        Self { links }
    }

    /// Creates a short link.
    ///
    /// The URL is stored verbatim (scheme normalization happens on the
    /// redirect path). A custom code is validated and must be free; a
    /// generated code is probed and re-drawn on collision, with the store's
    /// unique constraint as the authoritative arbiter for races between
    /// probe and insert.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed URL or custom code
    /// - [`AppError::Conflict`] when an explicit custom code is taken
    /// - [`AppError::Internal`] when the retry budget is exhausted
    pub async fn create_link(
        &self,
        original_url: String,
        custom_code: Option<String>,
        owner_id: Option<i64>,
    ) -> Result<Link, AppError> {
        validate_url(&original_url).map_err(|e| {
            AppError::validation("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        if let Some(custom) = custom_code {
            validate_custom_code(&custom)?;

            if self.links.find_by_code(&custom).await?.is_some() {
                return Err(AppError::conflict(
                    "Short code already in use",
                    json!({ "code": custom }),
                ));
            }

            // A concurrent insert can still win between probe and insert;
            // the unique constraint surfaces that as the same conflict.
            return self
                .links
                .create(NewLink {
                    code: custom,
                    original_url,
                    owner_id,
                })
                .await;
        }

        for attempt in 0..MAX_CODE_ATTEMPTS {
            let code = generate_code();

            if self.links.find_by_code(&code).await?.is_some() {
                continue;
            }

            match self
                .links
                .create(NewLink {
                    code,
                    original_url: original_url.clone(),
                    owner_id,
                })
                .await
            {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => {
                    // Lost the probe-to-insert race; draw again.
                    warn!(attempt, "generated code collided at insert, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Short code space exhausted",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Assigns an unclaimed link to a user.
    ///
    /// Ownership is set at most once: the repository performs a conditional
    /// update, and a zero-row outcome is disambiguated into not-found versus
    /// already-owned.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown code
    /// - [`AppError::Conflict`] when the link already has an owner
    pub async fn claim_link(&self, code: &str, owner_id: i64) -> Result<Link, AppError> {
        if let Some(link) = self.links.claim(code, owner_id).await? {
            return Ok(link);
        }

        match self.links.find_by_code(code).await? {
            None => Err(AppError::not_found(
                "Unknown code",
                json!({ "code": code }),
            )),
            Some(link) if link.owner_id == Some(owner_id) => Err(AppError::conflict(
                "You already own this link",
                json!({ "code": code }),
            )),
            Some(_) => Err(AppError::conflict(
                "Link is already owned by another user",
                json!({ "code": code }),
            )),
        }
    }

    /// Lists links owned by the caller, newest first.
    pub async fn list_my_links(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        self.links.list_by_owner(owner_id).await
    }

    /// Lists ownerless links available to claim, newest first.
    pub async fn list_unclaimed_links(&self) -> Result<Vec<Link>, AppError> {
        self.links.list_unclaimed().await
    }

    /// Constructs the full short URL for a code.
    pub fn short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }
}
