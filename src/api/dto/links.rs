//! DTOs for link creation, listing, and statistics.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::Link;

/// Compiled regex for custom code characters.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL. Scheme-less hosts are accepted and stored verbatim.
    #[validate(length(min = 1, max = 2048))]
    pub url: String,

    /// Optional custom short code.
    #[validate(length(min = 3, max = 20))]
    #[validate(regex(path = "*CUSTOM_CODE_REGEX"))]
    pub custom_code: Option<String>,
}

/// A short link as returned by the API.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub short_url: String,
    pub clicks: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    /// Builds the response record, deriving the short URL from the service
    /// base URL.
    pub fn from_link(link: Link, base_url: &str) -> Self {
        let short_url = format!("{}/{}", base_url.trim_end_matches('/'), link.code);

        Self {
            id: link.id,
            short_code: link.code,
            original_url: link.original_url,
            short_url,
            clicks: link.clicks,
            owner_id: link.owner_id,
            created_at: link.created_at,
        }
    }
}

/// A list of links.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}

impl LinkListResponse {
    pub fn from_links(links: Vec<Link>, base_url: &str) -> Self {
        let items: Vec<LinkResponse> = links
            .into_iter()
            .map(|link| LinkResponse::from_link(link, base_url))
            .collect();

        Self {
            total: items.len(),
            items,
        }
    }
}
