//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL link with its click counter and optional owner.
///
/// The code is immutable once created; `clicks` only ever grows and is
/// mutated solely by the redirect path, `owner_id` transitions from `None`
/// to `Some` at most once via the claim operation.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub clicks: i64,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        original_url: String,
        clicks: i64,
        owner_id: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            original_url,
            clicks,
            owner_id,
            created_at,
        }
    }

    /// Returns true if the link has been claimed by a user.
    pub fn is_claimed(&self) -> bool {
        self.owner_id.is_some()
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
}
