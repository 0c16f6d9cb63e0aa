//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, map_sqlx_error};

const LINK_COLUMNS: &str = "id, code, original_url, clicks, owner_id, created_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    original_url: String,
    clicks: i64,
    owner_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(
            row.id,
            row.code,
            row.original_url,
            row.clicks,
            row.owner_id,
            row.created_at,
        )
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// The `links_code_key` unique constraint backs collision detection for
/// short codes; claim races are resolved by a conditional update on the
/// owner column.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some("links_code_key"))
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            "INSERT INTO links (code, original_url, owner_id) \
             VALUES ($1, $2, $3) \
             RETURNING {LINK_COLUMNS}"
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.code)
            .bind(&new_link.original_url)
            .bind(new_link.owner_id)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                if is_unique_violation_on_code(&e) {
                    AppError::conflict(
                        "Short code already in use",
                        json!({ "code": new_link.code }),
                    )
                } else {
                    map_sqlx_error(e)
                }
            })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE code = $1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET clicks = clicks + 1 WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn flush_clicks(&self, code: &str, tally: i64) -> Result<(), AppError> {
        // GREATEST keeps the persisted counter monotone even if a cache
        // restart re-seeded the tally below a previously flushed value.
        sqlx::query("UPDATE links SET clicks = GREATEST(clicks, $2) WHERE code = $1")
            .bind(code)
            .bind(tally)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn claim(&self, code: &str, owner_id: i64) -> Result<Option<Link>, AppError> {
        let sql = format!(
            "UPDATE links SET owner_id = $2 \
             WHERE code = $1 AND owner_id IS NULL \
             RETURNING {LINK_COLUMNS}"
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(code)
            .bind(owner_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC"
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn list_unclaimed(&self) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE owner_id IS NULL \
             ORDER BY created_at DESC"
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
