//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::domain::entities::{Link, LinkOrder, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, title, target_url, short_code, created_at, clicks";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    title: String,
    target_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
    clicks: i64,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.title,
            r.target_url,
            r.short_code,
            r.created_at,
            r.clicks,
        )
    }
}

/// Maps an insert failure: a unique violation is a conflict on `code`,
/// anything else is logged and becomes an internal error.
fn create_error(e: sqlx::Error, code: &str) -> AppError {
    if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
        return AppError::conflict("Short code already in use", json!({ "code": code }));
    }

    error!(code = %code, error = %e, "create failed");
    e.into()
}

/// PostgreSQL repository for link storage and retrieval.
///
/// All values are bound parameters. The unique constraint on `short_code`
/// both enforces code uniqueness and indexes the redirect lookup.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            "INSERT INTO links (title, target_url, short_code) VALUES ($1, $2, $3) RETURNING {LINK_COLUMNS}"
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.title)
            .bind(&new_link.target_url)
            .bind(&new_link.short_code)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| create_error(e, &new_link.short_code))?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await
            .inspect_err(|e| error!(code, error = %e, "find_by_code failed"))?;

        Ok(row.map(Link::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await
            .inspect_err(|e| error!(link_id = id, error = %e, "find_by_id failed"))?;

        Ok(row.map(Link::from))
    }

    async fn increment_clicks(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE links SET clicks = clicks + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await
            .inspect_err(|e| error!(link_id = id, error = %e, "increment_clicks failed"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, order: LinkOrder) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links ORDER BY {} {}, id DESC",
            order.column.as_sql(),
            order.direction.as_sql()
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await
            .inspect_err(|e| {
                error!(
                    column = order.column.as_sql(),
                    direction = order.direction.as_sql(),
                    error = %e,
                    "list failed"
                )
            })?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn delete(&self, id: i64) -> Result<Option<Link>, AppError> {
        let sql = format!("DELETE FROM links WHERE id = $1 RETURNING {LINK_COLUMNS}");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await
            .inspect_err(|e| error!(link_id = id, error = %e, "delete failed"))?;

        Ok(row.map(Link::from))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await
            .inspect_err(|e| error!(error = %e, "count failed"))?;

        Ok(count)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
