//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::ShortUrlRepository;
use crate::eligible_filter;
use crate::error::AppError;

const COLUMNS: &str =
    "id, original_url, created_at, expires_at, is_active, is_deleted, clicks_count";

/// PostgreSQL repository for short URL records.
///
/// Eligibility filtering uses [`eligible_filter!`] with the evaluation
/// instant bound as `$1`, so every eligible read follows the same rule.
pub struct PgShortUrlRepository {
    pool: Arc<PgPool>,
}

impl PgShortUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn create(&self, new_short_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let record = sqlx::query_as::<_, ShortUrl>(&format!(
            r#"
            INSERT INTO short_urls (original_url, expires_at, is_active, clicks_count)
            VALUES ($1, $2, $3, 0)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new_short_url.original_url)
        .bind(new_short_url.expires_at)
        .bind(new_short_url.is_active)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortUrl>, AppError> {
        let record = sqlx::query_as::<_, ShortUrl>(&format!(
            "SELECT {COLUMNS} FROM short_urls WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn find_eligible(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<ShortUrl>, AppError> {
        let record = sqlx::query_as::<_, ShortUrl>(&format!(
            "SELECT {COLUMNS} FROM short_urls WHERE id = $2 AND {}",
            eligible_filter!()
        ))
        .bind(now)
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn list_eligible(
        &self,
        now: DateTime<Utc>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ShortUrl>, AppError> {
        let records = sqlx::query_as::<_, ShortUrl>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM short_urls
            WHERE {}
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
            eligible_filter!()
        ))
        .bind(now)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records)
    }

    async fn count_eligible(&self, now: DateTime<Utc>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(concat!(
            "SELECT COUNT(*) FROM short_urls WHERE ",
            eligible_filter!()
        ))
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, patch: ShortUrlPatch) -> Result<Option<ShortUrl>, AppError> {
        let record = sqlx::query_as::<_, ShortUrl>(&format!(
            r#"
            UPDATE short_urls SET
                original_url = COALESCE($2, original_url),
                is_active    = COALESCE($3, is_active)
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.original_url)
        .bind(patch.is_active)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE short_urls SET is_deleted = TRUE WHERE id = $1 AND is_deleted = FALSE")
                .bind(id)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_clicks(&self, id: i64, delta: i64) -> Result<bool, AppError> {
        // Single-statement delta; the row lock serialises concurrent increments.
        let result =
            sqlx::query("UPDATE short_urls SET clicks_count = clicks_count + $2 WHERE id = $1")
                .bind(id)
                .bind(delta)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
