//! PostgreSQL implementation of the access log repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{AccessLog, NewAccessLog};
use crate::domain::repositories::AccessLogRepository;
use crate::error::AppError;

/// PostgreSQL repository for access log entries.
///
/// `ip_address` is stored as `INET` and read back with `host()` so callers
/// only ever see plain address strings.
pub struct PgAccessLogRepository {
    pool: Arc<PgPool>,
}

impl PgAccessLogRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessLogRepository for PgAccessLogRepository {
    async fn insert(&self, new_log: NewAccessLog) -> Result<AccessLog, AppError> {
        // A vanished owner surfaces as a foreign key violation -> AppError::NotFound.
        let log = sqlx::query_as::<_, AccessLog>(
            r#"
            INSERT INTO access_logs (short_url_id, accessed_at, ip_address, user_agent, referer)
            VALUES ($1, $2, $3::inet, $4, $5)
            RETURNING id, short_url_id, accessed_at, host(ip_address) AS ip_address, user_agent, referer
            "#,
        )
        .bind(new_log.short_url_id)
        .bind(new_log.accessed_at)
        .bind(new_log.ip_address)
        .bind(new_log.user_agent)
        .bind(new_log.referer)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(log)
    }

    async fn list_for_short_url(
        &self,
        short_url_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AccessLog>, AppError> {
        let logs = sqlx::query_as::<_, AccessLog>(
            r#"
            SELECT id, short_url_id, accessed_at, host(ip_address) AS ip_address, user_agent, referer
            FROM access_logs
            WHERE short_url_id = $1
            ORDER BY accessed_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(short_url_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(logs)
    }

    async fn count_for_short_url(&self, short_url_id: i64) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM access_logs WHERE short_url_id = $1")
                .bind(short_url_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }
}
