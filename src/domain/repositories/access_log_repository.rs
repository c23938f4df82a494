//! Repository trait for access log entries.

use async_trait::async_trait;

use crate::domain::entities::{AccessLog, NewAccessLog};
use crate::error::AppError;

/// Storage contract for access log entries.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAccessLogRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryStore`] - in-process
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessLogRepository: Send + Sync {
    /// Records an access log entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the owning short URL does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_log: NewAccessLog) -> Result<AccessLog, AppError>;

    /// Lists entries for a short URL, newest first.
    async fn list_for_short_url(
        &self,
        short_url_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AccessLog>, AppError>;

    /// Counts entries for a short URL.
    async fn count_for_short_url(&self, short_url_id: i64) -> Result<i64, AppError>;
}
