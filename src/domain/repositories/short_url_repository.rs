//! Repository trait for short URL records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::error::AppError;

/// Storage contract for short URL records.
///
/// Eligibility-filtered reads (`find_eligible`, `list_eligible`,
/// `count_eligible`) must apply [`crate::domain::eligibility`] at the given
/// instant rather than at the storage engine's own clock.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryStore`] - in-process
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Inserts a record and returns it with its store-assigned id.
    ///
    /// `clicks_count` starts at 0 and `is_deleted` at false.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_short_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Finds a record by id regardless of its state.
    ///
    /// This is the administrative lookup: soft-deleted rows are returned too.
    async fn find_by_id(&self, id: i64) -> Result<Option<ShortUrl>, AppError>;

    /// Finds a record by id only if it is eligible at `now`.
    async fn find_eligible(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<ShortUrl>, AppError>;

    /// Lists records eligible at `now`, oldest first.
    async fn list_eligible(
        &self,
        now: DateTime<Utc>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ShortUrl>, AppError>;

    /// Counts records eligible at `now`.
    async fn count_eligible(&self, now: DateTime<Utc>) -> Result<i64, AppError>;

    /// Applies a partial update to a record that is not soft-deleted.
    ///
    /// Returns `Ok(None)` if no such record exists.
    async fn update(&self, id: i64, patch: ShortUrlPatch) -> Result<Option<ShortUrl>, AppError>;

    /// Marks a record as deleted without removing the row.
    ///
    /// Returns `Ok(true)` if the record was found and not already deleted.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;

    /// Atomically adds `delta` to `clicks_count`.
    ///
    /// The addition happens inside the store, so concurrent callers never
    /// lose updates. Returns `Ok(false)` if the row does not exist.
    async fn increment_clicks(&self, id: i64, delta: i64) -> Result<bool, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
