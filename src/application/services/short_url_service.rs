//! Short URL lifecycle service.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::domain::entities::{AccessLog, NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::{AccessLogRepository, ShortUrlRepository};
use crate::error::AppError;
use crate::utils::url_validation::validate_target_url;

/// Service for creating, editing and inspecting short URLs.
///
/// Ids come from the store and codes are derived from ids, so there is no
/// code generation or collision handling here.
pub struct ShortUrlService<R, L>
where
    R: ShortUrlRepository + ?Sized,
    L: AccessLogRepository + ?Sized,
{
    short_url_repository: Arc<R>,
    access_log_repository: Arc<L>,
    base_url: String,
    default_ttl: Duration,
}

impl<R, L> ShortUrlService<R, L>
where
    R: ShortUrlRepository + ?Sized,
    L: AccessLogRepository + ?Sized,
{
    /// Creates a new service.
    ///
    /// `base_url` is the public origin short codes are appended to.
    pub fn new(
        short_url_repository: Arc<R>,
        access_log_repository: Arc<L>,
        base_url: impl Into<String>,
        default_ttl: Duration,
    ) -> Self {
        Self {
            short_url_repository,
            access_log_repository,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_ttl,
        }
    }

    /// Creates a short URL.
    ///
    /// `expires_at` defaults to now plus the configured TTL and `is_active`
    /// to true. The click counter always starts at zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is invalid or `expires_at`
    /// is not in the future.
    pub async fn create(
        &self,
        original_url: &str,
        expires_at: Option<DateTime<Utc>>,
        is_active: Option<bool>,
    ) -> Result<ShortUrl, AppError> {
        let now = Utc::now();
        let original_url = validate_url(original_url)?;

        if let Some(expires_at) = expires_at
            && expires_at <= now
        {
            return Err(AppError::bad_request(
                "expires_at must be in the future",
                json!({ "expires_at": expires_at }),
            ));
        }

        let new_short_url =
            NewShortUrl::new(original_url, expires_at, is_active, now, self.default_ttl);
        let record = self.short_url_repository.create(new_short_url).await?;

        info!(
            short_url_id = record.id,
            code = %record.code(),
            "Short URL created"
        );

        Ok(record)
    }

    /// Retrieves a record that has not been deleted.
    ///
    /// Inactive and expired records are returned so they can be edited.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or deleted ids.
    pub async fn get(&self, id: i64) -> Result<ShortUrl, AppError> {
        self.short_url_repository
            .find_by_id(id)
            .await?
            .filter(|record| !record.is_deleted)
            .ok_or_else(|| not_found(id))
    }

    /// Lists records eligible right now, with the total eligible count.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<ShortUrl>, i64), AppError> {
        let now = Utc::now();
        let records = self
            .short_url_repository
            .list_eligible(now, offset, limit)
            .await?;
        let total = self.short_url_repository.count_eligible(now).await?;

        Ok((records, total))
    }

    /// Updates the target URL and/or active flag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid URL and
    /// [`AppError::NotFound`] for unknown or deleted ids.
    pub async fn update(
        &self,
        id: i64,
        original_url: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<ShortUrl, AppError> {
        let patch = ShortUrlPatch {
            original_url: original_url.map(validate_url).transpose()?,
            is_active,
        };

        if patch.is_empty() {
            return self.get(id).await;
        }

        let record = self
            .short_url_repository
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(short_url_id = id, is_active = record.is_active, "Short URL updated");

        Ok(record)
    }

    /// Soft-deletes a record. The row and its access logs are kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or already deleted ids.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.short_url_repository.soft_delete(id).await? {
            return Err(not_found(id));
        }

        info!(short_url_id = id, "Short URL deleted");
        Ok(())
    }

    /// Lists access logs for a record, newest first, with the total count.
    ///
    /// Works for deleted records too.
    pub async fn access_logs(
        &self,
        id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AccessLog>, i64), AppError> {
        if self.short_url_repository.find_by_id(id).await?.is_none() {
            return Err(not_found(id));
        }

        let logs = self
            .access_log_repository
            .list_for_short_url(id, offset, limit)
            .await?;
        let total = self.access_log_repository.count_for_short_url(id).await?;

        Ok((logs, total))
    }

    /// Builds the public short URL for a record.
    pub fn short_url(&self, record: &ShortUrl) -> String {
        format!("{}/{}", self.base_url, record.code())
    }

    /// Checks that the record store answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.short_url_repository.ping().await
    }
}

fn validate_url(input: &str) -> Result<String, AppError> {
    validate_target_url(input).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Short URL not found", json!({ "id": id }))
}
