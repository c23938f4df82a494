//! In-process record store.
//!
//! Backs `STORAGE_BACKEND=memory` and the HTTP integration tests. Both
//! repository traits are implemented on one type so that access log inserts
//! can check their owning record the way a foreign key would.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{AccessLog, NewAccessLog, NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::{AccessLogRepository, ShortUrlRepository};
use crate::error::AppError;

/// DashMap-backed store for short URLs and their access logs.
///
/// Ids are assigned from a monotonic counter starting at 1 and never reused.
/// Mutations of a single record happen under its shard lock, which is what
/// makes [`ShortUrlRepository::increment_clicks`] atomic here.
#[derive(Debug)]
pub struct MemoryStore {
    short_urls: DashMap<i64, ShortUrl>,
    access_logs: DashMap<i64, Vec<AccessLog>>,
    next_short_url_id: AtomicI64,
    next_access_log_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            short_urls: DashMap::new(),
            access_logs: DashMap::new(),
            next_short_url_id: AtomicI64::new(1),
            next_access_log_id: AtomicI64::new(1),
        }
    }

    /// Inserts a fully specified record, keeping its id.
    ///
    /// Used to seed fixtures with exact ids and states. Later
    /// [`ShortUrlRepository::create`] calls continue after the highest id seen.
    pub fn insert_record(&self, record: ShortUrl) {
        self.next_short_url_id
            .fetch_max(record.id + 1, Ordering::SeqCst);
        self.short_urls.insert(record.id, record);
    }

    /// Number of stored records, deleted ones included.
    pub fn len(&self) -> usize {
        self.short_urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.short_urls.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShortUrlRepository for MemoryStore {
    async fn create(&self, new_short_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let id = self.next_short_url_id.fetch_add(1, Ordering::SeqCst);
        let record = ShortUrl {
            id,
            original_url: new_short_url.original_url,
            created_at: Utc::now(),
            expires_at: new_short_url.expires_at,
            is_active: new_short_url.is_active,
            is_deleted: false,
            clicks_count: 0,
        };

        self.short_urls.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortUrl>, AppError> {
        Ok(self.short_urls.get(&id).map(|r| r.clone()))
    }

    async fn find_eligible(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<ShortUrl>, AppError> {
        Ok(self
            .short_urls
            .get(&id)
            .filter(|r| r.is_eligible_at(now))
            .map(|r| r.clone()))
    }

    async fn list_eligible(
        &self,
        now: DateTime<Utc>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ShortUrl>, AppError> {
        let mut records: Vec<ShortUrl> = self
            .short_urls
            .iter()
            .filter(|r| r.is_eligible_at(now))
            .map(|r| r.clone())
            .collect();

        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(records
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_eligible(&self, now: DateTime<Utc>) -> Result<i64, AppError> {
        Ok(self
            .short_urls
            .iter()
            .filter(|r| r.is_eligible_at(now))
            .count() as i64)
    }

    async fn update(&self, id: i64, patch: ShortUrlPatch) -> Result<Option<ShortUrl>, AppError> {
        let Some(mut record) = self.short_urls.get_mut(&id) else {
            return Ok(None);
        };

        if record.is_deleted {
            return Ok(None);
        }

        if let Some(original_url) = patch.original_url {
            record.original_url = original_url;
        }
        if let Some(is_active) = patch.is_active {
            record.is_active = is_active;
        }

        Ok(Some(record.clone()))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        match self.short_urls.get_mut(&id) {
            Some(mut record) if !record.is_deleted => {
                record.is_deleted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn increment_clicks(&self, id: i64, delta: i64) -> Result<bool, AppError> {
        match self.short_urls.get_mut(&id) {
            Some(mut record) => {
                record.clicks_count += delta;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl AccessLogRepository for MemoryStore {
    async fn insert(&self, new_log: NewAccessLog) -> Result<AccessLog, AppError> {
        if !self.short_urls.contains_key(&new_log.short_url_id) {
            return Err(AppError::not_found(
                "Referenced record not found",
                json!({ "short_url_id": new_log.short_url_id }),
            ));
        }

        let log = AccessLog {
            id: self.next_access_log_id.fetch_add(1, Ordering::SeqCst),
            short_url_id: new_log.short_url_id,
            accessed_at: new_log.accessed_at,
            ip_address: new_log.ip_address,
            user_agent: new_log.user_agent,
            referer: new_log.referer,
        };

        self.access_logs
            .entry(log.short_url_id)
            .or_default()
            .push(log.clone());

        Ok(log)
    }

    async fn list_for_short_url(
        &self,
        short_url_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AccessLog>, AppError> {
        let mut logs = self
            .access_logs
            .get(&short_url_id)
            .map(|logs| logs.clone())
            .unwrap_or_default();

        logs.sort_by(|a, b| b.accessed_at.cmp(&a.accessed_at).then(b.id.cmp(&a.id)));

        Ok(logs
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_for_short_url(&self, short_url_id: i64) -> Result<i64, AppError> {
        Ok(self
            .access_logs
            .get(&short_url_id)
            .map_or(0, |logs| logs.len() as i64))
    }
}
