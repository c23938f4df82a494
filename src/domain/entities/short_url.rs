//! Short URL entity and its lifecycle inputs.

use chrono::{DateTime, Duration, Utc};

use crate::domain::codec;
use crate::domain::eligibility;

/// A stored short URL.
///
/// The short code is never stored: it is derived from `id` with
/// [`codec::encode`], which is why a code cannot exist before insertion.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShortUrl {
    pub id: i64,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub clicks_count: i64,
}

impl ShortUrl {
    /// Returns the short code for this record.
    pub fn code(&self) -> String {
        codec::encode(self.id as u64)
    }

    /// Returns true if the record may be resolved or listed at `now`.
    pub fn is_eligible_at(&self, now: DateTime<Utc>) -> bool {
        eligibility::is_eligible(self, now)
    }

    /// Returns true if `expires_at` has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Input for creating a short URL.
///
/// There is no `clicks_count` field: new records always start at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortUrl {
    pub original_url: String,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl NewShortUrl {
    /// Builds a new record expiring `ttl` after `now` unless `expires_at` is given.
    pub fn new(
        original_url: String,
        expires_at: Option<DateTime<Utc>>,
        is_active: Option<bool>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            original_url,
            expires_at: expires_at.unwrap_or(now + ttl),
            is_active: is_active.unwrap_or(true),
        }
    }
}

/// Partial update of the externally mutable fields.
///
/// `None` fields are left unchanged. Every other column is server-controlled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortUrlPatch {
    pub original_url: Option<String>,
    pub is_active: Option<bool>,
}

impl ShortUrlPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.original_url.is_none() && self.is_active.is_none()
    }
}
