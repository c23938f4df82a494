//! Access log entity recorded for every successful redirect.

use chrono::{DateTime, Utc};

/// Maximum stored length of the `User-Agent` header, in characters.
pub const MAX_USER_AGENT_LEN: usize = 1024;

/// Maximum stored length of the `Referer` header, in characters.
pub const MAX_REFERER_LEN: usize = 2048;

/// A persisted access log entry.
///
/// Entries are written once by the access log worker and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AccessLog {
    pub id: i64,
    pub short_url_id: i64,
    pub accessed_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub referer: Option<String>,
}

/// Input for recording an access log entry.
///
/// `short_url_id` must reference an existing short URL; inserts for a missing
/// owner fail with [`crate::error::AppError::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccessLog {
    pub short_url_id: i64,
    pub accessed_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub referer: Option<String>,
}

/// Truncates `value` to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((byte_index, _)) => value[..byte_index].to_string(),
        None => value.to_string(),
    }
}
