//! The single definition of a "live" short URL.
//!
//! A record is eligible for redirect iff it is not soft-deleted, is active,
//! and has not reached `expires_at`. The rule exists twice, once as a Rust
//! predicate and once as a SQL fragment, and both live here so the listing
//! and the resolver can never disagree.

use chrono::{DateTime, Utc};

use crate::domain::entities::ShortUrl;

/// SQL form of [`is_eligible`] over the `short_urls` table.
///
/// Every query using it must bind the evaluation instant as `$1`.
#[macro_export]
macro_rules! eligible_filter {
    () => {
        "is_deleted = FALSE AND is_active = TRUE AND expires_at > $1"
    };
}

/// Returns true if `record` may be resolved or listed at `now`.
///
/// Expiry is exclusive: a record whose `expires_at` equals `now` is expired.
pub fn is_eligible(record: &ShortUrl, now: DateTime<Utc>) -> bool {
    !record.is_deleted && record.is_active && record.expires_at > now
}
