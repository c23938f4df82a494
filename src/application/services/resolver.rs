//! Short code resolution.

use chrono::{DateTime, Utc};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::access_event::{AccessEvent, VisitorInfo};
use crate::domain::access_log_sink::AccessLogSink;
use crate::domain::codec;
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;

/// Why a code did not resolve.
///
/// Only used for debug logs and metric labels. Every reason produces the
/// same response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The code is empty, contains a character outside the alphabet, or
    /// overflows `u64`.
    InvalidCode,
    /// The decoded id is larger than any id the store can hold.
    IdOutOfRange,
    /// No record with this id is currently eligible.
    NotEligible,
}

impl NotFoundReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCode => "invalid_code",
            Self::IdOutOfRange => "id_out_of_range",
            Self::NotEligible => "not_eligible",
        }
    }
}

/// Outcome of resolving a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Redirect to this URL.
    Redirect(String),
    NotFound(NotFoundReason),
}

/// Turns short codes into redirect targets.
///
/// A successful resolution bumps the click counter with a store-side delta
/// and hands an [`AccessEvent`] to the log sink without waiting for it.
pub struct Resolver<R: ShortUrlRepository + ?Sized> {
    repository: Arc<R>,
    access_log_sink: AccessLogSink,
}

impl<R: ShortUrlRepository + ?Sized> Resolver<R> {
    pub fn new(repository: Arc<R>, access_log_sink: AccessLogSink) -> Self {
        Self {
            repository,
            access_log_sink,
        }
    }

    /// Resolves `code` at the current instant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] only when the store cannot be queried.
    /// Unknown, malformed and ineligible codes are `Ok(Resolution::NotFound)`.
    pub async fn resolve(&self, code: &str, visitor: VisitorInfo) -> Result<Resolution, AppError> {
        self.resolve_at(code, visitor, Utc::now()).await
    }

    /// Resolves `code` as of `now`.
    ///
    /// `now` is both the eligibility instant and the access timestamp.
    pub async fn resolve_at(
        &self,
        code: &str,
        visitor: VisitorInfo,
        now: DateTime<Utc>,
    ) -> Result<Resolution, AppError> {
        let id = match codec::decode(code) {
            Ok(id) => id,
            Err(e) => {
                debug!(code, error = %e, "Short code rejected by codec");
                return Ok(not_found(NotFoundReason::InvalidCode));
            }
        };

        let Ok(id) = i64::try_from(id) else {
            debug!(code, id, "Decoded id exceeds store range");
            return Ok(not_found(NotFoundReason::IdOutOfRange));
        };

        let Some(record) = self.repository.find_eligible(id, now).await? else {
            debug!(code, id, "No eligible record for short code");
            return Ok(not_found(NotFoundReason::NotEligible));
        };

        match self.repository.increment_clicks(record.id, 1).await {
            Ok(true) => {}
            Ok(false) => {
                counter!("click_increment_failed_total").increment(1);
                error!(short_url_id = record.id, "Record vanished before click increment");
            }
            Err(e) => {
                counter!("click_increment_failed_total").increment(1);
                error!(short_url_id = record.id, error = %e, "Failed to increment click count");
            }
        }

        self.access_log_sink
            .record(AccessEvent::new(record.id, visitor, now));

        counter!("redirect_resolved_total").increment(1);
        Ok(Resolution::Redirect(record.original_url))
    }
}

fn not_found(reason: NotFoundReason) -> Resolution {
    counter!("redirect_not_found_total", "reason" => reason.as_str()).increment(1);
    Resolution::NotFound(reason)
}
