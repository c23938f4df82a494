//! Access event model handed from the redirect path to the log worker.

use chrono::{DateTime, Utc};
use std::net::IpAddr;

use crate::domain::entities::{MAX_REFERER_LEN, MAX_USER_AGENT_LEN, NewAccessLog};
use crate::domain::entities::access_log::truncate_chars;

/// Request metadata captured when a redirect is served.
///
/// Header values are captured as sent; truncation to column limits happens
/// in [`AccessEvent::into_new_access_log`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorInfo {
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub referer: Option<String>,
}

impl VisitorInfo {
    /// Creates visitor metadata from request parts.
    ///
    /// A missing `User-Agent` is recorded as an empty string.
    pub fn new(ip: Option<IpAddr>, user_agent: Option<&str>, referer: Option<&str>) -> Self {
        Self {
            ip_address: ip.map(|ip| ip.to_string()),
            user_agent: user_agent.unwrap_or_default().to_string(),
            referer: referer.filter(|r| !r.is_empty()).map(str::to_string),
        }
    }
}

/// An in-memory record of one successful resolution.
///
/// Sent through [`crate::domain::access_log_sink::AccessLogSink`] and
/// persisted by [`crate::domain::access_log_worker::run_access_log_worker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
    pub short_url_id: i64,
    pub accessed_at: DateTime<Utc>,
    pub visitor: VisitorInfo,
}

impl AccessEvent {
    pub fn new(short_url_id: i64, visitor: VisitorInfo, accessed_at: DateTime<Utc>) -> Self {
        Self {
            short_url_id,
            accessed_at,
            visitor,
        }
    }

    /// Converts the event into a storable entry, truncating oversized headers.
    pub fn into_new_access_log(self) -> NewAccessLog {
        NewAccessLog {
            short_url_id: self.short_url_id,
            accessed_at: self.accessed_at,
            ip_address: self.visitor.ip_address,
            user_agent: truncate_chars(&self.visitor.user_agent, MAX_USER_AGENT_LEN),
            referer: self
                .visitor
                .referer
                .map(|r| truncate_chars(&r, MAX_REFERER_LEN)),
        }
    }
}
