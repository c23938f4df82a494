//! DTOs for the access log endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::AccessLog;

/// One recorded redirect.
#[derive(Debug, Serialize)]
pub struct AccessLogResponse {
    pub id: i64,
    pub short_url_id: i64,
    pub accessed_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub referer: Option<String>,
}

impl From<AccessLog> for AccessLogResponse {
    fn from(log: AccessLog) -> Self {
        Self {
            id: log.id,
            short_url_id: log.short_url_id,
            accessed_at: log.accessed_at,
            ip_address: log.ip_address,
            user_agent: log.user_agent,
            referer: log.referer,
        }
    }
}
