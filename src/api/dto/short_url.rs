//! DTOs for short URL management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortUrl;

/// Request body for `POST /api/shorturls`.
///
/// Server-controlled fields such as `clicks_count` are ignored if sent.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortUrlRequest {
    #[validate(length(min = 1, max = 2048), url(message = "Invalid URL format"))]
    pub original_url: String,

    /// Defaults to now plus the configured TTL.
    pub expires_at: Option<DateTime<Utc>>,

    pub is_active: Option<bool>,
}

/// Request body for `PATCH`/`PUT /api/shorturls/{id}`.
///
/// Only the target URL and the active flag can change; any other field is
/// ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateShortUrlRequest {
    #[validate(length(min = 1, max = 2048), url(message = "Invalid URL format"))]
    pub original_url: Option<String>,

    pub is_active: Option<bool>,
}

/// JSON representation of a short URL.
#[derive(Debug, Serialize)]
pub struct ShortUrlResponse {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub clicks_count: i64,
}

impl ShortUrlResponse {
    pub fn new(record: ShortUrl, short_url: String) -> Self {
        Self {
            id: record.id,
            code: record.code(),
            short_url,
            original_url: record.original_url,
            created_at: record.created_at,
            expires_at: record.expires_at,
            is_active: record.is_active,
            clicks_count: record.clicks_count,
        }
    }
}

/// Paginated list envelope shared by list endpoints.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    /// Total number of matching items across all pages.
    pub count: i64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::url_validation::MAX_URL_LEN;

    #[test]
    fn test_create_request_ignores_server_fields() {
        let json = r#"{"original_url": "https://example.com", "clicks_count": 500, "id": 9}"#;
        let request: CreateShortUrlRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.original_url, "https://example.com");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_non_url() {
        let request = CreateShortUrlRequest {
            original_url: "not a url".to_string(),
            expires_at: None,
            is_active: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_oversized_url() {
        let request = CreateShortUrlRequest {
            original_url: format!("https://example.com/{}", "a".repeat(MAX_URL_LEN)),
            expires_at: None,
            is_active: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_all_optional() {
        let request: UpdateShortUrlRequest = serde_json::from_str("{}").unwrap();

        assert!(request.original_url.is_none());
        assert!(request.is_active.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_response_derives_code_from_id() {
        let now = Utc::now();
        let record = ShortUrl {
            id: 125,
            original_url: "https://example.com/".to_string(),
            created_at: now,
            expires_at: now,
            is_active: true,
            is_deleted: false,
            clicks_count: 3,
        };

        let response = ShortUrlResponse::new(record, "http://localhost:3000/12".to_string());

        assert_eq!(response.code, "12");
        assert_eq!(response.clicks_count, 3);
    }
}
