//! Handlers for short URL management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::access_log::AccessLogResponse;
use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::short_url::{
    CreateShortUrlRequest, PageResponse, ShortUrlResponse, UpdateShortUrlRequest,
};
use crate::domain::entities::ShortUrl;
use crate::error::AppError;
use crate::state::AppState;

/// Lists short URLs that currently resolve.
///
/// # Endpoint
///
/// `GET /api/shorturls?page=1&page_size=25`
///
/// Inactive, expired and deleted records are left out; fetch them by id.
pub async fn list_short_urls_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<ShortUrlResponse>>, AppError> {
    let (offset, limit) = page_bounds(&params)?;

    let (records, count) = state.short_url_service.list(offset, limit).await?;

    Ok(Json(PageResponse {
        count,
        page: params.page(),
        page_size: params.page_size(),
        results: records
            .into_iter()
            .map(|record| to_response(&state, record))
            .collect(),
    }))
}

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/shorturls`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/some/long/path",
///   "expires_at": "2030-01-01T00:00:00Z",
///   "is_active": true
/// }
/// ```
///
/// Only `original_url` is required.
///
/// # Errors
///
/// Returns 400 Bad Request if the URL or expiry is invalid.
pub async fn create_short_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateShortUrlRequest>,
) -> Result<(StatusCode, Json<ShortUrlResponse>), AppError> {
    payload.validate()?;

    let record = state
        .short_url_service
        .create(&payload.original_url, payload.expires_at, payload.is_active)
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, record))))
}

/// Returns one short URL by id, including inactive and expired ones.
///
/// `GET /api/shorturls/{id}`
pub async fn get_short_url_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let record = state.short_url_service.get(id).await?;
    Ok(Json(to_response(&state, record)))
}

/// Updates the target URL and/or active flag.
///
/// `PATCH /api/shorturls/{id}` and `PUT /api/shorturls/{id}`
pub async fn update_short_url_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateShortUrlRequest>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    payload.validate()?;

    let record = state
        .short_url_service
        .update(id, payload.original_url.as_deref(), payload.is_active)
        .await?;

    Ok(Json(to_response(&state, record)))
}

/// Soft-deletes a short URL.
///
/// `DELETE /api/shorturls/{id}` returns 204 No Content.
pub async fn delete_short_url_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.short_url_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists access logs for a short URL, newest first.
///
/// `GET /api/shorturls/{id}/logs?page=1&page_size=25`
pub async fn access_logs_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<AccessLogResponse>>, AppError> {
    let (offset, limit) = page_bounds(&params)?;

    let (logs, count) = state
        .short_url_service
        .access_logs(id, offset, limit)
        .await?;

    Ok(Json(PageResponse {
        count,
        page: params.page(),
        page_size: params.page_size(),
        results: logs.into_iter().map(AccessLogResponse::from).collect(),
    }))
}

fn page_bounds(params: &PaginationParams) -> Result<(i64, i64), AppError> {
    params
        .validate_and_get_offset_limit()
        .map_err(|msg| AppError::bad_request(msg, json!({})))
}

fn to_response(state: &AppState, record: ShortUrl) -> ShortUrlResponse {
    let short_url = state.short_url_service.short_url(&record);
    ShortUrlResponse::new(record, short_url)
}
