//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::application::services::Resolution;
use crate::domain::access_event::VisitorInfo;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Capture visitor address, `User-Agent` and `Referer`
/// 2. Resolve the code (decode, eligibility check, click increment)
/// 3. Enqueue the access event for the background worker
/// 4. Return 302 Found
///
/// # Errors
///
/// Every unresolvable code gets the same bare 404, whether it is malformed,
/// unknown, inactive, expired or deleted. Store failures return 500.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let visitor = VisitorInfo::new(
        client_ip(&headers, Some(addr), state.behind_proxy),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    match state.resolver.resolve(&code, visitor).await? {
        Resolution::Redirect(target) => {
            Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
        }
        Resolution::NotFound(_) => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}
