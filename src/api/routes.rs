//! API route configuration.

use crate::api::handlers::{
    access_logs_handler, create_short_url_handler, delete_short_url_handler,
    get_short_url_handler, list_short_urls_handler, update_short_url_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Management API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET    /shorturls`           - List eligible short URLs (paginated)
/// - `POST   /shorturls`           - Create a short URL
/// - `GET    /shorturls/{id}`      - Fetch a short URL
/// - `PATCH  /shorturls/{id}`      - Update URL and/or active flag
/// - `PUT    /shorturls/{id}`      - Same as `PATCH`
/// - `DELETE /shorturls/{id}`      - Soft-delete a short URL
/// - `GET    /shorturls/{id}/logs` - Access logs (paginated)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shorturls",
            get(list_short_urls_handler).post(create_short_url_handler),
        )
        .route(
            "/shorturls/{id}",
            get(get_short_url_handler)
                .patch(update_short_url_handler)
                .put(update_short_url_handler)
                .delete(delete_short_url_handler),
        )
        .route("/shorturls/{id}/logs", get(access_logs_handler))
}
