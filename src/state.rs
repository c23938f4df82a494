//! Shared application state injected into handlers.

use chrono::Duration;
use std::sync::Arc;

use crate::application::services::{Resolver, ShortUrlService};
use crate::domain::access_log_sink::AccessLogSink;
use crate::domain::repositories::{AccessLogRepository, ShortUrlRepository};

pub type DynResolver = Resolver<dyn ShortUrlRepository>;
pub type DynShortUrlService = ShortUrlService<dyn ShortUrlRepository, dyn AccessLogRepository>;

/// Handles shared by every request.
///
/// Cheap to clone: services sit behind `Arc` and the sink is a channel
/// sender.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<DynResolver>,
    pub short_url_service: Arc<DynShortUrlService>,
    pub access_log_sink: AccessLogSink,
    /// When true, the visitor address is read from `X-Forwarded-For`.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires services over the given stores.
    pub fn new(
        short_url_repository: Arc<dyn ShortUrlRepository>,
        access_log_repository: Arc<dyn AccessLogRepository>,
        access_log_sink: AccessLogSink,
        base_url: &str,
        default_ttl: Duration,
        behind_proxy: bool,
    ) -> Self {
        let resolver = Arc::new(Resolver::new(
            short_url_repository.clone(),
            access_log_sink.clone(),
        ));
        let short_url_service = Arc::new(ShortUrlService::new(
            short_url_repository,
            access_log_repository,
            base_url,
            default_ttl,
        ));

        Self {
            resolver,
            short_url_service,
            access_log_sink,
            behind_proxy,
        }
    }
}
