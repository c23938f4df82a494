#![allow(dead_code)]

use axum::extract::ConnectInfo;
use chrono::{Duration, Utc};
use shorturl::domain::access_event::AccessEvent;
use shorturl::domain::access_log_sink::AccessLogSink;
use shorturl::domain::entities::ShortUrl;
use shorturl::domain::repositories::{AccessLogRepository, ShortUrlRepository};
use shorturl::infrastructure::persistence::MemoryStore;
use shorturl::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const BASE_URL: &str = "http://sho.rt";
pub const PEER_ADDR: &str = "127.0.0.1:12345";

pub fn create_test_state() -> (AppState, Arc<MemoryStore>, mpsc::Receiver<AccessEvent>) {
    create_test_state_with(false, 100)
}

pub fn create_test_state_with(
    behind_proxy: bool,
    queue_capacity: usize,
) -> (AppState, Arc<MemoryStore>, mpsc::Receiver<AccessEvent>) {
    let store = Arc::new(MemoryStore::new());
    let (sink, rx) = AccessLogSink::channel(queue_capacity);

    let short_urls: Arc<dyn ShortUrlRepository> = store.clone();
    let access_logs: Arc<dyn AccessLogRepository> = store.clone();

    let state = AppState::new(
        short_urls,
        access_logs,
        sink,
        BASE_URL,
        Duration::days(30),
        behind_proxy,
    );

    (state, store, rx)
}

fn record(id: i64, url: &str) -> ShortUrl {
    let now = Utc::now();
    ShortUrl {
        id,
        original_url: url.to_string(),
        created_at: now,
        expires_at: now + Duration::days(30),
        is_active: true,
        is_deleted: false,
        clicks_count: 0,
    }
}

pub fn create_eligible(store: &MemoryStore, id: i64, url: &str) {
    store.insert_record(record(id, url));
}

pub fn create_inactive(store: &MemoryStore, id: i64, url: &str) {
    store.insert_record(ShortUrl {
        is_active: false,
        ..record(id, url)
    });
}

pub fn create_expired(store: &MemoryStore, id: i64, url: &str) {
    store.insert_record(ShortUrl {
        expires_at: Utc::now() - Duration::hours(1),
        ..record(id, url)
    });
}

pub fn create_deleted(store: &MemoryStore, id: i64, url: &str) {
    store.insert_record(ShortUrl {
        is_deleted: true,
        ..record(id, url)
    });
}

pub async fn clicks(store: &MemoryStore, id: i64) -> i64 {
    store.find_by_id(id).await.unwrap().unwrap().clicks_count
}

/// Inserts `ConnectInfo` so handlers can be tested without a real socket.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
