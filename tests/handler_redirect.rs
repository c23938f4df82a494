mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_test::TestServer;
use shorturl::domain::access_log_worker::run_access_log_worker;
use shorturl::domain::codec;
use shorturl::domain::repositories::AccessLogRepository;
use shorturl::routes::{app_router, with_trailing_slash_normalization};
use tower::ServiceExt;

use common::MockConnectInfoLayer;

fn test_server(state: shorturl::AppState) -> TestServer {
    let app = app_router(state).layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_redirect_success() {
    let (state, store, mut rx) = common::create_test_state();
    common::create_eligible(&store, 1, "https://example.com/target");
    let server = test_server(state);

    let response = server.get("/1").await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/target");
    assert_eq!(common::clicks(&store, 1).await, 1);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.short_url_id, 1);
}

#[tokio::test]
async fn test_redirect_multi_digit_code() {
    let (state, store, _rx) = common::create_test_state();
    common::create_eligible(&store, 125, "https://example.com/125");
    let server = test_server(state);

    let response = server.get(&format!("/{}", codec::encode(125))).await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/125");
}

#[tokio::test]
async fn test_redirect_non_canonical_code_resolves() {
    let (state, store, _rx) = common::create_test_state();
    common::create_eligible(&store, 1, "https://example.com/target");
    let server = test_server(state);

    let response = server.get("/10").await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_redirect_unknown_id_is_bare_404() {
    let (state, _store, mut rx) = common::create_test_state();
    let server = test_server(state);

    let response = server.get(&format!("/{}", codec::encode(999_999))).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_invalid_characters_is_404() {
    let (state, _store, _rx) = common::create_test_state();
    let server = test_server(state);

    let response = server.get("/$$$").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn test_redirect_id_beyond_store_range_is_404() {
    let (state, _store, _rx) = common::create_test_state();
    let server = test_server(state);

    let response = server.get(&format!("/{}", codec::encode(u64::MAX))).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_redirect_ineligible_records_are_404_without_click() {
    let (state, store, mut rx) = common::create_test_state();
    common::create_inactive(&store, 1, "https://example.com/inactive");
    common::create_expired(&store, 2, "https://example.com/expired");
    common::create_deleted(&store, 3, "https://example.com/deleted");
    let server = test_server(state);

    for id in 1..=3 {
        let response = server.get(&format!("/{}", codec::encode(id as u64))).await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "id {id}");
        assert!(response.text().is_empty());
        assert_eq!(common::clicks(&store, id).await, 0, "id {id}");
    }

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_captures_visitor_headers() {
    let (state, store, mut rx) = common::create_test_state();
    common::create_eligible(&store, 7, "https://example.com/");
    let server = test_server(state);

    server
        .get("/7")
        .add_header("User-Agent", "Mozilla/5.0")
        .add_header("Referer", "https://news.example.org/")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await;

    let event = rx.try_recv().unwrap();
    assert_eq!(event.visitor.user_agent, "Mozilla/5.0");
    assert_eq!(
        event.visitor.referer.as_deref(),
        Some("https://news.example.org/")
    );
    // Not behind a proxy: the forwarded header is ignored.
    assert_eq!(event.visitor.ip_address.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_redirect_behind_proxy_uses_forwarded_address() {
    let (state, store, mut rx) = common::create_test_state_with(true, 100);
    common::create_eligible(&store, 7, "https://example.com/");
    let server = test_server(state);

    server
        .get("/7")
        .add_header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
        .await;

    let event = rx.try_recv().unwrap();
    assert_eq!(event.visitor.ip_address.as_deref(), Some("203.0.113.7"));
}

#[tokio::test]
async fn test_redirect_full_queue_still_redirects() {
    let (state, store, mut rx) = common::create_test_state_with(false, 1);
    common::create_eligible(&store, 1, "https://example.com/");
    let server = test_server(state);

    for _ in 0..3 {
        let response = server.get("/1").await;
        assert_eq!(response.status_code(), StatusCode::FOUND);
    }

    assert_eq!(common::clicks(&store, 1).await, 3);
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_concurrent_clicks_are_counted() {
    const REQUESTS: usize = 50;

    let (state, store, _rx) = common::create_test_state_with(false, REQUESTS);
    common::create_eligible(&store, 1, "https://example.com/");
    let app = app_router(state).layer(MockConnectInfoLayer);

    let mut handles = Vec::with_capacity(REQUESTS);
    for _ in 0..REQUESTS {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let request = Request::get("/1").body(Body::empty()).unwrap();
            app.oneshot(request).await.unwrap().status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::FOUND);
    }

    assert_eq!(common::clicks(&store, 1).await, REQUESTS as i64);
}

#[tokio::test]
async fn test_redirect_trailing_slash() {
    let (state, store, _rx) = common::create_test_state();
    common::create_eligible(&store, 1, "https://example.com/target");
    let app = with_trailing_slash_normalization(app_router(state).layer(MockConnectInfoLayer));

    let request = Request::get("/1/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://example.com/target"
    );
}

#[tokio::test]
async fn test_redirect_is_logged_by_worker() {
    let (state, store, rx) = common::create_test_state();
    common::create_eligible(&store, 1, "https://example.com/");
    let worker = tokio::spawn(run_access_log_worker(rx, store.clone(), 2));
    let app = app_router(state).layer(MockConnectInfoLayer);

    let request = Request::get("/1")
        .header(header::USER_AGENT, "curl/8.5.0")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    // The router was consumed by `oneshot`, so every sender is gone and the
    // worker stops after draining the queue.
    worker.await.unwrap();

    let logs = store.list_for_short_url(1, 0, 10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_agent, "curl/8.5.0");
    assert_eq!(logs[0].ip_address.as_deref(), Some("127.0.0.1"));
}
