//! Failure injection tests: rate-limit retries, host cache TTL, and
//! upstream error passthrough.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Value};

mod common;
use common::{proxy_config, spawn_proxy, start_mock_upstream, MockResponse};

async fn post_action(proxy: std::net::SocketAddr, body: Value) -> (u16, Value) {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .post(format!("http://{}", proxy))
        .json(&body)
        .send()
        .await
        .expect("proxy unreachable");
    let status = res.status().as_u16();
    let envelope: Value = res.json().await.expect("envelope is JSON");
    (status, envelope)
}

fn control_plane_for(data_addr: std::net::SocketAddr) -> impl Fn(common::ReceivedRequest) -> MockResponse {
    move |req| {
        if req.method == "GET" && req.path.starts_with("/assistant/assistants/") {
            MockResponse::json(200, json!({"host": format!("http://{}", data_addr)}))
        } else {
            MockResponse::json(404, json!({}))
        }
    }
}

#[tokio::test]
async fn test_rate_limit_retry_then_success() {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();
    let data_addr = start_mock_upstream(move |_| {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        if attempt < 2 {
            MockResponse::json(429, json!({"error": "rate limited"}))
        } else {
            MockResponse::json(200, json!({"message": {"content": "finally"}}))
        }
    })
    .await;
    let control_addr = start_mock_upstream(control_plane_for(data_addr)).await;
    let proxy = spawn_proxy(proxy_config(control_addr)).await;

    let (status, envelope) = post_action(
        proxy,
        json!({"action": "chat", "assistant_name": "demo", "data": {"message": "hi"}}),
    )
    .await;

    assert_eq!(status, 200, "should succeed after retries");
    assert_eq!(envelope["data"]["response"], "finally");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_rate_limit_retries_exhausted() {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();
    let data_addr = start_mock_upstream(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        MockResponse::json(429, json!({"error": "rate limited"}))
    })
    .await;
    let control_addr = start_mock_upstream(control_plane_for(data_addr)).await;
    let proxy = spawn_proxy(proxy_config(control_addr)).await;

    let (status, envelope) = post_action(
        proxy,
        json!({"action": "chat", "assistant_name": "demo", "data": {"message": "hi"}}),
    )
    .await;

    assert_eq!(status, 429);
    assert_eq!(envelope["success"], json!(false));
    assert!(envelope["error"]
        .as_str()
        .unwrap()
        .contains("429 Too Many Requests"));
    assert_eq!(envelope["details"]["body"], json!({"error": "rate limited"}));
    // Initial attempt plus exactly two retries.
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_after_header_honored() {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();
    let data_addr = start_mock_upstream(move |_| {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        if attempt == 0 {
            MockResponse::json(429, json!({"error": "rate limited"}))
                .with_header("Retry-After", "1")
        } else {
            MockResponse::json(200, json!({"message": {"content": "ok"}}))
        }
    })
    .await;
    let control_addr = start_mock_upstream(control_plane_for(data_addr)).await;
    let proxy = spawn_proxy(proxy_config(control_addr)).await;

    let start = Instant::now();
    let (status, _) = post_action(
        proxy,
        json!({"action": "chat", "assistant_name": "demo", "data": {"message": "hi"}}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    // The 1-second Retry-After beats the 10ms fallback delay.
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_host_cache_single_discovery_within_ttl() {
    let data_addr = start_mock_upstream(|_| {
        MockResponse::json(200, json!({"message": {"content": "ok"}}))
    })
    .await;

    let discoveries = Arc::new(AtomicU32::new(0));
    let counter = discoveries.clone();
    let control_addr = start_mock_upstream(move |req| {
        if req.path.starts_with("/assistant/assistants/") {
            counter.fetch_add(1, Ordering::SeqCst);
            MockResponse::json(200, json!({"host": format!("http://{}", data_addr)}))
        } else {
            MockResponse::json(404, json!({}))
        }
    })
    .await;

    let proxy = spawn_proxy(proxy_config(control_addr)).await;
    let body = json!({"action": "chat", "assistant_name": "demo", "data": {"message": "hi"}});

    let (status, _) = post_action(proxy, body.clone()).await;
    assert_eq!(status, 200);
    let (status, _) = post_action(proxy, body.clone()).await;
    assert_eq!(status, 200);

    // Two requests inside the TTL share one discovery call.
    assert_eq!(discoveries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_host_cache_rediscovers_after_expiry() {
    let data_addr = start_mock_upstream(|_| {
        MockResponse::json(200, json!({"message": {"content": "ok"}}))
    })
    .await;

    let discoveries = Arc::new(AtomicU32::new(0));
    let counter = discoveries.clone();
    let control_addr = start_mock_upstream(move |req| {
        if req.path.starts_with("/assistant/assistants/") {
            counter.fetch_add(1, Ordering::SeqCst);
            MockResponse::json(200, json!({"host": format!("http://{}", data_addr)}))
        } else {
            MockResponse::json(404, json!({}))
        }
    })
    .await;

    let mut config = proxy_config(control_addr);
    config.host_cache.ttl_secs = 1;
    let proxy = spawn_proxy(config).await;
    let body = json!({"action": "chat", "assistant_name": "demo", "data": {"message": "hi"}});

    let (status, _) = post_action(proxy, body.clone()).await;
    assert_eq!(status, 200);
    assert_eq!(discoveries.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(1200)).await;

    let (status, _) = post_action(proxy, body.clone()).await;
    assert_eq!(status, 200);
    assert_eq!(discoveries.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_missing_host_in_discovery_response() {
    let control_addr = start_mock_upstream(|req| {
        if req.path.starts_with("/assistant/assistants/") {
            MockResponse::json(200, json!({"name": "demo", "status": "Initializing"}))
        } else {
            MockResponse::json(404, json!({}))
        }
    })
    .await;
    let proxy = spawn_proxy(proxy_config(control_addr)).await;

    let (status, envelope) = post_action(
        proxy,
        json!({"action": "chat", "assistant_name": "demo", "data": {"message": "hi"}}),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(envelope["success"], json!(false));
    assert!(envelope["error"].as_str().unwrap().contains("demo"));
    assert!(envelope["error"].as_str().unwrap().contains("host"));
}

#[tokio::test]
async fn test_upstream_error_status_and_details_pass_through() {
    let data_addr = start_mock_upstream(|_| {
        MockResponse::json(404, json!({"error": "assistant file not found"}))
    })
    .await;
    let control_addr = start_mock_upstream(control_plane_for(data_addr)).await;
    let proxy = spawn_proxy(proxy_config(control_addr)).await;

    let (status, envelope) = post_action(
        proxy,
        json!({
            "action": "deleteFile",
            "assistant_name": "demo",
            "data": {"file_id": "missing"}
        }),
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(envelope["success"], json!(false));
    assert!(envelope["error"].as_str().unwrap().contains("404 Not Found"));
    assert_eq!(
        envelope["details"]["body"],
        json!({"error": "assistant file not found"})
    );
    assert!(envelope["details"]["url"]
        .as_str()
        .unwrap()
        .contains("/assistant/files/demo/missing"));
}

#[tokio::test]
async fn test_unreachable_upstream_maps_to_bad_gateway() {
    // Closed port: connection refused on discovery.
    let control_addr: std::net::SocketAddr = "127.0.0.1:9".parse().unwrap();
    let proxy = spawn_proxy(proxy_config(control_addr)).await;

    let (status, envelope) = post_action(
        proxy,
        json!({"action": "listAssistants"}),
    )
    .await;

    assert_eq!(status, 502);
    assert_eq!(envelope["success"], json!(false));
    assert!(envelope["error"]
        .as_str()
        .unwrap()
        .contains("upstream request failed"));
}
