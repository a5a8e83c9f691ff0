mod common;

use common::Harness;
use serde_json::json;
use tootline_api::{StatusDraftBuilder, Statuses};
use tootline_error::TootlineErrorKind;
use wiremock::matchers::{body_partial_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_create_posts_status_with_idempotency_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/statuses"))
        .and(header_exists("Idempotency-Key"))
        .and(body_partial_json(json!({
            "status": "Hello, fediverse!",
            "visibility": "unlisted",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .expect(1)
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri());
    let draft = StatusDraftBuilder::default()
        .status("Hello, fediverse!")
        .visibility("unlisted")
        .build()
        .unwrap();
    let posted = Statuses::new(&harness.dispatcher).create(&draft).await.unwrap();
    assert_eq!(posted["id"], "1");
    harness.shutdown().await;
}

#[tokio::test]
async fn test_create_truncates_long_status_without_cutting_urls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .expect(1)
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri());
    let long_text = format!("{} https://example.com/a/long/link tail", "x".repeat(600));
    let draft = StatusDraftBuilder::default().status(long_text).build().unwrap();
    Statuses::new(&harness.dispatcher).create(&draft).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let sent = body["status"].as_str().unwrap();
    assert_eq!(sent, "x".repeat(500));
    assert!(!sent.contains("https://"));
    harness.shutdown().await;
}

#[tokio::test]
async fn test_create_keeps_a_url_that_fits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri());
    // 470 plain chars + space + URL (23) = 494 effective: the URL fits whole.
    let text = format!("{} https://example.com/a/very/long/link/indeed", "y".repeat(470));
    let draft = StatusDraftBuilder::default().status(text.clone()).build().unwrap();
    Statuses::new(&harness.dispatcher).create(&draft).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["status"].as_str().unwrap(), text);
    harness.shutdown().await;
}

#[tokio::test]
async fn test_create_rejects_empty_draft_without_network() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    let draft = StatusDraftBuilder::default().status("   ").build().unwrap();
    let err = Statuses::new(&harness.dispatcher).create(&draft).await.unwrap_err();
    assert!(matches!(err.kind(), TootlineErrorKind::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
    harness.shutdown().await;
}

#[tokio::test]
async fn test_create_rejects_invalid_visibility() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    let draft = StatusDraftBuilder::default()
        .status("hi")
        .visibility("followers-only")
        .build()
        .unwrap();
    let err = Statuses::new(&harness.dispatcher).create(&draft).await.unwrap_err();
    assert!(matches!(err.kind(), TootlineErrorKind::Validation(_)));
    assert!(err.to_string().contains("visibility"));
    harness.shutdown().await;
}

#[tokio::test]
async fn test_create_rejects_too_many_attachments() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    let ids: Vec<String> = (0..5).map(|i| i.to_string()).collect();
    let draft = StatusDraftBuilder::default().status("hi").media_ids(ids).build().unwrap();
    let err = Statuses::new(&harness.dispatcher).create(&draft).await.unwrap_err();
    assert!(matches!(err.kind(), TootlineErrorKind::Validation(_)));
    harness.shutdown().await;
}

#[tokio::test]
async fn test_create_rejects_near_future_schedule() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    let draft = StatusDraftBuilder::default()
        .status("hi")
        .scheduled_at(chrono::Utc::now() + chrono::Duration::minutes(2))
        .build()
        .unwrap();
    let err = Statuses::new(&harness.dispatcher).create(&draft).await.unwrap_err();
    assert!(matches!(err.kind(), TootlineErrorKind::Validation(_)));
    harness.shutdown().await;
}

#[tokio::test]
async fn test_create_caps_spoiler_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri());
    let draft = StatusDraftBuilder::default()
        .status("hi")
        .spoiler_text("w".repeat(150))
        .build()
        .unwrap();
    Statuses::new(&harness.dispatcher).create(&draft).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["spoiler_text"].as_str().unwrap().len(), 100);
    harness.shutdown().await;
}

#[tokio::test]
async fn test_favourite_invalidates_cached_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/statuses/55"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "55"})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/statuses/55/favourite"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "55", "favourited": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri());
    let statuses = Statuses::new(&harness.dispatcher);

    statuses.get("55").await.unwrap();
    let favourited = statuses.favourite("55").await.unwrap();
    assert_eq!(favourited["favourited"], true);
    // The cached read was dropped, so this second get hits the server again.
    statuses.get("55").await.unwrap();
    harness.shutdown().await;
}

#[tokio::test]
async fn test_blank_id_is_rejected() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());
    let statuses = Statuses::new(&harness.dispatcher);

    for result in [
        statuses.get("").await,
        statuses.delete(" ").await,
        statuses.boost("").await,
    ] {
        let err = result.unwrap_err();
        assert!(matches!(err.kind(), TootlineErrorKind::Validation(_)));
    }
    assert!(server.received_requests().await.unwrap().is_empty());
    harness.shutdown().await;
}
