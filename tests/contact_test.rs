mod common;

use axum::body::Body;
use axum::http::Request;
use common::{TestApp, TestAppOptions};
use contact_gateway::build_router;
use contact_gateway::config::{
    CommonConfig, DeploymentMode, GatewayConfig, GatewayVariant, OriginConfig, PushoverConfig,
};
use contact_gateway::services::{MockPushProvider, PushProvider};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;

fn valid_body() -> serde_json::Value {
    json!({
        "name": "Jordan",
        "message": "Please contact me about pricing.",
        "phone": "555-1234"
    })
}

// =============================================================================
// Validation failures: 400, no notification attempt
// =============================================================================

#[tokio::test]
async fn empty_body_rejected_without_send() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(app.contact_url())
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "name and message are required fields");
    assert_eq!(app.push.send_count(), 0);
}

#[tokio::test]
async fn missing_message_rejected_without_send() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(app.contact_url())
        .json(&json!({"name": "Jordan"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);
    assert_eq!(app.push.send_count(), 0);
}

#[tokio::test]
async fn overlong_message_rejected_without_send() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(app.contact_url())
        .json(&json!({"name": "Jordan", "message": "x".repeat(1001)}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "message must be 1000 characters or fewer");
    assert_eq!(app.push.send_count(), 0);
}

#[tokio::test]
async fn strict_variant_rejects_short_message() {
    let app = TestApp::spawn_strict().await;
    let client = Client::new();

    let response = client
        .post(app.contact_url())
        .json(&json!({"name": "Jo", "message": "short"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "message must be at least 10 characters");
    assert_eq!(app.push.send_count(), 0);
}

#[tokio::test]
async fn strict_variant_rejects_short_name() {
    let app = TestApp::spawn_strict().await;
    let client = Client::new();

    let response = client
        .post(app.contact_url())
        .json(&json!({"name": "J", "message": "a long enough message"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "name must be at least 2 characters");
    assert_eq!(app.push.send_count(), 0);
}

#[tokio::test]
async fn permissive_variant_accepts_short_fields() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(app.contact_url())
        .json(&json!({"name": "J", "message": "hi"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    assert_eq!(app.push.send_count(), 1);
}

#[tokio::test]
async fn malformed_json_gets_structured_error_body() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(app.contact_url())
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);

    // Parse failures keep the shared error shape, not axum's plain-text
    // rejection body.
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert_eq!(app.push.send_count(), 0);
}

#[tokio::test]
async fn oversized_body_gets_structured_error_body() {
    // Exercised through the router directly: a body past the 10 MB parse
    // limit is rejected before the upload would complete on a socket.
    let config = GatewayConfig {
        common: CommonConfig {
            port: 0,
            environment: "test".to_string(),
        },
        pushover: PushoverConfig {
            user_key: "test-user".to_string(),
            api_token: "test-token".to_string(),
            enabled: false,
        },
        origin: OriginConfig {
            allowed_origins: Vec::new(),
        },
        variant: GatewayVariant::Permissive,
        deployment: DeploymentMode::Server,
    };
    let push = Arc::new(MockPushProvider::new(true));
    let provider: Arc<dyn PushProvider> = push.clone();
    let app = build_router(&config, provider);

    let oversized = format!(
        r#"{{"name":"Jordan","message":"{}"}}"#,
        "x".repeat(11 * 1024 * 1024)
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/contact")
                .header("content-type", "application/json")
                .body(Body::from(oversized))
                .unwrap(),
        )
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 413);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body: serde_json::Value =
        serde_json::from_slice(&bytes).expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert_eq!(push.send_count(), 0);
}

// =============================================================================
// Successful delivery
// =============================================================================

#[tokio::test]
async fn valid_submission_sends_exactly_one_notification() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(app.contact_url())
        .json(&valid_body())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());
    assert!(body["timestamp"].is_string());

    assert_eq!(app.push.send_count(), 1);
    let sent = app.push.sent();
    assert!(sent[0].body.contains("Jordan"));
    assert!(sent[0].body.contains("555-1234"));
    assert!(sent[0].body.contains("Please contact me about pricing."));
}

#[tokio::test]
async fn missing_phone_uses_placeholder_in_notification() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(app.contact_url())
        .json(&json!({"name": "Jordan", "message": "Please contact me about pricing."}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);

    let sent = app.push.sent();
    assert!(sent[0].body.contains("Phone: none"));
}

#[tokio::test]
async fn submission_fields_are_trimmed_before_delivery() {
    let app = TestApp::spawn_strict().await;
    let client = Client::new();

    let response = client
        .post(app.contact_url())
        .json(&json!({
            "name": "  Jordan  ",
            "message": "  Please contact me about pricing.  ",
            "phone": "  555-1234  "
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);

    let sent = app.push.sent();
    assert!(sent[0].body.contains("Name: Jordan\n"));
    assert!(sent[0].body.contains("Phone: 555-1234\n"));
}

#[tokio::test]
async fn identical_submissions_are_not_deduplicated() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    for _ in 0..2 {
        let response = client
            .post(app.contact_url())
            .json(&valid_body())
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), 200);
    }

    assert_eq!(app.push.send_count(), 2);
}

// =============================================================================
// Delivery failure: 500, generic payload
// =============================================================================

#[tokio::test]
async fn provider_failure_returns_generic_500() {
    let app = TestApp::spawn_with(TestAppOptions {
        variant: GatewayVariant::Strict,
        provider: MockPushProvider::failing(),
        ..TestAppOptions::default()
    })
    .await;
    let client = Client::new();

    let response = client
        .post(app.contact_url())
        .json(&valid_body())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 500);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    // Provider detail must not leak to the client.
    assert_eq!(body["error"], "a server error occurred, please try again later");

    // The attempt was made exactly once; the submission is then dropped.
    assert_eq!(app.push.send_count(), 1);
}
