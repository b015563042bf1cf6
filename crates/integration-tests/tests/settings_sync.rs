//! Integration tests for settings/template synchronization.
//!
//! These tests require:
//! - A running `PostgreSQL` database (shoplark-cli migrate)
//! - The server running (cargo run -p shoplark-server)
//! - A valid owner bearer token in `SHOPLARK_TEST_TOKEN`
//!
//! Run with: cargo test -p shoplark-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
fn base_url() -> String {
    std::env::var("SHOPLARK_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Owner bearer token for authenticated requests.
fn test_token() -> String {
    std::env::var("SHOPLARK_TEST_TOKEN").expect("SHOPLARK_TEST_TOKEN must be set")
}

fn client() -> Client {
    Client::new()
}

/// A subdomain label unique to this test run.
fn unique_subdomain(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &suffix[..12])
}

/// Test helper: create or update the owner's store template.
async fn upsert_template(client: &Client, body: &Value) -> Value {
    let resp = client
        .post(format!("{}/api/store-templates", base_url()))
        .bearer_auth(test_token())
        .json(body)
        .send()
        .await
        .expect("Failed to upsert template");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse template response")
}

/// Test helper: latest settings row for the owner, if any.
async fn latest_settings(client: &Client) -> Option<Value> {
    let resp = client
        .get(format!("{}/api/settings", base_url()))
        .bearer_auth(test_token())
        .send()
        .await
        .expect("Failed to list settings");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse settings list");
    body["data"].as_array().and_then(|rows| rows.first().cloned())
}

#[tokio::test]
#[ignore = "Requires running server and owner token"]
async fn test_store_info_update_syncs_template() {
    let client = client();
    let store_name = format!("Sync Test {}", Uuid::new_v4().simple());

    let resp = client
        .put(format!("{}/api/settings/store", base_url()))
        .bearer_auth(test_token())
        .json(&json!({ "store_name": store_name }))
        .send()
        .await
        .expect("Failed to update store info");
    assert_eq!(resp.status(), StatusCode::OK);

    // The template must now carry the same store name.
    let resp = client
        .get(format!("{}/api/store-templates", base_url()))
        .bearer_auth(test_token())
        .send()
        .await
        .expect("Failed to get template");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse template");
    assert_eq!(body["data"]["store_name"], json!(store_name));
}

#[tokio::test]
#[ignore = "Requires running server and owner token"]
async fn test_payment_asset_only_update_leaves_template_identity_alone() {
    let client = client();

    // Pin the template identity first.
    let store_name = format!("Isolation Test {}", Uuid::new_v4().simple());
    upsert_template(&client, &json!({ "store_name": store_name })).await;

    // A payment-asset-only settings write must not rename the store.
    let resp = client
        .put(format!("{}/api/settings/store", base_url()))
        .bearer_auth(test_token())
        .json(&json!({
            "store_name": store_name,
            "payment_method_image": "https://cdn.example.com/qr-isolated.png",
        }))
        .send()
        .await
        .expect("Failed to update settings");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/store-templates", base_url()))
        .bearer_auth(test_token())
        .send()
        .await
        .expect("Failed to get template");
    let body: Value = resp.json().await.expect("Failed to parse template");
    assert_eq!(body["data"]["store_name"], json!(store_name));
}

#[tokio::test]
#[ignore = "Requires running server and owner token"]
async fn test_publish_mirrors_subdomain_into_settings() {
    let client = client();
    let subdomain = unique_subdomain("pubsync");

    upsert_template(&client, &json!({ "store_name": "Publish Sync" })).await;

    let resp = client
        .put(format!("{}/api/store-templates/publish", base_url()))
        .bearer_auth(test_token())
        .json(&json!({ "store_subdomain": subdomain }))
        .send()
        .await
        .expect("Failed to publish");
    assert_eq!(resp.status(), StatusCode::OK);

    // Settings store_url mirrors the plain subdomain label.
    let settings = latest_settings(&client)
        .await
        .expect("Publish should have produced a settings row");
    assert_eq!(settings["store_url"], json!(subdomain));
}

#[tokio::test]
#[ignore = "Requires running server and owner token"]
async fn test_republish_with_same_subdomain_is_idempotent() {
    let client = client();
    let subdomain = unique_subdomain("repub");

    upsert_template(&client, &json!({ "store_name": "Republish Test" })).await;

    for _ in 0..2 {
        let resp = client
            .put(format!("{}/api/store-templates/publish", base_url()))
            .bearer_auth(test_token())
            .json(&json!({ "store_subdomain": subdomain }))
            .send()
            .await
            .expect("Failed to publish");
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

#[tokio::test]
#[ignore = "Requires running server and owner token"]
async fn test_template_update_without_subdomain_keeps_subdomain() {
    let client = client();
    let subdomain = unique_subdomain("keep");

    upsert_template(
        &client,
        &json!({ "store_name": "Keep Subdomain", "store_subdomain": subdomain }),
    )
    .await;

    // Updating another field without mentioning the subdomain must not clear it.
    let body = upsert_template(
        &client,
        &json!({ "header_part": { "title": "Still Here" } }),
    )
    .await;
    assert_eq!(body["data"]["store_subdomain"], json!(subdomain));
}
