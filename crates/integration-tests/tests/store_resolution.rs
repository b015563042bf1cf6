//! Integration tests for public store resolution.
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

fn base_url() -> String {
    std::env::var("SHOPLARK_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

fn test_token() -> String {
    std::env::var("SHOPLARK_TEST_TOKEN").expect("SHOPLARK_TEST_TOKEN must be set")
}

fn unique_subdomain(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &suffix[..12])
}

/// Test helper: publish the owner's store under a fresh subdomain.
async fn publish_store(client: &Client, subdomain: &str) {
    let resp = client
        .post(format!("{}/api/store-templates", base_url()))
        .bearer_auth(test_token())
        .json(&json!({ "store_name": "Resolution Test" }))
        .send()
        .await
        .expect("Failed to upsert template");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .put(format!("{}/api/store-templates/publish", base_url()))
        .bearer_auth(test_token())
        .json(&json!({ "store_subdomain": subdomain }))
        .send()
        .await
        .expect("Failed to publish");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and owner token"]
async fn test_published_store_resolves() {
    let client = Client::new();
    let subdomain = unique_subdomain("resolve");
    publish_store(&client, &subdomain).await;

    let resp = client
        .get(format!("{}/store/{subdomain}", base_url()))
        .send()
        .await
        .expect("Failed to resolve store");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse store payload");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["store_subdomain"], json!(subdomain));
}

#[tokio::test]
#[ignore = "Requires running server and owner token"]
async fn test_unknown_store_is_an_opaque_404() {
    let client = Client::new();
    let subdomain = unique_subdomain("missing");

    let resp = client
        .get(format!("{}/store/{subdomain}", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"], json!("Store not found"));
}

#[tokio::test]
#[ignore = "Requires running server and owner token"]
async fn test_unpublished_store_404_matches_missing_store_404() {
    let client = Client::new();
    let subdomain = unique_subdomain("offline");
    publish_store(&client, &subdomain).await;

    let resp = client
        .put(format!("{}/api/store-templates/unpublish", base_url()))
        .bearer_auth(test_token())
        .send()
        .await
        .expect("Failed to unpublish");
    assert_eq!(resp.status(), StatusCode::OK);

    // The error body must be indistinguishable from a subdomain that never
    // existed.
    let resp = client
        .get(format!("{}/store/{subdomain}", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"], json!("Store not found"));
}

#[tokio::test]
#[ignore = "Requires running server and owner token"]
async fn test_settings_payment_image_shows_up_in_resolved_store() {
    let client = Client::new();
    let subdomain = unique_subdomain("asset");
    publish_store(&client, &subdomain).await;

    let image_url = format!("https://cdn.example.com/{}.png", Uuid::new_v4().simple());
    let resp = client
        .put(format!("{}/api/settings/store", base_url()))
        .bearer_auth(test_token())
        .json(&json!({
            "store_name": "Resolution Test",
            "payment_method_image": image_url,
        }))
        .send()
        .await
        .expect("Failed to update settings");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/store/{subdomain}", base_url()))
        .send()
        .await
        .expect("Failed to resolve store");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse store payload");
    assert_eq!(body["data"]["payment_method_image"], json!(image_url));
}

#[tokio::test]
#[ignore = "Requires running server and owner token"]
async fn test_public_products_for_unknown_store_404() {
    let client = Client::new();
    let subdomain = unique_subdomain("noshop");

    let resp = client
        .get(format!(
            "{}/api/products/public?subdomain={subdomain}",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
