//! Integration tests for price alerts.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (bw migrate)
//! - Seeded demo data (bw seed)
//! - The API server running (cargo run -p basketwatch-api)
//!
//! Run with: cargo test -p basketwatch-integration-tests -- --ignored

use basketwatch_integration_tests::TestApi;
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

/// Test helper: Create a product and return its id.
async fn create_test_product(api: &TestApi) -> i64 {
    let resp = api
        .post("/products")
        .json(&json!({ "name": format!("Watched {}", Uuid::new_v4()) }))
        .send()
        .await
        .expect("Failed to create test product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = resp.json().await.expect("Failed to parse product");
    product["id"].as_i64().expect("Product id missing")
}

/// Test helper: Create an alert and return its JSON body.
async fn create_test_alert(api: &TestApi, product_id: i64, target_price: f64) -> Value {
    let resp = api
        .post("/price-alerts")
        .json(&json!({ "product_id": product_id, "target_price": target_price }))
        .send()
        .await
        .expect("Failed to create test alert");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse alert")
}

// ============================================================================
// CRUD Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_price_alert_crud() {
    let api = TestApi::new();
    let product_id = create_test_product(&api).await;

    let alert = create_test_alert(&api, product_id, 2.50).await;
    let id = alert["id"].as_i64().expect("Alert id missing");
    assert_eq!(alert["is_active"], true);
    assert_eq!(alert["user_id"].as_i64(), Some(1));

    let resp = api
        .get("/price-alerts")
        .send()
        .await
        .expect("Failed to list alerts");
    assert_eq!(resp.status(), StatusCode::OK);
    let alerts: Vec<Value> = resp.json().await.expect("Failed to parse alerts");
    assert!(alerts.iter().any(|a| a["id"].as_i64() == Some(id)));

    let resp = api
        .put(&format!("/price-alerts/{id}"))
        .json(&json!({ "target_price": 2.25, "is_active": false }))
        .send()
        .await
        .expect("Failed to update alert");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse alert");
    assert_eq!(updated["target_price"].as_f64(), Some(2.25));
    assert_eq!(updated["is_active"], false);

    let resp = api
        .delete(&format!("/price-alerts/{id}"))
        .send()
        .await
        .expect("Failed to delete alert");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// ============================================================================
// Validation & Conflict Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_price_alert_rejects_nonpositive_target() {
    let api = TestApi::new();
    let product_id = create_test_product(&api).await;

    let resp = api
        .post("/price-alerts")
        .json(&json!({ "product_id": product_id, "target_price": 0.0 }))
        .send()
        .await
        .expect("Failed to post alert");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_price_alert_one_per_user_and_product() {
    let api = TestApi::new();
    let other = TestApi::as_user(2);
    let product_id = create_test_product(&api).await;

    create_test_alert(&api, product_id, 2.50).await;

    // Same user, same product: conflict
    let resp = api
        .post("/price-alerts")
        .json(&json!({ "product_id": product_id, "target_price": 2.00 }))
        .send()
        .await
        .expect("Failed to post duplicate alert");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Another user may watch the same product
    let alert = create_test_alert(&other, product_id, 1.75).await;
    assert_eq!(alert["user_id"].as_i64(), Some(2));
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_price_alert_unknown_product_conflicts() {
    let api = TestApi::new();

    let resp = api
        .post("/price-alerts")
        .json(&json!({ "product_id": 2147483000, "target_price": 2.50 }))
        .send()
        .await
        .expect("Failed to post alert");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// ============================================================================
// Ownership Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_price_alert_ownership_enforced() {
    let api = TestApi::new();
    let other = TestApi::as_user(2);
    let product_id = create_test_product(&api).await;

    let alert = create_test_alert(&api, product_id, 3.00).await;
    let id = alert["id"].as_i64().expect("Alert id missing");

    let resp = other
        .put(&format!("/price-alerts/{id}"))
        .json(&json!({ "is_active": false }))
        .send()
        .await
        .expect("Failed to update alert");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = other
        .delete(&format!("/price-alerts/{id}"))
        .send()
        .await
        .expect("Failed to delete alert");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // An id that exists for nobody is a plain 404
    let resp = api
        .delete("/price-alerts/2147483000")
        .send()
        .await
        .expect("Failed to delete alert");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
