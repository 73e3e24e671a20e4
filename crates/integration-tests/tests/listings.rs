//! Integration tests for per-market listings and price history.
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
        .json(&json!({ "name": format!("Listed {}", Uuid::new_v4()) }))
        .send()
        .await
        .expect("Failed to create test product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = resp.json().await.expect("Failed to parse product");
    product["id"].as_i64().expect("Product id missing")
}

/// Test helper: Create a listing and return its JSON body.
async fn create_test_listing(api: &TestApi, product_id: i64, market_id: i64, price: f64) -> Value {
    let resp = api
        .post("/listings")
        .json(&json!({ "product_id": product_id, "market_id": market_id, "price": price }))
        .send()
        .await
        .expect("Failed to create test listing");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse listing")
}

// ============================================================================
// CRUD Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_listing_crud() {
    let api = TestApi::new();
    let product_id = create_test_product(&api).await;

    let listing = create_test_listing(&api, product_id, 1, 4.20).await;
    let id = listing["id"].as_i64().expect("Listing id missing");
    assert_eq!(listing["product_id"].as_i64(), Some(product_id));
    assert_eq!(listing["is_favorite"], false);

    let resp = api
        .get(&format!("/listings/{id}"))
        .send()
        .await
        .expect("Failed to get listing");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = api
        .put(&format!("/listings/{id}"))
        .json(&json!({ "price": 3.99, "calories": 250.0 }))
        .send()
        .await
        .expect("Failed to update listing");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse listing");
    assert_eq!(updated["price"].as_f64(), Some(3.99));
    assert_eq!(updated["calories"].as_f64(), Some(250.0));

    let resp = api
        .delete(&format!("/listings/{id}"))
        .send()
        .await
        .expect("Failed to delete listing");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = api
        .get(&format!("/listings/{id}"))
        .send()
        .await
        .expect("Failed to get deleted listing");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Validation & Conflict Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_listing_rejects_nonpositive_price() {
    let api = TestApi::new();
    let product_id = create_test_product(&api).await;

    for price in [0.0, -1.50] {
        let resp = api
            .post("/listings")
            .json(&json!({ "product_id": product_id, "market_id": 1, "price": price }))
            .send()
            .await
            .expect("Failed to post listing");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_listing_duplicate_product_market_conflicts() {
    let api = TestApi::new();
    let product_id = create_test_product(&api).await;

    create_test_listing(&api, product_id, 1, 2.50).await;

    let resp = api
        .post("/listings")
        .json(&json!({ "product_id": product_id, "market_id": 1, "price": 2.60 }))
        .send()
        .await
        .expect("Failed to post duplicate listing");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_listing_unknown_product_conflicts() {
    let api = TestApi::new();

    let resp = api
        .post("/listings")
        .json(&json!({ "product_id": 2147483000, "market_id": 1, "price": 2.50 }))
        .send()
        .await
        .expect("Failed to post listing");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// ============================================================================
// List & Filter Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_listings_filter_by_product() {
    let api = TestApi::new();
    let product_id = create_test_product(&api).await;

    create_test_listing(&api, product_id, 1, 5.00).await;
    create_test_listing(&api, product_id, 2, 4.75).await;

    let resp = api
        .get(&format!("/listings?product_id={product_id}"))
        .send()
        .await
        .expect("Failed to list listings");
    assert_eq!(resp.status(), StatusCode::OK);
    let listings: Vec<Value> = resp.json().await.expect("Failed to parse listings");
    assert_eq!(listings.len(), 2);
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_product_listings_sorted_by_price() {
    let api = TestApi::new();
    let product_id = create_test_product(&api).await;

    create_test_listing(&api, product_id, 1, 5.00).await;
    create_test_listing(&api, product_id, 2, 4.75).await;
    create_test_listing(&api, product_id, 3, 6.10).await;

    let resp = api
        .get(&format!("/products/{product_id}/listings"))
        .send()
        .await
        .expect("Failed to list product listings");
    assert_eq!(resp.status(), StatusCode::OK);
    let listings: Vec<Value> = resp.json().await.expect("Failed to parse listings");

    assert_eq!(listings.len(), 3);
    let prices: Vec<f64> = listings
        .iter()
        .map(|l| l["price"].as_f64().expect("Price missing"))
        .collect();
    assert_eq!(prices, vec![4.75, 5.00, 6.10]);
    assert!(listings[0]["market_name"].is_string());
}

// ============================================================================
// Price History Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_price_history_tracks_price_changes() {
    let api = TestApi::new();
    let product_id = create_test_product(&api).await;

    let listing = create_test_listing(&api, product_id, 1, 3.00).await;
    let listing_id = listing["id"].as_i64().expect("Listing id missing");

    // A price change appends a history row; a non-price update does not.
    let resp = api
        .put(&format!("/listings/{listing_id}"))
        .json(&json!({ "price": 3.25 }))
        .send()
        .await
        .expect("Failed to update price");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = api
        .put(&format!("/listings/{listing_id}"))
        .json(&json!({ "calories": 120.0 }))
        .send()
        .await
        .expect("Failed to update calories");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = api
        .get(&format!("/products/{product_id}/price-history"))
        .send()
        .await
        .expect("Failed to get price history");
    assert_eq!(resp.status(), StatusCode::OK);
    let history: Vec<Value> = resp.json().await.expect("Failed to parse history");

    assert_eq!(history.len(), 2);
    // Newest first
    assert_eq!(history[0]["price"].as_f64(), Some(3.25));
    assert_eq!(history[1]["price"].as_f64(), Some(3.00));
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_price_history_unknown_product_returns_404() {
    let api = TestApi::new();

    let resp = api
        .get("/products/2147483000/price-history")
        .send()
        .await
        .expect("Failed to get price history");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
