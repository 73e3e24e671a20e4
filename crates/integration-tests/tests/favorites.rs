//! Integration tests for listing favorites.
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

/// Test helper: Create a product with one listing, returning the listing id.
async fn create_test_listing(api: &TestApi) -> i64 {
    let resp = api
        .post("/products")
        .json(&json!({ "name": format!("Favoritable {}", Uuid::new_v4()) }))
        .send()
        .await
        .expect("Failed to create test product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = resp.json().await.expect("Failed to parse product");

    let resp = api
        .post("/listings")
        .json(&json!({ "product_id": product["id"], "market_id": 1, "price": 2.99 }))
        .send()
        .await
        .expect("Failed to create test listing");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let listing: Value = resp.json().await.expect("Failed to parse listing");
    listing["id"].as_i64().expect("Listing id missing")
}

// ============================================================================
// Toggle Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_favorite_toggle_roundtrip() {
    let api = TestApi::new();
    let listing_id = create_test_listing(&api).await;

    // First toggle creates the favorite
    let resp = api
        .post(&format!("/favorites/toggle/{listing_id}"))
        .send()
        .await
        .expect("Failed to toggle favorite");
    assert_eq!(resp.status(), StatusCode::OK);
    let favorite: Value = resp.json().await.expect("Failed to parse favorite");
    assert_eq!(favorite["listing_id"].as_i64(), Some(listing_id));
    assert_eq!(favorite["user_id"].as_i64(), Some(1));

    // The listing reflects it
    let resp = api
        .get(&format!("/listings/{listing_id}"))
        .send()
        .await
        .expect("Failed to get listing");
    let listing: Value = resp.json().await.expect("Failed to parse listing");
    assert_eq!(listing["is_favorite"], true);

    // Second toggle removes it and returns null
    let resp = api
        .post(&format!("/favorites/toggle/{listing_id}"))
        .send()
        .await
        .expect("Failed to toggle favorite off");
    assert_eq!(resp.status(), StatusCode::OK);
    let removed: Value = resp.json().await.expect("Failed to parse toggle response");
    assert!(removed.is_null());

    let resp = api
        .get(&format!("/listings/{listing_id}"))
        .send()
        .await
        .expect("Failed to get listing");
    let listing: Value = resp.json().await.expect("Failed to parse listing");
    assert_eq!(listing["is_favorite"], false);
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_favorite_unknown_listing_returns_404() {
    let api = TestApi::new();

    let resp = api
        .post("/favorites/toggle/2147483000")
        .send()
        .await
        .expect("Failed to toggle favorite");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_favorites_are_scoped_per_user() {
    let api = TestApi::new();
    let other = TestApi::as_user(2);
    let listing_id = create_test_listing(&api).await;

    let resp = api
        .post(&format!("/favorites/toggle/{listing_id}"))
        .send()
        .await
        .expect("Failed to toggle favorite");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = api
        .get("/favorites")
        .send()
        .await
        .expect("Failed to list favorites");
    assert_eq!(resp.status(), StatusCode::OK);
    let mine: Vec<Value> = resp.json().await.expect("Failed to parse favorites");
    assert!(mine.iter().any(|f| f["listing_id"].as_i64() == Some(listing_id)));

    let resp = other
        .get("/favorites")
        .send()
        .await
        .expect("Failed to list favorites");
    assert_eq!(resp.status(), StatusCode::OK);
    let theirs: Vec<Value> = resp.json().await.expect("Failed to parse favorites");
    assert!(theirs.iter().all(|f| f["listing_id"].as_i64() != Some(listing_id)));

    // Clean up so reruns start from a known state
    let resp = api
        .post(&format!("/favorites/toggle/{listing_id}"))
        .send()
        .await
        .expect("Failed to toggle favorite off");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_favorites_require_authentication() {
    let api = TestApi::new();

    let resp = api
        .get_unauthenticated("/favorites")
        .send()
        .await
        .expect("Failed to request favorites");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
