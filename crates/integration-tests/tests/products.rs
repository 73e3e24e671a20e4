//! Integration tests for the product catalog.
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

/// Test helper: Create a product via API and return its JSON body.
async fn create_test_product(api: &TestApi, body: Value) -> Value {
    let resp = api
        .post("/products")
        .json(&body)
        .send()
        .await
        .expect("Failed to create test product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse product response")
}

// ============================================================================
// CRUD Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_product_crud() {
    let api = TestApi::new();
    let tag = Uuid::new_v4().to_string();

    let product = create_test_product(
        &api,
        json!({
            "name": format!("Test Yogurt {tag}"),
            "brand": "Meadowbrook",
            "barcode": tag,
        }),
    )
    .await;

    let id = product["id"].as_i64().expect("Product id missing");
    assert_eq!(product["brand"], "Meadowbrook");
    assert!(product["category_id"].is_null());

    // Read it back
    let resp = api
        .get(&format!("/products/{id}"))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(fetched["id"].as_i64(), Some(id));
    assert_eq!(fetched["name"], product["name"]);

    // Partial update leaves other fields untouched
    let resp = api
        .put(&format!("/products/{id}"))
        .json(&json!({ "description": "Creamy" }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(updated["description"], "Creamy");
    assert_eq!(updated["brand"], "Meadowbrook");

    // Delete, then confirm it is gone
    let resp = api
        .delete(&format!("/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = api
        .get(&format!("/products/{id}"))
        .send()
        .await
        .expect("Failed to get deleted product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_product_unknown_id_returns_404() {
    let api = TestApi::new();

    let resp = api
        .get("/products/2147483000")
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = api
        .put("/products/2147483000")
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = api
        .delete("/products/2147483000")
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Validation Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_product_create_rejects_blank_name() {
    let api = TestApi::new();

    let resp = api
        .post("/products")
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .expect("Failed to post product");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_product_create_rejects_overlong_name() {
    let api = TestApi::new();

    let resp = api
        .post("/products")
        .json(&json!({ "name": "x".repeat(101) }))
        .send()
        .await
        .expect("Failed to post product");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_product_duplicate_barcode_conflicts() {
    let api = TestApi::new();
    let barcode = Uuid::new_v4().to_string();

    create_test_product(&api, json!({ "name": "First", "barcode": barcode })).await;

    let resp = api
        .post("/products")
        .json(&json!({ "name": "Second", "barcode": barcode }))
        .send()
        .await
        .expect("Failed to post duplicate barcode");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_product_create_with_unknown_category_conflicts() {
    let api = TestApi::new();

    let resp = api
        .post("/products")
        .json(&json!({ "name": "Orphan", "category_id": 2147483000 }))
        .send()
        .await
        .expect("Failed to post product");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// ============================================================================
// List & Filter Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_product_search_and_pagination() {
    let api = TestApi::new();
    let tag = Uuid::new_v4().to_string();

    for n in 1..=3 {
        create_test_product(&api, json!({ "name": format!("Paging {tag} {n}") })).await;
    }

    let resp = api
        .get(&format!("/products?search={tag}&limit=2"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    assert_eq!(page.len(), 2);

    let resp = api
        .get(&format!("/products?search={tag}&skip=2"))
        .send()
        .await
        .expect("Failed to list products");
    let rest: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    assert_eq!(rest.len(), 1);
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_product_search_matches_brand() {
    let api = TestApi::new();
    let brand = format!("Brand-{}", Uuid::new_v4());

    let product = create_test_product(&api, json!({ "name": "Branded Thing", "brand": brand })).await;

    let resp = api
        .get(&format!("/products?search={brand}"))
        .send()
        .await
        .expect("Failed to search products");
    assert_eq!(resp.status(), StatusCode::OK);
    let found: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], product["id"]);
}

// ============================================================================
// Similar Products Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_similar_products_prefers_price_band_and_keywords() {
    let api = TestApi::new();
    let tag = &Uuid::new_v4().to_string()[..8];

    // Three products in the seeded Dairy category (id 1). Source sells at
    // 10.00, one peer inside the 8.00..12.00 band sharing a name keyword,
    // one peer priced far outside it.
    let source = create_test_product(
        &api,
        json!({ "name": format!("Cheddar{tag} Wedge"), "category_id": 1 }),
    )
    .await;
    let close = create_test_product(
        &api,
        json!({ "name": format!("Cheddar{tag} Block"), "category_id": 1 }),
    )
    .await;
    let expensive = create_test_product(
        &api,
        json!({ "name": format!("Cheddar{tag} Cave-Aged"), "category_id": 1 }),
    )
    .await;

    for (product, price) in [(&source, 10.00), (&close, 11.00), (&expensive, 50.00)] {
        let resp = api
            .post("/listings")
            .json(&json!({ "product_id": product["id"], "market_id": 1, "price": price }))
            .send()
            .await
            .expect("Failed to create listing");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let source_id = source["id"].as_i64().expect("Product id missing");
    let resp = api
        .get(&format!("/products/{source_id}/similar"))
        .send()
        .await
        .expect("Failed to get similar products");
    assert_eq!(resp.status(), StatusCode::OK);
    let similar: Vec<Value> = resp.json().await.expect("Failed to parse similar products");

    // The in-band keyword match ranks first; the out-of-band peer may only
    // show up via the same-category back-fill.
    assert_eq!(similar[0]["id"], close["id"]);
    assert!(similar.iter().all(|p| p["id"] != source["id"]));
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_similar_products_unknown_product_returns_404() {
    let api = TestApi::new();

    let resp = api
        .get("/products/2147483000/similar")
        .send()
        .await
        .expect("Failed to get similar products");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running api server and seeded database"]
async fn test_similar_products_without_category_is_empty() {
    let api = TestApi::new();

    let product = create_test_product(&api, json!({ "name": "Uncategorized Thing" })).await;
    let id = product["id"].as_i64().expect("Product id missing");

    let resp = api
        .get(&format!("/products/{id}/similar"))
        .send()
        .await
        .expect("Failed to get similar products");
    assert_eq!(resp.status(), StatusCode::OK);
    let similar: Vec<Value> = resp.json().await.expect("Failed to parse similar products");
    assert!(similar.is_empty());
}
