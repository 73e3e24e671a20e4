//! Product route handlers.
//!
//! Catalog CRUD plus the per-product views: listings across markets, price
//! history and similar products.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use basketwatch_core::{CategoryId, ProductId};

use crate::db::{ListingRepository, PriceHistoryRepository, ProductRepository, RepositoryError};
use crate::error::ApiError;
use crate::models::listing::ListingWithMarket;
use crate::models::price_history::PriceHistoryEntry;
use crate::models::product::{CreateProductInput, Product, ProductFilter, UpdateProductInput};
use crate::services::{DEFAULT_SIMILAR_LIMIT, SimilarProductsService};
use crate::state::AppState;

/// Build the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/listings", get(list_product_listings))
        .route("/products/{id}/price-history", get(list_price_history))
        .route("/products/{id}/similar", get(list_similar_products))
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the product list.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category_id: Option<CategoryId>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for the price history view.
#[derive(Debug, Deserialize)]
pub struct PriceHistoryQuery {
    pub days: Option<i32>,
}

/// Query parameters for the similar-products view.
#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub limit: Option<usize>,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Create a product.
///
/// POST /products
async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_name(&input.name)?;

    let product = ProductRepository::new(state.pool()).create(&input).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// List products with optional filters.
///
/// GET /products
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let filter = ProductFilter {
        category_id: query.category_id,
        search: query.search,
        min_price: query.min_price,
        max_price: query.max_price,
        limit: query.limit,
        offset: query.skip,
    };

    let products = ProductRepository::new(state.pool()).list(&filter).await?;

    Ok(Json(products))
}

/// Fetch a product.
///
/// GET /products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, ApiError> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_string()))?;

    Ok(Json(product))
}

/// Partially update a product.
///
/// PUT /products/{id}
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>, ApiError> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &input)
        .await
        .map_err(product_not_found)?;

    Ok(Json(product))
}

/// Delete a product and everything referencing it.
///
/// DELETE /products/{id}
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("product not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// A product's per-market listings, cheapest first.
///
/// GET /products/{id}/listings
async fn list_product_listings(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ListingWithMarket>>, ApiError> {
    let product_id = ProductId::new(id);
    ensure_product_exists(state.pool(), product_id).await?;

    let listings = ListingRepository::new(state.pool())
        .list_for_product(product_id)
        .await?;

    Ok(Json(listings))
}

/// A product's recorded price points within the last `days` days.
///
/// GET /products/{id}/price-history
async fn list_price_history(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PriceHistoryQuery>,
) -> Result<Json<Vec<PriceHistoryEntry>>, ApiError> {
    let product_id = ProductId::new(id);
    ensure_product_exists(state.pool(), product_id).await?;

    let days = query.days.unwrap_or(30);
    let history = PriceHistoryRepository::new(state.pool())
        .list_for_product(product_id, days)
        .await?;

    Ok(Json(history))
}

/// Products similar to the given one.
///
/// GET /products/{id}/similar
async fn list_similar_products(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<SimilarQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_SIMILAR_LIMIT);

    let similar = SimilarProductsService::new(state.pool())
        .similar_to(ProductId::new(id), limit)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_string()))?;

    Ok(Json(similar))
}

// =============================================================================
// Helpers
// =============================================================================

/// Validate a product name: non-blank, at most 100 characters.
fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if name.chars().count() > 100 {
        return Err(ApiError::BadRequest(
            "name must be at most 100 characters".to_string(),
        ));
    }
    Ok(())
}

/// 404 unless the product exists.
async fn ensure_product_exists(pool: &PgPool, id: ProductId) -> Result<(), ApiError> {
    let product = ProductRepository::new(pool).get(id).await?;
    if product.is_none() {
        return Err(ApiError::NotFound("product not found".to_string()));
    }
    Ok(())
}

/// Map a repository miss to a product-specific 404.
fn product_not_found(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::NotFound => ApiError::NotFound("product not found".to_string()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_rejects_blank() {
        assert!(validate_name("Milk").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn test_validate_name_rejects_over_100_chars() {
        let long = "x".repeat(101);
        assert!(validate_name(&long).is_err());
        assert!(validate_name(&"x".repeat(100)).is_ok());
    }
}
