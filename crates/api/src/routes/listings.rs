//! Listing route handlers.
//!
//! Listings tie a product to a market at a price. Creates and price changes
//! append to the product's price history as a side effect.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use basketwatch_core::{ListingId, MarketId, ProductId};

use crate::db::{ListingRepository, PriceHistoryRepository, RepositoryError};
use crate::error::ApiError;
use crate::models::listing::{CreateListingInput, Listing, ListingFilter, UpdateListingInput};
use crate::state::AppState;

/// Build the listing router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/listings", get(list_listings).post(create_listing))
        .route(
            "/listings/{id}",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the listing list.
#[derive(Debug, Deserialize)]
pub struct ListingsQuery {
    pub product_id: Option<ProductId>,
    pub market_id: Option<MarketId>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Create a listing and record its opening price.
///
/// POST /listings
async fn create_listing(
    State(state): State<AppState>,
    Json(input): Json<CreateListingInput>,
) -> Result<(StatusCode, Json<Listing>), ApiError> {
    validate_price(input.price)?;

    let listing = ListingRepository::new(state.pool()).create(&input).await?;
    PriceHistoryRepository::new(state.pool())
        .record(listing.product_id, listing.market_id, listing.price)
        .await?;

    Ok((StatusCode::CREATED, Json(listing)))
}

/// List listings, optionally scoped to a product or market.
///
/// GET /listings
async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingsQuery>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let filter = ListingFilter {
        product_id: query.product_id,
        market_id: query.market_id,
        limit: query.limit,
        offset: query.skip,
    };

    let listings = ListingRepository::new(state.pool()).list(&filter).await?;

    Ok(Json(listings))
}

/// Fetch a listing.
///
/// GET /listings/{id}
async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Listing>, ApiError> {
    let listing = ListingRepository::new(state.pool())
        .get(ListingId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("listing not found".to_string()))?;

    Ok(Json(listing))
}

/// Partially update a listing; a price change appends to price history.
///
/// PUT /listings/{id}
async fn update_listing(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateListingInput>,
) -> Result<Json<Listing>, ApiError> {
    if let Some(price) = input.price {
        validate_price(price)?;
    }

    let repo = ListingRepository::new(state.pool());
    let before = repo
        .get(ListingId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("listing not found".to_string()))?;

    let listing = repo
        .update(ListingId::new(id), &input)
        .await
        .map_err(listing_not_found)?;

    if listing.price != before.price {
        PriceHistoryRepository::new(state.pool())
            .record(listing.product_id, listing.market_id, listing.price)
            .await?;
    }

    Ok(Json(listing))
}

/// Delete a listing.
///
/// DELETE /listings/{id}
async fn delete_listing(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let deleted = ListingRepository::new(state.pool())
        .delete(ListingId::new(id))
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("listing not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

/// Validate a listing price: strictly positive.
fn validate_price(price: Decimal) -> Result<(), ApiError> {
    if price <= Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "price must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Map a repository miss to a listing-specific 404.
fn listing_not_found(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::NotFound => ApiError::NotFound("listing not found".to_string()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_price_requires_positive() {
        assert!(validate_price("0.01".parse().unwrap()).is_ok());
        assert!(validate_price(Decimal::ZERO).is_err());
        assert!(validate_price("-1.50".parse().unwrap()).is_err());
    }
}
