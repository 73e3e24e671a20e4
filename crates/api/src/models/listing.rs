//! Product-market listing domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use basketwatch_core::{ListingId, MarketId, ProductId};

/// A product listed at a market with a price.
///
/// At most one listing exists per (product, market) pair; the database
/// enforces the composite key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Unique listing ID.
    pub id: ListingId,
    /// Product being listed.
    pub product_id: ProductId,
    /// Market carrying the product.
    pub market_id: MarketId,
    /// Current price, currency-agnostic.
    pub price: Decimal,
    /// Optional expiration date of the offer.
    pub expiration_date: Option<NaiveDate>,
    /// Optional calorie count.
    pub calories: Option<f64>,
    /// Whether any user currently favorites this listing.
    pub is_favorite: bool,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A listing with its market's display name, for per-product price views.
///
/// Serializes flat: listing fields and `market_name` at the same level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingWithMarket {
    /// The listing itself.
    #[serde(flatten)]
    pub listing: Listing,
    /// Name of the market carrying it.
    pub market_name: String,
}

/// Input for creating a new listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListingInput {
    /// Product being listed.
    pub product_id: ProductId,
    /// Market carrying the product.
    pub market_id: MarketId,
    /// Price, must be positive.
    pub price: Decimal,
    /// Optional expiration date of the offer.
    pub expiration_date: Option<NaiveDate>,
    /// Optional calorie count.
    pub calories: Option<f64>,
}

/// Input for updating a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateListingInput {
    /// Price, must be positive.
    pub price: Option<Decimal>,
    /// Optional expiration date of the offer.
    pub expiration_date: Option<NaiveDate>,
    /// Optional calorie count.
    pub calories: Option<f64>,
}

/// Filter criteria for listing listings.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Filter by product.
    pub product_id: Option<ProductId>,
    /// Filter by market.
    pub market_id: Option<MarketId>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}
