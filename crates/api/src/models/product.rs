//! Product domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use basketwatch_core::{CategoryId, ProductId};

/// A catalog product. Prices live on per-market listings, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Optional brand name.
    pub brand: Option<String>,
    /// Optional EAN/UPC barcode, unique when present.
    pub barcode: Option<String>,
    /// Optional image URL.
    pub image_url: Option<String>,
    /// Category the product belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    /// Display name.
    pub name: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Optional brand name.
    pub brand: Option<String>,
    /// Optional EAN/UPC barcode.
    pub barcode: Option<String>,
    /// Optional image URL.
    pub image_url: Option<String>,
    /// Category the product belongs to, if any.
    pub category_id: Option<CategoryId>,
}

/// Input for updating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductInput {
    /// Display name.
    pub name: Option<String>,
    /// Optional long description.
    pub description: Option<String>,
    /// Optional brand name.
    pub brand: Option<String>,
    /// Optional EAN/UPC barcode.
    pub barcode: Option<String>,
    /// Optional image URL.
    pub image_url: Option<String>,
    /// Category the product belongs to.
    pub category_id: Option<CategoryId>,
}

/// Filter criteria for listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Filter by category.
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring match against name, brand or barcode.
    pub search: Option<String>,
    /// Only products with at least one listing priced at or above this.
    pub min_price: Option<Decimal>,
    /// Only products with at least one listing priced at or below this.
    pub max_price: Option<Decimal>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}
