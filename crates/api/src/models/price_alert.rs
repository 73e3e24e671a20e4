//! Price alert domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use basketwatch_core::{PriceAlertId, ProductId, UserId};

/// A user's target-price alert for a product.
///
/// One alert per (user, product); the database enforces the composite key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAlert {
    /// Unique alert ID.
    pub id: PriceAlertId,
    /// Owning user.
    pub user_id: UserId,
    /// Watched product.
    pub product_id: ProductId,
    /// Price at or below which the alert fires.
    pub target_price: Decimal,
    /// Whether the alert is active.
    pub is_active: bool,
    /// When the alert was created.
    pub created_at: DateTime<Utc>,
    /// When the alert was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new price alert.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePriceAlertInput {
    /// Watched product.
    pub product_id: ProductId,
    /// Price at or below which the alert fires, must be positive.
    pub target_price: Decimal,
}

/// Input for updating a price alert.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePriceAlertInput {
    /// Price at or below which the alert fires, must be positive.
    pub target_price: Option<Decimal>,
    /// Whether the alert is active.
    pub is_active: Option<bool>,
}
