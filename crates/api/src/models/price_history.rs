//! Price history domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use basketwatch_core::{MarketId, PriceHistoryId, ProductId};

/// A price snapshot, recorded when a listing is created or its price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    /// Unique entry ID.
    pub id: PriceHistoryId,
    /// Product the price belongs to.
    pub product_id: ProductId,
    /// Market the price was observed at.
    pub market_id: MarketId,
    /// Observed price.
    pub price: Decimal,
    /// When the price was recorded.
    pub recorded_at: DateTime<Utc>,
}
