//! Market price comparison models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use basketwatch_core::{MarketId, ProductId, Quantity};

/// A shopping-list item joined with its product's display name.
#[derive(Debug, Clone)]
pub struct ListItemWithProduct {
    /// Product to buy.
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// Desired quantity.
    pub quantity: Quantity,
}

/// One market's price for one product, joined with the market's name.
#[derive(Debug, Clone)]
pub struct MarketOffer {
    /// Market carrying the product.
    pub market_id: MarketId,
    /// Market display name.
    pub market_name: String,
    /// Product on offer.
    pub product_id: ProductId,
    /// Listed price.
    pub price: Decimal,
}

/// A matched line item within one market's comparison entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonItem {
    /// Product matched at the market.
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// Unit price at the market.
    pub price: Decimal,
    /// Desired quantity from the list.
    pub quantity: i32,
}

/// One market's entry in the ranked comparison result.
///
/// `total_price` sums only the items the market stocks; `found_products` /
/// `total_products` tell the caller how complete that subtotal is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketComparison {
    /// Market identity.
    pub market_id: MarketId,
    /// Market display name.
    pub market_name: String,
    /// Sum of price x quantity over matched items only.
    pub total_price: Decimal,
    /// Matched line items for display.
    pub items: Vec<ComparisonItem>,
    /// Number of list items matched at this market.
    pub found_products: usize,
    /// Total number of items in the list.
    pub total_products: usize,
}
