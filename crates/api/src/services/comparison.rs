//! Market price comparison over a shopping list.
//!
//! Given a list of (product, quantity) items, find every market stocking at
//! least one of those products and rank the markets by the subtotal of the
//! items they carry. Items a market doesn't carry are skipped, not priced at
//! zero, and the coverage counters report how much of the list each market
//! matched.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use basketwatch_core::{MarketId, ProductId, ShoppingListId};

use crate::db::{ListingRepository, RepositoryError, ShoppingListRepository};
use crate::models::comparison::{
    ComparisonItem, ListItemWithProduct, MarketComparison, MarketOffer,
};

/// Service computing market comparisons for shopping lists.
pub struct ComparisonService<'a> {
    pool: &'a PgPool,
}

impl<'a> ComparisonService<'a> {
    /// Create a new comparison service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Rank every market stocking at least one of the list's products.
    ///
    /// The caller is responsible for checking that the list exists and that
    /// the requester owns it. A list with no items produces an empty ranking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if loading items or offers fails.
    #[instrument(skip(self), fields(list_id = %list_id))]
    pub async fn compare_list(
        &self,
        list_id: ShoppingListId,
    ) -> Result<Vec<MarketComparison>, RepositoryError> {
        let items = ShoppingListRepository::new(self.pool)
            .items_with_product_names(list_id)
            .await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();
        let offers = ListingRepository::new(self.pool)
            .market_offers_for_products(&product_ids)
            .await?;

        Ok(rank_markets(&items, &offers))
    }
}

/// Rank markets by the subtotal of the list items they stock.
///
/// For each market appearing in `offers`, the subtotal accumulates
/// `price × quantity` over the items the market carries; items it doesn't
/// carry contribute nothing. Markets matching zero items are dropped.
/// The result is sorted by subtotal ascending, ties broken by market id
/// ascending, and each entry's line items follow the list's item order.
#[must_use]
pub fn rank_markets(
    items: &[ListItemWithProduct],
    offers: &[MarketOffer],
) -> Vec<MarketComparison> {
    // Group offers per market: market id -> (name, product -> unit price).
    // Offer rows are unique per (market, product) thanks to the listings
    // uniqueness constraint.
    let mut markets: BTreeMap<MarketId, (String, HashMap<ProductId, Decimal>)> = BTreeMap::new();
    for offer in offers {
        let (_, prices) = markets
            .entry(offer.market_id)
            .or_insert_with(|| (offer.market_name.clone(), HashMap::new()));
        prices.insert(offer.product_id, offer.price);
    }

    let mut comparisons: Vec<MarketComparison> = Vec::with_capacity(markets.len());
    for (market_id, (market_name, prices)) in markets {
        let mut total_price = Decimal::ZERO;
        let mut matched: Vec<ComparisonItem> = Vec::new();

        for item in items {
            let Some(&price) = prices.get(&item.product_id) else {
                continue;
            };
            total_price += price * Decimal::from(item.quantity.as_i32());
            matched.push(ComparisonItem {
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                price,
                quantity: item.quantity.as_i32(),
            });
        }

        if matched.is_empty() {
            continue;
        }

        comparisons.push(MarketComparison {
            market_id,
            market_name,
            total_price,
            found_products: matched.len(),
            total_products: items.len(),
            items: matched,
        });
    }

    comparisons.sort_by(|a, b| {
        a.total_price
            .cmp(&b.total_price)
            .then_with(|| a.market_id.cmp(&b.market_id))
    });

    comparisons
}

#[cfg(test)]
mod tests {
    use basketwatch_core::Quantity;

    use super::*;

    fn item(product_id: i32, name: &str, quantity: i32) -> ListItemWithProduct {
        ListItemWithProduct {
            product_id: ProductId::new(product_id),
            product_name: name.to_string(),
            quantity: Quantity::new(quantity).unwrap(),
        }
    }

    fn offer(market_id: i32, market_name: &str, product_id: i32, price: &str) -> MarketOffer {
        MarketOffer {
            market_id: MarketId::new(market_id),
            market_name: market_name.to_string(),
            product_id: ProductId::new(product_id),
            price: price.parse().unwrap(),
        }
    }

    fn price(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_list_yields_no_markets() {
        assert!(rank_markets(&[], &[]).is_empty());
        // Even offers on the table can't produce a ranking without items.
        assert!(rank_markets(&[], &[offer(1, "Alpha", 1, "2.00")]).is_empty());
    }

    #[test]
    fn test_no_market_stocks_any_item() {
        let items = vec![item(1, "Milk", 2), item(2, "Bread", 1)];
        assert!(rank_markets(&items, &[]).is_empty());
    }

    #[test]
    fn test_partial_match_subtotal_and_coverage() {
        let items = vec![item(1, "Milk", 2), item(2, "Bread", 1)];
        let offers = vec![offer(7, "Corner Shop", 1, "3.00")];

        let ranked = rank_markets(&items, &offers);

        assert_eq!(ranked.len(), 1);
        let entry = &ranked[0];
        assert_eq!(entry.market_id, MarketId::new(7));
        assert_eq!(entry.market_name, "Corner Shop");
        assert_eq!(entry.total_price, price("6.00"));
        assert_eq!(entry.found_products, 1);
        assert_eq!(entry.total_products, 2);
        assert_eq!(
            entry.items,
            vec![ComparisonItem {
                product_id: ProductId::new(1),
                product_name: "Milk".to_string(),
                price: price("3.00"),
                quantity: 2,
            }]
        );
    }

    #[test]
    fn test_markets_ranked_by_subtotal_ascending() {
        let items = vec![item(1, "Milk", 3)];
        // Market 1 is more expensive than market 2, so id order and price
        // order disagree.
        let offers = vec![
            offer(1, "Alpha", 1, "2.00"),
            offer(2, "Bravo", 1, "1.50"),
        ];

        let ranked = rank_markets(&items, &offers);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].market_name, "Bravo");
        assert_eq!(ranked[0].total_price, price("4.50"));
        assert_eq!(ranked[1].market_name, "Alpha");
        assert_eq!(ranked[1].total_price, price("6.00"));
    }

    #[test]
    fn test_equal_subtotals_break_ties_by_market_id() {
        let items = vec![item(1, "Milk", 1)];
        // Deliver the higher id first so input order can't mask the rule.
        let offers = vec![
            offer(9, "Zulu", 1, "5.00"),
            offer(3, "Charlie", 1, "5.00"),
        ];

        let ranked = rank_markets(&items, &offers);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].market_id, MarketId::new(3));
        assert_eq!(ranked[1].market_id, MarketId::new(9));
    }

    #[test]
    fn test_zero_coverage_market_excluded() {
        let items = vec![item(1, "Milk", 1)];
        // Market 5's only offer is for a product outside the list.
        let offers = vec![
            offer(2, "Bravo", 1, "2.50"),
            offer(5, "Echo", 99, "0.10"),
        ];

        let ranked = rank_markets(&items, &offers);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].market_id, MarketId::new(2));
    }

    #[test]
    fn test_line_items_follow_list_order() {
        let items = vec![item(3, "Eggs", 1), item(1, "Milk", 2), item(2, "Bread", 1)];
        let offers = vec![
            offer(4, "Delta", 1, "1.00"),
            offer(4, "Delta", 2, "2.00"),
            offer(4, "Delta", 3, "3.00"),
        ];

        let ranked = rank_markets(&items, &offers);

        assert_eq!(ranked.len(), 1);
        let names: Vec<&str> = ranked[0]
            .items
            .iter()
            .map(|i| i.product_name.as_str())
            .collect();
        assert_eq!(names, vec!["Eggs", "Milk", "Bread"]);
        assert_eq!(ranked[0].total_price, price("7.00"));
        assert_eq!(ranked[0].found_products, 3);
    }

    #[test]
    fn test_idempotent_over_unchanged_input() {
        let items = vec![item(1, "Milk", 2), item(2, "Bread", 1)];
        let offers = vec![
            offer(1, "Alpha", 1, "2.00"),
            offer(1, "Alpha", 2, "1.00"),
            offer(2, "Bravo", 1, "1.75"),
        ];

        let first = rank_markets(&items, &offers);
        let second = rank_markets(&items, &offers);

        assert_eq!(first, second);
    }

    #[test]
    fn test_repeated_product_counts_per_item() {
        // The same product twice on a list is two items, both matched.
        let items = vec![item(1, "Milk", 1), item(1, "Milk", 2)];
        let offers = vec![offer(1, "Alpha", 1, "2.00")];

        let ranked = rank_markets(&items, &offers);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].total_price, price("6.00"));
        assert_eq!(ranked[0].found_products, 2);
        assert_eq!(ranked[0].total_products, 2);
    }
}
