//! Database operations for recorded price points.
//!
//! A row is appended whenever a listing is created or its price changes,
//! so the table is insert-only from the application's point of view.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use basketwatch_core::{MarketId, PriceHistoryId, ProductId};

use super::RepositoryError;
use crate::models::price_history::PriceHistoryEntry;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for price history queries.
#[derive(Debug, sqlx::FromRow)]
struct PriceHistoryRow {
    id: i32,
    product_id: i32,
    market_id: i32,
    price: Decimal,
    recorded_at: DateTime<Utc>,
}

impl From<PriceHistoryRow> for PriceHistoryEntry {
    fn from(row: PriceHistoryRow) -> Self {
        Self {
            id: PriceHistoryId::new(row.id),
            product_id: ProductId::new(row.product_id),
            market_id: MarketId::new(row.market_id),
            price: row.price,
            recorded_at: row.recorded_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for price history database operations.
pub struct PriceHistoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PriceHistoryRepository<'a> {
    /// Create a new price history repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a price point for a (product, market) pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(
        &self,
        product_id: ProductId,
        market_id: MarketId,
        price: Decimal,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO price_history (product_id, market_id, price)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(product_id.as_i32())
        .bind(market_id.as_i32())
        .bind(price)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List a product's price points within the last `days` days, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
        days: i32,
    ) -> Result<Vec<PriceHistoryEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, PriceHistoryRow>(
            r"
            SELECT id, product_id, market_id, price, recorded_at
            FROM price_history
            WHERE
                product_id = $1
                AND recorded_at >= NOW() - make_interval(days => $2::int)
            ORDER BY recorded_at DESC, id DESC
            ",
        )
        .bind(product_id.as_i32())
        .bind(days)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
