//! Database operations for product-market listings.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use basketwatch_core::{ListingId, MarketId, ProductId};

use super::RepositoryError;
use crate::models::comparison::MarketOffer;
use crate::models::listing::{
    CreateListingInput, Listing, ListingFilter, ListingWithMarket, UpdateListingInput,
};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for listing queries.
#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id: i32,
    product_id: i32,
    market_id: i32,
    price: Decimal,
    expiration_date: Option<NaiveDate>,
    calories: Option<f64>,
    is_favorite: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Self {
            id: ListingId::new(row.id),
            product_id: ProductId::new(row.product_id),
            market_id: MarketId::new(row.market_id),
            price: row.price,
            expiration_date: row.expiration_date,
            calories: row.calories,
            is_favorite: row.is_favorite,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for listings joined with market names.
#[derive(Debug, sqlx::FromRow)]
struct ListingWithMarketRow {
    id: i32,
    product_id: i32,
    market_id: i32,
    price: Decimal,
    expiration_date: Option<NaiveDate>,
    calories: Option<f64>,
    is_favorite: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    market_name: String,
}

impl From<ListingWithMarketRow> for ListingWithMarket {
    fn from(row: ListingWithMarketRow) -> Self {
        Self {
            listing: Listing {
                id: ListingId::new(row.id),
                product_id: ProductId::new(row.product_id),
                market_id: MarketId::new(row.market_id),
                price: row.price,
                expiration_date: row.expiration_date,
                calories: row.calories,
                is_favorite: row.is_favorite,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            market_name: row.market_name,
        }
    }
}

/// Internal row type for comparator offer loading.
#[derive(Debug, sqlx::FromRow)]
struct MarketOfferRow {
    market_id: i32,
    market_name: String,
    product_id: i32,
    price: Decimal,
}

impl From<MarketOfferRow> for MarketOffer {
    fn from(row: MarketOfferRow) -> Self {
        Self {
            market_id: MarketId::new(row.market_id),
            market_name: row.market_name,
            product_id: ProductId::new(row.product_id),
            price: row.price,
        }
    }
}

/// Map constraint violations on listing writes to `Conflict`.
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.constraint() == Some("product_listings_product_market_key") {
            return RepositoryError::Conflict(
                "listing already exists for this product and market".to_string(),
            );
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict("product or market does not exist".to_string());
        }
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for listing database operations.
pub struct ListingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ListingRepository<'a> {
    /// Create a new listing repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a listing for the (product,
    /// market) pair already exists or a referenced row is missing.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &CreateListingInput) -> Result<Listing, RepositoryError> {
        let row = sqlx::query_as::<_, ListingRow>(
            r"
            INSERT INTO product_listings (product_id, market_id, price, expiration_date, calories)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, product_id, market_id, price, expiration_date, calories,
                is_favorite, created_at, updated_at
            ",
        )
        .bind(input.product_id.as_i32())
        .bind(input.market_id.as_i32())
        .bind(input.price)
        .bind(input.expiration_date)
        .bind(input.calories)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    /// Get a listing by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ListingId) -> Result<Option<Listing>, RepositoryError> {
        let row = sqlx::query_as::<_, ListingRow>(
            r"
            SELECT
                id, product_id, market_id, price, expiration_date, calories,
                is_favorite, created_at, updated_at
            FROM product_listings
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List listings with filtering.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, RepositoryError> {
        let limit = filter.limit.unwrap_or(100);
        let offset = filter.offset.unwrap_or(0);

        let rows = sqlx::query_as::<_, ListingRow>(
            r"
            SELECT
                id, product_id, market_id, price, expiration_date, calories,
                is_favorite, created_at, updated_at
            FROM product_listings
            WHERE
                ($1::int IS NULL OR product_id = $1)
                AND ($2::int IS NULL OR market_id = $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(filter.product_id.map(|id| id.as_i32()))
        .bind(filter.market_id.map(|id| id.as_i32()))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List a product's listings with market names, cheapest first.
    ///
    /// This is the price-across-markets view for a product page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ListingWithMarket>, RepositoryError> {
        let rows = sqlx::query_as::<_, ListingWithMarketRow>(
            r"
            SELECT
                l.id, l.product_id, l.market_id, l.price, l.expiration_date,
                l.calories, l.is_favorite, l.created_at, l.updated_at,
                m.name AS market_name
            FROM product_listings l
            INNER JOIN markets m ON m.id = l.market_id
            WHERE l.product_id = $1
            ORDER BY l.price ASC, l.market_id ASC
            ",
        )
        .bind(product_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update a listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the listing doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ListingId,
        input: &UpdateListingInput,
    ) -> Result<Listing, RepositoryError> {
        let row = sqlx::query_as::<_, ListingRow>(
            r"
            UPDATE product_listings
            SET
                price = COALESCE($2, price),
                expiration_date = COALESCE($3, expiration_date),
                calories = COALESCE($4, calories),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, product_id, market_id, price, expiration_date, calories,
                is_favorite, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(input.price)
        .bind(input.expiration_date)
        .bind(input.calories)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a listing.
    ///
    /// # Returns
    ///
    /// Returns `true` if the listing was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ListingId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM product_listings
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Load every market offer for any of the given products, joined with
    /// market names.
    ///
    /// This is the comparator's working set: one row per (market, product)
    /// listing. Markets carrying none of the products produce no rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn market_offers_for_products(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<MarketOffer>, RepositoryError> {
        let ids: Vec<i32> = product_ids.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, MarketOfferRow>(
            r"
            SELECT
                l.market_id, m.name AS market_name, l.product_id, l.price
            FROM product_listings l
            INNER JOIN markets m ON m.id = l.market_id
            WHERE l.product_id = ANY($1)
            ORDER BY l.market_id, l.product_id
            ",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
