//! Database operations for catalog products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use basketwatch_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::product::{CreateProductInput, Product, ProductFilter, UpdateProductInput};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    brand: Option<String>,
    barcode: Option<String>,
    image_url: Option<String>,
    category_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            brand: row.brand,
            barcode: row.barcode,
            image_url: row.image_url,
            category_id: row.category_id.map(CategoryId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Map constraint violations on product writes to `Conflict`.
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.constraint() == Some("products_barcode_key") {
            return RepositoryError::Conflict("barcode already in use".to_string());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict("category does not exist".to_string());
        }
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the barcode is already in use
    /// or the category does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &CreateProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (name, description, brand, barcode, image_url, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, name, description, brand, barcode, image_url, category_id,
                created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.brand)
        .bind(&input.barcode)
        .bind(&input.image_url)
        .bind(input.category_id.map(|id| id.as_i32()))
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT
                id, name, description, brand, barcode, image_url, category_id,
                created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List products with filtering.
    ///
    /// `search` matches name, brand or barcode case-insensitively. The price
    /// bounds match products that have at least one listing inside the range.
    /// Page size defaults to 100 and is capped at 500.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let limit = filter.limit.unwrap_or(100).min(500);
        let offset = filter.offset.unwrap_or(0);

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT
                p.id, p.name, p.description, p.brand, p.barcode, p.image_url,
                p.category_id, p.created_at, p.updated_at
            FROM products p
            WHERE
                ($1::int IS NULL OR p.category_id = $1)
                AND (
                    $2::text IS NULL
                    OR p.name ILIKE '%' || $2 || '%'
                    OR p.brand ILIKE '%' || $2 || '%'
                    OR p.barcode ILIKE '%' || $2 || '%'
                )
                AND (
                    ($3::numeric IS NULL AND $4::numeric IS NULL)
                    OR EXISTS (
                        SELECT 1
                        FROM product_listings l
                        WHERE l.product_id = p.id
                          AND ($3::numeric IS NULL OR l.price >= $3)
                          AND ($4::numeric IS NULL OR l.price <= $4)
                    )
                )
            ORDER BY p.id
            LIMIT $5 OFFSET $6
            ",
        )
        .bind(filter.category_id.map(|id| id.as_i32()))
        .bind(&filter.search)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` on barcode or category violations.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                brand = COALESCE($4, brand),
                barcode = COALESCE($5, barcode),
                image_url = COALESCE($6, image_url),
                category_id = COALESCE($7, category_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, description, brand, barcode, image_url, category_id,
                created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.brand)
        .bind(&input.barcode)
        .bind(&input.image_url)
        .bind(input.category_id.map(|id| id.as_i32()))
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a product. Listings, history, favorites, alerts and list items
    /// referencing it cascade.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Similar-product candidate queries
    // =========================================================================

    /// Average listed price of a product across its market listings.
    ///
    /// Returns `None` when the product has no listings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn average_listed_price(
        &self,
        id: ProductId,
    ) -> Result<Option<Decimal>, RepositoryError> {
        let avg = sqlx::query_scalar::<_, Option<Decimal>>(
            r"
            SELECT AVG(price)
            FROM product_listings
            WHERE product_id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(avg)
    }

    /// Same-category products (excluding the source) with at least one
    /// listing priced inside `[min_price, max_price]`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_peers_in_price_band(
        &self,
        category_id: CategoryId,
        exclude: ProductId,
        min_price: Decimal,
        max_price: Decimal,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT DISTINCT
                p.id, p.name, p.description, p.brand, p.barcode, p.image_url,
                p.category_id, p.created_at, p.updated_at
            FROM products p
            INNER JOIN product_listings l ON l.product_id = p.id
            WHERE p.category_id = $1
              AND p.id <> $2
              AND l.price >= $3
              AND l.price <= $4
            ORDER BY p.id
            ",
        )
        .bind(category_id.as_i32())
        .bind(exclude.as_i32())
        .bind(min_price)
        .bind(max_price)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Same-category products excluding the given ids, ordered by id.
    ///
    /// Used to back-fill similar-product results once the filtered tier has
    /// been selected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_peers(
        &self,
        category_id: CategoryId,
        exclude_ids: &[ProductId],
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let exclude: Vec<i32> = exclude_ids.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT
                id, name, description, brand, barcode, image_url, category_id,
                created_at, updated_at
            FROM products
            WHERE category_id = $1
              AND id <> ALL($2)
            ORDER BY id
            LIMIT $3
            ",
        )
        .bind(category_id.as_i32())
        .bind(exclude)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
