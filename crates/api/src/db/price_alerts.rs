//! Database operations for price alerts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use basketwatch_core::{PriceAlertId, ProductId, UserId};

use super::RepositoryError;
use crate::models::price_alert::{CreatePriceAlertInput, PriceAlert, UpdatePriceAlertInput};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for price alert queries.
#[derive(Debug, sqlx::FromRow)]
struct PriceAlertRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    target_price: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PriceAlertRow> for PriceAlert {
    fn from(row: PriceAlertRow) -> Self {
        Self {
            id: PriceAlertId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            target_price: row.target_price,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Map constraint violations on alert writes to `Conflict`.
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.constraint() == Some("price_alerts_user_product_key") {
            return RepositoryError::Conflict(
                "alert already exists for this product".to_string(),
            );
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict("product does not exist".to_string());
        }
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for price alert database operations.
pub struct PriceAlertRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PriceAlertRepository<'a> {
    /// Create a new price alert repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a price alert for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has an alert
    /// for the product or the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        input: &CreatePriceAlertInput,
    ) -> Result<PriceAlert, RepositoryError> {
        let row = sqlx::query_as::<_, PriceAlertRow>(
            r"
            INSERT INTO price_alerts (user_id, product_id, target_price)
            VALUES ($1, $2, $3)
            RETURNING
                id, user_id, product_id, target_price, is_active,
                created_at, updated_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(input.product_id.as_i32())
        .bind(input.target_price)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    /// Get a price alert by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: PriceAlertId) -> Result<Option<PriceAlert>, RepositoryError> {
        let row = sqlx::query_as::<_, PriceAlertRow>(
            r"
            SELECT
                id, user_id, product_id, target_price, is_active,
                created_at, updated_at
            FROM price_alerts
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List a user's price alerts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<PriceAlert>, RepositoryError> {
        let rows = sqlx::query_as::<_, PriceAlertRow>(
            r"
            SELECT
                id, user_id, product_id, target_price, is_active,
                created_at, updated_at
            FROM price_alerts
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update a price alert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the alert doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: PriceAlertId,
        input: &UpdatePriceAlertInput,
    ) -> Result<PriceAlert, RepositoryError> {
        let row = sqlx::query_as::<_, PriceAlertRow>(
            r"
            UPDATE price_alerts
            SET
                target_price = COALESCE($2, target_price),
                is_active = COALESCE($3, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, user_id, product_id, target_price, is_active,
                created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(input.target_price)
        .bind(input.is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a price alert.
    ///
    /// # Returns
    ///
    /// Returns `true` if the alert was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: PriceAlertId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM price_alerts
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
