//! Database operations for per-user favorite listings.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use basketwatch_core::{FavoriteId, ListingId, UserId};

use super::RepositoryError;
use crate::models::favorite::Favorite;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for favorite queries.
#[derive(Debug, sqlx::FromRow)]
struct FavoriteRow {
    id: i32,
    user_id: i32,
    listing_id: i32,
    created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Self {
            id: FavoriteId::new(row.id),
            user_id: UserId::new(row.user_id),
            listing_id: ListingId::new(row.listing_id),
            created_at: row.created_at,
        }
    }
}

/// Map constraint violations on favorite writes to `Conflict`.
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.constraint() == Some("favorites_user_listing_key") {
            return RepositoryError::Conflict("favorite already exists".to_string());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict("listing does not exist".to_string());
        }
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for favorite database operations.
pub struct FavoriteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FavoriteRepository<'a> {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Toggle a favorite for a (user, listing) pair.
    ///
    /// Removes the favorite if it exists, creates it otherwise, and keeps the
    /// listing's `is_favorite` flag in sync with the favorites table. All
    /// three statements run in one transaction.
    ///
    /// # Returns
    ///
    /// Returns the new favorite when one was created, `None` when an existing
    /// favorite was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the listing doesn't exist or a
    /// concurrent toggle already created the favorite.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn toggle(
        &self,
        user_id: UserId,
        listing_id: ListingId,
    ) -> Result<Option<Favorite>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query_as::<_, FavoriteRow>(
            r"
            DELETE FROM favorites
            WHERE user_id = $1 AND listing_id = $2
            RETURNING id, user_id, listing_id, created_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(listing_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?;

        let created = if removed.is_some() {
            None
        } else {
            let row = sqlx::query_as::<_, FavoriteRow>(
                r"
                INSERT INTO favorites (user_id, listing_id)
                VALUES ($1, $2)
                RETURNING id, user_id, listing_id, created_at
                ",
            )
            .bind(user_id.as_i32())
            .bind(listing_id.as_i32())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_write_error)?;

            Some(row.into())
        };

        sqlx::query(
            r"
            UPDATE product_listings
            SET is_favorite = EXISTS (SELECT 1 FROM favorites WHERE listing_id = $1)
            WHERE id = $1
            ",
        )
        .bind(listing_id.as_i32())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(created)
    }

    /// List a user's favorites, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Favorite>, RepositoryError> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            r"
            SELECT id, user_id, listing_id, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
