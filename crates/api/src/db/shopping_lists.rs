//! Database operations for shopping lists and their items.
//!
//! Item queries are scoped by list ID so a caller can never reach an item
//! through a list it doesn't belong to.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use basketwatch_core::{ProductId, Quantity, ShoppingListId, ShoppingListItemId, UserId};

use super::RepositoryError;
use crate::models::comparison::ListItemWithProduct;
use crate::models::shopping_list::{
    CreateShoppingListInput, ShoppingList, ShoppingListItem, UpdateShoppingListInput,
};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for shopping list queries.
#[derive(Debug, sqlx::FromRow)]
struct ShoppingListRow {
    id: i32,
    user_id: i32,
    name: String,
    share_token: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShoppingListRow> for ShoppingList {
    fn from(row: ShoppingListRow) -> Self {
        Self {
            id: ShoppingListId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.name,
            share_token: row.share_token,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for shopping list item queries.
#[derive(Debug, sqlx::FromRow)]
struct ShoppingListItemRow {
    id: i32,
    shopping_list_id: i32,
    product_id: i32,
    quantity: Quantity,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShoppingListItemRow> for ShoppingListItem {
    fn from(row: ShoppingListItemRow) -> Self {
        Self {
            id: ShoppingListItemId::new(row.id),
            shopping_list_id: ShoppingListId::new(row.shopping_list_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for comparator item loading.
#[derive(Debug, sqlx::FromRow)]
struct ListItemWithProductRow {
    product_id: i32,
    product_name: String,
    quantity: Quantity,
}

impl From<ListItemWithProductRow> for ListItemWithProduct {
    fn from(row: ListItemWithProductRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            quantity: row.quantity,
        }
    }
}

/// Map constraint violations on item writes to `Conflict`.
fn map_item_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.constraint() == Some("shopping_list_items_product_id_fkey") {
            return RepositoryError::Conflict("product does not exist".to_string());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict("shopping list does not exist".to_string());
        }
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for shopping list database operations.
pub struct ShoppingListRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShoppingListRepository<'a> {
    /// Create a new shopping list repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a shopping list for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        input: &CreateShoppingListInput,
    ) -> Result<ShoppingList, RepositoryError> {
        let row = sqlx::query_as::<_, ShoppingListRow>(
            r"
            INSERT INTO shopping_lists (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, share_token, created_at, updated_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(&input.name)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a shopping list by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ShoppingListId) -> Result<Option<ShoppingList>, RepositoryError> {
        let row = sqlx::query_as::<_, ShoppingListRow>(
            r"
            SELECT id, user_id, name, share_token, created_at, updated_at
            FROM shopping_lists
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a shopping list by its share token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_share_token(
        &self,
        token: Uuid,
    ) -> Result<Option<ShoppingList>, RepositoryError> {
        let row = sqlx::query_as::<_, ShoppingListRow>(
            r"
            SELECT id, user_id, name, share_token, created_at, updated_at
            FROM shopping_lists
            WHERE share_token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List a user's shopping lists, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ShoppingList>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShoppingListRow>(
            r"
            SELECT id, user_id, name, share_token, created_at, updated_at
            FROM shopping_lists
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.as_i32())
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update a shopping list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the list doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ShoppingListId,
        input: &UpdateShoppingListInput,
    ) -> Result<ShoppingList, RepositoryError> {
        let row = sqlx::query_as::<_, ShoppingListRow>(
            r"
            UPDATE shopping_lists
            SET
                name = COALESCE($2, name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, name, share_token, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(input.name.as_deref())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a shopping list and its items.
    ///
    /// # Returns
    ///
    /// Returns `true` if the list was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ShoppingListId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shopping_lists
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set the list's share token if it doesn't have one, and return the
    /// persisted token.
    ///
    /// Repeated calls keep returning the first token, so share links stay
    /// stable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the list doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn ensure_share_token(
        &self,
        id: ShoppingListId,
        token: Uuid,
    ) -> Result<Uuid, RepositoryError> {
        let token = sqlx::query_scalar::<_, Uuid>(
            r"
            UPDATE shopping_lists
            SET share_token = COALESCE(share_token, $2)
            WHERE id = $1
            RETURNING share_token
            ",
        )
        .bind(id.as_i32())
        .bind(token)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(token)
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// List a shopping list's items in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_items(
        &self,
        list_id: ShoppingListId,
    ) -> Result<Vec<ShoppingListItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShoppingListItemRow>(
            r"
            SELECT
                id, shopping_list_id, product_id, quantity, notes,
                created_at, updated_at
            FROM shopping_list_items
            WHERE shopping_list_id = $1
            ORDER BY id
            ",
        )
        .bind(list_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add an item to a shopping list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product or list doesn't
    /// exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        list_id: ShoppingListId,
        product_id: ProductId,
        quantity: Quantity,
        notes: Option<&str>,
    ) -> Result<ShoppingListItem, RepositoryError> {
        let row = sqlx::query_as::<_, ShoppingListItemRow>(
            r"
            INSERT INTO shopping_list_items (shopping_list_id, product_id, quantity, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id, shopping_list_id, product_id, quantity, notes,
                created_at, updated_at
            ",
        )
        .bind(list_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity)
        .bind(notes)
        .fetch_one(self.pool)
        .await
        .map_err(map_item_write_error)?;

        Ok(row.into())
    }

    /// Get an item scoped to its shopping list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_item(
        &self,
        list_id: ShoppingListId,
        item_id: ShoppingListItemId,
    ) -> Result<Option<ShoppingListItem>, RepositoryError> {
        let row = sqlx::query_as::<_, ShoppingListItemRow>(
            r"
            SELECT
                id, shopping_list_id, product_id, quantity, notes,
                created_at, updated_at
            FROM shopping_list_items
            WHERE shopping_list_id = $1 AND id = $2
            ",
        )
        .bind(list_id.as_i32())
        .bind(item_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Update an item scoped to its shopping list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist in the
    /// list.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_item(
        &self,
        list_id: ShoppingListId,
        item_id: ShoppingListItemId,
        quantity: Option<Quantity>,
        notes: Option<&str>,
    ) -> Result<ShoppingListItem, RepositoryError> {
        let row = sqlx::query_as::<_, ShoppingListItemRow>(
            r"
            UPDATE shopping_list_items
            SET
                quantity = COALESCE($3, quantity),
                notes = COALESCE($4, notes),
                updated_at = NOW()
            WHERE shopping_list_id = $1 AND id = $2
            RETURNING
                id, shopping_list_id, product_id, quantity, notes,
                created_at, updated_at
            ",
        )
        .bind(list_id.as_i32())
        .bind(item_id.as_i32())
        .bind(quantity)
        .bind(notes)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete an item scoped to its shopping list.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was deleted, `false` if it didn't exist in
    /// the list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_item(
        &self,
        list_id: ShoppingListId,
        item_id: ShoppingListItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shopping_list_items
            WHERE shopping_list_id = $1 AND id = $2
            ",
        )
        .bind(list_id.as_i32())
        .bind(item_id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Load a list's items joined with product names.
    ///
    /// This is the comparator's input: one row per item, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_with_product_names(
        &self,
        list_id: ShoppingListId,
    ) -> Result<Vec<ListItemWithProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, ListItemWithProductRow>(
            r"
            SELECT sli.product_id, p.name AS product_name, sli.quantity
            FROM shopping_list_items sli
            INNER JOIN products p ON p.id = sli.product_id
            WHERE sli.shopping_list_id = $1
            ORDER BY sli.id
            ",
        )
        .bind(list_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
