//! Shopping list domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use basketwatch_core::{ProductId, Quantity, ShoppingListId, ShoppingListItemId, UserId};

/// A user's shopping list. Deleting a list cascades to its items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingList {
    /// Unique list ID.
    pub id: ShoppingListId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Share token, set once the owner publishes the list.
    pub share_token: Option<Uuid>,
    /// When the list was created.
    pub created_at: DateTime<Utc>,
    /// When the list was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One product plus desired quantity within a shopping list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListItem {
    /// Unique item ID.
    pub id: ShoppingListItemId,
    /// List the item belongs to.
    pub shopping_list_id: ShoppingListId,
    /// Product to buy.
    pub product_id: ProductId,
    /// Desired quantity, always positive.
    pub quantity: Quantity,
    /// Optional free-text note.
    pub notes: Option<String>,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A shopping list together with its items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListWithItems {
    /// The list itself.
    pub list: ShoppingList,
    /// Items of the list.
    pub items: Vec<ShoppingListItem>,
}

/// Input for creating a shopping list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShoppingListInput {
    /// Display name.
    pub name: String,
}

/// Input for renaming a shopping list.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateShoppingListInput {
    /// Display name.
    pub name: Option<String>,
}

/// Input for adding an item to a shopping list.
///
/// Quantity is validated at the handler so that a zero or negative value
/// fails with a readable message rather than a deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListItemInput {
    /// Product to buy.
    pub product_id: ProductId,
    /// Desired quantity, defaults to 1.
    pub quantity: Option<i32>,
    /// Optional free-text note.
    pub notes: Option<String>,
}

/// Input for updating a shopping list item.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateListItemInput {
    /// Desired quantity.
    pub quantity: Option<i32>,
    /// Optional free-text note.
    pub notes: Option<String>,
}

/// A published share link for a shopping list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    /// Token identifying the shared list.
    pub share_token: Uuid,
    /// Absolute URL for read-only access.
    pub share_url: String,
}
