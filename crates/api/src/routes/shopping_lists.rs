//! Shopping list route handlers.
//!
//! Lists and their items belong to the authenticated user; every handler
//! except the shared-token read resolves the caller and enforces ownership.
//! The comparison endpoint ranks markets for a list, and the share endpoint
//! publishes a stable read-only link.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use uuid::Uuid;

use basketwatch_core::{Quantity, ShoppingListId, ShoppingListItemId, UserId};

use crate::db::{RepositoryError, ShoppingListRepository};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::comparison::MarketComparison;
use crate::models::shopping_list::{
    CreateListItemInput, CreateShoppingListInput, ShareLink, ShoppingList, ShoppingListItem,
    ShoppingListWithItems, UpdateListItemInput, UpdateShoppingListInput,
};
use crate::services::ComparisonService;
use crate::state::AppState;

/// Build the shopping list router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/shopping-lists",
            get(list_shopping_lists).post(create_shopping_list),
        )
        .route(
            "/shopping-lists/{id}",
            get(get_shopping_list)
                .put(update_shopping_list)
                .delete(delete_shopping_list),
        )
        .route(
            "/shopping-lists/{id}/items",
            get(list_items).post(add_item),
        )
        .route(
            "/shopping-lists/{id}/items/{item_id}",
            put(update_item).delete(delete_item),
        )
        .route("/shopping-lists/{id}/comparison", get(compare_shopping_list))
        .route("/shopping-lists/{id}/share", post(share_shopping_list))
        // Static segment wins over `{id}`, so this doesn't shadow anything.
        .route("/shopping-lists/shared/{token}", get(get_shared_list))
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the shopping list index.
#[derive(Debug, Deserialize)]
pub struct ShoppingListsQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Create a shopping list for the caller.
///
/// POST /shopping-lists
async fn create_shopping_list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<CreateShoppingListInput>,
) -> Result<(StatusCode, Json<ShoppingList>), ApiError> {
    validate_name(&input.name)?;

    let list = ShoppingListRepository::new(state.pool())
        .create(user_id, &input)
        .await?;

    Ok((StatusCode::CREATED, Json(list)))
}

/// The caller's shopping lists, newest first.
///
/// GET /shopping-lists
async fn list_shopping_lists(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ShoppingListsQuery>,
) -> Result<Json<Vec<ShoppingList>>, ApiError> {
    let limit = query.limit.unwrap_or(100).min(500);
    let skip = query.skip.unwrap_or(0);

    let lists = ShoppingListRepository::new(state.pool())
        .list_for_user(user_id, limit, skip)
        .await?;

    Ok(Json(lists))
}

/// Fetch the caller's shopping list with its items.
///
/// GET /shopping-lists/{id}
async fn get_shopping_list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ShoppingListWithItems>, ApiError> {
    let id = ShoppingListId::new(id);
    let list = owned_list(&state, user_id, id).await?;

    let items = ShoppingListRepository::new(state.pool())
        .list_items(id)
        .await?;

    Ok(Json(ShoppingListWithItems { list, items }))
}

/// Rename the caller's shopping list.
///
/// PUT /shopping-lists/{id}
async fn update_shopping_list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateShoppingListInput>,
) -> Result<Json<ShoppingList>, ApiError> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }

    let id = ShoppingListId::new(id);
    owned_list(&state, user_id, id).await?;

    let list = ShoppingListRepository::new(state.pool())
        .update(id, &input)
        .await?;

    Ok(Json(list))
}

/// Delete the caller's shopping list and its items.
///
/// DELETE /shopping-lists/{id}
async fn delete_shopping_list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = ShoppingListId::new(id);
    owned_list(&state, user_id, id).await?;

    ShoppingListRepository::new(state.pool()).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// The items of the caller's shopping list.
///
/// GET /shopping-lists/{id}/items
async fn list_items(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ShoppingListItem>>, ApiError> {
    let id = ShoppingListId::new(id);
    owned_list(&state, user_id, id).await?;

    let items = ShoppingListRepository::new(state.pool())
        .list_items(id)
        .await?;

    Ok(Json(items))
}

/// Add an item to the caller's shopping list.
///
/// POST /shopping-lists/{id}/items
async fn add_item(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<CreateListItemInput>,
) -> Result<(StatusCode, Json<ShoppingListItem>), ApiError> {
    let quantity = validate_quantity(input.quantity.unwrap_or(1))?;

    let id = ShoppingListId::new(id);
    owned_list(&state, user_id, id).await?;

    let item = ShoppingListRepository::new(state.pool())
        .add_item(id, input.product_id, quantity, input.notes.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Update an item on the caller's shopping list.
///
/// PUT /shopping-lists/{id}/items/{item_id}
async fn update_item(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path((id, item_id)): Path<(i32, i32)>,
    Json(input): Json<UpdateListItemInput>,
) -> Result<Json<ShoppingListItem>, ApiError> {
    let quantity = input.quantity.map(validate_quantity).transpose()?;

    let id = ShoppingListId::new(id);
    owned_list(&state, user_id, id).await?;

    let item = ShoppingListRepository::new(state.pool())
        .update_item(
            id,
            ShoppingListItemId::new(item_id),
            quantity,
            input.notes.as_deref(),
        )
        .await
        .map_err(item_not_found)?;

    Ok(Json(item))
}

/// Remove an item from the caller's shopping list.
///
/// DELETE /shopping-lists/{id}/items/{item_id}
async fn delete_item(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path((id, item_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let id = ShoppingListId::new(id);
    owned_list(&state, user_id, id).await?;

    let deleted = ShoppingListRepository::new(state.pool())
        .delete_item(id, ShoppingListItemId::new(item_id))
        .await?;
    if !deleted {
        return Err(ApiError::NotFound(
            "shopping list item not found".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Rank markets for the caller's shopping list.
///
/// GET /shopping-lists/{id}/comparison
async fn compare_shopping_list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Vec<MarketComparison>>, ApiError> {
    let id = ShoppingListId::new(id);
    owned_list(&state, user_id, id).await?;

    let comparisons = ComparisonService::new(state.pool()).compare_list(id).await?;

    Ok(Json(comparisons))
}

/// Publish a share link for the caller's shopping list.
///
/// POST /shopping-lists/{id}/share
///
/// Idempotent: the first call mints the token, later calls return it again.
async fn share_shopping_list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ShareLink>, ApiError> {
    let id = ShoppingListId::new(id);
    owned_list(&state, user_id, id).await?;

    let share_token = ShoppingListRepository::new(state.pool())
        .ensure_share_token(id, Uuid::new_v4())
        .await?;

    Ok(Json(ShareLink {
        share_token,
        share_url: state.config().shared_list_url(share_token),
    }))
}

/// Read-only fetch of a shared shopping list. No authentication.
///
/// GET /shopping-lists/shared/{token}
async fn get_shared_list(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<Json<ShoppingListWithItems>, ApiError> {
    let repo = ShoppingListRepository::new(state.pool());
    let list = repo
        .get_by_share_token(token)
        .await?
        .ok_or_else(|| ApiError::NotFound("shared shopping list not found".to_string()))?;

    let items = repo.list_items(list.id).await?;

    Ok(Json(ShoppingListWithItems { list, items }))
}

// =============================================================================
// Helpers
// =============================================================================

/// Validate a list name: non-blank, at most 100 characters.
fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if name.chars().count() > 100 {
        return Err(ApiError::BadRequest(
            "name must be at most 100 characters".to_string(),
        ));
    }
    Ok(())
}

/// Validate an item quantity: a positive integer.
fn validate_quantity(quantity: i32) -> Result<Quantity, ApiError> {
    Quantity::new(quantity)
        .map_err(|_| ApiError::BadRequest("quantity must be a positive integer".to_string()))
}

/// 404 unless the list exists, 403 unless the caller owns it.
async fn owned_list(
    state: &AppState,
    user_id: UserId,
    id: ShoppingListId,
) -> Result<ShoppingList, ApiError> {
    let list = ShoppingListRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("shopping list not found".to_string()))?;
    if list.user_id != user_id {
        return Err(ApiError::Forbidden(
            "you do not own this shopping list".to_string(),
        ));
    }
    Ok(list)
}

/// Map a repository miss to an item-specific 404.
fn item_not_found(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::NotFound => {
            ApiError::NotFound("shopping list item not found".to_string())
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity_rejects_non_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(12).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-2).is_err());
    }

    #[test]
    fn test_validate_name_rejects_blank_and_oversized() {
        assert!(validate_name("Weekly shop").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(" \t ").is_err());
        assert!(validate_name(&"n".repeat(101)).is_err());
    }
}
