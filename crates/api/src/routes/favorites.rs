//! Favorite route handlers.
//!
//! A favorite marks a specific listing (product at a market) for the
//! authenticated user. The toggle endpoint flips it in one call.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use basketwatch_core::ListingId;

use crate::db::{FavoriteRepository, ListingRepository};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::favorite::Favorite;
use crate::state::AppState;

/// Build the favorite router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route("/favorites/toggle/{listing_id}", post(toggle_favorite))
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Toggle the caller's favorite on a listing.
///
/// POST /favorites/toggle/{listing_id}
///
/// Returns the created favorite, or JSON `null` when an existing favorite was
/// removed.
async fn toggle_favorite(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(listing_id): Path<i32>,
) -> Result<Json<Option<Favorite>>, ApiError> {
    let listing_id = ListingId::new(listing_id);
    let listing = ListingRepository::new(state.pool()).get(listing_id).await?;
    if listing.is_none() {
        return Err(ApiError::NotFound("listing not found".to_string()));
    }

    let favorite = FavoriteRepository::new(state.pool())
        .toggle(user_id, listing_id)
        .await?;

    Ok(Json(favorite))
}

/// The caller's favorites, newest first.
///
/// GET /favorites
async fn list_favorites(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Favorite>>, ApiError> {
    let favorites = FavoriteRepository::new(state.pool())
        .list_for_user(user_id)
        .await?;

    Ok(Json(favorites))
}
