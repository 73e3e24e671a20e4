//! Favorite domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use basketwatch_core::{FavoriteId, ListingId, UserId};

/// A user's favorite listing.
///
/// Toggling a favorite also refreshes the denormalized `is_favorite` flag
/// on the listing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    /// Unique favorite ID.
    pub id: FavoriteId,
    /// Owning user.
    pub user_id: UserId,
    /// Favorited listing.
    pub listing_id: ListingId,
    /// When the favorite was created.
    pub created_at: DateTime<Utc>,
}
