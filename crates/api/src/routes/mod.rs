//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! # Products
//! POST   /products                      - Create product
//! GET    /products                      - List (category/search/price filters)
//! GET    /products/{id}                 - Product detail
//! PUT    /products/{id}                 - Partial update
//! DELETE /products/{id}                 - Delete product (cascades)
//! GET    /products/{id}/listings        - Prices across markets
//! GET    /products/{id}/price-history   - Recorded price points (?days=30)
//! GET    /products/{id}/similar         - Similar products (?limit=5)
//!
//! # Listings
//! POST   /listings                      - Create listing (records opening price)
//! GET    /listings                      - List (?product_id=&market_id=)
//! GET    /listings/{id}                 - Listing detail
//! PUT    /listings/{id}                 - Partial update (price change -> history)
//! DELETE /listings/{id}                 - Delete listing
//!
//! # Favorites (authenticated)
//! POST   /favorites/toggle/{listing_id} - Toggle favorite (favorite or null)
//! GET    /favorites                     - Caller's favorites
//!
//! # Price alerts (authenticated)
//! POST   /price-alerts                  - Create alert
//! GET    /price-alerts                  - Caller's alerts
//! PUT    /price-alerts/{id}             - Update alert (owner only)
//! DELETE /price-alerts/{id}             - Delete alert (owner only)
//!
//! # Shopping lists (authenticated except the shared read)
//! POST   /shopping-lists                      - Create list
//! GET    /shopping-lists                      - Caller's lists
//! GET    /shopping-lists/{id}                 - List with items (owner only)
//! PUT    /shopping-lists/{id}                 - Rename (owner only)
//! DELETE /shopping-lists/{id}                 - Delete with items (owner only)
//! GET    /shopping-lists/{id}/items           - Items (owner only)
//! POST   /shopping-lists/{id}/items           - Add item (owner only)
//! PUT    /shopping-lists/{id}/items/{item_id} - Update item (owner only)
//! DELETE /shopping-lists/{id}/items/{item_id} - Remove item (owner only)
//! GET    /shopping-lists/{id}/comparison      - Market ranking (owner only)
//! POST   /shopping-lists/{id}/share           - Publish share link (owner only)
//! GET    /shopping-lists/shared/{token}       - Shared read, no auth
//! ```
//!
//! Health endpoints (`/health`, `/health/ready`) are registered in `main`.

pub mod favorites;
pub mod listings;
pub mod price_alerts;
pub mod products;
pub mod shopping_lists;

use axum::Router;

use crate::state::AppState;

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .merge(listings::router())
        .merge(favorites::router())
        .merge(price_alerts::router())
        .merge(shopping_lists::router())
}
