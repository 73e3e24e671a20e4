//! Database operations for the API `PostgreSQL`.
//!
//! ## Tables
//!
//! - `users` - Account rows referenced by owned records (seeded, no HTTP surface)
//! - `categories` - Product grouping (seeded, no HTTP surface)
//! - `markets` - Stores that carry listings (seeded, no HTTP surface)
//! - `products` - Catalog entries
//! - `product_listings` - Per-market prices, unique per (product, market)
//! - `price_history` - Price snapshots recorded on listing creation and price change
//! - `favorites` - Per-user listing favorites
//! - `price_alerts` - Per-user target-price alerts
//! - `shopping_lists` / `shopping_list_items` - User lists, items cascade with the list
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p basketwatch-cli -- migrate
//! ```

pub mod favorites;
pub mod listings;
pub mod price_alerts;
pub mod price_history;
pub mod products;
pub mod shopping_lists;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use favorites::FavoriteRepository;
pub use listings::ListingRepository;
pub use price_alerts::PriceAlertRepository;
pub use price_history::PriceHistoryRepository;
pub use products::ProductRepository;
pub use shopping_lists::ShoppingListRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate (product, market) listing).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
