//! Integration tests for Basketwatch.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and seed the database, then start the API
//! cargo run -p basketwatch-cli -- migrate
//! cargo run -p basketwatch-cli -- seed
//! cargo run -p basketwatch-api
//!
//! # Run integration tests against it
//! cargo test -p basketwatch-integration-tests -- --ignored
//! ```
//!
//! All tests are `#[ignore]`d by default because they need a running server
//! and a seeded database. The seed provisions user 1 (the default principal
//! for [`TestApi::new`]) and user 2.
//!
//! # Test Categories
//!
//! - `products` - Product catalog CRUD, filtering and similar products
//! - `listings` - Per-market listings and price history
//! - `favorites` - Favorite toggling
//! - `price_alerts` - Price alert CRUD and ownership
//! - `shopping_lists` - Shopping lists, items, comparison and sharing

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::{Client, RequestBuilder};

/// Client for driving the API in tests.
///
/// Every request carries the `x-user-id` header the API authenticates with,
/// except those built via [`TestApi::get_unauthenticated`].
pub struct TestApi {
    client: Client,
    base_url: String,
    user_id: i32,
}

impl TestApi {
    /// Client acting as user 1 (created by `bw seed`).
    #[must_use]
    pub fn new() -> Self {
        Self::as_user(1)
    }

    /// Client acting as the given user.
    #[must_use]
    pub fn as_user(user_id: i32) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url(),
            user_id,
        }
    }

    #[must_use]
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.get(self.url(path)))
    }

    #[must_use]
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.post(self.url(path)))
    }

    #[must_use]
    pub fn put(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.put(self.url(path)))
    }

    #[must_use]
    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.delete(self.url(path)))
    }

    /// GET without the `x-user-id` header, for public endpoints and for
    /// asserting that protected ones reject anonymous requests.
    #[must_use]
    pub fn get_unauthenticated(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("x-user-id", self.user_id.to_string())
    }
}

impl Default for TestApi {
    fn default() -> Self {
        Self::new()
    }
}

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
