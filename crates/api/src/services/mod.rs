//! Business logic services for the API.
//!
//! # Services
//!
//! - `comparison` - Market price comparison over a shopping list
//! - `similar` - Similar-product selection for a product page
//!
//! Everything else in the API is a plain handler over one repository and
//! doesn't warrant a service.

pub mod comparison;
pub mod similar;

pub use comparison::{ComparisonService, rank_markets};
pub use similar::{DEFAULT_SIMILAR_LIMIT, SimilarProductsService};
