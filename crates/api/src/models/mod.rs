//! Domain models for the API.

pub mod comparison;
pub mod favorite;
pub mod listing;
pub mod price_alert;
pub mod price_history;
pub mod product;
pub mod shopping_list;

pub use comparison::{ComparisonItem, ListItemWithProduct, MarketComparison, MarketOffer};
pub use favorite::Favorite;
pub use listing::{CreateListingInput, Listing, ListingFilter, ListingWithMarket, UpdateListingInput};
pub use price_alert::{CreatePriceAlertInput, PriceAlert, UpdatePriceAlertInput};
pub use price_history::PriceHistoryEntry;
pub use product::{CreateProductInput, Product, ProductFilter, UpdateProductInput};
pub use shopping_list::{
    CreateListItemInput, CreateShoppingListInput, ShareLink, ShoppingList, ShoppingListItem,
    ShoppingListWithItems, UpdateListItemInput, UpdateShoppingListInput,
};
