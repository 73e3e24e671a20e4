//! Basketwatch Core - Shared types library.
//!
//! This crate provides common types used across all Basketwatch components:
//! - `api` - REST service for products, markets, shopping lists, and price comparison
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and validated quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
