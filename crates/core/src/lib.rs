//! Sugar Plum Core - Shared types library.
//!
//! This crate provides common types used across all Sugar Plum components:
//! - `storefront` - Public-facing shop API (catalog, carts, checkout, orders)
//! - `admin` - Catalog administration panel
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles
//! - [`cart`] - In-memory cart line aggregation and total computation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use types::*;
