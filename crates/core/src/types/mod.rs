//! Core types for GoMarketplace.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod cart;
pub mod id;
pub mod price;

pub use cart::{CartLineItem, CartSummary, NewCartLineItem};
pub use id::ProductId;
pub use price::{Price, PriceError};
