//! GoMarketplace Cart - Persistent shopping cart store.
//!
//! Holds the ordered list of cart line items in memory and mirrors every
//! mutation to a key-value persistence service, so the cart survives
//! restarts of the application.
//!
//! # Usage
//!
//! ```rust,no_run
//! use gomarketplace_cart::{CartConfig, CartContext, CartProvider, MemoryStorage};
//! use gomarketplace_core::NewCartLineItem;
//!
//! # async fn demo() -> Result<(), gomarketplace_cart::CartError> {
//! let provider = CartProvider::new(MemoryStorage::new(), CartConfig::default());
//! let cart = CartContext::with_store(provider.mount());
//!
//! cart.add_to_cart(NewCartLineItem::new("x", "T", "u", 10))?;
//! cart.increment(&"x".into())?;
//! assert_eq!(cart.items()?[0].quantity, 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`store`] - The cart store and its operations
//! - [`provider`] - Composition-root factory and consumer scope
//! - [`storage`] - Key-value persistence backends
//! - [`config`] - Environment configuration
//! - [`error`] - Error types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod provider;
pub mod storage;
pub mod store;
mod writer;

pub use config::{CartConfig, ConfigError};
pub use error::{CartError, StorageError};
pub use provider::{CartContext, CartProvider};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{CartStore, HydrationStatus};
