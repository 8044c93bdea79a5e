//! Integration tests for GoMarketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gomarketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Store lifecycle against file-backed storage
//! - `cart_context` - Consumer access through provider scopes

use std::path::Path;

use gomarketplace_cart::{CartConfig, CartProvider, CartStore};

/// Mount a hydrated cart store over file storage in `dir`.
///
/// # Panics
///
/// Panics if the stored cart cannot be loaded.
pub async fn mount_file_cart(dir: &Path) -> CartStore {
    let config = CartConfig::default().with_data_dir(dir);
    let store = CartProvider::from_config(config).mount();
    let status = store.hydration().await;
    assert!(
        !matches!(status, gomarketplace_cart::HydrationStatus::Failed { .. }),
        "hydration failed: {status:?}"
    );
    store
}
