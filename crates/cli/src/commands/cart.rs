//! Cart commands.
//!
//! Each invocation mounts the cart over file storage, waits for hydration,
//! applies one operation and lets the caller flush before exiting.

use std::path::PathBuf;

use gomarketplace_cart::{CartConfig, CartProvider, CartStore, HydrationStatus};
use gomarketplace_core::{CartSummary, NewCartLineItem, Price, ProductId};
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised before a command can run.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] gomarketplace_cart::ConfigError),
    #[error("stored cart could not be loaded: {0}")]
    Hydration(String),
}

/// Mount the cart and wait until persisted state is loaded.
///
/// `data_dir` overrides `GOMARKETPLACE_DATA_DIR`; `default_dir` applies when
/// neither is set.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the stored cart cannot be
/// loaded. Refusing to continue keeps a later write from replacing a snapshot
/// that could not be read.
pub async fn open(data_dir: Option<PathBuf>, default_dir: &str) -> Result<CartStore, CommandError> {
    let mut config = CartConfig::from_env()?;
    if let Some(dir) = data_dir {
        config = config.with_data_dir(dir);
    } else if config.data_dir.is_none() {
        config = config.with_data_dir(default_dir);
    }

    info!(
        key = %config.storage_key,
        dir = ?config.data_dir,
        "Opening cart"
    );

    let store = CartProvider::from_config(config).mount();
    match store.hydration().await {
        HydrationStatus::Failed { reason } => Err(CommandError::Hydration(reason)),
        _ => Ok(store),
    }
}

/// Log every line item and the cart totals.
pub fn list(store: &CartStore) {
    let items = store.items();
    if items.is_empty() {
        info!("Cart is empty");
        return;
    }

    for item in &items {
        info!(
            "  {} | {} | {} x {} = {}",
            item.id,
            item.title,
            item.quantity,
            item.price,
            item.line_total()
        );
    }
    log_summary(&CartSummary::from_items(&items));
}

/// Add a product with a quantity of one.
pub fn add(store: &CartStore, id: String, title: String, image_url: String, price: Price) {
    let item = NewCartLineItem::new(id, title, image_url, price);
    let id = item.id.clone();
    store.add_to_cart(item);
    info!(%id, "Added to cart");
    log_summary(&store.summary());
}

/// Increase a product's quantity by one.
pub fn increment(store: &CartStore, id: &ProductId) {
    if store.increment(id) {
        log_quantity(store, id);
    } else {
        warn!(%id, "Product is not in the cart");
    }
}

/// Decrease a product's quantity by one.
pub fn decrement(store: &CartStore, id: &ProductId) {
    if store.decrement(id) {
        log_quantity(store, id);
    } else {
        warn!(%id, "Product is not in the cart");
    }
}

fn log_quantity(store: &CartStore, id: &ProductId) {
    if let Some(item) = store.get(id) {
        info!(%id, quantity = item.quantity, "Updated quantity");
    }
}

fn log_summary(summary: &CartSummary) {
    info!(
        lines = summary.line_count,
        items = summary.item_count,
        subtotal = %summary.subtotal,
        "Cart totals"
    );
}
