//! Composition-root factory and consumer scope.
//!
//! The application builds one [`CartProvider`] at its composition root and
//! mounts it to obtain a [`CartStore`]. Components that use the cart receive
//! a [`CartContext`]; a context without a mounted store rejects every
//! operation with [`CartError::NoProvider`].

use std::sync::Arc;

use gomarketplace_core::{CartLineItem, NewCartLineItem, ProductId};
use tracing::{info, instrument};

use crate::config::CartConfig;
use crate::error::CartError;
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::store::CartStore;

/// Factory for cart stores backed by one persistence service.
#[derive(Clone)]
pub struct CartProvider {
    storage: Arc<dyn Storage>,
    config: CartConfig,
}

impl std::fmt::Debug for CartProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CartProvider {
    /// Create a provider over `storage`.
    pub fn new(storage: impl Storage + 'static, config: CartConfig) -> Self {
        Self {
            storage: Arc::new(storage),
            config,
        }
    }

    /// Create a provider whose storage is chosen by `config`.
    ///
    /// Uses [`FileStorage`] when a data directory is configured and
    /// [`MemoryStorage`] otherwise.
    #[must_use]
    pub fn from_config(config: CartConfig) -> Self {
        match &config.data_dir {
            Some(dir) => Self::new(FileStorage::new(dir.clone()), config),
            None => Self::new(MemoryStorage::new(), config),
        }
    }

    /// The provider's configuration.
    #[must_use]
    pub const fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Create a store and start hydrating it in the background.
    ///
    /// The returned store is usable immediately. Await
    /// [`CartStore::hydration`] to wait for persisted state to be loaded.
    /// Must be called inside a tokio runtime.
    #[instrument(skip(self), fields(key = %self.config.storage_key))]
    pub fn mount(&self) -> CartStore {
        let store = CartStore::new(Arc::clone(&self.storage), self.config.storage_key.clone());

        let hydrating = store.clone();
        tokio::spawn(async move {
            // Failures are recorded in the store's hydration status and logged.
            let _ = hydrating.hydrate().await;
        });

        info!("Cart store mounted");
        store
    }
}

/// The cart as seen by consumers.
///
/// Holds a store when created inside a provider scope. Every operation on a
/// context without a store fails with [`CartError::NoProvider`].
#[derive(Debug, Clone, Default)]
pub struct CartContext {
    store: Option<CartStore>,
}

impl CartContext {
    /// A context outside any provider scope.
    #[must_use]
    pub const fn empty() -> Self {
        Self { store: None }
    }

    /// A context inside the scope of `store`.
    #[must_use]
    pub const fn with_store(store: CartStore) -> Self {
        Self { store: Some(store) }
    }

    /// The live store handle.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoProvider` outside a provider scope.
    pub fn cart(&self) -> Result<&CartStore, CartError> {
        self.store.as_ref().ok_or(CartError::NoProvider)
    }

    /// Snapshot of the current line items.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoProvider` outside a provider scope.
    pub fn items(&self) -> Result<Vec<CartLineItem>, CartError> {
        Ok(self.cart()?.items())
    }

    /// Add a product with a quantity of one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoProvider` outside a provider scope.
    pub fn add_to_cart(&self, item: NewCartLineItem) -> Result<(), CartError> {
        self.cart()?.add_to_cart(item);
        Ok(())
    }

    /// Increase the quantity of the product by one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoProvider` outside a provider scope.
    pub fn increment(&self, id: &ProductId) -> Result<bool, CartError> {
        Ok(self.cart()?.increment(id))
    }

    /// Decrease the quantity of the product by one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoProvider` outside a provider scope.
    pub fn decrement(&self, id: &ProductId) -> Result<bool, CartError> {
        Ok(self.cart()?.decrement(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_STORAGE_KEY;
    use crate::store::HydrationStatus;

    #[test]
    fn test_empty_context_rejects_every_operation() {
        let cart = CartContext::empty();
        let id = ProductId::new("x");

        assert!(matches!(cart.cart(), Err(CartError::NoProvider)));
        assert!(matches!(cart.items(), Err(CartError::NoProvider)));
        assert!(matches!(
            cart.add_to_cart(NewCartLineItem::new("x", "T", "u", 10)),
            Err(CartError::NoProvider)
        ));
        assert!(matches!(cart.increment(&id), Err(CartError::NoProvider)));
        assert!(matches!(cart.decrement(&id), Err(CartError::NoProvider)));
    }

    #[test]
    fn test_default_context_is_empty() {
        let err = CartContext::default().items().unwrap_err();
        assert_eq!(err.to_string(), "no store available in this context");
    }

    #[tokio::test]
    async fn test_mount_hydrates_in_background() {
        let storage = MemoryStorage::with_entry(
            DEFAULT_STORAGE_KEY,
            r#"[{"id":"a","title":"T","image_url":"u","price":3,"quantity":2}]"#,
        );
        let provider = CartProvider::new(storage, CartConfig::default());

        let store = provider.mount();

        assert_eq!(store.hydration().await, HydrationStatus::Restored { items: 1 });
        let cart = CartContext::with_store(store);
        assert_eq!(cart.items().unwrap()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_mount_reports_malformed_snapshot() {
        let storage = MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, "[{\"id\":");
        let store = CartProvider::new(storage, CartConfig::default()).mount();

        let status = store.hydration().await;

        assert!(matches!(status, HydrationStatus::Failed { ref reason } if reason.starts_with("failed to hydrate cart")));
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn test_context_operations_reach_the_store() {
        let storage = MemoryStorage::new();
        let store = CartProvider::new(storage.clone(), CartConfig::default()).mount();
        store.hydration().await;
        let cart = CartContext::with_store(store.clone());

        cart.add_to_cart(NewCartLineItem::new("x", "T", "u", 10)).unwrap();
        assert!(cart.increment(&"x".into()).unwrap());
        assert!(!cart.decrement(&"missing".into()).unwrap());
        store.flush().await;

        assert_eq!(cart.items().unwrap()[0].quantity, 2);
        let blob = storage.value(DEFAULT_STORAGE_KEY).unwrap();
        let persisted: Vec<CartLineItem> = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted, cart.items().unwrap());
    }

    #[tokio::test]
    async fn test_custom_storage_key() {
        let storage = MemoryStorage::new();
        let config = CartConfig::default().with_storage_key("@test/cart");
        let store = CartProvider::new(storage.clone(), config).mount();
        store.hydration().await;

        store.add_to_cart(NewCartLineItem::new("x", "T", "u", 1));
        store.flush().await;

        assert!(storage.value("@test/cart").is_some());
        assert!(storage.value(DEFAULT_STORAGE_KEY).is_none());
    }

    #[tokio::test]
    async fn test_from_config_uses_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let config = CartConfig::default().with_data_dir(dir.path());
        let store = CartProvider::from_config(config).mount();
        store.hydration().await;

        store.add_to_cart(NewCartLineItem::new("x", "T", "u", 1));
        store.flush().await;

        let file = FileStorage::new(dir.path()).path_for(DEFAULT_STORAGE_KEY);
        assert!(file.exists());
    }
}
