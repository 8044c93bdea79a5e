//! The cart store.
//!
//! [`CartStore`] owns the ordered list of line items. Mutations apply to the
//! in-memory list immediately and hand a snapshot to the store's writer task;
//! callers never wait for persistence unless they call [`CartStore::flush`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gomarketplace_core::{CartLineItem, CartSummary, NewCartLineItem, ProductId};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument};

use crate::error::CartError;
use crate::storage::Storage;
use crate::writer::{self, Snapshot};

/// Progress of the one-time load of persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationStatus {
    /// Hydration has not finished yet.
    Pending,
    /// Nothing was stored; the cart starts empty.
    Empty,
    /// The stored snapshot replaced the in-memory list.
    Restored {
        /// Number of line items restored.
        items: usize,
    },
    /// The stored snapshot could not be loaded; the cart stays empty.
    Failed {
        /// Display form of the underlying [`CartError`].
        reason: String,
    },
}

#[derive(Debug, Default)]
struct CartState {
    items: Vec<CartLineItem>,
    generation: u64,
}

/// Handle to a cart store.
///
/// Cheaply cloneable via `Arc`; every clone operates on the same cart.
/// Constructing a store spawns its writer task, so it must happen inside a
/// tokio runtime.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    key: String,
    storage: Arc<dyn Storage>,
    state: Mutex<CartState>,
    snapshots: watch::Sender<Snapshot>,
    settled: watch::Receiver<u64>,
    hydration: watch::Sender<HydrationStatus>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("items", &state.items.len())
            .field("generation", &state.generation)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create an empty store persisting under `key` and start its writer.
    ///
    /// The store is not hydrated; call [`CartStore::hydrate`] or mount it
    /// through a [`CartProvider`](crate::CartProvider).
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (snapshots, snapshot_rx) = watch::channel(Snapshot::default());
        let (settled_tx, settled) = watch::channel(0);
        let (hydration, _) = watch::channel(HydrationStatus::Pending);

        writer::spawn(Arc::clone(&storage), key.clone(), snapshot_rx, settled_tx);

        Self {
            inner: Arc::new(CartStoreInner {
                key,
                storage,
                state: Mutex::new(CartState::default()),
                snapshots,
                settled,
                hydration,
            }),
        }
    }

    /// The key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Snapshot of the current line items, in insertion order.
    ///
    /// Reflects every mutation applied so far, whether or not it has been
    /// persisted yet.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.state().items.clone()
    }

    /// The first line item with the given ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<CartLineItem> {
        self.state().items.iter().find(|item| item.id == *id).cloned()
    }

    /// Totals for the current line items.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::from_items(&self.state().items)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append `item` to the cart with a quantity of one.
    ///
    /// Existing lines with the same ID are left alone; the cart then holds
    /// two rows for that product.
    #[instrument(skip(self, item), fields(id = %item.id))]
    pub fn add_to_cart(&self, item: NewCartLineItem) {
        self.mutate(|items| items.push(item.into_line_item()));
    }

    /// Increase the quantity of every line with `id` by one.
    ///
    /// Returns `false` and leaves the cart unchanged if no line matches.
    #[instrument(skip(self))]
    pub fn increment(&self, id: &ProductId) -> bool {
        self.mutate(|items| adjust_quantity(items, id, 1))
    }

    /// Decrease the quantity of every line with `id` by one.
    ///
    /// Quantities are not floored: decrementing a line at zero makes it
    /// negative. Quantities saturate at the `i64` bounds. Returns `false` and
    /// leaves the cart unchanged if no line matches.
    #[instrument(skip(self))]
    pub fn decrement(&self, id: &ProductId) -> bool {
        self.mutate(|items| adjust_quantity(items, id, -1))
    }

    /// Apply `f` to the items and hand the result to the writer.
    fn mutate<R>(&self, f: impl FnOnce(&mut Vec<CartLineItem>) -> R) -> R {
        let mut state = self.state();
        let result = f(&mut state.items);
        self.publish(&mut state);
        result
    }

    /// Advance the generation and hand the current items to the writer.
    ///
    /// Callers hold the state lock so snapshots reach the writer in
    /// mutation order.
    fn publish(&self, state: &mut CartState) {
        state.generation += 1;
        let snapshot = Snapshot {
            generation: state.generation,
            items: Arc::new(state.items.clone()),
        };
        debug!(
            generation = snapshot.generation,
            items = snapshot.items.len(),
            "Cart snapshot published"
        );
        self.inner.snapshots.send_replace(snapshot);
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Load the persisted snapshot into memory.
    ///
    /// A missing snapshot leaves the cart as it is. A stored snapshot replaces
    /// the in-memory list wholesale, including any lines added before
    /// hydration finished. In that case the restored list is persisted again,
    /// since the writer may already have stored the early lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the read fails and
    /// `CartError::Hydration` if the stored blob is not a valid item list.
    /// In both cases the cart keeps its current contents.
    #[instrument(skip(self), fields(key = %self.inner.key))]
    pub async fn hydrate(&self) -> Result<HydrationStatus, CartError> {
        match self.load().await {
            Ok(None) => {
                info!("No stored cart, starting empty");
                self.set_hydration(HydrationStatus::Empty);
                Ok(HydrationStatus::Empty)
            }
            Ok(Some(items)) => {
                let status = HydrationStatus::Restored { items: items.len() };
                info!(items = items.len(), "Restored stored cart");
                let mut state = self.state();
                state.items = items;
                // Lines added before hydration finished may already have been
                // written over the stored snapshot; persist the restored list.
                if state.generation > 0 {
                    self.publish(&mut state);
                }
                drop(state);
                self.set_hydration(status.clone());
                Ok(status)
            }
            Err(e) => {
                error!(error = %e, "Failed to hydrate cart");
                self.set_hydration(HydrationStatus::Failed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn load(&self) -> Result<Option<Vec<CartLineItem>>, CartError> {
        let Some(blob) = self.inner.storage.get(&self.inner.key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&blob)
            .map(Some)
            .map_err(CartError::Hydration)
    }

    /// Current hydration progress, without waiting.
    #[must_use]
    pub fn hydration_status(&self) -> HydrationStatus {
        self.inner.hydration.borrow().clone()
    }

    /// Wait for hydration to finish and return its outcome.
    ///
    /// Never resolves for a store on which [`CartStore::hydrate`] is never
    /// called.
    pub async fn hydration(&self) -> HydrationStatus {
        let mut status = self.inner.hydration.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        status
            .wait_for(|s| *s != HydrationStatus::Pending)
            .await
            .map_or(HydrationStatus::Pending, |s| s.clone())
    }

    /// Wait until every mutation applied so far has been written, or has
    /// failed to be written, by the writer.
    ///
    /// Write failures are not reported here; they are logged by the writer.
    pub async fn flush(&self) {
        let target = self.state().generation;
        if target == 0 {
            return;
        }
        let mut settled = self.inner.settled.clone();
        let _ = settled.wait_for(|generation| *generation >= target).await;
    }

    fn set_hydration(&self, status: HydrationStatus) {
        self.inner.hydration.send_replace(status);
    }

    fn state(&self) -> MutexGuard<'_, CartState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn adjust_quantity(items: &mut [CartLineItem], id: &ProductId, delta: i64) -> bool {
    let mut matched = false;
    for item in items.iter_mut().filter(|item| item.id == *id) {
        item.quantity = item.quantity.saturating_add(delta);
        matched = true;
    }
    matched
}
