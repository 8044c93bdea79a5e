//! Single-writer persistence queue.
//!
//! Every mutation publishes the full cart snapshot into a `watch` channel.
//! One background task drains the channel and writes to storage, so writes
//! land in mutation order and a burst of mutations collapses into a write of
//! the newest snapshot. A slow write can delay persistence but can never
//! overwrite a newer snapshot with an older one.

use std::sync::Arc;

use gomarketplace_core::CartLineItem;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CartError;
use crate::storage::Storage;

/// A cart snapshot tagged with the mutation that produced it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Snapshot {
    pub generation: u64,
    pub items: Arc<Vec<CartLineItem>>,
}

/// Spawn the writer task for one store.
///
/// The task exits once `snapshots` is closed, after persisting any snapshot
/// it has not written yet. `settled` is advanced after every write attempt,
/// successful or not.
pub(crate) fn spawn(
    storage: Arc<dyn Storage>,
    key: String,
    mut snapshots: watch::Receiver<Snapshot>,
    settled: watch::Sender<u64>,
) {
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            match persist(storage.as_ref(), &key, &snapshot.items).await {
                Ok(()) => debug!(
                    generation = snapshot.generation,
                    items = snapshot.items.len(),
                    "Persisted cart"
                ),
                Err(e) => warn!(
                    generation = snapshot.generation,
                    error = %e,
                    "Failed to persist cart"
                ),
            }
            settled.send_replace(snapshot.generation);
        }
        info!(key = %key, "Cart writer stopped");
    });
}

async fn persist(
    storage: &dyn Storage,
    key: &str,
    items: &[CartLineItem],
) -> Result<(), CartError> {
    let blob = serde_json::to_string(items).map_err(CartError::Serialize)?;
    storage.set(key, blob).await?;
    Ok(())
}
