//! Key-value persistence backends.
//!
//! The cart treats persistence as an opaque service with two operations:
//! read the blob stored under a key, and replace it. Backends only have to
//! provide last-write-wins semantics for a single key.

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::StorageError;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// An asynchronous key-value store holding serialized blobs.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}
