//! Cart error types.

use thiserror::Error;

/// Errors surfaced by the cart store.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was used outside of a provider scope.
    #[error("no store available in this context")]
    NoProvider,

    /// The persisted snapshot could not be deserialized.
    #[error("failed to hydrate cart: {0}")]
    Hydration(#[source] serde_json::Error),

    /// A snapshot could not be serialized for persistence.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The persistence service failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors returned by a [`Storage`](crate::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the value for `key` failed.
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend cannot serve requests.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_provider_message() {
        assert_eq!(
            CartError::NoProvider.to_string(),
            "no store available in this context"
        );
    }

    #[test]
    fn test_storage_error_converts() {
        let err: CartError = StorageError::Unavailable("offline".to_string()).into();
        assert!(matches!(err, CartError::Storage(_)));
        assert_eq!(err.to_string(), "storage error: storage unavailable: offline");
    }
}
