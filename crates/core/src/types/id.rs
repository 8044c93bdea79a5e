//! Product identifiers.
//!
//! Catalog IDs are opaque strings handed to the cart by the catalog layer.
//! The cart never parses or generates them; it only compares them.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a catalog product.
///
/// Wraps the caller-supplied string with `#[serde(transparent)]`, so it is
/// persisted as a plain JSON string.
///
/// ```
/// use gomarketplace_core::ProductId;
///
/// let id = ProductId::new("sku-42");
/// assert_eq!(id.as_str(), "sku-42");
/// assert_eq!(id, ProductId::from("sku-42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ProductId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let id = ProductId::new("abc-123");
        assert_eq!(format!("{id}"), "abc-123");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ProductId::new("abc-123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc-123\"");

        let parsed: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_compares_with_str() {
        let id = ProductId::from("x");
        assert!(id == *"x");
        assert!(id != *"y");
    }

    #[test]
    fn test_into_string() {
        let id = ProductId::new(String::from("owned"));
        let s: String = id.into();
        assert_eq!(s, "owned");
    }
}
