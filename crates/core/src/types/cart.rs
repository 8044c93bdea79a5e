//! Cart line items and derived totals.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as handed to the cart by the catalog, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartLineItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
}

impl NewCartLineItem {
    /// Create a new item.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: impl Into<Price>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price: price.into(),
        }
    }

    /// Turn this product into a cart line with a quantity of one.
    #[must_use]
    pub fn into_line_item(self) -> CartLineItem {
        CartLineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity: 1,
        }
    }
}

/// One product entry in the cart.
///
/// `quantity` is signed: decrementing below zero is not prevented.
///
/// Serialized field names match the snapshot layout stored on devices:
///
/// ```json
/// {"id":"a","title":"T","image_url":"u","price":10,"quantity":2}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
    pub quantity: i64,
}

impl CartLineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Totals derived from a cart snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Number of rows in the cart.
    pub line_count: usize,
    /// Sum of all quantities.
    pub item_count: i64,
    /// Sum of all line totals.
    pub subtotal: Price,
}

impl CartSummary {
    /// Compute the totals for a list of line items.
    ///
    /// Both sums saturate instead of overflowing.
    #[must_use]
    pub fn from_items(items: &[CartLineItem]) -> Self {
        Self {
            line_count: items.len(),
            item_count: items
                .iter()
                .fold(0_i64, |count, item| count.saturating_add(item.quantity)),
            subtotal: items.iter().map(CartLineItem::line_total).sum(),
        }
    }
}
