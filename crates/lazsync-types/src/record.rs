//! Normalized record representation.
//!
//! Numeric fields default to zero and string fields to empty when the remote
//! payload omits them. Consumers should read a zero as "unknown", not as a
//! confirmed zero.

use serde::{Deserialize, Serialize};

use crate::Collection;

/// A seller order, reduced to the fields used downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order number.
    pub order_id: String,
    /// Creation time as reported by the API.
    pub created_at: String,
    /// Last update time as reported by the API.
    pub updated_at: String,
    /// Order price.
    pub price: f64,
    /// Platform voucher amount.
    pub voucher_platform: f64,
    /// Seller voucher amount.
    pub voucher_seller: f64,
    /// Platform shipping fee discount.
    pub shipping_fee_discount: f64,
    /// Fulfilment warehouse code.
    pub warehouse_code: String,
    /// Original shipping fee.
    pub shipping_fee: f64,
    /// Number of items in the order.
    pub items_count: i64,
}

/// A seller product, reduced to the fields used downstream.
///
/// Price, quantity and URL come from the product's first SKU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Item identifier.
    pub item_id: i64,
    /// Product name.
    pub name: String,
    /// Brand name.
    pub brand: String,
    /// Listing status.
    pub status: String,
    /// Creation time as reported by the API.
    pub created_time: String,
    /// Last update time as reported by the API.
    pub updated_time: String,
    /// List price.
    pub price: f64,
    /// Special (discounted) price.
    pub special_price: f64,
    /// Stock quantity.
    pub quantity: i64,
    /// Product page URL.
    pub url: String,
    /// Image URLs.
    pub images: Vec<String>,
}

/// Normalized records of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Records {
    /// Order records.
    Orders(Vec<OrderRecord>),
    /// Product records.
    Products(Vec<ProductRecord>),
}

impl Records {
    /// Creates an empty record set for the collection.
    #[must_use]
    pub const fn empty(collection: Collection) -> Self {
        match collection {
            Collection::Orders => Self::Orders(Vec::new()),
            Collection::Products => Self::Products(Vec::new()),
        }
    }

    /// Returns the collection these records belong to.
    #[must_use]
    pub const fn collection(&self) -> Collection {
        match self {
            Self::Orders(_) => Collection::Orders,
            Self::Products(_) => Collection::Products,
        }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Orders(v) => v.len(),
            Self::Products(v) => v.len(),
        }
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends records of the same collection.
    ///
    /// Records of a different collection are ignored; the number of records
    /// actually appended is returned.
    pub fn extend(&mut self, other: Self) -> usize {
        match (self, other) {
            (Self::Orders(a), Self::Orders(b)) => {
                let n = b.len();
                a.extend(b);
                n
            }
            (Self::Products(a), Self::Products(b)) => {
                let n = b.len();
                a.extend(b);
                n
            }
            _ => 0,
        }
    }
}
