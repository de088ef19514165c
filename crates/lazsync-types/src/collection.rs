//! Paginated resource collections.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A paginated collection exposed by the partner API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Seller orders (`/orders/get`).
    Orders,
    /// Seller products (`/products/get`).
    Products,
}

impl Collection {
    /// Returns the API path serving the collection.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Orders => "/orders/get",
            Self::Products => "/products/get",
        }
    }

    /// Returns the field path of the total item count inside `data`.
    #[must_use]
    pub const fn count_field(&self) -> &'static str {
        match self {
            Self::Orders => "countTotal",
            Self::Products => "total_products",
        }
    }

    /// Returns the key holding the page's items inside `data`.
    #[must_use]
    pub const fn items_field(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Products => "products",
        }
    }

    /// Returns the collection name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Products => "products",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for unrecognized collection names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown collection: {0}")]
pub struct CollectionParseError(pub String);

impl std::str::FromStr for Collection {
    type Err = CollectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "orders" | "order" => Ok(Self::Orders),
            "products" | "product" => Ok(Self::Products),
            _ => Err(CollectionParseError(s.to_string())),
        }
    }
}
