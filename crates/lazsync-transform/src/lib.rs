//! Payload normalization for lazsync.
//!
//! This crate turns raw page payloads into flat records:
//!
//! - [`normalize`] - Decodes one page of a collection into [`Records`]
//! - [`normalize_pages`] - Decodes and concatenates several pages

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lazsync/lazsync/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod lenient;
mod orders;
mod products;

use lazsync_types::{Collection, LazsyncError, OrderRecord, ProductRecord, Records};
use serde_json::value::RawValue;
use thiserror::Error;

use crate::orders::OrdersPage;
use crate::products::ProductsPage;

/// Errors that can occur while normalizing a payload.
#[derive(Error, Debug)]
pub enum TransformError {
    /// The payload is not a JSON object.
    #[error("Payload is not a JSON object")]
    NotAnObject,

    /// The payload does not match the collection schema.
    #[error("Invalid {collection} payload: {source}")]
    Schema {
        /// Collection being decoded.
        collection: Collection,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

impl From<TransformError> for LazsyncError {
    fn from(error: TransformError) -> Self {
        Self::Transform(error.to_string())
    }
}

/// Normalizes one page payload.
///
/// A payload without the collection's items key yields no records.
///
/// # Errors
///
/// Returns an error if the payload is not a JSON object or its items do not
/// match the collection schema.
pub fn normalize(collection: Collection, data: &RawValue) -> Result<Records, TransformError> {
    if !data.get().trim_start().starts_with('{') {
        return Err(TransformError::NotAnObject);
    }

    let schema = |source| TransformError::Schema { collection, source };
    Ok(match collection {
        Collection::Orders => {
            let page: OrdersPage = serde_json::from_str(data.get()).map_err(schema)?;
            Records::Orders(page.orders.into_iter().map(OrderRecord::from).collect())
        }
        Collection::Products => {
            let page: ProductsPage = serde_json::from_str(data.get()).map_err(schema)?;
            Records::Products(page.products.into_iter().map(ProductRecord::from).collect())
        }
    })
}

/// Normalizes several pages into one record set.
///
/// Pages without a payload contribute no records.
///
/// # Errors
///
/// Returns the first page error.
pub fn normalize_pages<'a, I>(collection: Collection, pages: I) -> Result<Records, TransformError>
where
    I: IntoIterator<Item = Option<&'a RawValue>>,
{
    let mut records = Records::empty(collection);
    for data in pages.into_iter().flatten() {
        records.extend(normalize(collection, data)?);
    }
    Ok(records)
}
