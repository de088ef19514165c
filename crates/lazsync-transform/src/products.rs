//! `/products/get` payload schema.

use lazsync_types::ProductRecord;
use serde::Deserialize;

use crate::lenient;

/// Page payload of the products endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProductsPage {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub(crate) products: Vec<RawProduct>,
}

/// One product as sent by the API.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawProduct {
    #[serde(default, deserialize_with = "lenient::integer")]
    item_id: i64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    attributes: RawAttributes,
    #[serde(default, deserialize_with = "lenient::string")]
    status: String,
    #[serde(default, deserialize_with = "lenient::string")]
    created_time: String,
    #[serde(default, deserialize_with = "lenient::string")]
    updated_time: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    skus: Vec<RawSku>,
    #[serde(default, deserialize_with = "lenient::strings")]
    images: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAttributes {
    #[serde(default, deserialize_with = "lenient::string")]
    name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    brand: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawSku {
    #[serde(default, deserialize_with = "lenient::float")]
    price: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    special_price: f64,
    #[serde(default, deserialize_with = "lenient::integer")]
    quantity: i64,
    #[serde(default, rename = "Url", deserialize_with = "lenient::string")]
    url: String,
}

impl From<RawProduct> for ProductRecord {
    fn from(raw: RawProduct) -> Self {
        let sku = raw.skus.into_iter().next().unwrap_or_default();
        Self {
            item_id: raw.item_id,
            name: raw.attributes.name,
            brand: raw.attributes.brand,
            status: raw.status,
            created_time: raw.created_time,
            updated_time: raw.updated_time,
            price: sku.price,
            special_price: sku.special_price,
            quantity: sku.quantity,
            url: sku.url,
            images: raw.images,
        }
    }
}
