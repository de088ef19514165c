//! `/orders/get` payload schema.

use lazsync_types::OrderRecord;
use serde::Deserialize;

use crate::lenient;

/// Page payload of the orders endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct OrdersPage {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub(crate) orders: Vec<RawOrder>,
}

/// One order as sent by the API.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawOrder {
    #[serde(default, deserialize_with = "lenient::string")]
    order_number: String,
    #[serde(default, deserialize_with = "lenient::string")]
    created_at: String,
    #[serde(default, deserialize_with = "lenient::string")]
    updated_at: String,
    #[serde(default, deserialize_with = "lenient::float")]
    price: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    voucher_platform: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    voucher_seller: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    shipping_fee_discount_platform: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    warehouse_code: String,
    #[serde(default, deserialize_with = "lenient::float")]
    shipping_fee_original: f64,
    #[serde(default, deserialize_with = "lenient::integer")]
    items_count: i64,
}

impl From<RawOrder> for OrderRecord {
    fn from(raw: RawOrder) -> Self {
        Self {
            order_id: raw.order_number,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            price: raw.price,
            voucher_platform: raw.voucher_platform,
            voucher_seller: raw.voucher_seller,
            shipping_fee_discount: raw.shipping_fee_discount_platform,
            warehouse_code: raw.warehouse_code,
            shipping_fee: raw.shipping_fee_original,
            items_count: raw.items_count,
        }
    }
}
