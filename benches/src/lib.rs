//! Fixtures shared by the lazsync benchmarks.

use lazsync_lib::Params;
use serde_json::value::RawValue;

/// Secret used by every signing benchmark.
pub const SECRET: &str = "helloworld";

/// System parameters as sent on an authenticated call.
pub fn system_params() -> Params {
    [
        ("app_key", "123456"),
        ("sign_method", "sha256"),
        ("timestamp", "1517820392000"),
        ("access_token", "test"),
        ("partner_id", "lazsync-bench"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// `count` API parameters with distinct keys.
pub fn api_params(count: usize) -> Params {
    (0..count)
        .map(|n| (format!("param_{n:03}"), format!("value-{n}")))
        .collect()
}

/// An orders page payload (`data` object) holding `count` orders.
pub fn orders_payload(count: usize) -> Box<RawValue> {
    let orders: Vec<String> = (0..count)
        .map(|n| {
            format!(
                r#"{{"order_number":{},"created_at":"2024-11-10 09:15:00 +0800","updated_at":"2024-11-11 10:00:00 +0800","price":"1,{:03}.50","voucher_platform":0,"voucher_seller":"2.00","shipping_fee_discount_platform":0,"warehouse_code":"dropshipping","shipping_fee_original":"4.90","items_count":{}}}"#,
                200_000_000 + n,
                n % 1000,
                n % 5 + 1
            )
        })
        .collect();
    let json = format!(
        r#"{{"count":{count},"countTotal":{count},"orders":[{}]}}"#,
        orders.join(",")
    );
    RawValue::from_string(json).expect("fixture is valid JSON")
}
