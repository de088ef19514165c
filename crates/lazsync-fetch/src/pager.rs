//! Total count discovery.

use serde_json::Value;
use serde_json::value::RawValue;
use tracing::{info, warn};

use crate::{ApiClient, ApiError, ApiMethod};

pub use lazsync_types::plan_pages;

/// Total item count reported by a probe call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalCount {
    /// The payload carried a usable count.
    Reported(u64),
    /// The count field was absent or not numeric.
    Missing,
}

impl TotalCount {
    /// Returns the count, treating a missing count as zero.
    #[must_use]
    pub const fn value(&self) -> u64 {
        match self {
            Self::Reported(n) => *n,
            Self::Missing => 0,
        }
    }

    /// Returns true if the payload carried a count.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::Reported(_))
    }
}

/// Discovers the total item count of a collection.
///
/// Issues one GET with `offset=0` on top of any parameters pending on
/// `client`, requires a successful envelope, and reads the count at
/// `count_field` inside `data`.
///
/// # Errors
///
/// Returns an error if the probe fails or the envelope reports a failure.
pub async fn discover_total(
    client: &mut ApiClient,
    endpoint: &str,
    count_field: &str,
) -> Result<TotalCount, ApiError> {
    client.add_api_param("offset", "0");
    let envelope = client.execute(endpoint, ApiMethod::Get, None).await?;
    let envelope = client.ensure_success(envelope)?;

    let total = envelope
        .data()
        .map_or(TotalCount::Missing, |data| count_at_path(data, count_field));

    match total {
        TotalCount::Reported(n) => info!(endpoint, total = n, "total count discovered"),
        TotalCount::Missing => warn!(endpoint, count_field, "no total count in probe response"),
    }
    Ok(total)
}

/// Reads an item count at a dotted path such as `countTotal` or `a.b.0.c`.
///
/// Numeric segments index into arrays. Integers, finite floats (truncated)
/// and numeric strings are accepted; negative values clamp to zero.
#[must_use]
pub fn count_at_path(data: &RawValue, path: &str) -> TotalCount {
    let Ok(value) = serde_json::from_str::<Value>(data.get()) else {
        return TotalCount::Missing;
    };

    let mut current = &value;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(v) => current = v,
            None => return TotalCount::Missing,
        }
    }

    coerce_count(current).map_or(TotalCount::Missing, TotalCount::Reported)
}

fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(clamp))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<i64>().ok().map(clamp))
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(truncate)
                })
        }
        _ => None,
    }
}

const fn clamp(n: i64) -> u64 {
    if n < 0 { 0 } else { n as u64 }
}

fn truncate(f: f64) -> u64 {
    if f <= 0.0 { 0 } else { f.trunc() as u64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client_for;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn raw(json: &str) -> Box<RawValue> {
        RawValue::from_string(json.to_string()).unwrap()
    }

    #[test]
    fn test_count_at_top_level() {
        assert_eq!(
            count_at_path(&raw(r#"{"countTotal":45}"#), "countTotal"),
            TotalCount::Reported(45)
        );
    }

    #[test]
    fn test_count_at_nested_path() {
        let data = raw(r#"{"a":{"b":[{"c":7},{"c":9}]}}"#);
        assert_eq!(count_at_path(&data, "a.b.1.c"), TotalCount::Reported(9));
        assert_eq!(count_at_path(&data, "a.b.5.c"), TotalCount::Missing);
        assert_eq!(count_at_path(&data, "a.x"), TotalCount::Missing);
    }

    #[test]
    fn test_count_coercion() {
        let data = raw(r#"{"s":"20","f":20.9,"neg":-3,"word":"many","null":null,"obj":{}}"#);
        assert_eq!(count_at_path(&data, "s"), TotalCount::Reported(20));
        assert_eq!(count_at_path(&data, "f"), TotalCount::Reported(20));
        assert_eq!(count_at_path(&data, "neg"), TotalCount::Reported(0));
        assert_eq!(count_at_path(&data, "word"), TotalCount::Missing);
        assert_eq!(count_at_path(&data, "null"), TotalCount::Missing);
        assert_eq!(count_at_path(&data, "obj"), TotalCount::Missing);
    }

    #[test]
    fn test_count_from_decimal_string() {
        let data = raw(r#"{"a":"20.0","b":" 7.9 ","c":"-2.5","d":"NaN","e":"inf"}"#);
        assert_eq!(count_at_path(&data, "a"), TotalCount::Reported(20));
        assert_eq!(count_at_path(&data, "b"), TotalCount::Reported(7));
        assert_eq!(count_at_path(&data, "c"), TotalCount::Reported(0));
        assert_eq!(count_at_path(&data, "d"), TotalCount::Missing);
        assert_eq!(count_at_path(&data, "e"), TotalCount::Missing);
    }

    #[test]
    fn test_missing_count_is_zero() {
        assert_eq!(TotalCount::Missing.value(), 0);
        assert!(!TotalCount::Missing.is_reported());
        assert!(TotalCount::Reported(0).is_reported());
    }

    #[tokio::test]
    async fn test_discover_total() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders/get"))
            .and(query_param("offset", "0"))
            .and(query_param("created_after", "2024-11-10T09:00:00+08:00"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"code":"0","data":{"countTotal":20,"orders":[]}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server.uri());
        client.add_api_param("created_after", "2024-11-10T09:00:00+08:00");
        let total = discover_total(&mut client, "/orders/get", "countTotal")
            .await
            .unwrap();
        assert_eq!(total, TotalCount::Reported(20));
    }

    #[tokio::test]
    async fn test_discover_total_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":"0","data":{}}"#))
            .mount(&server)
            .await;

        let mut client = client_for(&server.uri());
        let total = discover_total(&mut client, "/products/get", "total_products")
            .await
            .unwrap();
        assert_eq!(total, TotalCount::Missing);
    }

    #[tokio::test]
    async fn test_discover_total_application_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"type":"ISP","code":"ApiCallLimit","message":"slow down","request_id":"r3"}"#,
            ))
            .mount(&server)
            .await;

        let mut client = client_for(&server.uri());
        let err = discover_total(&mut client, "/orders/get", "countTotal")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Application(_)));
    }
}
