//! Authorization URL construction.

use reqwest::Url;

use crate::ApiError;

/// Authorization endpoint a seller opens to grant access.
pub const AUTH_URL: &str = "https://auth.lazada.com/oauth/authorize";

/// Builds the seller authorization URL.
///
/// Query parameters are emitted in key order: `client_id`, `country`,
/// `force_auth`, `redirect_uri`, `response_type`.
///
/// # Example
///
/// ```
/// use lazsync_fetch::url::authorize_url;
///
/// let url = authorize_url("123456", "MY", "https://example.com/cb").unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://auth.lazada.com/oauth/authorize?client_id=123456&country=MY&force_auth=true&redirect_uri=https%3A%2F%2Fexample.com%2Fcb&response_type=code"
/// );
/// ```
///
/// # Errors
///
/// Returns an error if the URL cannot be built.
pub fn authorize_url(app_key: &str, region: &str, callback: &str) -> Result<Url, ApiError> {
    Url::parse_with_params(
        AUTH_URL,
        [
            ("client_id", app_key),
            ("country", region),
            ("force_auth", "true"),
            ("redirect_uri", callback),
            ("response_type", "code"),
        ],
    )
    .map_err(|e| ApiError::InvalidUrl(e.to_string()))
}
