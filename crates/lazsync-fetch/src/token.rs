//! Authorization code exchange.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ApiClient, ApiError, ApiMethod};

/// Path of the token creation endpoint.
pub const TOKEN_CREATE_PATH: &str = "/auth/token/create";

/// Access grant returned by the token exchange.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    /// Seller access token.
    #[serde(default)]
    pub access_token: String,
    /// Token used to refresh the grant.
    #[serde(default)]
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: i64,
    /// Refresh token lifetime in seconds.
    #[serde(default)]
    pub refresh_expires_in: i64,
    /// Seller account name.
    #[serde(default)]
    pub account: String,
    /// Seller country.
    #[serde(default)]
    pub country: String,
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("refresh_expires_in", &self.refresh_expires_in)
            .field("account", &self.account)
            .field("country", &self.country)
            .finish()
    }
}

/// Exchanges an authorization code for an access grant.
///
/// Any parameters pending on `client` are sent along with the code and
/// consumed.
///
/// # Errors
///
/// Returns an error if the call fails, the envelope reports a failure, or the
/// payload carries no access token.
pub async fn exchange_code(client: &mut ApiClient, code: &str) -> Result<TokenGrant, ApiError> {
    client.add_api_param("code", code);
    let envelope = client.execute(TOKEN_CREATE_PATH, ApiMethod::Get, None).await?;
    let envelope = client.ensure_success(envelope)?;

    let grant: Option<TokenGrant> = envelope.decode_data()?;
    let grant = grant.ok_or(ApiError::MissingField("access_token"))?;
    if grant.access_token.is_empty() {
        return Err(ApiError::MissingField("access_token"));
    }
    info!(account = %grant.account, expires_in = grant.expires_in, "access token granted");
    Ok(grant)
}
