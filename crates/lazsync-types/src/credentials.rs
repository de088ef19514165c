//! API credentials.

use std::fmt;

use crate::ConfigError;

/// App credentials issued by the open platform.
///
/// The secret is only reachable through [`Credentials::app_secret`] and is
/// redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    app_key: String,
    app_secret: String,
    region: String,
}

impl Credentials {
    /// Creates credentials, rejecting an empty key or secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] if the key or secret is empty.
    pub fn new(
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let app_key = app_key.into();
        let app_secret = app_secret.into();
        if app_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential("app key"));
        }
        if app_secret.is_empty() {
            return Err(ConfigError::MissingCredential("app secret"));
        }
        Ok(Self {
            app_key,
            app_secret,
            region: region.into().to_uppercase(),
        })
    }

    /// Returns the app key.
    #[must_use]
    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    /// Returns the app secret used as the HMAC key.
    #[must_use]
    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }

    /// Returns the home region code (uppercase).
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("app_secret", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}
