//! Region definitions.

use serde::{Deserialize, Serialize};

/// A marketplace region served by its own REST gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region code (e.g., "MY", "SG").
    code: String,
    /// Human-readable name (e.g., "Malaysia").
    name: String,
    /// REST gateway base URL, without a trailing slash.
    base_url: String,
}

impl Region {
    /// Creates a new region.
    ///
    /// The code is normalized to uppercase and any trailing `/` is removed
    /// from the base URL so that API paths can be appended directly.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            code: code.into().to_uppercase(),
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the region code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the REST gateway base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the full URL for an API path such as `/orders/get`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}
