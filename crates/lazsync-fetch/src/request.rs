//! Request parameter state and signed request values.

use bytes::Bytes;
use reqwest::Url;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::sign::SIGN_METHOD;

/// String-keyed, string-valued request parameters.
pub type Params = BTreeMap<String, String>;

/// File attachments keyed by file name.
pub type FileParams = BTreeMap<String, Bytes>;

/// HTTP method supported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiMethod {
    /// Parameters travel in the query string.
    #[default]
    Get,
    /// Parameters travel in a multipart body.
    Post,
}

impl ApiMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for unsupported HTTP methods.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported method: {0} (expected GET or POST)")]
pub struct MethodParseError(String);

impl std::str::FromStr for ApiMethod {
    type Err = MethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(MethodParseError(s.to_string())),
        }
    }
}

/// Per-client request state.
///
/// The access token and debug flag persist across calls. API and file
/// parameters are single-use: [`crate::ApiClient::execute`] takes them out of
/// the context, so every call starts from an empty parameter set.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    access_token: Option<String>,
    debug: Option<bool>,
    api_params: Params,
    file_params: FileParams,
}

impl RequestContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the seller access token sent as a system parameter.
    pub fn set_access_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the `debug` system parameter.
    pub const fn set_debug(&mut self, enabled: bool) -> &mut Self {
        self.debug = Some(enabled);
        self
    }

    /// Adds an API parameter, replacing any previous value for the key.
    pub fn add_api_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.api_params.insert(key.into(), value.into());
        self
    }

    /// Adds a file attachment.
    pub fn add_file_param(&mut self, key: impl Into<String>, data: impl Into<Bytes>) -> &mut Self {
        self.file_params.insert(key.into(), data.into());
        self
    }

    /// Returns the access token, if set.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Returns the debug flag, if set.
    #[must_use]
    pub const fn debug(&self) -> Option<bool> {
        self.debug
    }

    /// Returns the pending API parameters.
    #[must_use]
    pub const fn api_params(&self) -> &Params {
        &self.api_params
    }

    /// Returns the pending file attachments.
    #[must_use]
    pub const fn file_params(&self) -> &FileParams {
        &self.file_params
    }

    /// Returns a context with the same token and debug flag but no pending
    /// parameters.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            access_token: self.access_token.clone(),
            debug: self.debug,
            api_params: Params::new(),
            file_params: FileParams::new(),
        }
    }

    /// Takes the pending parameters out, leaving both maps empty.
    pub(crate) fn take_params(&mut self) -> (Params, FileParams) {
        (
            std::mem::take(&mut self.api_params),
            std::mem::take(&mut self.file_params),
        )
    }

    /// Builds the system parameters for a call made at `timestamp`.
    pub(crate) fn system_params(&self, app_key: &str, partner_id: &str, timestamp: &str) -> Params {
        let mut params = Params::new();
        params.insert("app_key".to_string(), app_key.to_string());
        params.insert("sign_method".to_string(), SIGN_METHOD.to_string());
        params.insert("timestamp".to_string(), timestamp.to_string());
        params.insert("partner_id".to_string(), partner_id.to_string());
        if let Some(token) = &self.access_token {
            params.insert("access_token".to_string(), token.clone());
        }
        if let Some(debug) = self.debug {
            params.insert("debug".to_string(), debug.to_string());
        }
        params
    }
}

/// A fully signed, immutable request ready for transport.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub(crate) method: ApiMethod,
    pub(crate) path: String,
    pub(crate) url: Url,
    pub(crate) form: Vec<(String, String)>,
    pub(crate) files: Vec<(String, Bytes)>,
    pub(crate) signature: String,
}

impl SignedRequest {
    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> ApiMethod {
        self.method
    }

    /// Returns the API path that was signed.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the full URL including the query string and signature.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the multipart form fields (POST only).
    #[must_use]
    pub fn form(&self) -> &[(String, String)] {
        &self.form
    }

    /// Returns the file parts (POST only).
    #[must_use]
    pub fn files(&self) -> &[(String, Bytes)] {
        &self.files
    }

    /// Returns the uppercase hex signature.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Returns the value of a query parameter.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}
