//! Signed HTTP client for the partner API.

use chrono::Utc;
use lazsync_regions::RegionTable;
use lazsync_types::{
    ApplicationError, ConfigError, Credentials, Envelope, LazsyncError, SuccessCodes,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::request::{ApiMethod, FileParams, Params, RequestContext, SignedRequest};
use crate::sign::Signer;

/// Multipart field name used for every file part.
const FILE_FIELD: &str = "image";

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Value of the `partner_id` system parameter.
    pub partner_id: String,
    /// Envelope codes treated as success.
    pub success_codes: SuccessCodes,
    /// Idle connections kept per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("lazsync/{}", env!("CARGO_PKG_VERSION")),
            partner_id: format!("lazsync-rs-{}", env!("CARGO_PKG_VERSION")),
            success_codes: SuccessCodes::default(),
            pool_max_idle_per_host: 10,
        }
    }
}

/// Errors that can occur during a single API call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The client configuration cannot serve the call.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    /// The server answered with a failure status and a non-envelope body.
    #[error("Server error: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The body is not a JSON envelope, or the payload has the wrong shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope reports an application failure.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A required field is absent from the response payload.
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),
}

impl ApiError {
    /// Wraps a transport error, dropping the URL.
    ///
    /// Request URLs carry the access token and signature in the query string.
    pub(crate) fn transport(error: reqwest::Error) -> Self {
        Self::Transport(error.without_url())
    }
}

impl From<ApiError> for LazsyncError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Config(e) => Self::Config(e),
            ApiError::Application(e) => Self::Application(e),
            ApiError::Decode(e) => Self::Decode(e.to_string()),
            ApiError::MissingField(field) => Self::Decode(format!("missing field {field}")),
            e @ (ApiError::Transport(_) | ApiError::Status { .. } | ApiError::InvalidUrl(_)) => {
                Self::Http(e.to_string())
            }
        }
    }
}

/// Signed API client.
///
/// A client owns one [`RequestContext`]. Credentials, configuration, the
/// region table and the HTTP connection pool are shared with every client
/// created through [`ApiClient::fork`].
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    signer: Arc<Signer>,
    credentials: Arc<Credentials>,
    regions: Arc<RegionTable>,
    config: Arc<ClientConfig>,
    region: String,
    context: RequestContext,
}

impl ApiClient {
    /// Creates a client using the built-in region table.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials' region is unknown or the HTTP
    /// client cannot be created.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self, ApiError> {
        Self::with_regions(credentials, config, RegionTable::global().clone())
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials' region is unknown or the HTTP
    /// client cannot be created.
    pub fn with_defaults(credentials: Credentials) -> Result<Self, ApiError> {
        Self::new(credentials, ClientConfig::default())
    }

    /// Creates a client resolving regions through the given table.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials' region is not in `regions` or the
    /// HTTP client cannot be created.
    pub fn with_regions(
        credentials: Credentials,
        config: ClientConfig,
        regions: RegionTable,
    ) -> Result<Self, ApiError> {
        regions.resolve(credentials.region())?;

        let http = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(ApiError::transport)?;

        Ok(Self {
            http,
            signer: Arc::new(Signer::new(credentials.app_secret())),
            region: credentials.region().to_string(),
            credentials: Arc::new(credentials),
            regions: Arc::new(regions),
            config: Arc::new(config),
            context: RequestContext::new(),
        })
    }

    /// Returns a client sharing this client's pool, credentials and
    /// configuration, with the same region, access token and debug flag but
    /// no pending parameters.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            http: self.http.clone(),
            signer: Arc::clone(&self.signer),
            credentials: Arc::clone(&self.credentials),
            regions: Arc::clone(&self.regions),
            config: Arc::clone(&self.config),
            region: self.region.clone(),
            context: self.context.fork(),
        }
    }

    /// Sets the seller access token.
    pub fn set_access_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.context.set_access_token(token);
        self
    }

    /// Switches the region used for subsequent calls.
    ///
    /// The code is not validated here; an unknown region fails the next call.
    pub fn set_region(&mut self, region: impl Into<String>) -> &mut Self {
        self.region = region.into().to_uppercase();
        self
    }

    /// Sets the `debug` system parameter.
    pub fn set_debug(&mut self, enabled: bool) -> &mut Self {
        self.context.set_debug(enabled);
        self
    }

    /// Adds an API parameter for the next call.
    pub fn add_api_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.context.add_api_param(key, value);
        self
    }

    /// Adds a file attachment for the next call.
    pub fn add_file_param(
        &mut self,
        key: impl Into<String>,
        data: impl Into<bytes::Bytes>,
    ) -> &mut Self {
        self.context.add_file_param(key, data);
        self
    }

    /// Adds every parameter of `params` for the next call.
    pub fn extend_api_params<'a>(
        &mut self,
        params: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> &mut Self {
        for (key, value) in params {
            self.context.add_api_param(key.as_str(), value.as_str());
        }
        self
    }

    /// Returns the credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the current region code.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the region table.
    #[must_use]
    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    /// Returns the request context.
    #[must_use]
    pub const fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Resolves a region code to its gateway base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRegion`] if the code is not in the table.
    pub fn resolve_endpoint(&self, region: &str) -> Result<&str, ConfigError> {
        self.regions.resolve(region)
    }

    /// Builds the authorization URL a seller opens to grant access.
    ///
    /// # Errors
    ///
    /// Returns an error if the callback cannot be encoded into a URL.
    pub fn authorize_url(&self, callback: &str) -> Result<Url, ApiError> {
        crate::url::authorize_url(self.credentials.app_key(), &self.region, callback)
    }

    /// Signs a call without sending it.
    ///
    /// GET calls carry the system parameters, the API parameters and `sign`
    /// in the query string. POST calls carry the system parameters and `sign`
    /// in the query string and the API parameters as form fields; a system
    /// parameter shadowed by an API parameter is left out of the query.
    ///
    /// `path` is signed as sent: a missing leading `/` is added first.
    ///
    /// # Errors
    ///
    /// Returns an error if the current region is unknown or the URL cannot be
    /// built.
    pub fn prepare(
        &self,
        path: &str,
        method: ApiMethod,
        api_params: Params,
        files: FileParams,
    ) -> Result<SignedRequest, ApiError> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        let endpoint = self
            .regions
            .get(&self.region)
            .ok_or_else(|| ConfigError::UnknownRegion(self.region.clone()))?
            .endpoint(&path);

        let timestamp = format!("{}000", Utc::now().timestamp());
        let system = self.context.system_params(
            self.credentials.app_key(),
            &self.config.partner_id,
            &timestamp,
        );
        let signature = self.signer.sign(&path, &system, &api_params);

        let (mut query, form) = match method {
            ApiMethod::Get => {
                let mut query = system;
                query.extend(api_params);
                (query, Vec::new())
            }
            ApiMethod::Post => {
                let mut query = system;
                query.retain(|key, _| !api_params.contains_key(key));
                (query, api_params.into_iter().collect())
            }
        };
        query.insert("sign".to_string(), signature.clone());

        let url = Url::parse_with_params(&endpoint, &query)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        Ok(SignedRequest {
            method,
            path,
            url,
            form,
            files: match method {
                ApiMethod::Get => Vec::new(),
                ApiMethod::Post => files.into_iter().collect(),
            },
            signature,
        })
    }

    /// Sends a signed request and decodes the response envelope.
    ///
    /// A well-formed envelope is returned even when it reports an
    /// application failure; see [`ApiClient::ensure_success`].
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, or if the body is not an
    /// envelope.
    #[instrument(level = "debug", skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: SignedRequest) -> Result<Envelope, ApiError> {
        let SignedRequest {
            method,
            url,
            form,
            files,
            ..
        } = request;

        let builder = match method {
            ApiMethod::Get => self.http.get(url),
            ApiMethod::Post => {
                let mut multipart = Form::new();
                for (key, value) in form {
                    multipart = multipart.text(key, value);
                }
                for (name, data) in files {
                    let part = Part::bytes(data.to_vec()).file_name(name);
                    multipart = multipart.part(FILE_FIELD, part);
                }
                self.http.post(url).multipart(multipart)
            }
        };

        let response = builder.send().await.map_err(ApiError::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::transport)?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        match Envelope::from_slice(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(ApiError::Status {
                status: status.as_u16(),
            }),
            Err(e) => Err(ApiError::Decode(e)),
        }
    }

    /// Executes one API call with the pending parameters.
    ///
    /// `body_params` are merged into the API parameters, so they are signed.
    /// The pending API and file parameters are consumed whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the call cannot be prepared or sent.
    pub async fn execute(
        &mut self,
        path: &str,
        method: ApiMethod,
        body_params: Option<Params>,
    ) -> Result<Envelope, ApiError> {
        let (mut api_params, files) = self.context.take_params();
        if let Some(body) = body_params {
            api_params.extend(body);
        }
        let request = self.prepare(path, method, api_params, files)?;
        self.send(request).await
    }

    /// Checks an envelope against the configured success codes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Application`] if the envelope reports a failure.
    pub fn ensure_success(&self, envelope: Envelope) -> Result<Envelope, ApiError> {
        envelope
            .ensure_success(&self.config.success_codes)
            .map_err(ApiError::from)
    }
}
