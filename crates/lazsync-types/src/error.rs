//! Error types for lazsync.

use thiserror::Error;

/// Result type alias for lazsync operations.
pub type Result<T> = std::result::Result<T, LazsyncError>;

/// Errors that can occur while harvesting and processing a collection.
#[derive(Error, Debug)]
pub enum LazsyncError {
    /// Client configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The API answered with a failure code.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// The count probe did not report a total.
    #[error("No total count reported by {endpoint}")]
    MissingCount {
        /// The endpoint that was probed.
        endpoint: String,
    },

    /// Some pages could not be fetched.
    #[error("{failed} of {planned} pages failed")]
    PartialFailure {
        /// Number of failed pages.
        failed: usize,
        /// Number of planned pages.
        planned: usize,
    },

    /// Invalid page plan.
    #[error(transparent)]
    PagePlan(#[from] PagePlanError),

    /// Payload could not be normalized.
    #[error("Transform error: {0}")]
    Transform(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output format error.
    #[error("Format error: {0}")]
    Format(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A failure reported inside a well-formed response envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("API error {code}: {message} (request {request_id})")]
pub struct ApplicationError {
    /// Envelope code.
    pub code: String,
    /// Error type (`ISV`, `ISP`, `SYSTEM`).
    pub kind: String,
    /// Envelope message.
    pub message: String,
    /// Request identifier assigned by the gateway.
    pub request_id: String,
}

/// Configuration errors. These are fatal to a call and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The region code has no gateway in the region table.
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// A required credential is empty.
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Error for invalid page plans.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PagePlanError {
    /// The page size must be at least one.
    #[error("Invalid page size: 0")]
    ZeroPageSize,
}
