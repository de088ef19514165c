//! Signed partner API client and concurrent paginator.
//!
//! This is a facade crate that re-exports functionality from the lazsync
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use lazsync_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::new("123456", "app-secret", "MY")?;
//!     let mut client = ApiClient::with_defaults(credentials)?;
//!     client.set_access_token("seller-access-token");
//!
//!     let mut query = Params::new();
//!     query.insert("created_after".into(), "2024-11-10T09:00:00+08:00".into());
//!
//!     let config = HarvestConfig::default();
//!     let harvest = harvest(&client, Collection::Orders, &query, &config).await?;
//!     let records = harvest_records(&harvest)?;
//!     println!("{} orders", records.len());
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lazsync/lazsync/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use lazsync_types::*;

// Re-export region registry
pub use lazsync_regions::RegionTable;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use lazsync_fetch::{
    ApiClient, ApiError, ApiMethod, ClientConfig, CollectionFetcher, EmptyCountPolicy,
    FailurePolicy, FileParams, Harvest, HarvestConfig, MethodParseError, PageFailure, PageFetcher,
    PageOutcome, PagePayload, Params, PoolReport, RequestContext, SIGN_METHOD, SignedRequest,
    Signer, TokenGrant, TotalCount, WorkerPool, count_at_path, discover_total, exchange_code,
    harvest, page_stream, signing_string, url::authorize_url,
};

// Re-export normalization
#[cfg(feature = "transform")]
pub use lazsync_transform::{TransformError, normalize, normalize_pages};

// Re-export formatters
#[cfg(feature = "format")]
pub use lazsync_format::{CsvFormatter, FormatError, Formatter, JsonFormatter, OutputFormat};

/// Normalizes every fetched page of a harvest, in offset order.
///
/// # Errors
///
/// Returns an error if any page payload cannot be normalized.
#[cfg(all(feature = "fetch", feature = "transform"))]
pub fn harvest_records(harvest: &Harvest) -> Result<Records> {
    let pages = harvest.report().sorted_pages();
    let records = normalize_pages(
        harvest.collection(),
        pages.iter().map(|page| page.data.as_deref()),
    )?;
    Ok(records)
}

/// Prelude module for convenient imports.
///
/// ```
/// use lazsync_lib::prelude::*;
/// ```
pub mod prelude {
    pub use lazsync_types::{
        Collection, ConfigError, Credentials, Envelope, LazsyncError, OrderRecord, PagePlan,
        PageTask, ProductRecord, Records, Region, Result, SuccessCodes, plan_pages,
    };

    pub use lazsync_regions::RegionTable;

    #[cfg(feature = "fetch")]
    pub use lazsync_fetch::{
        ApiClient, ApiMethod, ClientConfig, FailurePolicy, HarvestConfig, Params, WorkerPool,
        harvest,
    };

    #[cfg(all(feature = "fetch", feature = "transform"))]
    pub use crate::harvest_records;

    #[cfg(feature = "transform")]
    pub use lazsync_transform::normalize;

    #[cfg(feature = "format")]
    pub use lazsync_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};
}
